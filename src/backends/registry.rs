use std::collections::HashMap;
use std::sync::Arc;

use crate::backends::base::AuthBackend;

/// Backends available to the HTTP layer, keyed by name
#[derive(Default)]
pub struct Registry {
    backends: HashMap<&'static str, Arc<dyn AuthBackend>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a backend. A backend with the same name is replaced.
    pub fn register(&mut self, backend: Arc<dyn AuthBackend>) {
        self.backends.insert(backend.name(), backend);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AuthBackend>> {
        self.backends.get(name).map(Arc::clone)
    }

    /// Sorted names of every registered backend
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.backends.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn enabled_names(&self) -> Vec<&'static str> {
        self.names()
            .into_iter()
            .filter(|name| self.backends[name].enabled())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
