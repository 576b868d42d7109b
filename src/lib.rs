pub mod core {
    pub mod config;
    pub mod error;
    pub mod routes;
    pub mod startup;
    pub mod state;
    pub mod tracing_init;
}

pub mod oauth {
    pub mod request;
    pub mod signature;
    pub mod token;
}

pub mod backends {
    pub mod base;
    pub mod google;
    pub mod orkut;
    pub mod registry;
}

pub mod handlers {
    pub mod auth;
    pub mod fallback;
    pub mod health;
}

pub mod models {
    pub mod auth;
    pub mod user;
}

pub mod stores {
    pub mod token_store;
}

pub mod utils {
    pub mod auth;
    pub mod time;
}
