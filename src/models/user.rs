use serde::{Deserialize, Serialize};

/// Normalized profile handed to the session layer after a login
///
/// Every field is optional: providers may omit any of them and the record is
/// passed on partially filled rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub username: Option<String>,
    pub email: Option<String>,
    pub fullname: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl UserDetails {
    /// True when all five fields were found in the provider response
    pub fn is_complete(&self) -> bool {
        self.username.is_some()
            && self.email.is_some()
            && self.fullname.is_some()
            && self.firstname.is_some()
            && self.lastname.is_some()
    }
}
