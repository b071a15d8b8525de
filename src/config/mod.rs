mod secret;
mod store;


use serde::{Deserialize, Serialize};

pub use secret::SharedSecret;
pub use store::ConfigStore;

/// Controller configuration generated once at first-run setup and read-only
/// afterwards. Field names match the persisted JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub admin: String,
    pub password: String,
    pub root_url: String,
    pub random_key: String,
}

impl ControllerConfig {
    /// The shared secret workers must present when registering.
    pub fn shared_secret(&self) -> SharedSecret {
        SharedSecret::new(self.random_key.clone())
    }
}
