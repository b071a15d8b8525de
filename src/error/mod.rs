mod app;
mod config;
mod engine;
mod registry;
mod server;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use engine::EngineError;
pub use registry::RegistryError;
pub use server::ServerError;
