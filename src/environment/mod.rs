pub mod config;
pub mod types;

pub use config::ConfigLoader;
pub use types::{Environment, EnvironmentConfig, KvPayload, merge_missing};
