#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::{LoggingConfig, PortalConfig, ServiceSection, SessionConfig};

#[cfg(feature = "cli")]
pub use cli::CliArgs;

/// Connection settings for the remote content service.
pub trait ServiceConfig: Send + Sync {
    fn endpoint(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn upload_chunk_size(&self) -> usize;
}
