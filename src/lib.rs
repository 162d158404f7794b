pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{Credential, FileSession, HttpContentService, LocalStorage};
pub use config::{PortalConfig, ServiceConfig};
pub use core::{AdminGate, AuthFlow, DataAccess, QueryCache, QueryKey, Scope};
pub use utils::error::{PortalError, Result};
