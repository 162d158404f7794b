pub mod auth;
pub mod cache;
pub mod data_access;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::*;
pub use crate::domain::ports::{BlobStore, ContentService, IdentityProvider, Storage};
pub use crate::utils::error::Result;
pub use auth::{AdminGate, AuthFlow, GateState, Guarded};
pub use cache::{QueryCache, QueryKey, Scope};
pub use data_access::{DataAccess, NotesInput, QuestionPaperInput};
