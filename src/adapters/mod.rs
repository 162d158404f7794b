// Adapters layer: concrete implementations of the domain ports (http, storage, session).

pub mod http;
pub mod session;
pub mod storage;

pub use http::HttpContentService;
pub use session::{Credential, FileSession};
pub use storage::LocalStorage;
