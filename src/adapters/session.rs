use crate::domain::model::{Identity, Principal};
use crate::domain::ports::{IdentityProvider, Storage};
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use chrono::Utc;

pub const DEFAULT_SESSION_FILE: &str = "session.json";

/// Caller credential handed out by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub principal: Principal,
    pub token: String,
}

/// Session persisted as a JSON file through a `Storage` backend.
///
/// Logging in while the file exists fails with `AlreadyAuthenticated`, the
/// same way a browser identity client refuses a second login.
#[derive(Debug, Clone)]
pub struct FileSession<S: Storage> {
    storage: S,
    file_name: String,
    credential: Option<Credential>,
}

impl<S: Storage> FileSession<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            file_name: DEFAULT_SESSION_FILE.to_string(),
            credential: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    async fn read_session(&self) -> Result<Option<Identity>> {
        match self.storage.read_file(&self.file_name).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(PortalError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<S: Storage> IdentityProvider for FileSession<S> {
    async fn login(&self) -> Result<Identity> {
        if self.read_session().await?.is_some() {
            return Err(PortalError::AlreadyAuthenticated);
        }

        let credential = self
            .credential
            .as_ref()
            .ok_or_else(|| PortalError::NotAuthenticated {
                message: "no credential configured (set session.principal and session.token)"
                    .to_string(),
            })?;

        let identity = Identity {
            principal: credential.principal.clone(),
            token: credential.token.clone(),
            authenticated_at: Utc::now(),
        };

        let data = serde_json::to_vec_pretty(&identity)?;
        self.storage.write_file(&self.file_name, &data).await?;
        tracing::info!("🔑 Logged in as {}", identity.principal);
        Ok(identity)
    }

    async fn clear(&self) -> Result<()> {
        self.storage.remove_file(&self.file_name).await
    }

    async fn current(&self) -> Result<Option<Identity>> {
        self.read_session().await
    }
}
