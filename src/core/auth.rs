use crate::core::cache::QueryCache;
use crate::core::data_access::DataAccess;
use crate::domain::model::{Identity, UserProfile};
use crate::domain::ports::{BlobStore, ContentService, IdentityProvider};
use crate::utils::error::{PortalError, Result};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Checking,
    Denied,
    Granted,
}

/// Admin-only content, or the reason it is withheld.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    Checking,
    Denied,
    Content(T),
}

/// Gate in front of admin-only content.
///
/// Starts in `Checking`; the admin-flag answer moves it to `Granted` or
/// `Denied`. A failed check denies, and nothing retries it.
#[derive(Debug, Clone)]
pub struct AdminGate {
    state: GateState,
}

impl AdminGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Checking,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_granted(&self) -> bool {
        self.state == GateState::Granted
    }

    pub fn resolve(&mut self, outcome: &Result<bool>) -> GateState {
        self.state = match outcome {
            Ok(true) => GateState::Granted,
            Ok(false) => GateState::Denied,
            Err(e) => {
                tracing::warn!("🔒 Admin check failed: {}", e);
                GateState::Denied
            }
        };
        self.state
    }

    pub async fn check<S: ContentService + BlobStore>(&mut self, data: &DataAccess<S>) -> GateState {
        let outcome = data.is_caller_admin().await;
        self.resolve(&outcome)
    }

    /// Build the guarded content only once access is granted.
    pub fn guard<T>(&self, render: impl FnOnce() -> T) -> Guarded<T> {
        match self.state {
            GateState::Checking => Guarded::Checking,
            GateState::Denied => Guarded::Denied,
            GateState::Granted => Guarded::Content(render()),
        }
    }
}

impl Default for AdminGate {
    fn default() -> Self {
        Self::new()
    }
}

const LOGIN_RETRY_DELAY: Duration = Duration::from_millis(300);

pub struct AuthFlow<I: IdentityProvider> {
    provider: I,
    retry_delay: Duration,
}

impl<I: IdentityProvider> AuthFlow<I> {
    pub fn new(provider: I) -> Self {
        Self {
            provider,
            retry_delay: LOGIN_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn provider(&self) -> &I {
        &self.provider
    }

    /// Log in. A stale "already authenticated" session is cleared and the
    /// login retried exactly once.
    pub async fn login(&self) -> Result<Identity> {
        match self.provider.login().await {
            Err(PortalError::AlreadyAuthenticated) => {
                tracing::warn!("🔁 Session already active, clearing and retrying login");
                self.provider.clear().await?;
                tokio::time::sleep(self.retry_delay).await;
                self.provider.login().await
            }
            other => other,
        }
    }

    pub async fn logout(&self, cache: &QueryCache) -> Result<()> {
        self.provider.clear().await?;
        cache.clear();
        tracing::info!("👋 Logged out");
        Ok(())
    }

    pub async fn identity(&self) -> Result<Option<Identity>> {
        self.provider.current().await
    }
}

/// The profile prompt shows once the profile read has finished and found nothing.
/// `profile` is `None` while the read has not completed.
pub fn needs_profile_setup(authenticated: bool, profile: Option<&Option<UserProfile>>) -> bool {
    authenticated && matches!(profile, Some(None))
}
