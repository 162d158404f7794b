use crate::utils::error::{PortalError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{broadcast, OnceCell};

/// First element of every cache key. Invalidation works on whole scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Branches,
    Branch,
    Semesters,
    Subjects,
    Subject,
    Notes,
    QuestionPapers,
    Mcqs,
    Syllabus,
    Search,
    CurrentUserProfile,
    IsAdmin,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Branches => "branches",
            Scope::Branch => "branch",
            Scope::Semesters => "semesters",
            Scope::Subjects => "subjects",
            Scope::Subject => "subject",
            Scope::Notes => "notes",
            Scope::QuestionPapers => "questionPapers",
            Scope::Mcqs => "mcqs",
            Scope::Syllabus => "syllabus",
            Scope::Search => "search",
            Scope::CurrentUserProfile => "currentUserProfile",
            Scope::IsAdmin => "isAdmin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub scope: Scope,
    pub param: Option<String>,
}

impl QueryKey {
    pub fn new(scope: Scope) -> Self {
        Self { scope, param: None }
    }

    pub fn with_param(scope: Scope, param: impl ToString) -> Self {
        Self {
            scope,
            param: Some(param.to_string()),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "[{:?}, {:?}]", self.scope.as_str(), param),
            None => write!(f, "[{:?}]", self.scope.as_str()),
        }
    }
}

type Slot = Arc<OnceCell<serde_json::Value>>;

/// Shared request cache of the data-access layer.
///
/// Each key owns a `OnceCell`, so concurrent reads of one key share a single
/// remote call. A failed fetch leaves the cell empty and the next read retries.
/// Values are stored as JSON and decoded per read.
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Slot>>,
    invalidations: broadcast::Sender<Scope>,
}

impl QueryCache {
    pub fn new() -> Self {
        let (invalidations, _) = broadcast::channel(64);
        Self {
            entries: Mutex::new(HashMap::new()),
            invalidations,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, Slot>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn slot(&self, key: &QueryKey) -> Slot {
        self.entries().entry(key.clone()).or_default().clone()
    }

    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let slot = self.slot(&key);
        if let Some(value) = slot.get() {
            tracing::debug!("🗃️ Cache hit {}", key);
            return Ok(T::deserialize(value)?);
        }

        let value = slot
            .get_or_try_init(|| async move {
                tracing::debug!("📡 Cache miss {}, fetching", key);
                let fresh = fetch().await?;
                Ok::<_, PortalError>(serde_json::to_value(fresh)?)
            })
            .await?;

        Ok(T::deserialize(value)?)
    }

    pub fn is_cached(&self, key: &QueryKey) -> bool {
        self.entries()
            .get(key)
            .map(|slot| slot.initialized())
            .unwrap_or(false)
    }

    /// Drop every entry of `scope` and notify subscribers.
    pub fn invalidate(&self, scope: Scope) {
        let removed = {
            let mut entries = self.entries();
            let before = entries.len();
            entries.retain(|key, _| key.scope != scope);
            before - entries.len()
        };
        tracing::debug!("♻️ Invalidated {} entries of {:?}", removed, scope.as_str());
        // 沒有訂閱者時 send 會失敗，忽略即可
        let _ = self.invalidations.send(scope);
    }

    pub fn invalidate_all(&self, scopes: &[Scope]) {
        for scope in scopes {
            self.invalidate(*scope);
        }
    }

    pub fn clear(&self) {
        self.entries().clear();
        tracing::debug!("🧹 Query cache cleared");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Scope> {
        self.invalidations.subscribe()
    }

    pub fn len(&self) -> usize {
        self.entries()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
