use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type Id = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: Id,
    pub number: u32,
    pub branch_id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: Id,
    pub name: String,
    pub branch_id: Id,
    pub semester_id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notes {
    pub id: Id,
    pub title: String,
    pub year: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub subject_id: Id,
    pub file: ExternalBlob,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPaper {
    pub id: Id,
    pub year: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_type: Option<String>,
    pub subject_id: Id,
    pub file: ExternalBlob,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mcq {
    pub id: Id,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub subject_id: Id,
}

impl Mcq {
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_answer).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Syllabus {
    pub subject_id: Id,
    pub overview: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Guest,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::User => write!(f, "user"),
            UserRole::Guest => write!(f, "guest"),
        }
    }
}

/// Opaque caller identity as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(pub String);

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub notes: Vec<Notes>,
    #[serde(default)]
    pub question_papers: Vec<QuestionPaper>,
    #[serde(default)]
    pub mcqs: Vec<Mcq>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
            && self.notes.is_empty()
            && self.question_papers.is_empty()
            && self.mcqs.is_empty()
    }

    pub fn total(&self) -> usize {
        self.subjects.len() + self.notes.len() + self.question_papers.len() + self.mcqs.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqAnswer {
    pub mcq_id: Id,
    pub selected_answer: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqPracticeResult {
    /// Percentage in 0..=100.
    pub score: f64,
    pub correct_answers: u64,
    pub total_questions: u64,
}

impl McqPracticeResult {
    pub fn passed(&self) -> bool {
        self.score >= 50.0
    }
}

/// Reference to a binary object held by the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalBlob {
    pub url: String,
}

impl ExternalBlob {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn direct_url(&self) -> &str {
        &self.url
    }
}

pub type UploadProgress = Arc<dyn Fn(f64) + Send + Sync>;

/// Bytes waiting to be uploaded, optionally reporting percentage progress.
#[derive(Clone)]
pub struct PendingBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub on_progress: Option<UploadProgress>,
}

impl PendingBlob {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: "application/pdf".to_string(),
            on_progress: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_upload_progress(mut self, on_progress: impl Fn(f64) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(on_progress));
        self
    }

    pub fn report(&self, percentage: f64) {
        if let Some(on_progress) = &self.on_progress {
            on_progress(percentage);
        }
    }
}

impl fmt::Debug for PendingBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingBlob")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

/// File argument of a file-bearing mutation.
#[derive(Debug, Clone)]
pub enum BlobSource {
    Existing(ExternalBlob),
    Pending(PendingBlob),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesDraft {
    pub subject_id: Id,
    pub title: String,
    pub year: u32,
    pub tags: Vec<String>,
    pub file: ExternalBlob,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPaperDraft {
    pub subject_id: Id,
    pub year: u32,
    pub exam_type: Option<String>,
    pub file: ExternalBlob,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqDraft {
    pub subject_id: Id,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: Option<String>,
}

/// The caller's authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub principal: Principal,
    pub token: String,
    pub authenticated_at: chrono::DateTime<chrono::Utc>,
}
