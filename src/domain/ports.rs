use crate::domain::model::{
    Branch, ExternalBlob, Id, Identity, Mcq, McqAnswer, McqDraft, McqPracticeResult, Notes,
    NotesDraft, PendingBlob, Principal, QuestionPaper, QuestionPaperDraft, SearchResult, Semester,
    Subject, Syllabus, UserProfile, UserRole,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Typed surface of the remote content service. Every method is one remote call.
#[async_trait]
pub trait ContentService: Send + Sync {
    async fn add_branch(&self, name: &str) -> Result<Id>;
    async fn get_branch(&self, id: Id) -> Result<Option<Branch>>;
    async fn get_branches(&self) -> Result<Vec<Branch>>;
    async fn update_branch(&self, id: Id, name: &str) -> Result<()>;
    async fn delete_branch(&self, id: Id) -> Result<()>;

    async fn add_semester(&self, branch_id: Id, number: u32) -> Result<Id>;
    async fn get_semesters(&self) -> Result<Vec<Semester>>;
    async fn get_semesters_by_branch(&self, branch_id: Id) -> Result<Vec<Semester>>;
    async fn update_semester(&self, id: Id, branch_id: Id, number: u32) -> Result<()>;
    async fn delete_semester(&self, id: Id) -> Result<()>;

    async fn add_subject(&self, branch_id: Id, semester_id: Id, name: &str) -> Result<Id>;
    async fn get_subject(&self, id: Id) -> Result<Option<Subject>>;
    async fn get_subjects(&self) -> Result<Vec<Subject>>;
    async fn get_subjects_by_semester(&self, semester_id: Id) -> Result<Vec<Subject>>;
    async fn update_subject(&self, id: Id, branch_id: Id, semester_id: Id, name: &str)
        -> Result<()>;
    async fn delete_subject(&self, id: Id) -> Result<()>;

    async fn add_notes(&self, draft: &NotesDraft) -> Result<Id>;
    async fn get_notes_by_id(&self, id: Id) -> Result<Option<Notes>>;
    async fn get_notes_by_subject(&self, subject_id: Id) -> Result<Vec<Notes>>;
    async fn update_notes(&self, id: Id, draft: &NotesDraft) -> Result<()>;
    async fn delete_notes(&self, id: Id) -> Result<()>;

    async fn add_question_paper(&self, draft: &QuestionPaperDraft) -> Result<Id>;
    async fn get_question_paper_by_id(&self, id: Id) -> Result<Option<QuestionPaper>>;
    async fn get_question_papers_by_subject(&self, subject_id: Id) -> Result<Vec<QuestionPaper>>;
    async fn update_question_paper(&self, id: Id, draft: &QuestionPaperDraft) -> Result<()>;
    async fn delete_question_paper(&self, id: Id) -> Result<()>;

    async fn add_mcq(&self, draft: &McqDraft) -> Result<Id>;
    async fn get_mcq_by_id(&self, id: Id) -> Result<Option<Mcq>>;
    async fn get_mcqs_by_subject(&self, subject_id: Id) -> Result<Vec<Mcq>>;
    async fn update_mcq(&self, id: Id, draft: &McqDraft) -> Result<()>;
    async fn delete_mcq(&self, id: Id) -> Result<()>;

    async fn add_syllabus(&self, subject_id: Id, overview: &str) -> Result<()>;
    async fn get_syllabus_by_subject(&self, subject_id: Id) -> Result<Option<Syllabus>>;
    async fn update_syllabus(&self, subject_id: Id, overview: &str) -> Result<()>;
    async fn delete_syllabus(&self, subject_id: Id) -> Result<()>;

    async fn search(&self, term: &str) -> Result<SearchResult>;
    async fn evaluate_mcq_answers(&self, answers: &[McqAnswer]) -> Result<McqPracticeResult>;

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>>;
    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<()>;
    async fn get_user_profile(&self, user: &Principal) -> Result<Option<UserProfile>>;

    async fn is_caller_admin(&self) -> Result<bool>;
    async fn get_caller_user_role(&self) -> Result<UserRole>;
    async fn assign_caller_user_role(&self, user: &Principal, role: UserRole) -> Result<()>;
}

/// Storage for the binaries behind notes and question papers.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, blob: PendingBlob) -> Result<ExternalBlob>;
    async fn fetch_bytes(&self, blob: &ExternalBlob) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fails with `PortalError::AlreadyAuthenticated` while a session is active.
    async fn login(&self) -> Result<Identity>;
    async fn clear(&self) -> Result<()>;
    async fn current(&self) -> Result<Option<Identity>>;
}
