use crate::core::cache::{QueryCache, QueryKey, Scope};
use crate::domain::model::{
    BlobSource, Branch, ExternalBlob, Id, Mcq, McqAnswer, McqDraft, McqPracticeResult, Notes,
    NotesDraft, Principal, QuestionPaper, QuestionPaperDraft, SearchResult, Semester, Subject,
    Syllabus, UserProfile, UserRole,
};
use crate::domain::ports::{BlobStore, ContentService};
use crate::utils::error::Result;
use std::future::Future;
use std::sync::Arc;

/// Arguments of add/update notes before the file is uploaded.
#[derive(Debug, Clone)]
pub struct NotesInput {
    pub subject_id: Id,
    pub title: String,
    pub year: u32,
    pub tags: Vec<String>,
    pub file: BlobSource,
}

#[derive(Debug, Clone)]
pub struct QuestionPaperInput {
    pub subject_id: Id,
    pub year: u32,
    pub exam_type: Option<String>,
    pub file: BlobSource,
}

/// Cached reads and invalidating mutations over the content service.
///
/// Reads taking `Option<Id>` return an empty value without a remote call when
/// the parent id is missing.
pub struct DataAccess<S> {
    service: Arc<S>,
    cache: Arc<QueryCache>,
}

impl<S> Clone for DataAccess<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<S: ContentService + BlobStore> DataAccess<S> {
    pub fn new(service: S) -> Self {
        Self::with_cache(Arc::new(service), Arc::new(QueryCache::new()))
    }

    pub fn with_cache(service: Arc<S>, cache: Arc<QueryCache>) -> Self {
        Self { service, cache }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    async fn mutate<T, Fut>(&self, action: &str, scopes: &[Scope], call: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match call.await {
            Ok(value) => {
                tracing::info!("✅ {} succeeded", action);
                self.cache.invalidate_all(scopes);
                Ok(value)
            }
            Err(e) => {
                tracing::warn!("❌ {} failed: {}", action, e);
                Err(e)
            }
        }
    }

    async fn resolve_blob(&self, source: BlobSource) -> Result<ExternalBlob> {
        match source {
            BlobSource::Existing(blob) => Ok(blob),
            BlobSource::Pending(pending) => {
                tracing::info!("📤 Uploading file ({} bytes)", pending.bytes.len());
                self.service.upload(pending).await
            }
        }
    }

    // --- Branches ---

    pub async fn branches(&self) -> Result<Vec<Branch>> {
        let service = &self.service;
        self.cache
            .fetch(QueryKey::new(Scope::Branches), || service.get_branches())
            .await
    }

    pub async fn branch(&self, id: Option<Id>) -> Result<Option<Branch>> {
        let Some(id) = id else { return Ok(None) };
        let service = &self.service;
        self.cache
            .fetch(QueryKey::with_param(Scope::Branch, id), || service.get_branch(id))
            .await
    }

    pub async fn add_branch(&self, name: &str) -> Result<Id> {
        self.mutate("addBranch", &[Scope::Branches], self.service.add_branch(name))
            .await
    }

    pub async fn update_branch(&self, id: Id, name: &str) -> Result<()> {
        self.mutate(
            "updateBranch",
            &[Scope::Branches, Scope::Branch],
            self.service.update_branch(id, name),
        )
        .await
    }

    pub async fn delete_branch(&self, id: Id) -> Result<()> {
        self.mutate(
            "deleteBranch",
            &[Scope::Branches, Scope::Branch, Scope::Semesters],
            self.service.delete_branch(id),
        )
        .await
    }

    // --- Semesters ---

    pub async fn semesters_by_branch(&self, branch_id: Option<Id>) -> Result<Vec<Semester>> {
        let Some(branch_id) = branch_id else {
            return Ok(Vec::new());
        };
        let service = &self.service;
        self.cache
            .fetch(QueryKey::with_param(Scope::Semesters, branch_id), || {
                service.get_semesters_by_branch(branch_id)
            })
            .await
    }

    pub async fn add_semester(&self, branch_id: Id, number: u32) -> Result<Id> {
        self.mutate(
            "addSemester",
            &[Scope::Semesters],
            self.service.add_semester(branch_id, number),
        )
        .await
    }

    pub async fn update_semester(&self, id: Id, branch_id: Id, number: u32) -> Result<()> {
        self.mutate(
            "updateSemester",
            &[Scope::Semesters, Scope::Subjects],
            self.service.update_semester(id, branch_id, number),
        )
        .await
    }

    pub async fn delete_semester(&self, id: Id) -> Result<()> {
        self.mutate(
            "deleteSemester",
            &[Scope::Semesters, Scope::Subjects],
            self.service.delete_semester(id),
        )
        .await
    }

    // --- Subjects ---

    pub async fn subjects_by_semester(&self, semester_id: Option<Id>) -> Result<Vec<Subject>> {
        let Some(semester_id) = semester_id else {
            return Ok(Vec::new());
        };
        let service = &self.service;
        self.cache
            .fetch(QueryKey::with_param(Scope::Subjects, semester_id), || {
                service.get_subjects_by_semester(semester_id)
            })
            .await
    }

    pub async fn subject(&self, id: Option<Id>) -> Result<Option<Subject>> {
        let Some(id) = id else { return Ok(None) };
        let service = &self.service;
        self.cache
            .fetch(QueryKey::with_param(Scope::Subject, id), || service.get_subject(id))
            .await
    }

    pub async fn add_subject(&self, branch_id: Id, semester_id: Id, name: &str) -> Result<Id> {
        self.mutate(
            "addSubject",
            &[Scope::Subjects],
            self.service.add_subject(branch_id, semester_id, name),
        )
        .await
    }

    pub async fn update_subject(
        &self,
        id: Id,
        branch_id: Id,
        semester_id: Id,
        name: &str,
    ) -> Result<()> {
        self.mutate(
            "updateSubject",
            &[Scope::Subjects, Scope::Subject],
            self.service.update_subject(id, branch_id, semester_id, name),
        )
        .await
    }

    pub async fn delete_subject(&self, id: Id) -> Result<()> {
        self.mutate(
            "deleteSubject",
            &[Scope::Subjects, Scope::Subject],
            self.service.delete_subject(id),
        )
        .await
    }

    // --- Notes ---

    pub async fn notes_by_subject(&self, subject_id: Option<Id>) -> Result<Vec<Notes>> {
        let Some(subject_id) = subject_id else {
            return Ok(Vec::new());
        };
        let service = &self.service;
        self.cache
            .fetch(QueryKey::with_param(Scope::Notes, subject_id), || {
                service.get_notes_by_subject(subject_id)
            })
            .await
    }

    pub async fn notes_by_id(&self, id: Id) -> Result<Option<Notes>> {
        self.service.get_notes_by_id(id).await
    }

    async fn notes_draft(&self, input: NotesInput) -> Result<NotesDraft> {
        Ok(NotesDraft {
            subject_id: input.subject_id,
            title: input.title,
            year: input.year,
            tags: input.tags,
            file: self.resolve_blob(input.file).await?,
        })
    }

    pub async fn add_notes(&self, input: NotesInput) -> Result<Id> {
        let draft = self.notes_draft(input).await?;
        self.mutate(
            "addNotes",
            &[Scope::Notes, Scope::Search],
            self.service.add_notes(&draft),
        )
        .await
    }

    pub async fn update_notes(&self, id: Id, input: NotesInput) -> Result<()> {
        let draft = self.notes_draft(input).await?;
        self.mutate(
            "updateNotes",
            &[Scope::Notes, Scope::Search],
            self.service.update_notes(id, &draft),
        )
        .await
    }

    pub async fn delete_notes(&self, id: Id) -> Result<()> {
        self.mutate(
            "deleteNotes",
            &[Scope::Notes, Scope::Search],
            self.service.delete_notes(id),
        )
        .await
    }

    // --- Question papers ---

    pub async fn question_papers_by_subject(
        &self,
        subject_id: Option<Id>,
    ) -> Result<Vec<QuestionPaper>> {
        let Some(subject_id) = subject_id else {
            return Ok(Vec::new());
        };
        let service = &self.service;
        self.cache
            .fetch(QueryKey::with_param(Scope::QuestionPapers, subject_id), || {
                service.get_question_papers_by_subject(subject_id)
            })
            .await
    }

    pub async fn question_paper_by_id(&self, id: Id) -> Result<Option<QuestionPaper>> {
        self.service.get_question_paper_by_id(id).await
    }

    async fn question_paper_draft(&self, input: QuestionPaperInput) -> Result<QuestionPaperDraft> {
        Ok(QuestionPaperDraft {
            subject_id: input.subject_id,
            year: input.year,
            exam_type: input.exam_type,
            file: self.resolve_blob(input.file).await?,
        })
    }

    pub async fn add_question_paper(&self, input: QuestionPaperInput) -> Result<Id> {
        let draft = self.question_paper_draft(input).await?;
        self.mutate(
            "addQuestionPaper",
            &[Scope::QuestionPapers, Scope::Search],
            self.service.add_question_paper(&draft),
        )
        .await
    }

    pub async fn update_question_paper(&self, id: Id, input: QuestionPaperInput) -> Result<()> {
        let draft = self.question_paper_draft(input).await?;
        self.mutate(
            "updateQuestionPaper",
            &[Scope::QuestionPapers, Scope::Search],
            self.service.update_question_paper(id, &draft),
        )
        .await
    }

    pub async fn delete_question_paper(&self, id: Id) -> Result<()> {
        self.mutate(
            "deleteQuestionPaper",
            &[Scope::QuestionPapers, Scope::Search],
            self.service.delete_question_paper(id),
        )
        .await
    }

    // --- MCQs ---

    pub async fn mcqs_by_subject(&self, subject_id: Option<Id>) -> Result<Vec<Mcq>> {
        let Some(subject_id) = subject_id else {
            return Ok(Vec::new());
        };
        let service = &self.service;
        self.cache
            .fetch(QueryKey::with_param(Scope::Mcqs, subject_id), || {
                service.get_mcqs_by_subject(subject_id)
            })
            .await
    }

    pub async fn add_mcq(&self, draft: &McqDraft) -> Result<Id> {
        self.mutate(
            "addMCQ",
            &[Scope::Mcqs, Scope::Search],
            self.service.add_mcq(draft),
        )
        .await
    }

    pub async fn update_mcq(&self, id: Id, draft: &McqDraft) -> Result<()> {
        self.mutate(
            "updateMCQ",
            &[Scope::Mcqs, Scope::Search],
            self.service.update_mcq(id, draft),
        )
        .await
    }

    pub async fn delete_mcq(&self, id: Id) -> Result<()> {
        self.mutate(
            "deleteMCQ",
            &[Scope::Mcqs, Scope::Search],
            self.service.delete_mcq(id),
        )
        .await
    }

    /// Scoring happens remotely; nothing is cached or invalidated.
    pub async fn evaluate_mcq_answers(&self, answers: &[McqAnswer]) -> Result<McqPracticeResult> {
        tracing::info!("📝 Submitting {} answers for evaluation", answers.len());
        self.service.evaluate_mcq_answers(answers).await
    }

    // --- Syllabus ---

    pub async fn syllabus_by_subject(&self, subject_id: Option<Id>) -> Result<Option<Syllabus>> {
        let Some(subject_id) = subject_id else {
            return Ok(None);
        };
        let service = &self.service;
        self.cache
            .fetch(QueryKey::with_param(Scope::Syllabus, subject_id), || {
                service.get_syllabus_by_subject(subject_id)
            })
            .await
    }

    /// Update the subject's syllabus if one exists, otherwise add it.
    pub async fn upsert_syllabus(&self, subject_id: Id, overview: &str) -> Result<()> {
        let service = &self.service;
        self.mutate("saveSyllabus", &[Scope::Syllabus], async move {
            match service.get_syllabus_by_subject(subject_id).await? {
                Some(_) => service.update_syllabus(subject_id, overview).await,
                None => service.add_syllabus(subject_id, overview).await,
            }
        })
        .await
    }

    pub async fn delete_syllabus(&self, subject_id: Id) -> Result<()> {
        self.mutate(
            "deleteSyllabus",
            &[Scope::Syllabus],
            self.service.delete_syllabus(subject_id),
        )
        .await
    }

    // --- Search ---

    /// Blank terms resolve to an empty result without a remote call.
    pub async fn search(&self, term: &str) -> Result<SearchResult> {
        if term.trim().is_empty() {
            return Ok(SearchResult::default());
        }
        let service = &self.service;
        self.cache
            .fetch(QueryKey::with_param(Scope::Search, term), || service.search(term))
            .await
    }

    // --- Profile & roles ---

    pub async fn caller_user_profile(&self) -> Result<Option<UserProfile>> {
        let service = &self.service;
        self.cache
            .fetch(QueryKey::new(Scope::CurrentUserProfile), || {
                service.get_caller_user_profile()
            })
            .await
    }

    pub async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<()> {
        self.mutate(
            "saveCallerUserProfile",
            &[Scope::CurrentUserProfile],
            self.service.save_caller_user_profile(profile),
        )
        .await
    }

    pub async fn user_profile(&self, user: &Principal) -> Result<Option<UserProfile>> {
        self.service.get_user_profile(user).await
    }

    pub async fn is_caller_admin(&self) -> Result<bool> {
        let service = &self.service;
        self.cache
            .fetch(QueryKey::new(Scope::IsAdmin), || service.is_caller_admin())
            .await
    }

    pub async fn caller_user_role(&self) -> Result<UserRole> {
        self.service.get_caller_user_role().await
    }

    pub async fn assign_caller_user_role(&self, user: &Principal, role: UserRole) -> Result<()> {
        self.mutate(
            "assignCallerUserRole",
            &[Scope::IsAdmin],
            self.service.assign_caller_user_role(user, role),
        )
        .await
    }

    pub async fn download(&self, blob: &ExternalBlob) -> Result<Vec<u8>> {
        tracing::debug!("📥 Downloading {}", blob.direct_url());
        self.service.fetch_bytes(blob).await
    }
}
