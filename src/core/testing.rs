//! In-memory content service used by unit tests.

use crate::domain::model::{
    Branch, ExternalBlob, Id, Mcq, McqAnswer, McqDraft, McqPracticeResult, Notes, NotesDraft,
    PendingBlob, Principal, QuestionPaper, QuestionPaperDraft, SearchResult, Semester, Subject,
    Syllabus, UserProfile, UserRole,
};
use crate::domain::ports::{BlobStore, ContentService};
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct State {
    branches: Vec<Branch>,
    semesters: Vec<Semester>,
    subjects: Vec<Subject>,
    notes: Vec<Notes>,
    papers: Vec<QuestionPaper>,
    mcqs: Vec<Mcq>,
    syllabi: Vec<Syllabus>,
    profile: Option<UserProfile>,
    role: Option<UserRole>,
    blobs: HashMap<String, Vec<u8>>,
    next_id: Id,
}

impl State {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }
}

pub(crate) struct MockService {
    state: Mutex<State>,
    calls: Mutex<HashMap<String, usize>>,
    failures: Mutex<HashMap<String, String>>,
}

fn blob_ref(name: &str) -> ExternalBlob {
    ExternalBlob::from_url(format!("https://blobs.test/{}", name))
}

impl MockService {
    pub(crate) fn empty() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 100,
                ..State::default()
            }),
            calls: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Two branches; subject 10 carries material, subject 12 has none.
    pub(crate) fn seeded() -> Self {
        let service = Self::empty();
        {
            let mut state = service.state();
            state.branches = vec![
                Branch { id: 1, name: "Computer".to_string() },
                Branch { id: 2, name: "Mechanical".to_string() },
            ];
            state.semesters = vec![
                Semester { id: 3, number: 2, branch_id: 1 },
                Semester { id: 4, number: 1, branch_id: 1 },
                Semester { id: 5, number: 1, branch_id: 2 },
            ];
            state.subjects = vec![
                Subject { id: 10, name: "Data Structures".to_string(), branch_id: 1, semester_id: 4 },
                Subject { id: 11, name: "Thermodynamics".to_string(), branch_id: 2, semester_id: 5 },
                Subject { id: 12, name: "Workshop Practice".to_string(), branch_id: 1, semester_id: 3 },
            ];
            state.notes = vec![Notes {
                id: 20,
                title: "Linked Lists".to_string(),
                year: 2023,
                tags: vec!["theory".to_string()],
                subject_id: 10,
                file: blob_ref("20"),
            }];
            state.papers = vec![
                QuestionPaper { id: 30, year: 2021, exam_type: Some("Mid-term".to_string()), subject_id: 10, file: blob_ref("30") },
                QuestionPaper { id: 31, year: 2023, exam_type: None, subject_id: 10, file: blob_ref("31") },
                QuestionPaper { id: 32, year: 2021, exam_type: Some("Final".to_string()), subject_id: 10, file: blob_ref("32") },
            ];
            state.mcqs = vec![
                Mcq {
                    id: 40,
                    question: "Which structure is FIFO?".to_string(),
                    options: vec!["Stack".to_string(), "Queue".to_string()],
                    correct_answer: 1,
                    explanation: Some("Queues dequeue in insertion order".to_string()),
                    subject_id: 10,
                },
                Mcq {
                    id: 41,
                    question: "Binary search needs?".to_string(),
                    options: vec!["Sorted input".to_string(), "A hash".to_string(), "A tree".to_string()],
                    correct_answer: 0,
                    explanation: None,
                    subject_id: 10,
                },
                Mcq {
                    id: 42,
                    question: "Heap root holds?".to_string(),
                    options: vec!["Extreme value".to_string(), "Median".to_string()],
                    correct_answer: 0,
                    explanation: None,
                    subject_id: 10,
                },
            ];
        }
        service
    }

    pub(crate) fn with_admin(self, admin: bool) -> Self {
        self.state().role = Some(if admin { UserRole::Admin } else { UserRole::User });
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub(crate) fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub(crate) fn fail_next(&self, method: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(method.to_string(), message.to_string());
    }

    fn record(&self, method: &str) -> Result<()> {
        *self.calls.lock().unwrap().entry(method.to_string()).or_insert(0) += 1;
        match self.failures.lock().unwrap().remove(method) {
            Some(message) => Err(PortalError::RejectedError {
                method: method.to_string(),
                status: 400,
                message,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContentService for MockService {
    async fn add_branch(&self, name: &str) -> Result<Id> {
        self.record("addBranch")?;
        let mut state = self.state();
        let id = state.next_id();
        state.branches.push(Branch { id, name: name.to_string() });
        Ok(id)
    }

    async fn get_branch(&self, id: Id) -> Result<Option<Branch>> {
        self.record("getBranch")?;
        Ok(self.state().branches.iter().find(|b| b.id == id).cloned())
    }

    async fn get_branches(&self) -> Result<Vec<Branch>> {
        self.record("getBranches")?;
        Ok(self.state().branches.clone())
    }

    async fn update_branch(&self, id: Id, name: &str) -> Result<()> {
        self.record("updateBranch")?;
        if let Some(branch) = self.state().branches.iter_mut().find(|b| b.id == id) {
            branch.name = name.to_string();
        }
        Ok(())
    }

    async fn delete_branch(&self, id: Id) -> Result<()> {
        self.record("deleteBranch")?;
        self.state().branches.retain(|b| b.id != id);
        Ok(())
    }

    async fn add_semester(&self, branch_id: Id, number: u32) -> Result<Id> {
        self.record("addSemester")?;
        let mut state = self.state();
        let id = state.next_id();
        state.semesters.push(Semester { id, number, branch_id });
        Ok(id)
    }

    async fn get_semesters(&self) -> Result<Vec<Semester>> {
        self.record("getSemesters")?;
        Ok(self.state().semesters.clone())
    }

    async fn get_semesters_by_branch(&self, branch_id: Id) -> Result<Vec<Semester>> {
        self.record("getSemestersByBranch")?;
        Ok(self
            .state()
            .semesters
            .iter()
            .filter(|s| s.branch_id == branch_id)
            .cloned()
            .collect())
    }

    async fn update_semester(&self, id: Id, branch_id: Id, number: u32) -> Result<()> {
        self.record("updateSemester")?;
        if let Some(semester) = self.state().semesters.iter_mut().find(|s| s.id == id) {
            semester.branch_id = branch_id;
            semester.number = number;
        }
        Ok(())
    }

    async fn delete_semester(&self, id: Id) -> Result<()> {
        self.record("deleteSemester")?;
        self.state().semesters.retain(|s| s.id != id);
        Ok(())
    }

    async fn add_subject(&self, branch_id: Id, semester_id: Id, name: &str) -> Result<Id> {
        self.record("addSubject")?;
        let mut state = self.state();
        let id = state.next_id();
        state.subjects.push(Subject { id, name: name.to_string(), branch_id, semester_id });
        Ok(id)
    }

    async fn get_subject(&self, id: Id) -> Result<Option<Subject>> {
        self.record("getSubject")?;
        Ok(self.state().subjects.iter().find(|s| s.id == id).cloned())
    }

    async fn get_subjects(&self) -> Result<Vec<Subject>> {
        self.record("getSubjects")?;
        Ok(self.state().subjects.clone())
    }

    async fn get_subjects_by_semester(&self, semester_id: Id) -> Result<Vec<Subject>> {
        self.record("getSubjectsBySemester")?;
        Ok(self
            .state()
            .subjects
            .iter()
            .filter(|s| s.semester_id == semester_id)
            .cloned()
            .collect())
    }

    async fn update_subject(&self, id: Id, branch_id: Id, semester_id: Id, name: &str) -> Result<()> {
        self.record("updateSubject")?;
        if let Some(subject) = self.state().subjects.iter_mut().find(|s| s.id == id) {
            subject.branch_id = branch_id;
            subject.semester_id = semester_id;
            subject.name = name.to_string();
        }
        Ok(())
    }

    async fn delete_subject(&self, id: Id) -> Result<()> {
        self.record("deleteSubject")?;
        self.state().subjects.retain(|s| s.id != id);
        Ok(())
    }

    async fn add_notes(&self, draft: &NotesDraft) -> Result<Id> {
        self.record("addNotes")?;
        let mut state = self.state();
        let id = state.next_id();
        state.notes.push(Notes {
            id,
            title: draft.title.clone(),
            year: draft.year,
            tags: draft.tags.clone(),
            subject_id: draft.subject_id,
            file: draft.file.clone(),
        });
        Ok(id)
    }

    async fn get_notes_by_id(&self, id: Id) -> Result<Option<Notes>> {
        self.record("getNotesById")?;
        Ok(self.state().notes.iter().find(|n| n.id == id).cloned())
    }

    async fn get_notes_by_subject(&self, subject_id: Id) -> Result<Vec<Notes>> {
        self.record("getNotesBySubject")?;
        Ok(self
            .state()
            .notes
            .iter()
            .filter(|n| n.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn update_notes(&self, id: Id, draft: &NotesDraft) -> Result<()> {
        self.record("updateNotes")?;
        if let Some(notes) = self.state().notes.iter_mut().find(|n| n.id == id) {
            notes.title = draft.title.clone();
            notes.year = draft.year;
            notes.tags = draft.tags.clone();
            notes.subject_id = draft.subject_id;
            notes.file = draft.file.clone();
        }
        Ok(())
    }

    async fn delete_notes(&self, id: Id) -> Result<()> {
        self.record("deleteNotes")?;
        self.state().notes.retain(|n| n.id != id);
        Ok(())
    }

    async fn add_question_paper(&self, draft: &QuestionPaperDraft) -> Result<Id> {
        self.record("addQuestionPaper")?;
        let mut state = self.state();
        let id = state.next_id();
        state.papers.push(QuestionPaper {
            id,
            year: draft.year,
            exam_type: draft.exam_type.clone(),
            subject_id: draft.subject_id,
            file: draft.file.clone(),
        });
        Ok(id)
    }

    async fn get_question_paper_by_id(&self, id: Id) -> Result<Option<QuestionPaper>> {
        self.record("getQuestionPaperById")?;
        Ok(self.state().papers.iter().find(|p| p.id == id).cloned())
    }

    async fn get_question_papers_by_subject(&self, subject_id: Id) -> Result<Vec<QuestionPaper>> {
        self.record("getQuestionPapersBySubject")?;
        Ok(self
            .state()
            .papers
            .iter()
            .filter(|p| p.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn update_question_paper(&self, id: Id, draft: &QuestionPaperDraft) -> Result<()> {
        self.record("updateQuestionPaper")?;
        if let Some(paper) = self.state().papers.iter_mut().find(|p| p.id == id) {
            paper.year = draft.year;
            paper.exam_type = draft.exam_type.clone();
            paper.subject_id = draft.subject_id;
            paper.file = draft.file.clone();
        }
        Ok(())
    }

    async fn delete_question_paper(&self, id: Id) -> Result<()> {
        self.record("deleteQuestionPaper")?;
        self.state().papers.retain(|p| p.id != id);
        Ok(())
    }

    async fn add_mcq(&self, draft: &McqDraft) -> Result<Id> {
        self.record("addMCQ")?;
        let mut state = self.state();
        let id = state.next_id();
        state.mcqs.push(Mcq {
            id,
            question: draft.question.clone(),
            options: draft.options.clone(),
            correct_answer: draft.correct_answer,
            explanation: draft.explanation.clone(),
            subject_id: draft.subject_id,
        });
        Ok(id)
    }

    async fn get_mcq_by_id(&self, id: Id) -> Result<Option<Mcq>> {
        self.record("getMCQById")?;
        Ok(self.state().mcqs.iter().find(|m| m.id == id).cloned())
    }

    async fn get_mcqs_by_subject(&self, subject_id: Id) -> Result<Vec<Mcq>> {
        self.record("getMCQsBySubject")?;
        Ok(self
            .state()
            .mcqs
            .iter()
            .filter(|m| m.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn update_mcq(&self, id: Id, draft: &McqDraft) -> Result<()> {
        self.record("updateMCQ")?;
        if let Some(mcq) = self.state().mcqs.iter_mut().find(|m| m.id == id) {
            mcq.question = draft.question.clone();
            mcq.options = draft.options.clone();
            mcq.correct_answer = draft.correct_answer;
            mcq.explanation = draft.explanation.clone();
            mcq.subject_id = draft.subject_id;
        }
        Ok(())
    }

    async fn delete_mcq(&self, id: Id) -> Result<()> {
        self.record("deleteMCQ")?;
        self.state().mcqs.retain(|m| m.id != id);
        Ok(())
    }

    async fn add_syllabus(&self, subject_id: Id, overview: &str) -> Result<()> {
        self.record("addSyllabus")?;
        self.state().syllabi.push(Syllabus {
            subject_id,
            overview: overview.to_string(),
        });
        Ok(())
    }

    async fn get_syllabus_by_subject(&self, subject_id: Id) -> Result<Option<Syllabus>> {
        self.record("getSyllabusBySubject")?;
        Ok(self
            .state()
            .syllabi
            .iter()
            .find(|s| s.subject_id == subject_id)
            .cloned())
    }

    async fn update_syllabus(&self, subject_id: Id, overview: &str) -> Result<()> {
        self.record("updateSyllabus")?;
        if let Some(syllabus) = self
            .state()
            .syllabi
            .iter_mut()
            .find(|s| s.subject_id == subject_id)
        {
            syllabus.overview = overview.to_string();
        }
        Ok(())
    }

    async fn delete_syllabus(&self, subject_id: Id) -> Result<()> {
        self.record("deleteSyllabus")?;
        self.state().syllabi.retain(|s| s.subject_id != subject_id);
        Ok(())
    }

    async fn search(&self, term: &str) -> Result<SearchResult> {
        self.record("search")?;
        let needle = term.to_lowercase();
        let state = self.state();
        Ok(SearchResult {
            subjects: state
                .subjects
                .iter()
                .filter(|s| s.name.to_lowercase().contains(&needle))
                .cloned()
                .collect(),
            notes: state
                .notes
                .iter()
                .filter(|n| {
                    n.title.to_lowercase().contains(&needle)
                        || n.tags.iter().any(|t| t.to_lowercase().contains(&needle))
                })
                .cloned()
                .collect(),
            question_papers: state
                .papers
                .iter()
                .filter(|p| {
                    p.exam_type
                        .as_deref()
                        .map(|e| e.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
                .cloned()
                .collect(),
            mcqs: state
                .mcqs
                .iter()
                .filter(|m| m.question.to_lowercase().contains(&needle))
                .cloned()
                .collect(),
        })
    }

    async fn evaluate_mcq_answers(&self, answers: &[McqAnswer]) -> Result<McqPracticeResult> {
        self.record("evaluateMCQAnswers")?;
        let state = self.state();
        let correct = answers
            .iter()
            .filter(|a| {
                state
                    .mcqs
                    .iter()
                    .any(|m| m.id == a.mcq_id && m.correct_answer == a.selected_answer)
            })
            .count() as u64;
        let total = answers.len() as u64;
        let score = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64 * 100.0
        };
        Ok(McqPracticeResult {
            score,
            correct_answers: correct,
            total_questions: total,
        })
    }

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>> {
        self.record("getCallerUserProfile")?;
        Ok(self.state().profile.clone())
    }

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<()> {
        self.record("saveCallerUserProfile")?;
        self.state().profile = Some(profile.clone());
        Ok(())
    }

    async fn get_user_profile(&self, _user: &Principal) -> Result<Option<UserProfile>> {
        self.record("getUserProfile")?;
        Ok(self.state().profile.clone())
    }

    async fn is_caller_admin(&self) -> Result<bool> {
        self.record("isCallerAdmin")?;
        Ok(self.state().role == Some(UserRole::Admin))
    }

    async fn get_caller_user_role(&self) -> Result<UserRole> {
        self.record("getCallerUserRole")?;
        Ok(self.state().role.unwrap_or(UserRole::Guest))
    }

    async fn assign_caller_user_role(&self, _user: &Principal, role: UserRole) -> Result<()> {
        self.record("assignCallerUserRole")?;
        self.state().role = Some(role);
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MockService {
    async fn upload(&self, blob: PendingBlob) -> Result<ExternalBlob> {
        self.record("upload")?;
        let mut state = self.state();
        let id = state.next_id();
        let external = blob_ref(&format!("upload-{}", id));
        state.blobs.insert(external.url.clone(), blob.bytes.clone());
        blob.report(100.0);
        Ok(external)
    }

    async fn fetch_bytes(&self, blob: &ExternalBlob) -> Result<Vec<u8>> {
        self.record("fetchBytes")?;
        Ok(self
            .state()
            .blobs
            .get(&blob.url)
            .cloned()
            .unwrap_or_else(|| b"%PDF-1.4".to_vec()))
    }
}
