//! Admin content management: form validation, submission and the content tree.
//!
//! Every submission turns into a [`Notice`]. Forms validate locally first, so a
//! rejected form never reaches the service.

use crate::app::notice::Notice;
use crate::core::{DataAccess, NotesInput, QuestionPaperInput};
use crate::domain::model::{BlobSource, Branch, Id, McqDraft, Principal, Semester, Subject, UserRole};
use crate::domain::ports::{BlobStore, ContentService};
use crate::utils::error::{PortalError, Result};
use std::fmt;
use std::ops::RangeInclusive;

pub const SEMESTER_NUMBERS: RangeInclusive<u32> = 1..=8;
pub const YEARS: RangeInclusive<u32> = 2000..=2100;
pub const MIN_MCQ_OPTIONS: usize = 2;

const REQUIRED_FIELDS: &str = "Please fill all required fields";

fn required<T: Copy>(value: Option<T>, message: &str) -> Result<T> {
    value.ok_or_else(|| PortalError::validation(message))
}

fn non_blank(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PortalError::validation(message));
    }
    Ok(trimmed.to_string())
}

fn in_range(value: u32, range: &RangeInclusive<u32>, field: &str) -> Result<u32> {
    if !range.contains(&value) {
        return Err(PortalError::validation(format!(
            "{} must be between {} and {}",
            field,
            range.start(),
            range.end()
        )));
    }
    Ok(value)
}

/// Comma-separated tags, trimmed, blanks dropped.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchForm {
    pub name: String,
}

impl BranchForm {
    pub fn validate(&self) -> Result<String> {
        non_blank(&self.name, "Branch name is required")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemesterForm {
    pub branch_id: Option<Id>,
    pub number: Option<u32>,
}

impl SemesterForm {
    pub fn validate(&self) -> Result<(Id, u32)> {
        let branch_id = required(self.branch_id, "Please select a branch")?;
        let number = required(self.number, "Semester number is required")?;
        Ok((branch_id, in_range(number, &SEMESTER_NUMBERS, "Semester number")?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectForm {
    pub branch_id: Option<Id>,
    pub semester_id: Option<Id>,
    pub name: String,
}

impl SubjectForm {
    pub fn validate(&self) -> Result<(Id, Id, String)> {
        let branch_id = required(self.branch_id, "Please select a branch")?;
        let semester_id = required(self.semester_id, "Please select a semester")?;
        let name = non_blank(&self.name, "Subject name is required")?;
        Ok((branch_id, semester_id, name))
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotesForm {
    pub subject_id: Option<Id>,
    pub title: String,
    pub year: Option<u32>,
    pub tags: String,
    pub file: Option<BlobSource>,
}

impl NotesForm {
    pub fn validate(self) -> Result<NotesInput> {
        let subject_id = required(self.subject_id, REQUIRED_FIELDS)?;
        let title = non_blank(&self.title, REQUIRED_FIELDS)?;
        let year = in_range(required(self.year, REQUIRED_FIELDS)?, &YEARS, "Year")?;
        let file = self.file.ok_or_else(|| PortalError::validation(REQUIRED_FIELDS))?;
        Ok(NotesInput {
            subject_id,
            title,
            year,
            tags: parse_tags(&self.tags),
            file,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuestionPaperForm {
    pub subject_id: Option<Id>,
    pub year: Option<u32>,
    pub exam_type: String,
    pub file: Option<BlobSource>,
}

impl QuestionPaperForm {
    pub fn validate(self) -> Result<QuestionPaperInput> {
        let subject_id = required(self.subject_id, REQUIRED_FIELDS)?;
        let year = in_range(required(self.year, REQUIRED_FIELDS)?, &YEARS, "Year")?;
        let file = self.file.ok_or_else(|| PortalError::validation(REQUIRED_FIELDS))?;
        Ok(QuestionPaperInput {
            subject_id,
            year,
            exam_type: optional_text(&self.exam_type),
            file,
        })
    }
}

/// MCQ authoring form. Always holds at least two option slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McqForm {
    pub subject_id: Option<Id>,
    pub question: String,
    options: Vec<String>,
    correct_answer: usize,
    pub explanation: String,
}

impl Default for McqForm {
    fn default() -> Self {
        Self {
            subject_id: None,
            question: String::new(),
            options: vec![String::new(); MIN_MCQ_OPTIONS],
            correct_answer: 0,
            explanation: String::new(),
        }
    }
}

impl McqForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a list of options, padded to the minimum.
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        while self.options.len() < MIN_MCQ_OPTIONS {
            self.options.push(String::new());
        }
        if self.correct_answer >= self.options.len() {
            self.correct_answer = 0;
        }
        self
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    pub fn add_option(&mut self) {
        self.options.push(String::new());
    }

    pub fn set_option(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        let slot = self
            .options
            .get_mut(index)
            .ok_or_else(|| PortalError::validation(format!("No option {}", index + 1)))?;
        *slot = text.into();
        Ok(())
    }

    /// Drop an option unless only the minimum remain; the correct answer
    /// resets to the first option when it no longer exists.
    pub fn remove_option(&mut self, index: usize) -> bool {
        if self.options.len() <= MIN_MCQ_OPTIONS || index >= self.options.len() {
            return false;
        }
        self.options.remove(index);
        if self.correct_answer >= self.options.len() {
            self.correct_answer = 0;
        }
        true
    }

    pub fn set_correct_answer(&mut self, index: usize) -> Result<()> {
        if index >= self.options.len() {
            return Err(PortalError::validation(format!(
                "Correct answer must be one of the {} options",
                self.options.len()
            )));
        }
        self.correct_answer = index;
        Ok(())
    }

    pub fn validate(&self) -> Result<McqDraft> {
        let subject_id = required(self.subject_id, REQUIRED_FIELDS)?;
        let question = non_blank(&self.question, REQUIRED_FIELDS)?;
        if self.options.len() < MIN_MCQ_OPTIONS || self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(PortalError::validation(REQUIRED_FIELDS));
        }
        if self.correct_answer >= self.options.len() {
            return Err(PortalError::validation("Correct answer is out of range"));
        }
        Ok(McqDraft {
            subject_id,
            question,
            options: self.options.iter().map(|o| o.trim().to_string()).collect(),
            correct_answer: self.correct_answer,
            explanation: optional_text(&self.explanation),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyllabusForm {
    pub subject_id: Option<Id>,
    pub overview: String,
}

impl SyllabusForm {
    pub fn validate(&self) -> Result<(Id, String)> {
        const MESSAGE: &str = "Please select a subject and enter syllabus content";
        let subject_id = required(self.subject_id, MESSAGE)?;
        Ok((subject_id, non_blank(&self.overview, MESSAGE)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Branch,
    Semester,
    Subject,
    Notes,
    QuestionPaper,
    Mcq,
    Syllabus,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContentKind::Branch => "Branch",
            ContentKind::Semester => "Semester",
            ContentKind::Subject => "Subject",
            ContentKind::Notes => "Notes",
            ContentKind::QuestionPaper => "Question paper",
            ContentKind::Mcq => "MCQ",
            ContentKind::Syllabus => "Syllabus",
        };
        f.write_str(label)
    }
}

/// A branch with its semesters (ascending) and each semester's subjects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchTree {
    pub branch: Branch,
    pub semesters: Vec<(Semester, Vec<Subject>)>,
}

/// Submits admin forms. Callers put it behind the admin gate.
pub struct AdminPanel<'a, S> {
    data: &'a DataAccess<S>,
}

impl<'a, S: ContentService + BlobStore> AdminPanel<'a, S> {
    pub fn new(data: &'a DataAccess<S>) -> Self {
        Self { data }
    }

    /// Content tree used to pick parents in the forms.
    pub async fn overview(&self) -> Result<Vec<BranchTree>> {
        let mut tree = Vec::new();
        for branch in self.data.branches().await? {
            let mut semesters = self.data.semesters_by_branch(Some(branch.id)).await?;
            semesters.sort_by_key(|s| s.number);

            let mut entries = Vec::with_capacity(semesters.len());
            for semester in semesters {
                let subjects = self.data.subjects_by_semester(Some(semester.id)).await?;
                entries.push((semester, subjects));
            }
            tree.push(BranchTree {
                branch,
                semesters: entries,
            });
        }
        Ok(tree)
    }

    pub async fn add_branch(&self, form: &BranchForm) -> Notice {
        let result = match form.validate() {
            Ok(name) => self.data.add_branch(&name).await,
            Err(e) => Err(e),
        };
        Notice::from_result(&result, "Branch added successfully", "Failed to add branch")
    }

    pub async fn rename_branch(&self, id: Id, form: &BranchForm) -> Notice {
        let result = match form.validate() {
            Ok(name) => self.data.update_branch(id, &name).await,
            Err(e) => Err(e),
        };
        Notice::from_result(&result, "Branch updated successfully", "Failed to update branch")
    }

    pub async fn add_semester(&self, form: &SemesterForm) -> Notice {
        let result = match form.validate() {
            Ok((branch_id, number)) => self.data.add_semester(branch_id, number).await,
            Err(e) => Err(e),
        };
        Notice::from_result(&result, "Semester added successfully", "Failed to add semester")
    }

    pub async fn add_subject(&self, form: &SubjectForm) -> Notice {
        let result = match form.validate() {
            Ok((branch_id, semester_id, name)) => {
                self.data.add_subject(branch_id, semester_id, &name).await
            }
            Err(e) => Err(e),
        };
        Notice::from_result(&result, "Subject added successfully", "Failed to add subject")
    }

    pub async fn rename_subject(&self, id: Id, form: &SubjectForm) -> Notice {
        let result = match form.validate() {
            Ok((branch_id, semester_id, name)) => {
                self.data
                    .update_subject(id, branch_id, semester_id, &name)
                    .await
            }
            Err(e) => Err(e),
        };
        Notice::from_result(&result, "Subject updated successfully", "Failed to update subject")
    }

    pub async fn upload_notes(&self, form: NotesForm) -> Notice {
        let result = match form.validate() {
            Ok(input) => self.data.add_notes(input).await,
            Err(e) => Err(e),
        };
        Notice::from_result(&result, "Notes uploaded successfully", "Failed to upload notes")
    }

    pub async fn upload_question_paper(&self, form: QuestionPaperForm) -> Notice {
        let result = match form.validate() {
            Ok(input) => self.data.add_question_paper(input).await,
            Err(e) => Err(e),
        };
        Notice::from_result(
            &result,
            "Question paper uploaded successfully",
            "Failed to upload question paper",
        )
    }

    pub async fn add_mcq(&self, form: &McqForm) -> Notice {
        let result = match form.validate() {
            Ok(draft) => self.data.add_mcq(&draft).await,
            Err(e) => Err(e),
        };
        Notice::from_result(&result, "MCQ added successfully", "Failed to add MCQ")
    }

    pub async fn update_mcq(&self, id: Id, form: &McqForm) -> Notice {
        let result = match form.validate() {
            Ok(draft) => self.data.update_mcq(id, &draft).await,
            Err(e) => Err(e),
        };
        Notice::from_result(&result, "MCQ updated successfully", "Failed to update MCQ")
    }

    pub async fn save_syllabus(&self, form: &SyllabusForm) -> Notice {
        let result = match form.validate() {
            Ok((subject_id, overview)) => self.data.upsert_syllabus(subject_id, &overview).await,
            Err(e) => Err(e),
        };
        Notice::from_result(&result, "Syllabus updated successfully", "Failed to update syllabus")
    }

    pub async fn assign_role(&self, user: &Principal, role: UserRole) -> Notice {
        let result = self.data.assign_caller_user_role(user, role).await;
        Notice::from_result(&result, "Role assigned successfully", "Failed to assign role")
    }

    /// For syllabi `id` is the subject id.
    pub async fn delete(&self, kind: ContentKind, id: Id) -> Notice {
        let result = match kind {
            ContentKind::Branch => self.data.delete_branch(id).await,
            ContentKind::Semester => self.data.delete_semester(id).await,
            ContentKind::Subject => self.data.delete_subject(id).await,
            ContentKind::Notes => self.data.delete_notes(id).await,
            ContentKind::QuestionPaper => self.data.delete_question_paper(id).await,
            ContentKind::Mcq => self.data.delete_mcq(id).await,
            ContentKind::Syllabus => self.data.delete_syllabus(id).await,
        };
        Notice::from_result(
            &result,
            &format!("{} deleted successfully", kind),
            &format!("Failed to delete {}", kind.to_string().to_lowercase()),
        )
    }
}
