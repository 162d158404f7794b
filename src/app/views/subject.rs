use super::materials::{sort_papers, SortOrder};
use super::mcq::McqBrowser;
use super::{section, Section};
use crate::core::DataAccess;
use crate::domain::model::{Id, Notes, QuestionPaper, Subject, Syllabus};
use crate::domain::ports::{BlobStore, ContentService};

#[derive(Debug, Clone, PartialEq)]
pub enum SubjectView {
    Failed,
    Loaded(Box<SubjectPage>),
}

/// Everything shown for one subject. Sections fail independently.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectPage {
    pub subject: Subject,
    pub notes: Section<Vec<Notes>>,
    pub papers: Section<Vec<QuestionPaper>>,
    pub order: SortOrder,
    pub mcqs: Section<McqBrowser>,
    pub syllabus: Section<Option<Syllabus>>,
}

pub async fn load<S: ContentService + BlobStore>(
    data: &DataAccess<S>,
    id: Id,
    order: SortOrder,
) -> SubjectView {
    let subject = match data.subject(Some(id)).await {
        Ok(Some(subject)) => subject,
        Ok(None) => return SubjectView::Failed,
        Err(e) => {
            tracing::warn!("⚠️ Failed to load subject {}: {}", id, e);
            return SubjectView::Failed;
        }
    };

    let (notes, papers, mcqs, syllabus) = tokio::join!(
        data.notes_by_subject(Some(id)),
        data.question_papers_by_subject(Some(id)),
        data.mcqs_by_subject(Some(id)),
        data.syllabus_by_subject(Some(id)),
    );

    let papers = section(papers, "Failed to load question papers. Please try again.").map(
        |mut papers| {
            sort_papers(&mut papers, order);
            papers
        },
    );

    SubjectView::Loaded(Box::new(SubjectPage {
        subject,
        notes: section(notes, "Failed to load notes. Please try again."),
        papers,
        order,
        mcqs: section(mcqs, "Failed to load MCQs. Please try again.").map(McqBrowser::new),
        syllabus: section(syllabus, "Failed to load syllabus. Please try again."),
    }))
}
