use crate::core::DataAccess;
use crate::domain::model::{Id, Notes, QuestionPaper};
use crate::domain::ports::{BlobStore, ContentService};
use crate::utils::error::{PortalError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::NewestFirst => write!(f, "Newest First"),
            SortOrder::OldestFirst => write!(f, "Oldest First"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "newest" | "year-desc" => Ok(SortOrder::NewestFirst),
            "oldest" | "year-asc" => Ok(SortOrder::OldestFirst),
            other => Err(PortalError::validation(format!(
                "Unknown sort order '{}', expected newest or oldest",
                other
            ))),
        }
    }
}

/// Stable sort by year; papers from the same year keep their order.
pub fn sort_papers(papers: &mut [QuestionPaper], order: SortOrder) {
    match order {
        SortOrder::NewestFirst => papers.sort_by(|a, b| b.year.cmp(&a.year)),
        SortOrder::OldestFirst => papers.sort_by(|a, b| a.year.cmp(&b.year)),
    }
}

pub fn paper_file_name(paper: &QuestionPaper) -> String {
    match &paper.exam_type {
        Some(exam_type) if !exam_type.trim().is_empty() => {
            format!("Question_Paper_{}_{}.pdf", paper.year, exam_type)
        }
        _ => format!("Question_Paper_{}.pdf", paper.year),
    }
}

pub fn notes_file_name(notes: &Notes) -> String {
    format!("{}.pdf", notes.title)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    Notes,
    QuestionPaper,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Look up a notes file or question paper and fetch the bytes behind it.
pub async fn fetch<S: ContentService + BlobStore>(
    data: &DataAccess<S>,
    kind: DownloadKind,
    id: Id,
) -> Result<Download> {
    let (file_name, blob) = match kind {
        DownloadKind::Notes => {
            let notes = data
                .notes_by_id(id)
                .await?
                .ok_or_else(|| PortalError::validation(format!("Notes {} not found", id)))?;
            (notes_file_name(&notes), notes.file)
        }
        DownloadKind::QuestionPaper => {
            let paper = data.question_paper_by_id(id).await?.ok_or_else(|| {
                PortalError::validation(format!("Question paper {} not found", id))
            })?;
            (paper_file_name(&paper), paper.file)
        }
    };

    let bytes = data.download(&blob).await.map_err(|e| {
        tracing::error!("❌ Failed to download file: {}", e);
        e
    })?;
    Ok(Download { file_name, bytes })
}
