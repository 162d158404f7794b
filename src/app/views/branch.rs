use crate::app::catalog::{self, CatalogBranch};
use crate::core::DataAccess;
use crate::domain::model::{Branch, Semester, Subject};
use crate::domain::ports::{BlobStore, ContentService};
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum BranchView {
    NotFound,
    Loaded(BranchPage),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchPage {
    pub entry: &'static CatalogBranch,
    pub branch: Branch,
    /// Ascending by semester number.
    pub semesters: Vec<Semester>,
    pub selected: Option<SemesterSubjects>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SemesterSubjects {
    pub semester: Semester,
    pub subjects: Vec<Subject>,
}

/// Load `/branch/:slug`, optionally opening the semester numbered `semester_number`.
pub async fn load<S: ContentService + BlobStore>(
    data: &DataAccess<S>,
    slug: &str,
    semester_number: Option<u32>,
) -> Result<BranchView> {
    let Some(entry) = catalog::by_slug(slug) else {
        return Ok(BranchView::NotFound);
    };

    let branches = data.branches().await?;
    let Some(branch) = catalog::backend_branch(&branches, slug).cloned() else {
        tracing::debug!("No backend branch matches catalog entry {}", slug);
        return Ok(BranchView::NotFound);
    };

    let mut semesters = data.semesters_by_branch(Some(branch.id)).await?;
    semesters.sort_by_key(|semester| semester.number);

    let selected = match semester_number
        .and_then(|number| semesters.iter().find(|s| s.number == number))
    {
        Some(semester) => Some(SemesterSubjects {
            semester: semester.clone(),
            subjects: data.subjects_by_semester(Some(semester.id)).await?,
        }),
        None => None,
    };

    Ok(BranchView::Loaded(BranchPage {
        entry,
        branch,
        semesters,
        selected,
    }))
}
