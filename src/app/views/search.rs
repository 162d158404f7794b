use crate::core::DataAccess;
use crate::domain::model::{Mcq, SearchResult};
use crate::domain::ports::{BlobStore, ContentService};
use crate::utils::error::Result;

/// At most this many MCQ hits are listed.
pub const MAX_MCQ_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchView {
    Prompt,
    NoResults { query: String },
    Results { query: String, result: SearchResult },
}

impl SearchView {
    pub fn shown_mcqs(&self) -> &[Mcq] {
        match self {
            SearchView::Results { result, .. } => {
                &result.mcqs[..result.mcqs.len().min(MAX_MCQ_RESULTS)]
            }
            _ => &[],
        }
    }
}

pub async fn load<S: ContentService + BlobStore>(
    data: &DataAccess<S>,
    query: Option<&str>,
) -> Result<SearchView> {
    let query = match query {
        Some(query) if !query.is_empty() => query,
        _ => return Ok(SearchView::Prompt),
    };

    let result = data.search(query).await?;
    if result.is_empty() {
        return Ok(SearchView::NoResults {
            query: query.to_string(),
        });
    }

    Ok(SearchView::Results {
        query: query.to_string(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::MockService;
    use crate::domain::model::Id;

    #[tokio::test]
    async fn test_prompt_without_query() {
        let data = DataAccess::new(MockService::seeded());
        assert_eq!(load(&data, None).await.unwrap(), SearchView::Prompt);
        assert_eq!(load(&data, Some("")).await.unwrap(), SearchView::Prompt);
        assert_eq!(data.service().calls("search"), 0);
    }

    #[tokio::test]
    async fn test_blank_query_shows_no_results_without_call() {
        let data = DataAccess::new(MockService::seeded());
        assert_eq!(
            load(&data, Some("   ")).await.unwrap(),
            SearchView::NoResults {
                query: "   ".to_string()
            }
        );
        assert_eq!(data.service().calls("search"), 0);
    }

    #[tokio::test]
    async fn test_grouped_results() {
        let data = DataAccess::new(MockService::seeded());
        let view = load(&data, Some("linked")).await.unwrap();
        let SearchView::Results { result, .. } = &view else {
            panic!("expected results");
        };
        assert_eq!(result.notes.len(), 1);
        assert!(result.subjects.is_empty());

        assert!(matches!(
            load(&data, Some("quantum")).await.unwrap(),
            SearchView::NoResults { .. }
        ));
    }

    #[test]
    fn test_mcq_hits_are_capped() {
        let mcqs: Vec<Mcq> = (0..15)
            .map(|id: Id| Mcq {
                id,
                question: format!("q{}", id),
                options: vec!["a".to_string(), "b".to_string()],
                correct_answer: 0,
                explanation: None,
                subject_id: 1,
            })
            .collect();
        let view = SearchView::Results {
            query: "q".to_string(),
            result: SearchResult {
                mcqs,
                ..SearchResult::default()
            },
        };
        assert_eq!(view.shown_mcqs().len(), MAX_MCQ_RESULTS);
        assert_eq!(view.shown_mcqs()[9].id, 9);
        assert!(SearchView::Prompt.shown_mcqs().is_empty());
    }
}
