use crate::core::DataAccess;
use crate::domain::model::{Id, Mcq, McqAnswer, McqPracticeResult, Subject};
use crate::domain::ports::{BlobStore, ContentService};
use crate::utils::error::{PortalError, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum PracticeView {
    Failed,
    /// The subject has no MCQs; nothing can be scored.
    Empty { subject: Subject },
    Ready { subject: Subject, session: PracticeSession },
}

/// One run through a subject's MCQs.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeSession {
    mcqs: Vec<Mcq>,
    current: usize,
    answers: HashMap<Id, usize>,
    result: Option<McqPracticeResult>,
}

impl PracticeSession {
    pub fn new(mcqs: Vec<Mcq>) -> Self {
        Self {
            mcqs,
            current: 0,
            answers: HashMap::new(),
            result: None,
        }
    }

    pub fn len(&self) -> usize {
        self.mcqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mcqs.is_empty()
    }

    pub fn mcqs(&self) -> &[Mcq] {
        &self.mcqs
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Mcq> {
        self.mcqs.get(self.current)
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.mcqs.len()
    }

    /// Percentage of the way through the question list.
    pub fn progress(&self) -> f64 {
        if self.mcqs.is_empty() {
            return 0.0;
        }
        (self.current + 1) as f64 / self.mcqs.len() as f64 * 100.0
    }

    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Record `option` for the question with id `mcq_id`, replacing an earlier choice.
    pub fn answer(&mut self, mcq_id: Id, option: usize) -> Result<()> {
        let mcq = self
            .mcqs
            .iter()
            .find(|m| m.id == mcq_id)
            .ok_or_else(|| PortalError::validation(format!("MCQ {} is not part of this practice", mcq_id)))?;
        if option >= mcq.options.len() {
            return Err(PortalError::validation(format!(
                "MCQ {} has {} options",
                mcq_id,
                mcq.options.len()
            )));
        }
        self.answers.insert(mcq_id, option);
        Ok(())
    }

    /// Answer the question currently shown.
    pub fn select(&mut self, option: usize) -> Result<()> {
        let id = self
            .current()
            .map(|m| m.id)
            .ok_or_else(|| PortalError::validation("No MCQs available"))?;
        self.answer(id, option)
    }

    pub fn selected(&self, mcq_id: Id) -> Option<usize> {
        self.answers.get(&mcq_id).copied()
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn all_answered(&self) -> bool {
        !self.mcqs.is_empty() && self.mcqs.iter().all(|m| self.answers.contains_key(&m.id))
    }

    /// Answers in question order.
    pub fn answers(&self) -> Vec<McqAnswer> {
        self.mcqs
            .iter()
            .filter_map(|m| {
                self.selected(m.id).map(|selected_answer| McqAnswer {
                    mcq_id: m.id,
                    selected_answer,
                })
            })
            .collect()
    }

    /// Send every answer for scoring. Only allowed once all questions are answered.
    pub async fn submit<S: ContentService + BlobStore>(
        &mut self,
        data: &DataAccess<S>,
    ) -> Result<&McqPracticeResult> {
        if self.mcqs.is_empty() {
            return Err(PortalError::validation("No MCQs available"));
        }
        if !self.all_answered() {
            return Err(PortalError::validation(
                "Please answer all questions before submitting",
            ));
        }

        let result = data.evaluate_mcq_answers(&self.answers()).await?;
        Ok(self.result.insert(result))
    }

    pub fn result(&self) -> Option<&McqPracticeResult> {
        self.result.as_ref()
    }

    pub fn restart(&mut self) {
        self.current = 0;
        self.answers.clear();
        self.result = None;
    }
}

pub async fn load<S: ContentService + BlobStore>(data: &DataAccess<S>, subject_id: Id) -> PracticeView {
    let (subject, mcqs) = tokio::join!(
        data.subject(Some(subject_id)),
        data.mcqs_by_subject(Some(subject_id))
    );

    match (subject, mcqs) {
        (Ok(Some(subject)), Ok(mcqs)) if mcqs.is_empty() => PracticeView::Empty { subject },
        (Ok(Some(subject)), Ok(mcqs)) => PracticeView::Ready {
            subject,
            session: PracticeSession::new(mcqs),
        },
        (Ok(None), _) => PracticeView::Failed,
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("⚠️ Failed to load practice session: {}", e);
            PracticeView::Failed
        }
    }
}
