use crate::domain::model::{Id, Mcq};
use std::collections::HashSet;

/// Browsing list of a subject's MCQs with per-question answer reveal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct McqBrowser {
    mcqs: Vec<Mcq>,
    revealed: HashSet<Id>,
}

impl McqBrowser {
    pub fn new(mcqs: Vec<Mcq>) -> Self {
        Self {
            mcqs,
            revealed: HashSet::new(),
        }
    }

    pub fn mcqs(&self) -> &[Mcq] {
        &self.mcqs
    }

    pub fn is_empty(&self) -> bool {
        self.mcqs.is_empty()
    }

    pub fn toggle(&mut self, id: Id) {
        if !self.revealed.remove(&id) {
            self.revealed.insert(id);
        }
    }

    pub fn reveal_all(&mut self) {
        self.revealed = self.mcqs.iter().map(|m| m.id).collect();
    }

    pub fn is_revealed(&self, id: Id) -> bool {
        self.revealed.contains(&id)
    }
}
