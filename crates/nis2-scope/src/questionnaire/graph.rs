use super::catalog::{self, Question};
use super::domain::{AnswerSet, QuestionId};

/// Flow control over the static question catalog.
///
/// Every predicate is evaluated against the full answer set, not a prefix of it, so a
/// predicate may read answers to questions declared after its own question. The result is
/// always ordered by declaration index.
#[derive(Debug, Clone, Copy)]
pub struct QuestionGraph {
    questions: &'static [Question],
}

impl Default for QuestionGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionGraph {
    pub fn new() -> Self {
        Self {
            questions: catalog::questions(),
        }
    }

    pub fn questions(&self) -> &'static [Question] {
        self.questions
    }

    pub fn visible_questions(&self, answers: &AnswerSet) -> Vec<&'static Question> {
        self.questions
            .iter()
            .filter(|question| question.is_visible(answers))
            .collect()
    }

    /// Visible questions that have no answer yet.
    pub fn pending(&self, answers: &AnswerSet) -> Vec<&'static Question> {
        self.questions
            .iter()
            .filter(|question| question.is_visible(answers) && !answers.contains(question.id))
            .collect()
    }

    pub fn is_complete(&self, answers: &AnswerSet) -> bool {
        self.pending(answers).is_empty()
    }

    /// Re-clamp the caller's position after the visible sequence changed.
    ///
    /// Keeps `current` when it is still visible, otherwise moves to the next later visible
    /// question, otherwise to the last visible one. Returns `None` only for an empty sequence.
    pub fn reclamp(&self, current: QuestionId, visible: &[&Question]) -> Option<usize> {
        if visible.is_empty() {
            return None;
        }

        if let Some(index) = visible.iter().position(|question| question.id == current) {
            return Some(index);
        }

        let later = catalog::declaration_index(current).and_then(|current_rank| {
            visible.iter().position(|question| {
                catalog::declaration_index(question.id)
                    .map(|rank| rank > current_rank)
                    .unwrap_or(false)
            })
        });

        Some(later.unwrap_or(visible.len() - 1))
    }
}

/// Ordered questions applicable to the given answers.
pub fn visible_questions(answers: &AnswerSet) -> Vec<&'static Question> {
    QuestionGraph::new().visible_questions(answers)
}
