use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{AnswerSet, AnswerValue, QuestionId, Ternary};

/// Flat, storage-facing encoding of an answer set keyed by question id.
///
/// Ternary answers are written as one of the literal tokens `yes`, `no`, `unknown`
/// (unrecognized text is kept, trimmed). Multi-select answers are written as a JSON list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatRecord(pub BTreeMap<String, String>);

impl FlatRecord {
    pub fn from_answers(answers: &AnswerSet) -> Self {
        let mut fields = BTreeMap::new();

        for (id, value) in answers.iter() {
            let encoded = match value {
                AnswerValue::Choice(raw) => Ternary::parse(raw)
                    .map(|ternary| ternary.token().to_string())
                    .unwrap_or_else(|| raw.trim().to_string()),
                AnswerValue::Selections(options) => {
                    serde_json::Value::from(options.clone()).to_string()
                }
            };
            fields.insert(id.as_str().to_string(), encoded);
        }

        Self(fields)
    }

    /// Decode stored fields. Text that reads as a list of strings becomes a selection;
    /// anything else, including a malformed list, is kept as a raw choice.
    pub fn to_answers(&self) -> AnswerSet {
        let mut answers = AnswerSet::new();

        for (key, raw) in &self.0 {
            let Some(id) = QuestionId::from_token(key) else {
                tracing::debug!(question = %key, "skipping stored field for unknown question");
                continue;
            };

            let value = if raw.trim_start().starts_with('[') {
                match serde_json::from_str::<Vec<String>>(raw) {
                    Ok(options) => AnswerValue::Selections(options),
                    Err(error) => {
                        tracing::debug!(
                            question = %id,
                            %error,
                            "stored list unreadable, keeping text"
                        );
                        AnswerValue::Choice(raw.clone())
                    }
                }
            } else {
                AnswerValue::Choice(raw.clone())
            };
            answers.insert(id, value);
        }

        answers
    }

    pub fn get(&self, id: QuestionId) -> Option<&str> {
        self.0.get(id.as_str()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
