use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

/// Question table compiled into the binary. A deployment that wants its own
/// content swaps this file out and rebuilds.
const EMBEDDED_QUESTIONS: &str = include_str!("../assets/questions.json");

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Hard,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Hard => "Hard",
        }
    }
}

/// One multiple-choice question. `answer` indexes into `options`.
#[derive(Clone, Debug, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: [String; 4],
    pub answer: usize,
}

#[derive(Resource, Debug, Deserialize)]
pub struct QuestionBank {
    beginner: Vec<Question>,
    intermediate: Vec<Question>,
    hard: Vec<Question>,
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("malformed question table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no questions for {} tier", .0.label())]
    EmptyTier(Difficulty),
    #[error("answer index {index} out of range in question {text:?}")]
    AnswerOutOfRange { text: String, index: usize },
}

impl QuestionBank {
    pub fn load_embedded() -> Result<Self, ContentError> {
        Self::from_json(EMBEDDED_QUESTIONS)
    }

    /// Parses and validates a question table. Option count is enforced by the
    /// shape of `Question::options`; answer indices are checked here so the
    /// game logic never has to.
    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let bank: QuestionBank = serde_json::from_str(raw)?;
        for difficulty in Difficulty::ALL {
            let tier = bank.tier(difficulty);
            if tier.is_empty() {
                return Err(ContentError::EmptyTier(difficulty));
            }
            for question in tier {
                if question.answer >= question.options.len() {
                    return Err(ContentError::AnswerOutOfRange {
                        text: question.text.clone(),
                        index: question.answer,
                    });
                }
            }
        }
        Ok(bank)
    }

    pub fn tier(&self, difficulty: Difficulty) -> &[Question] {
        match difficulty {
            Difficulty::Beginner => &self.beginner,
            Difficulty::Intermediate => &self.intermediate,
            Difficulty::Hard => &self.hard,
        }
    }
}
