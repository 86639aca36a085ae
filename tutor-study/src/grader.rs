//! Deterministic grading of quiz submissions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::quiz::QuizSet;

/// A user's selected labels, keyed by question index. May be partial:
/// unanswered questions count against the denominator, not dropped.
pub type UserSubmission = BTreeMap<usize, String>;

/// The outcome of grading one submission against one quiz.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Score {
    /// Questions answered with the correct label.
    pub correct: usize,
    /// Total questions in the quiz, answered or not.
    pub total: usize,
}

impl Score {
    /// The score as a percentage. An empty quiz scores 0, not an error.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }
}

/// Grade a submission against a quiz.
///
/// Pure function, no external calls: re-scoring an unchanged submission
/// against an unchanged quiz always yields the same [`Score`]. An absent
/// answer is an automatic miss.
pub fn score(quiz: &QuizSet, submission: &UserSubmission) -> Score {
    let total = quiz.questions.len();
    let correct = quiz
        .questions
        .iter()
        .enumerate()
        .filter(|(i, question)| submission.get(i) == Some(&question.correct_answer))
        .count();
    Score { correct, total }
}
