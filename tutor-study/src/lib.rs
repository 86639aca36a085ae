//! Assessment tools for the tutor study companion.
//!
//! Quiz generation turns retrieved context into a structured, gradable set
//! of multiple-choice questions; the grader scores submissions against it
//! deterministically. The roadmap generator produces free-form markdown
//! study plans.

pub mod error;
pub mod generator;
pub mod grader;
pub mod quiz;
pub mod roadmap;

pub use error::{Result, StudyError};
pub use generator::QuizGenerator;
pub use grader::{Score, UserSubmission, score};
pub use quiz::{OPTION_LABELS, QuizQuestion, QuizSet, quiz_schema};
pub use roadmap::RoadmapGenerator;
