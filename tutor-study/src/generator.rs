//! Quiz generation from retrieved context.

use std::sync::Arc;

use tracing::{info, warn};

use tutor_core::{CompletionRequest, Llm};
use tutor_rag::Chunk;

use crate::error::Result;
use crate::quiz::{QuizSet, quiz_schema};

/// Generates a structured, gradable quiz from retrieved context.
///
/// Issues one prompt asking for a single JSON object matching the quiz
/// schema, then runs the response through [`QuizSet::parse`]. Nothing is
/// retried: a malformed response fails the whole batch and the caller
/// re-invokes manually.
pub struct QuizGenerator {
    llm: Arc<dyn Llm>,
}

impl QuizGenerator {
    /// Create a generator over the given model.
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    /// Generate `count` multiple-choice questions about `topic`, grounded
    /// in the given context chunks.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Generation`](crate::StudyError::Generation) if
    /// the service call fails, or
    /// [`StudyError::QuizFormat`](crate::StudyError::QuizFormat) if the
    /// response does not encode a valid quiz.
    pub async fn generate(&self, topic: &str, context: &[Chunk], count: usize) -> Result<QuizSet> {
        let prompt = quiz_prompt(topic, context, count);
        let request = CompletionRequest::new(prompt).with_output_schema(quiz_schema());

        let text = self.llm.complete(request).await?;
        let quiz = QuizSet::parse(&text)?;

        if quiz.len() != count {
            warn!(requested = count, received = quiz.len(), "quiz question count mismatch");
        }
        info!(topic, question_count = quiz.len(), "generated quiz");
        Ok(quiz)
    }
}

/// The JSON structure example embedded in the quiz prompt.
const QUIZ_JSON_EXAMPLE: &str = r#"{
  "questions": [
    {
      "question": "question text",
      "options": {
        "a": "option a",
        "b": "option b",
        "c": "option c",
        "d": "option d"
      },
      "correct_answer": "a"
    }
  ]
}"#;

/// Render the quiz-maker prompt.
fn quiz_prompt(topic: &str, context: &[Chunk], count: usize) -> String {
    let context_text: Vec<&str> = context.iter().map(|c| c.text.as_str()).collect();
    format!(
        "You are an expert quiz maker.\n\n\
         Generate {count} multiple choice questions based on the context below.\n\
         Each question must have 4 options (a, b, c, d) and exactly one correct answer.\n\n\
         Return ONLY valid JSON in the following structure:\n\n\
         {QUIZ_JSON_EXAMPLE}\n\n\
         Context:\n{}\n\n\
         Topic:\n{topic}",
        context_text.join("\n\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use tutor_core::LlmError;

    use crate::error::StudyError;

    struct CannedLlm {
        response: String,
    }

    #[async_trait]
    impl Llm for CannedLlm {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> std::result::Result<String, LlmError> {
            Ok(self.response.clone())
        }
    }

    fn chunk(text: &str) -> Chunk {
        Chunk { id: "c0".into(), text: text.into(), start_offset: 0, document_id: "d".into() }
    }

    #[test]
    fn prompt_carries_topic_context_and_count() {
        let prompt = quiz_prompt("ownership", &[chunk("Moves transfer ownership.")], 5);
        assert!(prompt.contains("Generate 5 multiple choice questions"));
        assert!(prompt.contains("Moves transfer ownership."));
        assert!(prompt.ends_with("Topic:\nownership"));
        assert!(prompt.contains("ONLY valid JSON"));
    }

    #[tokio::test]
    async fn valid_response_becomes_a_quiz() {
        let response = json!({
            "questions": [{
                "question": "What transfers ownership?",
                "options": { "a": "A move", "b": "A print", "c": "A comment", "d": "A space" },
                "correct_answer": "a"
            }]
        })
        .to_string();
        let generator = QuizGenerator::new(Arc::new(CannedLlm { response }));

        let quiz = generator.generate("ownership", &[chunk("Moves.")], 1).await.unwrap();
        assert_eq!(quiz.len(), 1);
    }

    #[tokio::test]
    async fn malformed_response_fails_the_whole_batch() {
        let generator =
            QuizGenerator::new(Arc::new(CannedLlm { response: "no json here".into() }));

        let result = generator.generate("ownership", &[], 2).await;
        assert!(matches!(result, Err(StudyError::QuizFormat(_))));
    }
}
