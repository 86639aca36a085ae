//! Learning-roadmap generation.

use std::sync::Arc;

use tracing::info;

use tutor_core::{CompletionRequest, Llm};

use crate::error::Result;

/// Generates a topic-based learning roadmap for a domain as markdown text.
///
/// Unlike the quiz flow this output is free-form: the markdown is rendered
/// or exported as-is, so no schema constraint is attached.
pub struct RoadmapGenerator {
    llm: Arc<dyn Llm>,
}

impl RoadmapGenerator {
    /// Create a generator over the given model.
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    /// Generate a learning roadmap for `domain`, from absolute basics to
    /// expert level.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Generation`](crate::StudyError::Generation) if
    /// the service call fails.
    pub async fn generate(&self, domain: &str) -> Result<String> {
        let roadmap = self.llm.complete(CompletionRequest::new(roadmap_prompt(domain))).await?;
        info!(domain, chars = roadmap.len(), "generated roadmap");
        Ok(roadmap)
    }
}

/// The format instructions embedded in the roadmap prompt.
const ROADMAP_FORMAT: &str = r#"Generate a comprehensive, topic-based (not time-based) roadmap that progresses
from absolute basics to advanced expert level.

Format the roadmap with:

# 🚀 [Domain] Learning Roadmap

## 📚 Foundation Level
🔹 **Topic 1**:
   - Key concepts
   - Practical applications
   - Resources (books/courses)

## 🏗️ Intermediate Level
🔸 **Topic 1**:
   - Key concepts
   - Practical applications
   - Resources

## 🎯 Advanced Level
🔺 **Topic 1**:
   - Key concepts
   - Practical applications
   - Resources

## 🏫 Expert Level
🌟 **Topic 1**:
   - Key concepts
   - Practical applications
   - Resources

Include emojis to make it visually appealing and use clear section headers."#;

/// Render the curriculum-designer prompt.
fn roadmap_prompt(domain: &str) -> String {
    format!(
        "You are an expert curriculum designer and technical educator.\n\
         Your task is to create a detailed learning roadmap for the domain: {domain}.\n\n\
         {ROADMAP_FORMAT}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_domain_and_all_levels() {
        let prompt = roadmap_prompt("Data Science");
        assert!(prompt.contains("domain: Data Science"));
        for level in ["Foundation Level", "Intermediate Level", "Advanced Level", "Expert Level"] {
            assert!(prompt.contains(level), "missing section: {level}");
        }
    }
}
