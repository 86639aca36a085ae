//! Helpers for handling JSON embedded in model output.

/// Extract the JSON payload from model output that may be wrapped in a
/// markdown code fence.
///
/// Models asked for "ONLY valid JSON" still frequently fence their answer in
/// ```` ```json ```` blocks. Returns the fenced content if a fence is found,
/// otherwise the trimmed input unchanged. Callers parse and validate the
/// result; this function never fails.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    for start in ["```json\n", "```json\r\n", "```\n", "```\r\n"] {
        if let Some(idx) = trimmed.find(start) {
            let content_start = idx + start.len();
            if let Some(end) = trimmed[content_start..].find("```") {
                return trimmed[content_start..content_start + end].trim();
            }
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_json_passes_through() {
        assert_eq!(strip_code_fence(r#"{"query": "rust"}"#), r#"{"query": "rust"}"#);
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        let text = "Here is the result:\n```json\n{\"query\": \"rust\"}\n```";
        assert_eq!(strip_code_fence(text), r#"{"query": "rust"}"#);
    }

    #[test]
    fn plain_fence_is_unwrapped() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(text), r#"{"a": 1}"#);
    }

    #[test]
    fn unterminated_fence_is_left_alone() {
        let text = "```json\n{\"a\": 1}";
        assert_eq!(strip_code_fence(text), text.trim());
    }
}
