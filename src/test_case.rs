use serde::{Deserialize, Serialize};

/// Retrieval context passed to a metric never exceeds this many passages.
pub const MAX_RETRIEVAL_CONTEXT: usize = 3;

/// A single input/output/context tuple submitted for evaluation.
///
/// Constructed once per run and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmTestCase {
    /// The input sent to the system under test.
    pub input: String,
    /// The system's response, stringified.
    pub actual_output: String,
    /// Human-readable rubric describing what a good response contains.
    pub expected_output: String,
    /// Supporting passages grounding the relevancy judgment, in the order
    /// the system returned them.
    pub retrieval_context: Vec<String>,
}

impl LlmTestCase {
    /// Build a test case, truncating the retrieval context to
    /// [`MAX_RETRIEVAL_CONTEXT`] entries.
    pub fn new(
        input: impl Into<String>,
        actual_output: impl Into<String>,
        expected_output: impl Into<String>,
        mut retrieval_context: Vec<String>,
    ) -> Self {
        retrieval_context.truncate(MAX_RETRIEVAL_CONTEXT);
        Self {
            input: input.into(),
            actual_output: actual_output.into(),
            expected_output: expected_output.into(),
            retrieval_context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_within_cap_is_kept_in_order() {
        let case = LlmTestCase::new("q", "a", "rubric", vec!["A".into(), "B".into()]);
        assert_eq!(case.retrieval_context, vec!["A", "B"]);
    }

    #[test]
    fn context_is_truncated_to_cap() {
        let stories: Vec<String> = (0..5).map(|i| format!("story-{i}")).collect();
        let case = LlmTestCase::new("q", "a", "rubric", stories);
        assert_eq!(case.retrieval_context.len(), MAX_RETRIEVAL_CONTEXT);
        assert_eq!(
            case.retrieval_context,
            vec!["story-0", "story-1", "story-2"]
        );
    }

    #[test]
    fn empty_context_allowed() {
        let case = LlmTestCase::new("q", "a", "rubric", Vec::new());
        assert!(case.retrieval_context.is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let case = LlmTestCase::new("q", "a", "rubric", vec!["A".into()]);
        let json = serde_json::to_string(&case).unwrap();
        let parsed: LlmTestCase = serde_json::from_str(&json).unwrap();
        assert_eq!(case, parsed);
    }
}
