use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::metric::{Metric, MetricResult};
use crate::model::EvalModel;
use crate::test_case::LlmTestCase;

pub const ANSWER_RELEVANCY: &str = "answer_relevancy";

/// LLM-as-judge metric scoring how well the actual output addresses the
/// input, grounded by the retrieval context.
pub struct AnswerRelevancyMetric<M: EvalModel> {
    model: Arc<M>,
    threshold: f64,
}

impl<M: EvalModel> AnswerRelevancyMetric<M> {
    pub fn new(model: Arc<M>, threshold: f64) -> Self {
        Self { model, threshold }
    }

    fn build_prompt(&self, case: &LlmTestCase) -> String {
        let context = if case.retrieval_context.is_empty() {
            "(none)".to_string()
        } else {
            case.retrieval_context
                .iter()
                .enumerate()
                .map(|(i, passage)| format!("[{}] {}", i + 1, passage))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            "You are an expert evaluator. Score how relevant the actual output is \
            to the input, on a scale of 0.0 to 1.0.\n\n\
            Input: {}\n\n\
            Expected output: {}\n\n\
            Actual output: {}\n\n\
            Retrieval context:\n{}\n\n\
            Respond with ONLY a JSON object: {{\"score\": <float>, \"explanation\": \"<reason>\"}}",
            case.input, case.expected_output, case.actual_output, context
        )
    }
}

#[async_trait]
impl<M: EvalModel + 'static> Metric for AnswerRelevancyMetric<M> {
    fn name(&self) -> &str {
        ANSWER_RELEVANCY
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    async fn measure(&self, case: &LlmTestCase) -> Result<MetricResult> {
        let prompt = self.build_prompt(case);
        let reply = self.model.a_generate(&prompt).await?;
        let (score, explanation) = parse_judge_reply(&reply);

        Ok(MetricResult {
            metric: ANSWER_RELEVANCY.into(),
            score,
            threshold: self.threshold,
            passed: score >= self.threshold,
            reason: Some(explanation),
        })
    }
}

/// Extract a clamped score and explanation from the judge's reply.
///
/// Prefers the requested JSON shape; falls back to scanning for a bare
/// number in [0, 1]; otherwise scores 0.
pub fn parse_judge_reply(text: &str) -> (f64, String) {
    if let Ok(val) = serde_json::from_str::<Value>(text) {
        let score = val
            .get("score")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);
        let explanation = val
            .get("explanation")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        return (score, explanation);
    }

    for word in text.split_whitespace() {
        if let Ok(n) = word
            .trim_matches(|c: char| !c.is_ascii_digit() && c != '.')
            .parse::<f64>()
        {
            if (0.0..=1.0).contains(&n) {
                return (n, text.to_string());
            }
        }
    }

    (0.0, format!("Could not parse score from: {text}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EvalError, ProviderError};

    // --- parse_judge_reply tests ---

    #[test]
    fn parse_valid_json() {
        let (score, explanation) =
            parse_judge_reply(r#"{"score": 0.85, "explanation": "Addresses the story"}"#);
        assert!((score - 0.85).abs() < 1e-10);
        assert_eq!(explanation, "Addresses the story");
    }

    #[test]
    fn parse_score_clamped() {
        let (score, _) = parse_judge_reply(r#"{"score": 1.5, "explanation": "over"}"#);
        assert_eq!(score, 1.0);

        let (score, _) = parse_judge_reply(r#"{"score": -0.5, "explanation": "under"}"#);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn parse_plain_number() {
        let (score, explanation) = parse_judge_reply("I would rate this 0.7 out of 1.0");
        assert!((score - 0.7).abs() < 1e-10);
        assert_eq!(explanation, "I would rate this 0.7 out of 1.0");
    }

    #[test]
    fn parse_unparseable() {
        let (score, explanation) = parse_judge_reply("cannot say");
        assert_eq!(score, 0.0);
        assert!(explanation.contains("Could not parse score"));
    }

    // --- metric tests with a scripted model ---

    #[derive(Clone)]
    struct ScriptedModel {
        reply: std::result::Result<String, String>,
    }

    #[async_trait]
    impl EvalModel for ScriptedModel {
        type Client = ();

        fn load_model(&self) -> &Self::Client {
            &()
        }

        fn generate(&self, _prompt: &str) -> Result<String> {
            self.reply
                .clone()
                .map_err(|e| EvalError::Provider(ProviderError::ApiRequest(e)))
        }

        async fn a_generate(&self, prompt: &str) -> Result<String> {
            self.generate(prompt)
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn sample_case() -> LlmTestCase {
        LlmTestCase::new(
            "As a user, I want to login...",
            r#"{"format":8}"#,
            "Should provide scores for Format, Clarity, Testability, Completeness, Consistency, and Grammar",
            vec!["A".into(), "B".into()],
        )
    }

    #[tokio::test]
    async fn measure_passes_above_threshold() {
        let model = Arc::new(ScriptedModel {
            reply: Ok(r#"{"score": 0.9, "explanation": "relevant"}"#.into()),
        });
        let metric = AnswerRelevancyMetric::new(model, 0.7);

        let result = metric.measure(&sample_case()).await.unwrap();
        assert_eq!(result.metric, ANSWER_RELEVANCY);
        assert!((result.score - 0.9).abs() < 1e-10);
        assert!(result.passed);
        assert_eq!(result.reason.as_deref(), Some("relevant"));
    }

    #[tokio::test]
    async fn measure_fails_below_threshold() {
        let model = Arc::new(ScriptedModel {
            reply: Ok(r#"{"score": 0.4, "explanation": "off topic"}"#.into()),
        });
        let metric = AnswerRelevancyMetric::new(model, 0.7);

        let result = metric.measure(&sample_case()).await.unwrap();
        assert!(!result.passed);
        assert_eq!(result.threshold, 0.7);
    }

    #[tokio::test]
    async fn measure_propagates_provider_error() {
        let model = Arc::new(ScriptedModel {
            reply: Err("connection reset".into()),
        });
        let metric = AnswerRelevancyMetric::new(model, 0.7);

        let err = metric.measure(&sample_case()).await.unwrap_err();
        assert!(matches!(
            err,
            EvalError::Provider(ProviderError::ApiRequest(_))
        ));
    }

    #[test]
    fn prompt_includes_case_fields() {
        let model = Arc::new(ScriptedModel {
            reply: Ok(String::new()),
        });
        let metric = AnswerRelevancyMetric::new(model, 0.7);
        let prompt = metric.build_prompt(&sample_case());
        assert!(prompt.contains("As a user, I want to login..."));
        assert!(prompt.contains(r#"{"format":8}"#));
        assert!(prompt.contains("[1] A"));
        assert!(prompt.contains("[2] B"));
    }

    #[test]
    fn prompt_handles_empty_context() {
        let model = Arc::new(ScriptedModel {
            reply: Ok(String::new()),
        });
        let metric = AnswerRelevancyMetric::new(model, 0.7);
        let case = LlmTestCase::new("q", "a", "rubric", Vec::new());
        let prompt = metric.build_prompt(&case);
        assert!(prompt.contains("(none)"));
    }
}
