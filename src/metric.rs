use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::test_case::LlmTestCase;

/// Outcome of measuring one metric against one test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricResult {
    /// Name of the metric.
    pub metric: String,
    /// Score value in [0, 1].
    pub score: f64,
    /// Pass/fail cutoff the metric was configured with.
    pub threshold: f64,
    /// Whether `score >= threshold`.
    pub passed: bool,
    /// Optional explanation from the judge.
    #[serde(default)]
    pub reason: Option<String>,
}

/// A scoring policy producing a pass/fail judgment against a threshold.
#[async_trait]
pub trait Metric: Send + Sync {
    /// Name of this metric.
    fn name(&self) -> &str;

    /// Pass/fail cutoff in [0, 1].
    fn threshold(&self) -> f64;

    /// Score the test case. Provider failures propagate unretried.
    async fn measure(&self, case: &LlmTestCase) -> Result<MetricResult>;
}
