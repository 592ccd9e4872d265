use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::metric::{Metric, MetricResult};
use crate::test_case::LlmTestCase;

/// Results for one test case across all configured metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// The input of the evaluated case.
    pub input: String,
    /// One result per metric, in configuration order.
    pub metric_results: Vec<MetricResult>,
    /// Wall time spent scoring this case, in milliseconds.
    pub latency_ms: u64,
}

/// Aggregate outcome for one metric across all cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean_score: f64,
    /// Cutoff the metric was configured with.
    pub threshold: f64,
    /// Whether the mean score met the cutoff.
    pub passed: bool,
}

/// Summary of an evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub total_cases: usize,
    pub results: Vec<CaseResult>,
    /// Per-metric aggregate, keyed by metric name.
    pub aggregate_scores: HashMap<String, MetricSummary>,
    /// True when every metric on every case met its threshold.
    pub all_passed: bool,
}

/// Scores test cases against an ordered list of metrics.
pub struct EvalRunner {
    metrics: Vec<Box<dyn Metric>>,
}

impl EvalRunner {
    pub fn new() -> Self {
        Self {
            metrics: Vec::new(),
        }
    }

    pub fn add_metric(mut self, metric: impl Metric + 'static) -> Self {
        self.metrics.push(Box::new(metric));
        self
    }

    /// Measure every metric against every case, sequentially; metric
    /// errors abort the run and propagate.
    pub async fn evaluate(&self, cases: &[LlmTestCase]) -> Result<EvalReport> {
        let mut results = Vec::with_capacity(cases.len());

        for case in cases {
            let start = Instant::now();
            let mut metric_results = Vec::with_capacity(self.metrics.len());
            for metric in &self.metrics {
                metric_results.push(metric.measure(case).await?);
            }
            results.push(CaseResult {
                input: case.input.clone(),
                metric_results,
                latency_ms: start.elapsed().as_millis() as u64,
            });
        }

        let mut aggregate_scores = HashMap::new();
        for metric in &self.metrics {
            let name = metric.name();
            let scores: Vec<f64> = results
                .iter()
                .flat_map(|r| r.metric_results.iter())
                .filter(|m| m.metric == name)
                .map(|m| m.score)
                .collect();
            if !scores.is_empty() {
                let mean_score = scores.iter().sum::<f64>() / scores.len() as f64;
                aggregate_scores.insert(
                    name.to_string(),
                    MetricSummary {
                        mean_score,
                        threshold: metric.threshold(),
                        passed: mean_score >= metric.threshold(),
                    },
                );
            }
        }

        let all_passed = results
            .iter()
            .flat_map(|r| r.metric_results.iter())
            .all(|m| m.passed);

        Ok(EvalReport {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            total_cases: cases.len(),
            results,
            aggregate_scores,
            all_passed,
        })
    }
}

impl Default for EvalRunner {
    fn default() -> Self {
        Self::new()
    }
}
