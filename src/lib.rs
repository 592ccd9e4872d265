pub mod config;
pub mod driver;
pub mod error;
pub mod groq;
pub mod metric;
pub mod model;
pub mod relevancy;
pub mod runner;
pub mod story_api;
pub mod test_case;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::EvalConfig;
    pub use crate::driver::EvalDriver;
    pub use crate::error::{EvalError, ProviderError, Result, ValidationError};
    pub use crate::groq::GroqModel;
    pub use crate::metric::{Metric, MetricResult};
    pub use crate::model::EvalModel;
    pub use crate::relevancy::AnswerRelevancyMetric;
    pub use crate::runner::{EvalReport, EvalRunner, MetricSummary};
    pub use crate::story_api::ValidationClient;
    pub use crate::test_case::{LlmTestCase, MAX_RETRIEVAL_CONTEXT};
}
