use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storyeval::prelude::*;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyeval=info".into()),
        )
        .init();

    let config = match EvalConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(model = %config.model, endpoint = %config.endpoint, "starting evaluation run");

    let model = Arc::new(GroqModel::new(config.api_key.clone(), config.model.clone()));
    let runner =
        EvalRunner::new().add_metric(AnswerRelevancyMetric::new(model, config.threshold));
    let driver = EvalDriver::new(ValidationClient::new(config.endpoint.clone()), runner);

    match driver.run().await {
        Ok(Some(report)) => {
            let rendered = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("report serialization failed: {e}"));
            println!("{rendered}");
            tracing::info!(all_passed = report.all_passed, "evaluation complete");
        }
        Ok(None) => {
            tracing::warn!("evaluation skipped; no test case constructed");
        }
        Err(e) => {
            tracing::error!(error = %e, "evaluation failed");
            std::process::exit(1);
        }
    }
}
