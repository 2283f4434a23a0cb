//! AWS Lambda handler for running repayment scenarios
//!
//! Accepts a customer id and an optional scenario via JSON and returns either a
//! single scenario summary or the full comparison against the minimum-payment
//! baseline. Datasets are loaded once per cold start from `DATA_DIR`.

use std::sync::Arc;
use std::time::Instant;

use debt_restructuring::config::{SimulationConfig, DEFAULT_DATA_PATH, DEFAULT_HORIZON_MONTHS};
use debt_restructuring::{
    build_customer_portfolio, Dataset, ScenarioComparisonResult, ScenarioRunner, ScenarioSummary,
    ScenarioType,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

const OVERVIEW: &str = "overview";

/// Input for one scenario request
#[derive(Debug, Deserialize)]
pub struct ScenarioRequest {
    pub customer_id: String,

    /// minimum_payment, optimized_plan, consolidation or overview (default)
    #[serde(default)]
    pub scenario: Option<String>,

    /// Safety cap on simulated months (default: 600, at most 1200)
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,
}

fn default_horizon_months() -> u32 { DEFAULT_HORIZON_MONTHS }

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ScenarioPayload {
    Summary(ScenarioSummary),
    Overview(ScenarioComparisonResult),
}

/// Output for one scenario request
#[derive(Debug, Serialize)]
pub struct ScenarioResponse {
    pub customer_id: String,
    pub scenario: String,
    pub horizon_months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScenarioPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended: Option<ScenarioType>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn run_request(dataset: &Dataset, request: &ScenarioRequest, scenario: &str, config: SimulationConfig) -> Result<(ScenarioPayload, Option<ScenarioType>), String> {
    let portfolio = build_customer_portfolio(dataset, &request.customer_id).map_err(|e| e.to_string())?;
    let runner = ScenarioRunner::with_config(config, dataset.bank_offers.clone());

    if scenario == OVERVIEW {
        let comparison = runner.compare(&portfolio);
        let recommended = comparison.recommended().map(|s| s.scenario_type);
        return Ok((ScenarioPayload::Overview(comparison), recommended));
    }

    let scenario_type = ScenarioType::from_label(scenario).ok_or_else(|| {
        format!(
            "Unknown scenario '{}' (expected minimum_payment, optimized_plan, consolidation or overview)",
            scenario
        )
    })?;
    Ok((ScenarioPayload::Summary(runner.run(&portfolio, scenario_type)), None))
}

/// Lambda handler function
async fn handler(dataset: Arc<Dataset>, event: LambdaEvent<ScenarioRequest>) -> Result<ScenarioResponse, Error> {
    let start = Instant::now();
    let request = event.payload;
    let scenario = request.scenario.clone().unwrap_or_else(|| OVERVIEW.to_string());
    let config = SimulationConfig::default().with_horizon(request.horizon_months);
    let horizon_months = config.horizon_months;

    let (result, recommended, error) = match run_request(&dataset, &request, &scenario, config) {
        Ok((payload, recommended)) => (Some(payload), recommended, None),
        Err(message) => {
            log::warn!("request for {} failed: {}", request.customer_id, message);
            (None, None, Some(message))
        }
    };

    Ok(ScenarioResponse {
        customer_id: request.customer_id,
        scenario,
        horizon_months,
        result,
        recommended,
        execution_time_ms: start.elapsed().as_millis() as u64,
        error,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());
    let dataset = Arc::new(Dataset::load_from(&data_dir)?);

    run(service_fn(move |event: LambdaEvent<ScenarioRequest>| {
        let dataset = Arc::clone(&dataset);
        async move { handler(dataset, event).await }
    }))
    .await
}
