//! AWS Lambda handler for running a single projection
//!
//! Accepts a JSON event with an optional holding period and the full
//! assumption set, and returns the statements, disposal and return metrics.
//! An event without assumptions is rejected by the runtime's deserializer.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{error, info};
use realty_projection::{
    projection::{AnnualStatementRow, DisposalResult, ProjectionConfig, ProjectionSummary, RatioRow},
    ProjectionAssumptions, ProjectionEngine,
};
use serde::{Deserialize, Serialize};

/// Input configuration for the projection
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    /// Holding period in years (default: 5)
    #[serde(default = "default_years")]
    pub years: i32,

    /// Full assumption set
    pub assumptions: ProjectionAssumptions,

    /// Include the annual statements and ratios in the response
    #[serde(default = "default_true")]
    pub detailed_output: bool,
}

fn default_years() -> i32 { ProjectionConfig::default().years }
fn default_true() -> bool { true }

/// Output from the projection
#[derive(Debug, Serialize, Default)]
pub struct ProjectionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ProjectionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposal: Option<DisposalResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statements: Vec<AnnualStatementRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ratios: Vec<RatioRow>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Lambda handler function
async fn handler(event: LambdaEvent<ProjectionRequest>) -> Result<ProjectionResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    let engine = ProjectionEngine::new(request.assumptions, ProjectionConfig::with_years(request.years));

    let mut response = match engine.project() {
        Ok(result) => {
            info!("Projected {} years", result.years);
            ProjectionResponse {
                summary: Some(result.summary()),
                disposal: Some(result.disposal),
                statements: if request.detailed_output { result.statements } else { Vec::new() },
                ratios: if request.detailed_output { result.ratios } else { Vec::new() },
                ..Default::default()
            }
        }
        Err(e) => {
            error!("Projection failed: {}", e);
            ProjectionResponse {
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    };

    response.execution_time_ms = start.elapsed().as_millis() as u64;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_requires_assumptions() {
        let err = serde_json::from_value::<ProjectionRequest>(json!({ "years": 5 })).unwrap_err();
        assert!(err.to_string().contains("assumptions"));
    }

    #[test]
    fn test_request_defaults_horizon_only() {
        let request: ProjectionRequest = serde_json::from_value(json!({
            "assumptions": ProjectionAssumptions::reference_case(),
        }))
        .unwrap();

        assert_eq!(request.years, 5);
        assert!(request.detailed_output);
        assert_eq!(request.assumptions, ProjectionAssumptions::reference_case());
    }
}
