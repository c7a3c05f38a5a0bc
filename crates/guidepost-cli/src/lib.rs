use anyhow::bail;
use guidepost_api_client::ServiceHealth;
use guidepost_core::{AnalysisResult, ApiResult, HealthResponse};
use guidepost_ui::GridViewState;
use serde_json::{json, Value};

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Results the grid would show, or the reason it shows none.
pub fn visible_results(state: &GridViewState) -> anyhow::Result<Vec<AnalysisResult>> {
    if let (Some(error), true) = (&state.error_message, state.analysis_results.is_empty()) {
        bail!("{}", error);
    }
    Ok(state.filtered_results().into_iter().cloned().collect())
}

fn health_entry(health: &ApiResult<HealthResponse>) -> Value {
    match health {
        Ok(response) => json!({
            "ok": response.success,
            "message": response.message,
            "timestamp": response.timestamp,
        }),
        Err(err) => json!({
            "ok": false,
            "error": err.message,
            "status": err.code,
        }),
    }
}

pub fn health_report(health: &ServiceHealth) -> Value {
    json!({
        "healthy": health.is_healthy(),
        "upload": health_entry(&health.upload),
        "analysis": health_entry(&health.analysis),
    })
}
