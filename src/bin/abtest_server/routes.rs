use crate::state::SharedState;
use abtest_utils::engine::InferenceResult;
use abtest_utils::error::AbTestError;
use abtest_utils::observation::AbTestInput;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, warn};
use serde::Serialize;
use std::sync::atomic::Ordering;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/health", get(health_handler))
}

async fn calculate_handler(
    State(state): State<SharedState>,
    Json(input): Json<AbTestInput>,
) -> Result<Json<InferenceResult>, AppError> {
    state.total_requests.fetch_add(1, Ordering::Relaxed);
    debug!("POST /calculate {:?}", input);

    // Sampling and KDE are CPU bound, keep them off the async workers
    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || engine.calculate(&input))
        .await
        .map_err(|e| AppError::internal(format!("calculation task failed: {}", e)))?;

    match result {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            warn!("Calculation rejected: {}", e);
            Err(AppError::from(e))
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_s: f64,
    total_requests: u64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: abtest_utils::VERSION,
        uptime_s: state.started_at.elapsed().as_secs_f64(),
        total_requests: state.total_requests.load(Ordering::Relaxed),
    })
}

/// Structured JSON error response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn internal(message: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl From<AbTestError> for AppError {
    fn from(err: AbTestError) -> Self {
        let status = if err.is_input_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use abtest_utils::config::EngineConfig;
    use abtest_utils::engine::AbTestEngine;
    use std::sync::Arc;

    fn test_state() -> SharedState {
        let engine = AbTestEngine::new(EngineConfig {
            metric_samples: 5_000,
            plot_samples: 1_000,
            grid_points: 100,
            hist_bins: 30,
            ..Default::default()
        })
        .unwrap();
        Arc::new(AppState::new(engine))
    }

    #[tokio::test]
    async fn test_calculate_ok() {
        let state = test_state();
        let input = AbTestInput::new(100, 1000, 120, 1000);
        let Json(result) = calculate_handler(State(state.clone()), Json(input)).await.unwrap();
        assert!((result.freq_p_value - 0.152918).abs() <= 2e-6);
        assert_eq!(result.x_hist.len(), 30);
        assert_eq!(state.total_requests.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_is_unprocessable() {
        let input = AbTestInput::new(11, 10, 1, 10);
        let err = calculate_handler(State(test_state()), Json(input)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.message.contains("exceed"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_computation_errors_are_internal() {
        let err = AppError::from(AbTestError::InsufficientSamples("empty".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health() {
        let Json(health) = health_handler(State(test_state())).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.total_requests, 0);
    }
}
