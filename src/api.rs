//! HTTP shell around the estimation core

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::estimation::{estimate, format_range, EstimateError, RentForm};
use crate::params::ParameterTable;

#[derive(Clone)]
pub struct AppState {
    pub parameters: ParameterTable,
    pub reference_city: Arc<str>,
}

#[derive(Serialize, Deserialize)]
pub struct ApiResponse {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NeighborhoodSummary {
    pub neighborhood: String,
    pub city: String,
    pub types: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EstimateResponse {
    Ok(RangeBody),
    Failure(FailureBody),
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RangeBody {
    pub status: String,
    pub min: f64,
    pub max: f64,
    pub estimated: f64,
    pub display: String,
}

/// `status` is the error's code, e.g. `incomplete` or `unknown_neighborhood`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FailureBody {
    pub status: String,
    pub message: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/api/health", get(health_check))
        .route("/api/neighborhoods", get(list_neighborhoods))
        .route("/api/estimate", post(estimate_rent))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        message: "Rent estimator API is running!".to_string(),
        status: "ok".to_string(),
    })
}

async fn list_neighborhoods(State(state): State<AppState>) -> Json<Vec<NeighborhoodSummary>> {
    let summaries = state
        .parameters
        .iter()
        .map(|p| NeighborhoodSummary {
            neighborhood: p.neighborhood.clone(),
            city: p.city.clone(),
            types: p.types.keys().cloned().collect(),
        })
        .collect();

    Json(summaries)
}

async fn estimate_rent(
    State(state): State<AppState>,
    Json(form): Json<RentForm>,
) -> (StatusCode, Json<EstimateResponse>) {
    let attrs = form.to_attributes(&state.reference_city);

    match estimate(&attrs, &state.parameters) {
        Ok(range) => {
            let rounded = range.rounded();
            info!(
                "Estimate for {} in {}: {:.2} - {:.2}",
                form.property_type, attrs.neighborhood, rounded.min, rounded.max
            );

            (
                StatusCode::OK,
                Json(EstimateResponse::Ok(RangeBody {
                    status: "ok".to_string(),
                    min: rounded.min,
                    max: rounded.max,
                    estimated: rounded.estimated,
                    display: format_range(&range),
                })),
            )
        }
        Err(err) => {
            debug!("No estimate: {}", err);
            failure_response(&err)
        }
    }
}

/// Incomplete input is not an error while the form is being filled in
fn failure_response(err: &EstimateError) -> (StatusCode, Json<EstimateResponse>) {
    let status = match err {
        e if e.is_missing_data() => StatusCode::NOT_FOUND,
        EstimateError::OutOfRange => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };

    (
        status,
        Json(EstimateResponse::Failure(FailureBody {
            status: err.code().to_string(),
            message: err.to_string(),
        })),
    )
}
