//! HTTP handlers for the gateway

use axum::{
    extract::{ConnectInfo, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chain_core::{generator, Block, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Instant;

use crate::params::{self, RawGenerateParams};
use crate::AppState;

/// Error responses surfaced to HTTP clients.
pub enum ApiError {
    InvalidParam(String),
    Generation(chain_core::Error),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidParam(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Generation(err) => {
                tracing::error!(error = %err, "generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error generating random numbers".to_string(),
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Generated values, integers or fractions depending on the request mode.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Numbers {
    Integers(Vec<i64>),
    Floats(Vec<f64>),
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub numbers: Numbers,
    pub min_num: f64,
    pub max_num: f64,
    pub flo: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<BTreeMap<i64, u64>>,
    pub generation_time: String,
}

/// GET /randomnumber
///
/// Generates secure random values, returns them to the caller, and stages
/// an audit record for the chain. `itime > 0` schedules the record that
/// many publish cycles into the future instead of the current one.
pub async fn generate(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Query(raw): Query<RawGenerateParams>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request = params::validate(raw, &state.limits).map_err(ApiError::InvalidParam)?;

    let started = Instant::now();
    let (numbers, stats) = if request.float_mode {
        let values = generator::generate_floats(request.min, request.max, request.count)
            .map_err(ApiError::Generation)?;
        (Numbers::Floats(values), None)
    } else {
        let (min, max) = request.int_bounds();
        let generation = generator::generate_integers(min, max, request.count, request.unique)
            .map_err(ApiError::Generation)?;
        (Numbers::Integers(generation.values), Some(generation.stats))
    };
    let generation_time = format!("{:?}", started.elapsed());

    let record = Record {
        requester: addr.ip().to_string(),
        min: request.min,
        max: request.max,
        count: request.count,
        unique: request.unique,
        generation_time: generation_time.clone(),
        random_numbers: match &numbers {
            Numbers::Integers(values) => Some(values.clone()),
            Numbers::Floats(_) => None,
        },
        random_floats: match &numbers {
            Numbers::Floats(values) => Some(values.clone()),
            Numbers::Integers(_) => None,
        },
        stats: stats.clone(),
        request_details: format!(
            "min={}&max={}&count={}&flo={}&unique={}",
            request.min, request.max, request.count, request.float_mode, request.unique
        ),
    };

    if request.delay_slots > 0 {
        state.service.append_deferred(record, request.delay_slots);
    } else {
        state.service.append_immediate(record);
    }

    Ok(Json(GenerateResponse {
        numbers,
        min_num: request.min,
        max_num: request.max,
        flo: request.float_mode,
        unique: request.unique,
        stats,
        generation_time,
    }))
}

#[derive(Debug, Deserialize)]
pub struct BlockQuery {
    pub id: Option<String>,
}

/// GET /getblock
///
/// Serves a sealed block from durable storage by identifier.
pub async fn get_block(
    State(state): State<AppState>,
    Query(query): Query<BlockQuery>,
) -> Result<Json<Block>, ApiError> {
    let id: u64 = query
        .id
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| ApiError::InvalidParam("Invalid id parameter".to_string()))?;

    match state.service.block(id) {
        Ok(block) => Ok(Json(block)),
        Err(chain_core::Error::BlockNotFound(_)) => {
            Err(ApiError::NotFound("Block not found".to_string()))
        }
        Err(err) => {
            tracing::error!(block_id = id, error = %err, "failed to read block");
            Err(ApiError::Internal("Error reading block data".to_string()))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub chain_height: u64,
    pub pending_records: usize,
    pub deferred_records: usize,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.service.snapshot();

    Json(HealthResponse {
        status: "healthy",
        service: "randledger-gateway",
        version: env!("CARGO_PKG_VERSION"),
        chain_height: snapshot.blocks.last().map(|block| block.id).unwrap_or(0),
        pending_records: snapshot.pending.len(),
        deferred_records: snapshot.deferred_depths.iter().sum(),
    })
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    state
        .service
        .metrics()
        .export()
        .map_err(|err| ApiError::Internal(format!("failed to export metrics: {err}")))
}
