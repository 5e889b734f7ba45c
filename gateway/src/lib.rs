//! RandLedger HTTP gateway
//!
//! Boundary layer in front of the chain core: validates and clamps request
//! parameters, attributes audit records to the requesting client, and
//! serves persisted blocks. Core errors surface as request failures
//! without crashing the process.

pub mod api;
pub mod params;

use axum::{routing::get, Router};
use chain_core::{config::LimitsConfig, LedgerService};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Ledger service owning all chain state.
    pub service: Arc<LedgerService>,

    /// Request validation limits.
    pub limits: LimitsConfig,
}

/// Build the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/randomnumber", get(api::generate))
        .route("/getblock", get(api::get_block))
        .route("/health", get(api::health))
        .route("/metrics", get(api::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
