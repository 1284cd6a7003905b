//! # Family Ledger Backend
//!
//! Allowance ledger for families: parents register children, record income
//! and expenses against them, and read balances derived from that history.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers, DTO mappers)
//!     ↓
//! Domain Layer (ledger service, family setup gate, balance calculator)
//!     ↓
//! Storage Layer (entity store traits; memory and CSV backends)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::domain::{FamilySetupGate, LedgerService};
use crate::io::rest::session::USER_ID_HEADER;
use crate::storage::Connection;

/// Services shared by every request handler
#[derive(Clone)]
pub struct AppState<C: Connection> {
    pub ledger_service: LedgerService<C>,
    pub family_gate: FamilySetupGate<C>,
}

/// Wire the domain services to a storage connection
pub fn initialize_backend<C: Connection>(connection: Arc<C>, config: &AppConfig) -> AppState<C> {
    info!("Setting up domain model");
    let family_gate = FamilySetupGate::new(connection.clone());
    let ledger_service = LedgerService::new(connection, family_gate.clone())
        .with_cleanup_attempts(config.cleanup_attempts);

    AppState {
        ledger_service,
        family_gate,
    }
}

/// Create the Axum router with all routes configured
pub fn create_router<C: Connection>(app_state: AppState<C>, config: &AppConfig) -> Result<Router> {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]);
    if let Some(origin) = &config.allowed_origin {
        let origin = origin
            .parse::<HeaderValue>()
            .with_context(|| format!("Invalid allowed origin {:?}", origin))?;
        info!("Allowing cross-origin requests from {:?}", origin);
        cors = cors.allow_origin(origin);
    }

    Ok(Router::new()
        .nest("/api", io::rest::api_routes::<C>())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
