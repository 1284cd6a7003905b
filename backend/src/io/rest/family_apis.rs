//! # REST API for Family Setup
//!
//! Reading and completing the one-time family setup.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;

use super::errors::error_response;
use super::mappers::FamilyMapper;
use crate::domain::Session;
use crate::storage::Connection;
use crate::AppState;
use shared::ConfigureFamilyRequest;

/// Get the caller's family setup state
pub async fn get_family_status<C: Connection>(
    State(state): State<AppState<C>>,
    session: Session,
) -> impl IntoResponse {
    info!("GET /api/family - user: {}", session.user_id());

    match state.family_gate.status(&session).await {
        Ok((user, _)) => (StatusCode::OK, Json(FamilyMapper::to_status_response_dto(user))).into_response(),
        Err(e) => error_response("Get family status", e),
    }
}

/// Name the caller's family
pub async fn configure_family<C: Connection>(
    State(state): State<AppState<C>>,
    session: Session,
    Json(request): Json<ConfigureFamilyRequest>,
) -> impl IntoResponse {
    info!("PUT /api/family - user: {}, request: {:?}", session.user_id(), request);

    let command = FamilyMapper::to_configure_command(request);
    match state.family_gate.configure(&session, command).await {
        Ok(user) => (StatusCode::OK, Json(FamilyMapper::to_status_response_dto(user))).into_response(),
        Err(e) => error_response("Configure family", e),
    }
}
