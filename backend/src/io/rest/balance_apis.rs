//! # REST API for Balances

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;

use super::errors::error_response;
use super::mappers::BalanceMapper;
use crate::domain::Session;
use crate::storage::Connection;
use crate::AppState;

/// Balances of every child in the caller's family
pub async fn get_family_balances<C: Connection>(
    State(state): State<AppState<C>>,
    session: Session,
) -> impl IntoResponse {
    info!("GET /api/balances");

    match state.ledger_service.get_family_balances(&session).await {
        Ok(balances) => (StatusCode::OK, Json(BalanceMapper::to_family_balances_dto(balances))).into_response(),
        Err(e) => error_response("Get family balances", e),
    }
}

/// Balance of one child
pub async fn get_child_balance<C: Connection>(
    State(state): State<AppState<C>>,
    session: Session,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/children/{}/balance", child_id);

    match state.ledger_service.get_child_balance(&session, &child_id).await {
        Ok(balance) => (
            StatusCode::OK,
            Json(BalanceMapper::to_child_balance_dto(balance.child, balance.balance)),
        )
            .into_response(),
        Err(e) => error_response("Get child balance", e),
    }
}
