//! # REST API for Transactions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;

use super::errors::error_response;
use super::mappers::TransactionMapper;
use crate::domain::Session;
use crate::storage::Connection;
use crate::AppState;
use shared::CreateTransactionRequest;

/// Record an income or expense for a child
pub async fn create_transaction<C: Connection>(
    State(state): State<AppState<C>>,
    session: Session,
    Path(child_id): Path<String>,
    Json(request): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/children/{}/transactions - request: {:?}", child_id, request);

    let command = TransactionMapper::to_create_command(child_id, request);
    match state.ledger_service.create_transaction(&session, command).await {
        Ok(transaction) => (StatusCode::CREATED, Json(TransactionMapper::to_dto(transaction))).into_response(),
        Err(e) => error_response("Create transaction", e),
    }
}
