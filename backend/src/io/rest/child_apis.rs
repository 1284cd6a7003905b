//! # REST API for Child Management
//!
//! Endpoints for creating, retrieving, updating, and deleting children.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;

use super::errors::error_response;
use super::mappers::{BalanceMapper, ChildMapper};
use crate::domain::commands::child::DeleteChildCommand;
use crate::domain::Session;
use crate::storage::Connection;
use crate::AppState;
use shared::{CreateChildRequest, UpdateChildRequest};

/// Create a new child
pub async fn create_child<C: Connection>(
    State(state): State<AppState<C>>,
    session: Session,
    Json(request): Json<CreateChildRequest>,
) -> impl IntoResponse {
    info!("POST /api/children - request: {:?}", request);

    let command = ChildMapper::to_create_command(request);
    match state.ledger_service.create_child(&session, command).await {
        Ok(child) => (
            StatusCode::CREATED,
            Json(ChildMapper::to_child_response_dto(child, "Child created successfully.")),
        )
            .into_response(),
        Err(e) => error_response("Create child", e),
    }
}

/// List the caller's children
pub async fn list_children<C: Connection>(
    State(state): State<AppState<C>>,
    session: Session,
) -> impl IntoResponse {
    info!("GET /api/children");

    match state.ledger_service.list_children(&session).await {
        Ok(children) => (StatusCode::OK, Json(ChildMapper::to_child_list_dto(children))).into_response(),
        Err(e) => error_response("List children", e),
    }
}

/// Get a child with its transactions and balance
pub async fn get_child_ledger<C: Connection>(
    State(state): State<AppState<C>>,
    session: Session,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/children/{}", child_id);

    match state.ledger_service.get_child_ledger(&session, &child_id).await {
        Ok(ledger) => (StatusCode::OK, Json(BalanceMapper::to_ledger_dto(ledger))).into_response(),
        Err(e) => error_response("Get child", e),
    }
}

/// Update a child
pub async fn update_child<C: Connection>(
    State(state): State<AppState<C>>,
    session: Session,
    Path(child_id): Path<String>,
    Json(request): Json<UpdateChildRequest>,
) -> impl IntoResponse {
    info!("PUT /api/children/{} - request: {:?}", child_id, request);

    let command = ChildMapper::to_update_command(child_id, request);
    match state.ledger_service.update_child(&session, command).await {
        Ok(child) => (
            StatusCode::OK,
            Json(ChildMapper::to_child_response_dto(child, "Child updated successfully.")),
        )
            .into_response(),
        Err(e) => error_response("Update child", e),
    }
}

/// Delete a child and all of its transactions
pub async fn delete_child<C: Connection>(
    State(state): State<AppState<C>>,
    session: Session,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/children/{}", child_id);

    match state
        .ledger_service
        .delete_child(&session, DeleteChildCommand { child_id })
        .await
    {
        Ok(result) => (StatusCode::OK, Json(ChildMapper::to_delete_response_dto(result))).into_response(),
        Err(e) => error_response("Delete child", e),
    }
}
