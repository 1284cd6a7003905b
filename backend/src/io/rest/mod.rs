//! # REST API Interface Layer
//!
//! HTTP endpoints for the family ledger. Every route except the router's own
//! CORS preflight requires the `X-User-Id` header.
//!
//! - **family_apis**: family setup status and configuration
//! - **child_apis**: child CRUD and the per-child ledger
//! - **transaction_apis**: recording income and expenses
//! - **balance_apis**: derived balances
//! - **errors**: domain error to HTTP status translation

pub mod balance_apis;
pub mod child_apis;
pub mod errors;
pub mod family_apis;
pub mod mappers;
pub mod session;
pub mod transaction_apis;

use axum::{
    routing::{get, post},
    Router,
};

use crate::storage::Connection;
use crate::AppState;

/// Routes served under `/api`
pub fn api_routes<C: Connection>() -> Router<AppState<C>> {
    Router::new()
        .route(
            "/family",
            get(family_apis::get_family_status::<C>).put(family_apis::configure_family::<C>),
        )
        .route("/balances", get(balance_apis::get_family_balances::<C>))
        .route(
            "/children",
            get(child_apis::list_children::<C>).post(child_apis::create_child::<C>),
        )
        .route(
            "/children/:id",
            get(child_apis::get_child_ledger::<C>)
                .put(child_apis::update_child::<C>)
                .delete(child_apis::delete_child::<C>),
        )
        .route("/children/:id/balance", get(balance_apis::get_child_balance::<C>))
        .route(
            "/children/:id/transactions",
            post(transaction_apis::create_transaction::<C>),
        )
}
