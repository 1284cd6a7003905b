//! # Domain Module
//!
//! Business rules for the family ledger.
//!
//! ## Module Organization
//!
//! - **models**: `Child`, `Transaction` and `User` records with validated constructors
//! - **balance_calculator**: derives a balance from a transaction history
//! - **family_gate**: the `Unconfigured` / `Configured` family setup state machine
//! - **ledger_service**: child and transaction operations plus balance views
//! - **commands**: inputs and results of the service operations
//! - **errors**: `ValidationError` and `LedgerError`
//!
//! ## Business Rules
//!
//! - Amounts are strictly positive; the transaction type carries the sign
//! - Balances are never stored, only derived from the transaction history
//! - Children belong to exactly one family and are invisible to every other
//! - No child data can be read or written until the family has a name

pub mod balance_calculator;
pub mod commands;
pub mod errors;
pub mod family_gate;
pub mod ledger_service;
pub mod models;
pub mod session;

pub use balance_calculator::calculate_balance;
pub use errors::{LedgerError, LedgerResult, ValidationError};
pub use family_gate::{FamilySetupGate, FamilySetupState};
pub use ledger_service::LedgerService;
pub use session::Session;
