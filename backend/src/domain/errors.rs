//! Error types for the ledger domain.

use rust_decimal::Decimal;

/// Input rejected before it reaches the entity store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Child name cannot be empty")]
    EmptyChildName,
    #[error("Child name cannot exceed {0} characters")]
    ChildNameTooLong(usize),
    #[error("Age must be a positive integer, got {0}")]
    NonPositiveAge(i64),
    #[error("Age {0} is out of range")]
    AgeOutOfRange(i64),
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("Amount cannot exceed {0}")]
    AmountTooLarge(Decimal),
    #[error("Description cannot be empty")]
    EmptyDescription,
    #[error("Description cannot exceed {0} characters")]
    DescriptionTooLong(usize),
    #[error("Unrecognized transaction type: {0:?}")]
    UnrecognizedTransactionType(String),
    /// A stored record carries an amount below zero.
    #[error("Transaction {0} has a negative amount")]
    NegativeAmount(String),
    /// The sum of the stored amounts does not fit in a decimal.
    #[error("Balance is too large to compute")]
    BalanceOverflow,
    #[error("Family name cannot be empty")]
    EmptyFamilyName,
    /// The family was already named; renaming is not supported.
    #[error("Family is already configured as {0:?}")]
    FamilyAlreadyConfigured(String),
}

/// Errors surfaced by the ledger services.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The user has not named their family yet, so no child data may be read.
    #[error("Family setup must be completed first")]
    SetupRequired,

    /// Any failure of the entity store. The cause is kept for logging only.
    #[error("Entity store request failed: {0:#}")]
    Transport(#[from] anyhow::Error),

    /// The child is gone but some of its transactions could not be removed.
    #[error(
        "Child {child_id} was deleted but {} of its transactions could not be removed",
        remaining.len()
    )]
    CleanupIncomplete {
        child_id: String,
        remaining: Vec<String>,
    },
}

impl LedgerError {
    pub fn child_not_found(child_id: &str) -> Self {
        LedgerError::NotFound {
            entity: "Child",
            id: child_id.to_string(),
        }
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
