//! Domain model for a ledger transaction.
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

use crate::domain::errors::ValidationError;

pub const MAX_DESCRIPTION_LENGTH: usize = 256;

/// Largest amount a single transaction may carry
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Direction of a transaction.
///
/// Records read back from the store keep whatever tag they were written with;
/// tags other than `income`/`expense` survive as `Unrecognized` so that they
/// can be rejected instead of being counted on either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Expense,
    Unrecognized(String),
}

impl TransactionType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "income" => TransactionType::Income,
            "expense" => TransactionType::Expense,
            _ => TransactionType::Unrecognized(tag.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Unrecognized(tag) => tag,
        }
    }

    /// Accept only the two recognized directions.
    pub fn parse_recognized(tag: &str) -> Result<Self, ValidationError> {
        match Self::from_tag(tag) {
            TransactionType::Unrecognized(tag) => {
                Err(ValidationError::UnrecognizedTransactionType(tag))
            }
            recognized => Ok(recognized),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Transaction ID in format: "transaction::<income|expense>::<uuid>"
///
/// Transactions are immutable once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub child_id: String,
    pub transaction_type: TransactionType,
    /// Always non-negative; the type carries the sign
    pub amount: Decimal,
    pub description: String,
    pub created_date: DateTime<Utc>,
}

impl Transaction {
    /// Build a new transaction, validating every field.
    pub fn new(
        child_id: &str,
        transaction_type: &str,
        amount: Decimal,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let transaction_type = TransactionType::parse_recognized(transaction_type)?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(amount));
        }
        if amount > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge(MAX_AMOUNT));
        }
        let description = Self::validate_description(description)?;

        Ok(Self {
            id: Self::generate_id(&transaction_type),
            child_id: child_id.to_string(),
            transaction_type,
            amount,
            description,
            created_date: now,
        })
    }

    pub fn generate_id(transaction_type: &TransactionType) -> String {
        format!("transaction::{}::{}", transaction_type, Uuid::new_v4())
    }

    /// Returns the trimmed description.
    pub fn validate_description(description: &str) -> Result<String, ValidationError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::DescriptionTooLong(MAX_DESCRIPTION_LENGTH));
        }
        Ok(description.to_string())
    }
}
