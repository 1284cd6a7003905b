//! Wire types shared between the family ledger backend and its clients.
//!
//! Everything here is plain data: timestamps travel as RFC 3339 strings and
//! amounts as exact decimals (serialised as strings).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A child registered in a family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub family_id: String,
    pub name: String,
    pub age: u32,
    /// RFC 3339 timestamp
    pub created_date: String,
    /// RFC 3339 timestamp
    pub updated_date: String,
}

/// Transaction as shown to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Format: "transaction::<income|expense>::<uuid>"
    pub id: String,
    pub child_id: String,
    /// "income" or "expense"
    pub transaction_type: String,
    pub amount: Decimal,
    /// Amount rounded to two places for display
    pub formatted_amount: String,
    pub description: String,
    /// RFC 3339 timestamp
    pub created_date: String,
}

/// The authenticated user's family record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub family_name: Option<String>,
}

/// Setup state of the user's family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FamilyStatus {
    Unconfigured,
    Configured { family_name: String },
}

/// Request for setting the family name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigureFamilyRequest {
    pub family_name: String,
}

/// Response describing the family setup state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyStatusResponse {
    pub user: User,
    pub status: FamilyStatus,
}

/// Request for creating a new child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChildRequest {
    pub name: String,
    /// Signed so that bad input reaches validation instead of failing to parse
    pub age: i64,
}

/// Request for updating an existing child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateChildRequest {
    pub name: String,
    pub age: i64,
}

/// Response after creating or updating a child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildResponse {
    pub child: Child,
    pub success_message: String,
}

/// Response containing a list of children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildListResponse {
    pub children: Vec<Child>,
}

/// Response after deleting a child and its transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteChildResponse {
    pub child_id: String,
    pub deleted_transactions: u32,
    pub success_message: String,
}

/// Request for recording a transaction against a child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// "income" or "expense"; anything else is rejected by validation
    pub transaction_type: String,
    pub amount: Decimal,
    pub description: String,
}

/// Balance of a single child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildBalance {
    pub child: Child,
    pub balance: Decimal,
    pub formatted_balance: String,
}

/// Balances for every child in the family plus the family total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyBalancesResponse {
    pub children: Vec<ChildBalance>,
    pub total_balance: Decimal,
    pub formatted_total_balance: String,
}

/// A child's full ledger: the child, its transactions (newest first) and balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildLedgerResponse {
    pub child: Child,
    pub transactions: Vec<Transaction>,
    pub balance: Decimal,
    pub formatted_balance: String,
}

/// Error body returned by the REST interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Format an amount with exactly two decimal places.
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(40, 0)), "40.00");
        assert_eq!(format_amount(Decimal::new(-155, 1)), "-15.50");
        assert_eq!(format_amount(Decimal::new(12345, 3)), "12.35");
    }

    #[test]
    fn test_family_status_serialization() {
        let status = FamilyStatus::Configured {
            family_name: "Levi".to_string(),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "configured");
        assert_eq!(json["family_name"], "Levi");

        let json = serde_json::to_value(FamilyStatus::Unconfigured).unwrap();
        assert_eq!(json["state"], "unconfigured");
    }

    #[test]
    fn test_create_transaction_request_accepts_numeric_amount() {
        let request: CreateTransactionRequest = serde_json::from_str(
            r#"{"transaction_type":"income","amount":12.5,"description":"Chores"}"#,
        )
        .unwrap();
        assert_eq!(request.amount, Decimal::new(125, 1));
    }
}
