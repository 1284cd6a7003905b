//! Domain-level command and result types.
//!
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the DTOs defined in the
//! `shared` crate to these types.

pub mod family {
    /// Input for naming the caller's family.
    #[derive(Debug, Clone)]
    pub struct ConfigureFamilyCommand {
        pub family_name: String,
    }
}

pub mod child {
    use crate::domain::models::Child;

    /// Input for registering a new child.
    #[derive(Debug, Clone)]
    pub struct CreateChildCommand {
        pub name: String,
        pub age: i64,
    }

    /// Input for editing a child's name and age.
    #[derive(Debug, Clone)]
    pub struct UpdateChildCommand {
        pub child_id: String,
        pub name: String,
        pub age: i64,
    }

    /// Input for deleting a child together with its transactions.
    #[derive(Debug, Clone)]
    pub struct DeleteChildCommand {
        pub child_id: String,
    }

    /// Result of deleting a child.
    #[derive(Debug, Clone)]
    pub struct DeleteChildResult {
        pub child: Child,
        pub deleted_transactions: u32,
    }
}

pub mod transactions {
    use rust_decimal::Decimal;

    /// Input for recording a transaction against a child.
    #[derive(Debug, Clone)]
    pub struct CreateTransactionCommand {
        pub child_id: String,
        /// Raw type tag; validated by the service
        pub transaction_type: String,
        pub amount: Decimal,
        pub description: String,
    }
}

pub mod balances {
    use crate::domain::models::{Child, Transaction};
    use rust_decimal::Decimal;

    /// A child paired with its derived balance.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ChildBalance {
        pub child: Child,
        pub balance: Decimal,
    }

    /// Every child in the family with its balance, plus the family total.
    #[derive(Debug, Clone, PartialEq)]
    pub struct FamilyBalances {
        /// Newest child first
        pub children: Vec<ChildBalance>,
        pub total_balance: Decimal,
    }

    /// A child's transactions (newest first) and balance.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ChildLedger {
        pub child: Child,
        pub transactions: Vec<Transaction>,
        pub balance: Decimal,
    }
}
