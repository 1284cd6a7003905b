//! # Storage Traits
//!
//! The entity store client as seen by the domain layer. Implementations may
//! be remote or local; every call is async and any failure is reported as an
//! opaque `anyhow::Error`, which the domain treats uniformly as a transport
//! failure.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{Child, Transaction, User};

/// Trait defining the interface for child storage operations
#[async_trait]
pub trait ChildStorage: Send + Sync {
    /// List the children of one family, newest first (by `created_date`)
    async fn list_children(&self, family_id: &str) -> Result<Vec<Child>>;

    /// Retrieve a specific child by ID
    async fn get_child(&self, child_id: &str) -> Result<Option<Child>>;

    /// Store a new child
    async fn store_child(&self, child: &Child) -> Result<()>;

    /// Replace an existing child record
    async fn update_child(&self, child: &Child) -> Result<()>;

    /// Delete a child by ID
    /// Returns true if the child was found and deleted, false otherwise
    async fn delete_child(&self, child_id: &str) -> Result<bool>;
}

/// Trait defining the interface for transaction storage operations
#[async_trait]
pub trait TransactionStorage: Send + Sync {
    /// List every transaction visible to the store, in no particular order
    async fn list_transactions(&self) -> Result<Vec<Transaction>>;

    /// List the transactions of one child, newest first (by `created_date`)
    async fn list_transactions_for_child(&self, child_id: &str) -> Result<Vec<Transaction>>;

    /// Store a new transaction
    async fn store_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// Delete a single transaction
    /// Returns true if the transaction was found and deleted, false otherwise
    async fn delete_transaction(&self, transaction_id: &str) -> Result<bool>;
}

/// Trait defining the interface for user storage operations
#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Store a newly provisioned user
    async fn store_user(&self, user: &User) -> Result<()>;

    async fn update_user(&self, user: &User) -> Result<()>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type (in-memory, CSV
/// files, etc.) and provides factory methods for creating repositories.
pub trait Connection: Send + Sync + Clone + 'static {
    type ChildRepository: ChildStorage + Clone + 'static;
    type TransactionRepository: TransactionStorage + Clone + 'static;
    type UserRepository: UserStorage + Clone + 'static;

    fn create_child_repository(&self) -> Self::ChildRepository;

    fn create_transaction_repository(&self) -> Self::TransactionRepository;

    fn create_user_repository(&self) -> Self::UserRepository;
}
