//! In-memory entity store.
//!
//! Holds everything in a single lock-guarded state shared by all repositories
//! created from the same connection. Used by the test suite and by the
//! `memory` storage backend for throwaway sessions.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::models::{Child, Transaction, User};
use crate::storage::traits::{ChildStorage, Connection, TransactionStorage, UserStorage};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<String, User>,
    children: HashMap<String, Child>,
    transactions: HashMap<String, Transaction>,
}

#[derive(Clone, Default)]
pub struct MemoryConnection {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

impl Connection for MemoryConnection {
    type ChildRepository = MemoryRepository;
    type TransactionRepository = MemoryRepository;
    type UserRepository = MemoryRepository;

    fn create_child_repository(&self) -> MemoryRepository {
        MemoryRepository {
            connection: self.clone(),
        }
    }

    fn create_transaction_repository(&self) -> MemoryRepository {
        MemoryRepository {
            connection: self.clone(),
        }
    }

    fn create_user_repository(&self) -> MemoryRepository {
        MemoryRepository {
            connection: self.clone(),
        }
    }
}

/// Repository over the shared in-memory state; serves every entity type.
#[derive(Clone)]
pub struct MemoryRepository {
    connection: MemoryConnection,
}

#[async_trait]
impl ChildStorage for MemoryRepository {
    async fn list_children(&self, family_id: &str) -> Result<Vec<Child>> {
        let state = self.connection.read()?;
        let mut children: Vec<Child> = state
            .children
            .values()
            .filter(|child| child.family_id == family_id)
            .cloned()
            .collect();
        children.sort_by(|a, b| b.created_date.cmp(&a.created_date).then_with(|| a.id.cmp(&b.id)));
        Ok(children)
    }

    async fn get_child(&self, child_id: &str) -> Result<Option<Child>> {
        Ok(self.connection.read()?.children.get(child_id).cloned())
    }

    async fn store_child(&self, child: &Child) -> Result<()> {
        let mut state = self.connection.write()?;
        if state.children.contains_key(&child.id) {
            return Err(anyhow!("Child already exists: {}", child.id));
        }
        state.children.insert(child.id.clone(), child.clone());
        Ok(())
    }

    async fn update_child(&self, child: &Child) -> Result<()> {
        let mut state = self.connection.write()?;
        match state.children.get_mut(&child.id) {
            Some(existing) => {
                *existing = child.clone();
                Ok(())
            }
            None => Err(anyhow!("Child not found: {}", child.id)),
        }
    }

    async fn delete_child(&self, child_id: &str) -> Result<bool> {
        Ok(self.connection.write()?.children.remove(child_id).is_some())
    }
}

#[async_trait]
impl TransactionStorage for MemoryRepository {
    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.connection.read()?.transactions.values().cloned().collect())
    }

    async fn list_transactions_for_child(&self, child_id: &str) -> Result<Vec<Transaction>> {
        let state = self.connection.read()?;
        let mut transactions: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|transaction| transaction.child_id == child_id)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.created_date.cmp(&a.created_date).then_with(|| a.id.cmp(&b.id)));
        Ok(transactions)
    }

    async fn store_transaction(&self, transaction: &Transaction) -> Result<()> {
        let mut state = self.connection.write()?;
        if state.transactions.contains_key(&transaction.id) {
            return Err(anyhow!("Transaction already exists: {}", transaction.id));
        }
        state
            .transactions
            .insert(transaction.id.clone(), transaction.clone());
        Ok(())
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<bool> {
        Ok(self
            .connection
            .write()?
            .transactions
            .remove(transaction_id)
            .is_some())
    }
}

#[async_trait]
impl UserStorage for MemoryRepository {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.connection.read()?.users.get(user_id).cloned())
    }

    async fn store_user(&self, user: &User) -> Result<()> {
        let mut state = self.connection.write()?;
        if state.users.contains_key(&user.id) {
            return Err(anyhow!("User already exists: {}", user.id));
        }
        state.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut state = self.connection.write()?;
        match state.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(anyhow!("User not found: {}", user.id)),
        }
    }
}
