//! Ledger service: children, transactions and the balances derived from them.
//!
//! Every operation is scoped to the caller's family and passes the family
//! setup gate before it touches child data. Input is validated before any
//! store call is made. Balances are never stored; they are recomputed from the
//! transaction history on each read.

use chrono::Utc;
use log::{error, info, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::balance_calculator::calculate_balance;
use crate::domain::commands::balances::{ChildBalance, ChildLedger, FamilyBalances};
use crate::domain::commands::child::{
    CreateChildCommand, DeleteChildCommand, DeleteChildResult, UpdateChildCommand,
};
use crate::domain::commands::transactions::CreateTransactionCommand;
use crate::domain::errors::{LedgerError, LedgerResult, ValidationError};
use crate::domain::family_gate::FamilySetupGate;
use crate::domain::models::{Child, Transaction};
use crate::domain::session::Session;
use crate::storage::{ChildStorage, Connection, TransactionStorage};

pub const DEFAULT_CLEANUP_ATTEMPTS: u32 = 3;

#[derive(Clone)]
pub struct LedgerService<C: Connection> {
    child_repository: C::ChildRepository,
    transaction_repository: C::TransactionRepository,
    family_gate: FamilySetupGate<C>,
    cleanup_attempts: u32,
}

impl<C: Connection> LedgerService<C> {
    pub fn new(connection: Arc<C>, family_gate: FamilySetupGate<C>) -> Self {
        Self {
            child_repository: connection.create_child_repository(),
            transaction_repository: connection.create_transaction_repository(),
            family_gate,
            cleanup_attempts: DEFAULT_CLEANUP_ATTEMPTS,
        }
    }

    /// Number of passes made over a deleted child's transactions before
    /// giving up. At least one pass is always made.
    pub fn with_cleanup_attempts(mut self, attempts: u32) -> Self {
        self.cleanup_attempts = attempts.max(1);
        self
    }

    /// Register a new child in the caller's family
    pub async fn create_child(
        &self,
        session: &Session,
        command: CreateChildCommand,
    ) -> LedgerResult<Child> {
        info!("Creating child: name={}, age={}", command.name, command.age);

        let child = Child::new(session.family_id(), &command.name, command.age, Utc::now())?;
        self.family_gate.require_configured(session).await?;

        self.child_repository.store_child(&child).await?;

        info!("Created child: {} with ID: {}", child.name, child.id);
        Ok(child)
    }

    /// List the caller's children, newest first
    pub async fn list_children(&self, session: &Session) -> LedgerResult<Vec<Child>> {
        let family_id = self.family_gate.require_configured(session).await?;
        let children = self.child_repository.list_children(&family_id).await?;
        info!("Found {} children for family {}", children.len(), family_id);
        Ok(children)
    }

    /// Get one of the caller's children
    pub async fn get_child(&self, session: &Session, child_id: &str) -> LedgerResult<Child> {
        let family_id = self.family_gate.require_configured(session).await?;
        self.find_family_child(&family_id, child_id).await
    }

    /// Change a child's name and age
    pub async fn update_child(
        &self,
        session: &Session,
        command: UpdateChildCommand,
    ) -> LedgerResult<Child> {
        info!("Updating child: {}", command.child_id);

        let name = Child::validate_name(&command.name)?;
        let age = Child::validate_age(command.age)?;

        let family_id = self.family_gate.require_configured(session).await?;
        let mut child = self.find_family_child(&family_id, &command.child_id).await?;

        child.name = name;
        child.age = age;
        child.updated_date = Utc::now();
        self.child_repository.update_child(&child).await?;

        info!("Updated child: {} with ID: {}", child.name, child.id);
        Ok(child)
    }

    /// Delete a child, then every transaction that references it.
    ///
    /// The child is removed first. Transaction cleanup re-reads the child's
    /// remaining transactions on each pass and retries whatever is left, so a
    /// transient store failure midway does not leave orphans behind. If
    /// transactions still remain after the last pass the call fails with
    /// `CleanupIncomplete`.
    pub async fn delete_child(
        &self,
        session: &Session,
        command: DeleteChildCommand,
    ) -> LedgerResult<DeleteChildResult> {
        info!("Deleting child: {}", command.child_id);

        let family_id = self.family_gate.require_configured(session).await?;
        let child = self.find_family_child(&family_id, &command.child_id).await?;

        if !self.child_repository.delete_child(&child.id).await? {
            // Someone else got there first; their cascade may not have finished
            warn!("Child {} vanished before it could be deleted", child.id);
        }

        let deleted_transactions = self.purge_child_transactions(&child.id).await?;

        info!(
            "Deleted child: {} with ID: {} and {} transactions",
            child.name, child.id, deleted_transactions
        );
        Ok(DeleteChildResult {
            child,
            deleted_transactions,
        })
    }

    /// Record an income or expense against one of the caller's children
    pub async fn create_transaction(
        &self,
        session: &Session,
        command: CreateTransactionCommand,
    ) -> LedgerResult<Transaction> {
        info!(
            "Creating {} transaction of {} for child {}",
            command.transaction_type, command.amount, command.child_id
        );

        let transaction = Transaction::new(
            &command.child_id,
            &command.transaction_type,
            command.amount,
            &command.description,
            Utc::now(),
        )?;

        let family_id = self.family_gate.require_configured(session).await?;
        self.find_family_child(&family_id, &command.child_id).await?;

        self.transaction_repository
            .store_transaction(&transaction)
            .await?;

        info!("Created transaction: {}", transaction.id);
        Ok(transaction)
    }

    /// Balance of one of the caller's children
    pub async fn get_child_balance(&self, session: &Session, child_id: &str) -> LedgerResult<ChildBalance> {
        let family_id = self.family_gate.require_configured(session).await?;
        let child = self.find_family_child(&family_id, child_id).await?;

        let transactions = self
            .transaction_repository
            .list_transactions_for_child(&child.id)
            .await?;
        let balance = calculate_balance(&transactions)?;

        info!("Child {} balance {}", child.id, balance);
        Ok(ChildBalance { child, balance })
    }

    /// A child with its transactions (newest first) and balance
    pub async fn get_child_ledger(&self, session: &Session, child_id: &str) -> LedgerResult<ChildLedger> {
        let family_id = self.family_gate.require_configured(session).await?;
        let child = self.find_family_child(&family_id, child_id).await?;

        let transactions = self
            .transaction_repository
            .list_transactions_for_child(&child.id)
            .await?;
        let balance = calculate_balance(&transactions)?;

        info!(
            "Child {} has {} transactions, balance {}",
            child.id,
            transactions.len(),
            balance
        );
        Ok(ChildLedger {
            child,
            transactions,
            balance,
        })
    }

    /// Balance of every child in the caller's family plus the family total.
    ///
    /// Transactions are fetched once and grouped by child, so the cost is one
    /// pass over the history regardless of how many children there are.
    /// Children without transactions are included with a zero balance.
    pub async fn get_family_balances(&self, session: &Session) -> LedgerResult<FamilyBalances> {
        let family_id = self.family_gate.require_configured(session).await?;
        let children = self.child_repository.list_children(&family_id).await?;
        let transactions = self.transaction_repository.list_transactions().await?;

        let mut ledgers: HashMap<&str, Vec<&Transaction>> = HashMap::new();
        for transaction in &transactions {
            ledgers
                .entry(transaction.child_id.as_str())
                .or_default()
                .push(transaction);
        }

        let mut total_balance = Decimal::ZERO;
        let mut balances = Vec::with_capacity(children.len());
        for child in children {
            let ledger = ledgers.get(child.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            let balance = calculate_balance(ledger.iter().copied())?;
            total_balance = total_balance
                .checked_add(balance)
                .ok_or(ValidationError::BalanceOverflow)?;
            balances.push(ChildBalance { child, balance });
        }

        info!(
            "Family {} has {} children, total balance {}",
            family_id,
            balances.len(),
            total_balance
        );
        Ok(FamilyBalances {
            children: balances,
            total_balance,
        })
    }

    async fn find_family_child(&self, family_id: &str, child_id: &str) -> LedgerResult<Child> {
        match self.child_repository.get_child(child_id).await? {
            Some(child) if child.family_id == family_id => Ok(child),
            Some(_) => {
                warn!("Child {} is not part of family {}", child_id, family_id);
                Err(LedgerError::child_not_found(child_id))
            }
            None => {
                warn!("Child not found: {}", child_id);
                Err(LedgerError::child_not_found(child_id))
            }
        }
    }

    async fn purge_child_transactions(&self, child_id: &str) -> LedgerResult<u32> {
        let mut deleted = 0;
        let mut remaining: Vec<String> = Vec::new();
        let mut list_error: Option<anyhow::Error> = None;

        for attempt in 1..=self.cleanup_attempts {
            let pending = match self
                .transaction_repository
                .list_transactions_for_child(child_id)
                .await
            {
                Ok(pending) => {
                    list_error = None;
                    pending
                }
                Err(e) => {
                    warn!(
                        "Cleanup pass {}/{} for child {} could not list transactions: {:#}",
                        attempt, self.cleanup_attempts, child_id, e
                    );
                    list_error = Some(e);
                    continue;
                }
            };
            if pending.is_empty() {
                return Ok(deleted);
            }

            remaining.clear();
            for transaction in pending {
                match self
                    .transaction_repository
                    .delete_transaction(&transaction.id)
                    .await
                {
                    Ok(true) => deleted += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Failed to delete transaction {}: {:#}", transaction.id, e);
                        remaining.push(transaction.id);
                    }
                }
            }
            if remaining.is_empty() {
                return Ok(deleted);
            }

            warn!(
                "Cleanup pass {}/{} for child {} left {} transactions",
                attempt,
                self.cleanup_attempts,
                child_id,
                remaining.len()
            );
        }

        // The last pass could not see what is left, so there is no count to report
        if let Some(e) = list_error {
            error!("Giving up on cleanup for child {}: transactions could not be listed", child_id);
            return Err(LedgerError::Transport(e.context(format!(
                "Child {} was deleted but its transactions could not be listed",
                child_id
            ))));
        }

        error!(
            "Giving up on cleanup for child {}: {} transactions remain",
            child_id,
            remaining.len()
        );
        Err(LedgerError::CleanupIncomplete {
            child_id: child_id.to_string(),
            remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::family::ConfigureFamilyCommand;
    use crate::domain::models::TransactionType;
    use crate::storage::memory::{MemoryConnection, MemoryRepository};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    async fn setup_test() -> (LedgerService<MemoryConnection>, Session) {
        let connection = Arc::new(MemoryConnection::new());
        let gate = FamilySetupGate::new(connection.clone());
        let session = Session::new("user-1");
        gate.configure(
            &session,
            ConfigureFamilyCommand {
                family_name: "Levi".to_string(),
            },
        )
        .await
        .expect("Failed to configure family");
        (LedgerService::new(connection, gate), session)
    }

    async fn add_child<C: Connection>(service: &LedgerService<C>, session: &Session, name: &str) -> Child {
        service
            .create_child(
                session,
                CreateChildCommand {
                    name: name.to_string(),
                    age: 8,
                },
            )
            .await
            .expect("Failed to create child")
    }

    async fn add_transaction<C: Connection>(
        service: &LedgerService<C>,
        session: &Session,
        child_id: &str,
        transaction_type: &str,
        amount: i64,
    ) -> Transaction {
        service
            .create_transaction(
                session,
                CreateTransactionCommand {
                    child_id: child_id.to_string(),
                    transaction_type: transaction_type.to_string(),
                    amount: Decimal::from(amount),
                    description: format!("{} of {}", transaction_type, amount),
                },
            )
            .await
            .expect("Failed to create transaction")
    }

    #[tokio::test]
    async fn test_child_balance_scenario() {
        let (service, session) = setup_test().await;
        let child = add_child(&service, &session, "C").await;

        add_transaction(&service, &session, &child.id, "income", 50).await;
        add_transaction(&service, &session, &child.id, "expense", 20).await;
        add_transaction(&service, &session, &child.id, "income", 10).await;

        let balance = service.get_child_balance(&session, &child.id).await.unwrap();
        assert_eq!(balance.child.id, child.id);
        assert_eq!(balance.balance, Decimal::from(40));
    }

    #[tokio::test]
    async fn test_family_balances_scenario() {
        let (service, session) = setup_test().await;
        let a = add_child(&service, &session, "A").await;
        let b = add_child(&service, &session, "B").await;
        let idle = add_child(&service, &session, "Idle").await;

        add_transaction(&service, &session, &a.id, "income", 50).await;
        add_transaction(&service, &session, &a.id, "expense", 10).await;
        add_transaction(&service, &session, &b.id, "income", 5).await;
        add_transaction(&service, &session, &b.id, "expense", 20).await;

        let balances = service.get_family_balances(&session).await.unwrap();
        assert_eq!(balances.children.len(), 3);

        let by_id: HashMap<&str, Decimal> = balances
            .children
            .iter()
            .map(|entry| (entry.child.id.as_str(), entry.balance))
            .collect();
        assert_eq!(by_id[a.id.as_str()], Decimal::from(40));
        assert_eq!(by_id[b.id.as_str()], Decimal::from(-15));
        assert_eq!(by_id[idle.id.as_str()], Decimal::ZERO);

        assert_eq!(balances.total_balance, Decimal::from(25));
        let sum: Decimal = balances.children.iter().map(|entry| entry.balance).sum();
        assert_eq!(sum, balances.total_balance);
    }

    #[tokio::test]
    async fn test_family_balances_ignore_other_families() {
        let connection = Arc::new(MemoryConnection::new());
        let gate = FamilySetupGate::new(connection.clone());
        let service = LedgerService::new(connection, gate.clone());

        let mine = Session::new("user-1");
        let theirs = Session::new("user-2");
        for (session, name) in [(&mine, "Levi"), (&theirs, "Katz")] {
            gate.configure(
                session,
                ConfigureFamilyCommand {
                    family_name: name.to_string(),
                },
            )
            .await
            .unwrap();
        }

        let my_child = add_child(&service, &mine, "Mine").await;
        let their_child = add_child(&service, &theirs, "Theirs").await;
        add_transaction(&service, &mine, &my_child.id, "income", 7).await;
        add_transaction(&service, &theirs, &their_child.id, "income", 100).await;

        let balances = service.get_family_balances(&mine).await.unwrap();
        assert_eq!(balances.children.len(), 1);
        assert_eq!(balances.total_balance, Decimal::from(7));

        // Another family's child is indistinguishable from a missing one
        let result = service.get_child_balance(&mine, &their_child.id).await;
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_child_ledger_is_newest_first() {
        let (service, session) = setup_test().await;
        let child = add_child(&service, &session, "Noa").await;

        let first = add_transaction(&service, &session, &child.id, "income", 3).await;
        tokio::time::sleep(tokio::time::Duration::from_millis(2)).await;
        let second = add_transaction(&service, &session, &child.id, "expense", 1).await;

        let ledger = service.get_child_ledger(&session, &child.id).await.unwrap();
        assert_eq!(ledger.child.id, child.id);
        assert_eq!(ledger.transactions.len(), 2);
        assert_eq!(ledger.transactions[0].id, second.id);
        assert_eq!(ledger.transactions[1].id, first.id);
        assert_eq!(ledger.balance, Decimal::from(2));
    }

    #[tokio::test]
    async fn test_create_transaction_validation_leaves_store_untouched() {
        let (service, session) = setup_test().await;
        let child = add_child(&service, &session, "Noa").await;

        let cases = [
            ("income", Decimal::ZERO, "Gift"),
            ("income", Decimal::from(-3), "Gift"),
            ("expense", Decimal::from(2), ""),
            ("expense", Decimal::from(2), "   "),
            ("allowance", Decimal::from(2), "Weekly"),
        ];
        for (transaction_type, amount, description) in cases {
            let result = service
                .create_transaction(
                    &session,
                    CreateTransactionCommand {
                        child_id: child.id.clone(),
                        transaction_type: transaction_type.to_string(),
                        amount,
                        description: description.to_string(),
                    },
                )
                .await;
            assert!(
                matches!(result, Err(LedgerError::Validation(_))),
                "expected validation error for {:?}",
                (transaction_type, amount, description)
            );
        }

        let ledger = service.get_child_ledger(&session, &child.id).await.unwrap();
        assert!(ledger.transactions.is_empty());
        assert_eq!(ledger.balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_create_transaction_for_missing_child() {
        let (service, session) = setup_test().await;

        let result = service
            .create_transaction(
                &session,
                CreateTransactionCommand {
                    child_id: "child::missing".to_string(),
                    transaction_type: "income".to_string(),
                    amount: Decimal::ONE,
                    description: "Gift".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_child() {
        let (service, session) = setup_test().await;
        let child = add_child(&service, &session, "Original").await;

        let updated = service
            .update_child(
                &session,
                UpdateChildCommand {
                    child_id: child.id.clone(),
                    name: "Renamed".to_string(),
                    age: 9,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.age, 9);
        assert_eq!(updated.created_date, child.created_date);
        assert!(updated.updated_date >= child.updated_date);
    }

    #[tokio::test]
    async fn test_update_child_rejects_negative_age() {
        let (service, session) = setup_test().await;
        let child = add_child(&service, &session, "Noa").await;

        let result = service
            .update_child(
                &session,
                UpdateChildCommand {
                    child_id: child.id.clone(),
                    name: "Noa".to_string(),
                    age: -1,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::NonPositiveAge(-1)))
        ));

        let result = service
            .update_child(
                &session,
                UpdateChildCommand {
                    child_id: child.id.clone(),
                    name: " ".to_string(),
                    age: 5,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::EmptyChildName))
        ));

        let stored = service.get_child(&session, &child.id).await.unwrap();
        assert_eq!(stored, child);
    }

    #[tokio::test]
    async fn test_delete_child_cascades() {
        let (service, session) = setup_test().await;
        let child = add_child(&service, &session, "Gone").await;
        let sibling = add_child(&service, &session, "Stays").await;
        add_transaction(&service, &session, &child.id, "income", 5).await;
        add_transaction(&service, &session, &child.id, "expense", 2).await;
        add_transaction(&service, &session, &sibling.id, "income", 9).await;

        let result = service
            .delete_child(
                &session,
                DeleteChildCommand {
                    child_id: child.id.clone(),
                },
            )
            .await
            .unwrap();
        assert_eq!(result.deleted_transactions, 2);
        assert_eq!(result.child.id, child.id);

        let remaining = service.transaction_repository.list_transactions().await.unwrap();
        assert!(remaining.iter().all(|t| t.child_id != child.id));
        assert_eq!(remaining.len(), 1);

        let balance = service.get_child_balance(&session, &child.id).await;
        assert!(matches!(balance, Err(LedgerError::NotFound { .. })));

        let balances = service.get_family_balances(&session).await.unwrap();
        assert_eq!(balances.children.len(), 1);
        assert_eq!(balances.total_balance, Decimal::from(9));
    }

    #[tokio::test]
    async fn test_delete_missing_child() {
        let (service, session) = setup_test().await;
        let result = service
            .delete_child(
                &session,
                DeleteChildCommand {
                    child_id: "child::missing".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_unconfigured_family_cannot_read_children() {
        let connection = Arc::new(MemoryConnection::new());
        let gate = FamilySetupGate::new(connection.clone());
        let service = LedgerService::new(connection, gate.clone());
        let session = Session::new("fresh-user");

        assert!(matches!(
            service.list_children(&session).await,
            Err(LedgerError::SetupRequired)
        ));
        assert!(matches!(
            service.get_family_balances(&session).await,
            Err(LedgerError::SetupRequired)
        ));
        assert!(matches!(
            service
                .create_child(
                    &session,
                    CreateChildCommand {
                        name: "Noa".to_string(),
                        age: 4,
                    },
                )
                .await,
            Err(LedgerError::SetupRequired)
        ));

        gate.configure(
            &session,
            ConfigureFamilyCommand {
                family_name: "Levi".to_string(),
            },
        )
        .await
        .unwrap();

        let balances = service.get_family_balances(&session).await.unwrap();
        assert!(balances.children.is_empty());
        assert_eq!(balances.total_balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_unrecognized_stored_type_fails_balance() {
        let (service, session) = setup_test().await;
        let child = add_child(&service, &session, "Noa").await;
        add_transaction(&service, &session, &child.id, "income", 5).await;

        let legacy = Transaction {
            id: "transaction::bonus::legacy".to_string(),
            child_id: child.id.clone(),
            transaction_type: TransactionType::Unrecognized("bonus".to_string()),
            amount: Decimal::from(5),
            description: "Legacy".to_string(),
            created_date: Utc::now(),
        };
        service
            .transaction_repository
            .store_transaction(&legacy)
            .await
            .unwrap();

        let result = service.get_child_balance(&session, &child.id).await;
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::UnrecognizedTransactionType(_)))
        ));
    }

    /// Connection whose transaction repository fails a set number of deletes,
    /// and fails every per-child listing while `listing_broken` is set.
    #[derive(Clone)]
    struct FlakyConnection {
        inner: MemoryConnection,
        failures_left: Arc<AtomicU32>,
        listing_broken: Arc<AtomicBool>,
    }

    #[derive(Clone)]
    struct FlakyTransactionRepository {
        inner: MemoryRepository,
        failures_left: Arc<AtomicU32>,
        listing_broken: Arc<AtomicBool>,
    }

    #[async_trait]
    impl TransactionStorage for FlakyTransactionRepository {
        async fn list_transactions(&self) -> anyhow::Result<Vec<Transaction>> {
            self.inner.list_transactions().await
        }

        async fn list_transactions_for_child(&self, child_id: &str) -> anyhow::Result<Vec<Transaction>> {
            if self.listing_broken.load(Ordering::SeqCst) {
                return Err(anyhow!("timed out listing transactions for {}", child_id));
            }
            self.inner.list_transactions_for_child(child_id).await
        }

        async fn store_transaction(&self, transaction: &Transaction) -> anyhow::Result<()> {
            self.inner.store_transaction(transaction).await
        }

        async fn delete_transaction(&self, transaction_id: &str) -> anyhow::Result<bool> {
            let should_fail = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if should_fail {
                return Err(anyhow!("connection reset while deleting {}", transaction_id));
            }
            self.inner.delete_transaction(transaction_id).await
        }
    }

    impl Connection for FlakyConnection {
        type ChildRepository = MemoryRepository;
        type TransactionRepository = FlakyTransactionRepository;
        type UserRepository = MemoryRepository;

        fn create_child_repository(&self) -> MemoryRepository {
            self.inner.create_child_repository()
        }

        fn create_transaction_repository(&self) -> FlakyTransactionRepository {
            FlakyTransactionRepository {
                inner: self.inner.create_transaction_repository(),
                failures_left: self.failures_left.clone(),
                listing_broken: self.listing_broken.clone(),
            }
        }

        fn create_user_repository(&self) -> MemoryRepository {
            self.inner.create_user_repository()
        }
    }

    async fn setup_flaky(failures: u32, attempts: u32) -> (LedgerService<FlakyConnection>, Session, Arc<FlakyConnection>) {
        let connection = Arc::new(FlakyConnection {
            inner: MemoryConnection::new(),
            failures_left: Arc::new(AtomicU32::new(0)),
            listing_broken: Arc::new(AtomicBool::new(false)),
        });
        let gate = FamilySetupGate::new(connection.clone());
        let session = Session::new("user-1");
        gate.configure(
            &session,
            ConfigureFamilyCommand {
                family_name: "Levi".to_string(),
            },
        )
        .await
        .unwrap();
        let service = LedgerService::new(connection.clone(), gate).with_cleanup_attempts(attempts);

        let child = add_child(&service, &session, "Flaky").await;
        for amount in 1..=3 {
            add_transaction(&service, &session, &child.id, "income", amount).await;
        }
        connection.failures_left.store(failures, Ordering::SeqCst);
        (service, session, connection)
    }

    #[tokio::test]
    async fn test_delete_child_retries_failed_cleanup() {
        let (service, session, _) = setup_flaky(2, 3).await;
        let child = service.list_children(&session).await.unwrap().remove(0);

        let result = service
            .delete_child(
                &session,
                DeleteChildCommand {
                    child_id: child.id.clone(),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.deleted_transactions, 3);
        assert!(service.transaction_repository.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_child_reports_incomplete_cleanup() {
        let (service, session, _) = setup_flaky(u32::MAX, 2).await;
        let child = service.list_children(&session).await.unwrap().remove(0);

        let result = service
            .delete_child(
                &session,
                DeleteChildCommand {
                    child_id: child.id.clone(),
                },
            )
            .await;

        match result {
            Err(LedgerError::CleanupIncomplete { child_id, remaining }) => {
                assert_eq!(child_id, child.id);
                assert_eq!(remaining.len(), 3);
            }
            other => panic!("expected CleanupIncomplete, got {:?}", other),
        }

        // The child itself is gone
        let lookup = service.get_child(&session, &child.id).await;
        assert!(matches!(lookup, Err(LedgerError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_child_when_cleanup_cannot_list() {
        let (service, session, connection) = setup_flaky(0, 2).await;
        let child = service.list_children(&session).await.unwrap().remove(0);
        connection.listing_broken.store(true, Ordering::SeqCst);

        let result = service
            .delete_child(
                &session,
                DeleteChildCommand {
                    child_id: child.id.clone(),
                },
            )
            .await;

        // No leftover count is invented when nothing could be listed
        match result {
            Err(LedgerError::Transport(e)) => {
                let message = format!("{:#}", e);
                assert!(message.contains(&child.id), "{}", message);
                assert!(message.contains("timed out listing transactions"), "{}", message);
            }
            other => panic!("expected Transport, got {:?}", other),
        }

        connection.listing_broken.store(false, Ordering::SeqCst);
        let orphans = service
            .transaction_repository
            .list_transactions_for_child(&child.id)
            .await
            .unwrap();
        assert_eq!(orphans.len(), 3);
    }

    /// Half of `Decimal::MAX` plus one: two of these overflow a sum
    fn overflowing_amount() -> Decimal {
        Decimal::MAX / Decimal::TWO + Decimal::ONE
    }

    async fn store_raw(service: &LedgerService<MemoryConnection>, child_id: &str, amount: Decimal) {
        let transaction = Transaction {
            id: Transaction::generate_id(&TransactionType::Income),
            child_id: child_id.to_string(),
            transaction_type: TransactionType::Income,
            amount,
            description: "Imported".to_string(),
            created_date: Utc::now(),
        };
        service
            .transaction_repository
            .store_transaction(&transaction)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_oversized_amount_is_rejected() {
        let (service, session) = setup_test().await;
        let child = add_child(&service, &session, "Noa").await;

        let result = service
            .create_transaction(
                &session,
                CreateTransactionCommand {
                    child_id: child.id.clone(),
                    transaction_type: "income".to_string(),
                    amount: overflowing_amount(),
                    description: "Jackpot".to_string(),
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::AmountTooLarge(_)))
        ));
        assert!(service.get_child_ledger(&session, &child.id).await.unwrap().transactions.is_empty());
    }

    #[tokio::test]
    async fn test_child_balance_overflow_is_an_error() {
        let (service, session) = setup_test().await;
        let child = add_child(&service, &session, "Noa").await;
        store_raw(&service, &child.id, overflowing_amount()).await;
        store_raw(&service, &child.id, overflowing_amount()).await;

        assert!(matches!(
            service.get_child_balance(&session, &child.id).await,
            Err(LedgerError::Validation(ValidationError::BalanceOverflow))
        ));
        assert!(matches!(
            service.get_child_ledger(&session, &child.id).await,
            Err(LedgerError::Validation(ValidationError::BalanceOverflow))
        ));
        assert!(matches!(
            service.get_family_balances(&session).await,
            Err(LedgerError::Validation(ValidationError::BalanceOverflow))
        ));
    }

    #[tokio::test]
    async fn test_family_total_overflow_is_an_error() {
        let (service, session) = setup_test().await;
        let a = add_child(&service, &session, "A").await;
        let b = add_child(&service, &session, "B").await;
        store_raw(&service, &a.id, overflowing_amount()).await;
        store_raw(&service, &b.id, overflowing_amount()).await;

        // Each child on its own is still representable
        assert_eq!(
            service.get_child_balance(&session, &a.id).await.unwrap().balance,
            overflowing_amount()
        );
        assert!(matches!(
            service.get_family_balances(&session).await,
            Err(LedgerError::Validation(ValidationError::BalanceOverflow))
        ));
    }
}
