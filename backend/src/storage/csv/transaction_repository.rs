use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use csv::{Reader, Writer};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::str::FromStr;

use super::connection::CsvConnection;
use crate::domain::models::{Transaction, TransactionType};
use crate::storage::traits::TransactionStorage;

/// One row of `transactions.csv`.
///
/// Every column is kept as text so amounts stay exact and unknown type tags
/// survive a round trip untouched.
#[derive(Debug, Serialize, Deserialize)]
struct TransactionRecord {
    id: String,
    child_id: String,
    transaction_type: String,
    amount: String,
    description: String,
    created_date: String,
}

impl TransactionRecord {
    fn from_domain(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id.clone(),
            child_id: transaction.child_id.clone(),
            transaction_type: transaction.transaction_type.as_tag().to_string(),
            amount: transaction.amount.to_string(),
            description: transaction.description.clone(),
            created_date: transaction.created_date.to_rfc3339(),
        }
    }

    fn into_domain(self) -> Result<Transaction> {
        let amount = Decimal::from_str(&self.amount)
            .with_context(|| format!("Invalid amount {:?} in transaction {}", self.amount, self.id))?;
        let created_date = DateTime::parse_from_rfc3339(&self.created_date)
            .with_context(|| {
                format!("Invalid created_date {:?} in transaction {}", self.created_date, self.id)
            })?
            .with_timezone(&Utc);

        Ok(Transaction {
            transaction_type: TransactionType::from_tag(&self.transaction_type),
            id: self.id,
            child_id: self.child_id,
            amount,
            description: self.description,
            created_date,
        })
    }
}

/// CSV-based transaction repository
#[derive(Clone)]
pub struct CsvTransactionRepository {
    connection: CsvConnection,
}

impl CsvTransactionRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_transactions(&self) -> Result<Vec<Transaction>> {
        let path = self.connection.transactions_file_path();
        if !path.exists() {
            debug!("No transactions file at {}, starting empty", path.display());
            return Ok(Vec::new());
        }

        let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        csv_reader
            .deserialize::<TransactionRecord>()
            .map(|record| {
                record
                    .with_context(|| format!("Malformed row in {}", path.display()))?
                    .into_domain()
            })
            .collect()
    }

    fn write_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        for transaction in transactions {
            csv_writer.serialize(TransactionRecord::from_domain(transaction))?;
        }
        let bytes = csv_writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush transactions CSV: {}", e))?;
        CsvConnection::write_atomically(&self.connection.transactions_file_path(), &bytes)
    }
}

#[async_trait]
impl TransactionStorage for CsvTransactionRepository {
    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.connection.with_lock(|| self.read_transactions())
    }

    async fn list_transactions_for_child(&self, child_id: &str) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .connection
            .with_lock(|| self.read_transactions())?
            .into_iter()
            .filter(|transaction| transaction.child_id == child_id)
            .collect();
        transactions.sort_by(|a, b| b.created_date.cmp(&a.created_date).then_with(|| a.id.cmp(&b.id)));
        Ok(transactions)
    }

    async fn store_transaction(&self, transaction: &Transaction) -> Result<()> {
        self.connection.with_lock(|| {
            let mut transactions = self.read_transactions()?;
            if transactions.iter().any(|existing| existing.id == transaction.id) {
                return Err(anyhow!("Transaction already exists: {}", transaction.id));
            }
            transactions.push(transaction.clone());
            self.write_transactions(&transactions)
        })
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<bool> {
        self.connection.with_lock(|| {
            let mut transactions = self.read_transactions()?;
            let before = transactions.len();
            transactions.retain(|transaction| transaction.id != transaction_id);
            if transactions.len() == before {
                return Ok(false);
            }
            self.write_transactions(&transactions)?;
            Ok(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::Connection;
    use chrono::Duration;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, CsvConnection, CsvTransactionRepository) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = CsvConnection::new(temp_dir.path()).expect("Failed to open store");
        let repo = connection.create_transaction_repository();
        (temp_dir, connection, repo)
    }

    #[tokio::test]
    async fn test_round_trip_keeps_exact_amounts() {
        let (_temp_dir, connection, repo) = setup();
        let tx = Transaction::new(
            "child::a",
            "income",
            Decimal::new(1005, 2),
            "Birthday, from grandma",
            Utc::now(),
        )
        .unwrap();
        repo.store_transaction(&tx).await.unwrap();

        // A fresh connection reads what the first one wrote
        let reopened = CsvConnection::new(connection.base_directory())
            .unwrap()
            .create_transaction_repository();
        let loaded = reopened.list_transactions().await.unwrap();
        assert_eq!(loaded, vec![tx]);
    }

    #[tokio::test]
    async fn test_list_for_child_newest_first() {
        let (_temp_dir, _connection, repo) = setup();
        let now = Utc::now();
        let old = Transaction::new("child::a", "income", Decimal::from(3), "Old", now - Duration::days(2))
            .unwrap();
        let new = Transaction::new("child::a", "expense", Decimal::from(1), "New", now).unwrap();
        let other = Transaction::new("child::b", "income", Decimal::from(7), "Other", now).unwrap();
        for tx in [&old, &new, &other] {
            repo.store_transaction(tx).await.unwrap();
        }

        let listed = repo.list_transactions_for_child("child::a").await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![new.id.as_str(), old.id.as_str()]);
    }

    #[tokio::test]
    async fn test_delete_transaction() {
        let (_temp_dir, _connection, repo) = setup();
        let tx = Transaction::new("child::a", "income", Decimal::from(3), "Chores", Utc::now()).unwrap();
        repo.store_transaction(&tx).await.unwrap();

        assert!(repo.delete_transaction(&tx.id).await.unwrap());
        assert!(!repo.delete_transaction(&tx.id).await.unwrap());
        assert!(repo.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_type_tag_survives() {
        let (_temp_dir, connection, repo) = setup();
        fs::write(
            connection.transactions_file_path(),
            "id,child_id,transaction_type,amount,description,created_date\n\
             transaction::bonus::1,child::a,bonus,5.00,Legacy row,2025-01-10T10:00:00+00:00\n",
        )
        .unwrap();

        let loaded = repo.list_transactions().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded[0].transaction_type,
            TransactionType::Unrecognized("bonus".to_string())
        );
        assert_eq!(loaded[0].amount, Decimal::new(500, 2));
    }

    #[tokio::test]
    async fn test_malformed_amount_is_an_error() {
        let (_temp_dir, connection, repo) = setup();
        fs::write(
            connection.transactions_file_path(),
            "id,child_id,transaction_type,amount,description,created_date\n\
             transaction::income::1,child::a,income,lots,Bad row,2025-01-10T10:00:00+00:00\n",
        )
        .unwrap();

        assert!(repo.list_transactions().await.is_err());
    }
}
