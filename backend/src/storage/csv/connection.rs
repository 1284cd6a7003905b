use anyhow::{anyhow, Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::child_repository::CsvChildRepository;
use super::transaction_repository::CsvTransactionRepository;
use super::user_repository::CsvUserRepository;
use crate::storage::traits::Connection;

const CHILDREN_FILE: &str = "children.yaml";
const USERS_FILE: &str = "users.yaml";
const TRANSACTIONS_FILE: &str = "transactions.csv";

/// CsvConnection manages the data directory of the flat-file store.
///
/// Layout:
/// - `users.yaml`: every known user and their family name
/// - `children.yaml`: every child, tagged with its family ID
/// - `transactions.csv`: one row per transaction
///
/// All repositories created from one connection share a lock so that their
/// read-modify-write cycles do not interleave.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn children_file_path(&self) -> PathBuf {
        self.base_directory.join(CHILDREN_FILE)
    }

    pub fn users_file_path(&self) -> PathBuf {
        self.base_directory.join(USERS_FILE)
    }

    pub fn transactions_file_path(&self) -> PathBuf {
        self.base_directory.join(TRANSACTIONS_FILE)
    }

    /// Run `f` while holding the store lock.
    pub fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow!("CSV store lock poisoned"))?;
        f()
    }

    /// Replace `path` with `contents` via a sibling temp file and rename.
    pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

impl Connection for CsvConnection {
    type ChildRepository = CsvChildRepository;
    type TransactionRepository = CsvTransactionRepository;
    type UserRepository = CsvUserRepository;

    fn create_child_repository(&self) -> CsvChildRepository {
        CsvChildRepository::new(self.clone())
    }

    fn create_transaction_repository(&self) -> CsvTransactionRepository {
        CsvTransactionRepository::new(self.clone())
    }

    fn create_user_repository(&self) -> CsvUserRepository {
        CsvUserRepository::new(self.clone())
    }
}
