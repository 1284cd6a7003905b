use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::fs;

use super::connection::CsvConnection;
use crate::domain::models::User;
use crate::storage::traits::UserStorage;

/// User repository backed by a single YAML document
#[derive(Clone)]
pub struct CsvUserRepository {
    connection: CsvConnection,
}

impl CsvUserRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_users(&self) -> Result<Vec<User>> {
        let path = self.connection.users_file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn write_users(&self, users: &[User]) -> Result<()> {
        let yaml = serde_yaml::to_string(users).context("Failed to serialize users")?;
        CsvConnection::write_atomically(&self.connection.users_file_path(), yaml.as_bytes())
    }
}

#[async_trait]
impl UserStorage for CsvUserRepository {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let users = self.connection.with_lock(|| self.read_users())?;
        Ok(users.into_iter().find(|user| user.id == user_id))
    }

    async fn store_user(&self, user: &User) -> Result<()> {
        self.connection.with_lock(|| {
            let mut users = self.read_users()?;
            if users.iter().any(|existing| existing.id == user.id) {
                return Err(anyhow!("User already exists: {}", user.id));
            }
            users.push(user.clone());
            self.write_users(&users)
        })
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        self.connection.with_lock(|| {
            let mut users = self.read_users()?;
            let existing = users
                .iter_mut()
                .find(|existing| existing.id == user.id)
                .ok_or_else(|| anyhow!("User not found: {}", user.id))?;
            *existing = user.clone();
            self.write_users(&users)
        })
    }
}
