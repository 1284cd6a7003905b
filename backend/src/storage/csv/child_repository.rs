use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use std::fs;

use super::connection::CsvConnection;
use crate::domain::models::Child;
use crate::storage::traits::ChildStorage;

/// Child repository backed by a single YAML document
#[derive(Clone)]
pub struct CsvChildRepository {
    connection: CsvConnection,
}

impl CsvChildRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_children(&self) -> Result<Vec<Child>> {
        let path = self.connection.children_file_path();
        if !path.exists() {
            debug!("No children file at {}, starting empty", path.display());
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

    fn write_children(&self, children: &[Child]) -> Result<()> {
        let yaml = serde_yaml::to_string(children).context("Failed to serialize children")?;
        CsvConnection::write_atomically(&self.connection.children_file_path(), yaml.as_bytes())
    }
}

#[async_trait]
impl ChildStorage for CsvChildRepository {
    async fn list_children(&self, family_id: &str) -> Result<Vec<Child>> {
        let mut children: Vec<Child> = self
            .connection
            .with_lock(|| self.read_children())?
            .into_iter()
            .filter(|child| child.family_id == family_id)
            .collect();
        children.sort_by(|a, b| b.created_date.cmp(&a.created_date).then_with(|| a.id.cmp(&b.id)));
        Ok(children)
    }

    async fn get_child(&self, child_id: &str) -> Result<Option<Child>> {
        let children = self.connection.with_lock(|| self.read_children())?;
        Ok(children.into_iter().find(|child| child.id == child_id))
    }

    async fn store_child(&self, child: &Child) -> Result<()> {
        self.connection.with_lock(|| {
            let mut children = self.read_children()?;
            if children.iter().any(|existing| existing.id == child.id) {
                return Err(anyhow!("Child already exists: {}", child.id));
            }
            children.push(child.clone());
            self.write_children(&children)
        })
    }

    async fn update_child(&self, child: &Child) -> Result<()> {
        self.connection.with_lock(|| {
            let mut children = self.read_children()?;
            let existing = children
                .iter_mut()
                .find(|existing| existing.id == child.id)
                .ok_or_else(|| anyhow!("Child not found: {}", child.id))?;
            *existing = child.clone();
            self.write_children(&children)
        })
    }

    async fn delete_child(&self, child_id: &str) -> Result<bool> {
        self.connection.with_lock(|| {
            let mut children = self.read_children()?;
            let before = children.len();
            children.retain(|child| child.id != child_id);
            if children.len() == before {
                return Ok(false);
            }
            self.write_children(&children)?;
            Ok(true)
        })
    }
}
