//! Local state store: the record of installed workshops.
//!
//! Loaded once per invocation, mutated in memory, and written back
//! wholesale by [`InstalledWorkshops::save`]. There is no locking; two
//! concurrent invocations can overwrite each other's changes.

mod persist;

use crate::core::types::InstalledWorkshop;
use crate::error::{Result, WorkshopError};
use crate::ui;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct StateDocument {
    #[serde(default)]
    workshops: Vec<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct InstalledWorkshops {
    path: PathBuf,
    workshops: Vec<InstalledWorkshop>,
}

impl InstalledWorkshops {
    /// Empty store backed by `path`; nothing is read or written.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            workshops: Vec::new(),
        }
    }

    /// Load the store from `path`. A missing or blank file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::empty(path);
        if !store.path.exists() {
            return Ok(store);
        }

        let content =
            fs::read_to_string(&store.path).map_err(|e| WorkshopError::io_at(&store.path, e))?;
        if content.trim().is_empty() {
            return Ok(store);
        }

        let (records, dropped) =
            parse_records(&content).map_err(|e| WorkshopError::StateCorrupted {
                path: store.path.clone(),
                reason: e.to_string(),
            })?;
        if dropped > 0 {
            ui::verbose(&format!(
                "Ignored {} incomplete record(s) in {}",
                dropped,
                store.path.display()
            ));
        }

        for record in records {
            store.add(record);
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has(&self, code: &str) -> bool {
        self.position(code).is_some()
    }

    pub fn get(&self, code: &str) -> Result<&InstalledWorkshop> {
        self.position(code)
            .map(|idx| &self.workshops[idx])
            .ok_or_else(|| not_installed(code))
    }

    /// Insert or replace by code. A replaced entry keeps its position.
    pub fn add(&mut self, workshop: InstalledWorkshop) {
        match self.position(workshop.code()) {
            Some(idx) => self.workshops[idx] = workshop,
            None => self.workshops.push(workshop),
        }
    }

    pub fn remove(&mut self, code: &str) -> Result<InstalledWorkshop> {
        let idx = self.position(code).ok_or_else(|| not_installed(code))?;
        Ok(self.workshops.remove(idx))
    }

    /// Installed workshops in insertion order.
    pub fn all(&self) -> &[InstalledWorkshop] {
        &self.workshops
    }

    pub fn is_empty(&self) -> bool {
        self.workshops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.workshops.len()
    }

    /// Overwrite the backing document with the in-memory set.
    pub fn save(&self) -> Result<()> {
        persist::write_state_atomically(&self.path, &self.workshops)
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.workshops.iter().position(|w| w.code() == code)
    }
}

fn not_installed(code: &str) -> WorkshopError {
    WorkshopError::NotInstalled {
        code: code.to_string(),
    }
}

/// Parse the state document, keeping only complete records.
///
/// Returns the records and how many were dropped.
pub(crate) fn parse_records(
    content: &str,
) -> std::result::Result<(Vec<InstalledWorkshop>, usize), serde_json::Error> {
    let document: StateDocument = serde_json::from_str(content)?;
    let total = document.workshops.len();
    let records: Vec<InstalledWorkshop> = document
        .workshops
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    let dropped = total - records.len();
    Ok((records, dropped))
}
