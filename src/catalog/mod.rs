//! Remote catalog of installable workshops.
//!
//! The catalog document is fetched on first use and cached for the rest of
//! the process. Records missing any required field are skipped.

pub mod matching;

use crate::core::types::Workshop;
use crate::error::{Result, WorkshopError};
use crate::traits::CatalogSource;
use crate::ui;
use serde::Deserialize;
use std::cell::OnceCell;

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    workshops: Vec<serde_json::Value>,
}

pub struct RemoteCatalog {
    source: Box<dyn CatalogSource>,
    workshops: OnceCell<Vec<Workshop>>,
}

impl RemoteCatalog {
    pub fn new(source: Box<dyn CatalogSource>) -> Self {
        Self {
            source,
            workshops: OnceCell::new(),
        }
    }

    pub fn has_workshop(&self, code: &str) -> Result<bool> {
        Ok(self.workshops()?.iter().any(|w| w.code == code))
    }

    pub fn get_by_code(&self, code: &str) -> Result<&Workshop> {
        self.workshops()?
            .iter()
            .find(|w| w.code == code)
            .ok_or_else(|| WorkshopError::NotFound {
                code: code.to_string(),
            })
    }

    pub fn all(&self) -> Result<&[Workshop]> {
        self.workshops().map(Vec::as_slice)
    }

    /// Fuzzy search in catalog order. See [`matching::matches`].
    pub fn find(&self, term: &str) -> Result<Vec<&Workshop>> {
        Ok(self
            .workshops()?
            .iter()
            .filter(|w| matching::matches(term, w))
            .collect())
    }

    fn workshops(&self) -> Result<&Vec<Workshop>> {
        if let Some(workshops) = self.workshops.get() {
            return Ok(workshops);
        }

        let loaded = self.load()?;
        Ok(self.workshops.get_or_init(|| loaded))
    }

    fn load(&self) -> Result<Vec<Workshop>> {
        if !self.source.is_reachable() {
            return Err(WorkshopError::RequiresNetworkAccess {
                host: self.source.host(),
            });
        }

        ui::verbose(&format!("Fetching workshop catalog from {}", self.source.host()));
        let body = self.source.fetch()?;
        let (workshops, dropped) = parse_catalog(&body)?;
        if dropped > 0 {
            ui::verbose(&format!("Skipped {} incomplete catalog record(s)", dropped));
        }
        Ok(workshops)
    }
}

/// Parse a catalog document, returning complete records and the dropped count.
pub(crate) fn parse_catalog(body: &str) -> Result<(Vec<Workshop>, usize)> {
    let document: CatalogDocument = serde_json::from_str(body)
        .map_err(|e| WorkshopError::SerializationError(format!("Workshop catalog: {}", e)))?;

    let total = document.workshops.len();
    let workshops: Vec<Workshop> = document
        .workshops
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    let dropped = total - workshops.len();
    Ok((workshops, dropped))
}
