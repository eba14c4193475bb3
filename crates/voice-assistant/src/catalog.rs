//! Catalog items and product lookup

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{matcher::best_match, ports::CatalogService, ServiceError};

/// Opaque catalog identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only snapshot of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub category: String,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Outcome of resolving a spoken product name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(Item),
    NotFound,
    /// The catalog has no items at all.
    Empty,
}

/// Resolves product queries against a fresh catalog snapshot
#[derive(Clone)]
pub struct CatalogLookup {
    service: Arc<dyn CatalogService>,
}

impl CatalogLookup {
    pub fn new(service: Arc<dyn CatalogService>) -> Self {
        Self { service }
    }

    pub async fn items(&self) -> Result<Vec<Item>, ServiceError> {
        self.service.list_all().await
    }

    pub async fn resolve(&self, query: &str) -> Result<Resolution, ServiceError> {
        let items = self.items().await?;
        if items.is_empty() {
            return Ok(Resolution::Empty);
        }

        match best_match(query, &items) {
            Some(item) => {
                debug!("Resolved '{}' to '{}' ({})", query, item.name, item.id);
                Ok(Resolution::Found(item.clone()))
            }
            None => {
                debug!("No catalog match for '{}' among {} items", query, items.len());
                Ok(Resolution::NotFound)
            }
        }
    }
}
