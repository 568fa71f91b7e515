//! Region reference data
//!
//! The catalog is immutable once built; scope validation consults it and
//! nothing else mutates it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Regions accepted by default
pub const INDIAN_STATES: [&str; 10] = [
    "Andhra Pradesh",
    "Karnataka",
    "Maharashtra",
    "Tamil Nadu",
    "Uttar Pradesh",
    "Gujarat",
    "Rajasthan",
    "Kerala",
    "West Bengal",
    "Delhi",
];

/// Immutable list of valid region names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RegionCatalog {
    names: Arc<[String]>,
}

impl RegionCatalog {
    /// Build catalog from region names
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive membership
    #[inline]
    #[must_use]
    pub fn contains(&self, region: &str) -> bool {
        self.names.iter().any(|name| name == region)
    }

    /// Iterate region names in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of regions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the catalog is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::from_names(INDIAN_STATES)
    }
}

impl From<Vec<String>> for RegionCatalog {
    fn from(names: Vec<String>) -> Self {
        Self::from_names(names)
    }
}

impl From<RegionCatalog> for Vec<String> {
    fn from(catalog: RegionCatalog) -> Self {
        catalog.names.to_vec()
    }
}
