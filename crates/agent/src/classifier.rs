//! Query classifier: maps a free-text question to the reference documents
//! whose keywords it mentions.
//!
//! Matching is a case-insensitive literal substring test, so short keywords
//! also fire inside longer words ("us" in "business"). Results are a set in
//! catalog order, not a ranking.

use crate::catalog::ReferenceCatalog;

/// Identifiers selected for one query, in catalog order, each at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    ids: Vec<String>,
}

impl Classification {
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn into_ids(self) -> Vec<String> {
        self.ids
    }
}

/// Classify `query` against `catalog`.
///
/// Empty queries and queries with no keyword hit yield an empty result;
/// neither is an error.
pub fn classify(query: &str, catalog: &ReferenceCatalog) -> Classification {
    let q = query.to_lowercase();
    if q.trim().is_empty() {
        return Classification::default();
    }

    let ids = catalog
        .lookup_all()
        .iter()
        .filter(|entry| entry.matches(&q))
        .map(|entry| entry.id.clone())
        .collect();

    Classification { ids }
}
