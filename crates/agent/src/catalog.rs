//! Reference catalog: which benchmark documents exist and which words
//! point at them.
//!
//! The catalog holds metadata only. Document bodies are resolved later by a
//! [`DocumentLoader`](fobench_core::DocumentLoader); classification never
//! reads them.
//!
//! The compensation and role vocabularies live in a separate
//! [`FallbackGate`]: they never select a document themselves, they only
//! decide whether an unclassified query should receive the full catalog.

/// One reference document and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// File name under `references/` (e.g., "regional-uk.md").
    pub id: String,
    /// Lower-cased, matched as literal substrings of the lower-cased query.
    pub keywords: Vec<String>,
    pub description: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, keywords: &[&str], description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            description: description.into(),
        }
    }

    /// Whether any keyword occurs in `query_lower`.
    pub fn matches(&self, query_lower: &str) -> bool {
        self.keywords.iter().any(|k| query_lower.contains(k.as_str()))
    }
}

/// Ordered, read-only table of reference documents.
///
/// Iteration order is significant: classification results and fallback
/// loads both follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCatalog {
    entries: Vec<CatalogEntry>,
}

impl ReferenceCatalog {
    /// Build a catalog. Entries without keywords could never be selected and
    /// are dropped, as are repeated identifiers after the first.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut kept: Vec<CatalogEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.keywords.is_empty() || kept.iter().any(|e| e.id == entry.id) {
                tracing::warn!(id = %entry.id, "Skipping catalog entry");
                continue;
            }
            kept.push(entry);
        }
        Self { entries: kept }
    }

    /// The 2025 family office compensation benchmark reference set.
    pub fn builtin() -> Self {
        Self::new(vec![
            CatalogEntry::new(
                "regional-uk.md",
                &["uk", "united kingdom", "britain", "british", "london", "gbp", "£"],
                "UK family office compensation data",
            ),
            CatalogEntry::new(
                "regional-europe.md",
                &["europe", "european", "eu", "germany", "france", "switzerland", "eur", "€"],
                "Continental Europe compensation data",
            ),
            CatalogEntry::new(
                "regional-usa.md",
                &[
                    "usa",
                    "us",
                    "united states",
                    "america",
                    "american",
                    "usd",
                    "$",
                    "new york",
                    "california",
                ],
                "USA family office compensation data",
            ),
            CatalogEntry::new(
                "regional-asia.md",
                &["asia", "asian", "singapore", "hong kong", "china", "japan", "india"],
                "Asia family office compensation data",
            ),
            CatalogEntry::new(
                "regional-australia.md",
                &["australia", "australian", "sydney", "melbourne", "aud"],
                "Australia family office compensation data",
            ),
            CatalogEntry::new(
                "regional-middleeast.md",
                &["middle east", "uae", "dubai", "saudi", "arabia", "qatar", "gulf"],
                "Middle East family office compensation data",
            ),
            CatalogEntry::new(
                "governance.md",
                &[
                    "governance",
                    "succession",
                    "structure",
                    "board",
                    "family council",
                    "next gen",
                    "professionalisation",
                ],
                "Family office governance and succession planning",
            ),
            CatalogEntry::new(
                "investments.md",
                &[
                    "investment",
                    "invest",
                    "portfolio",
                    "allocation",
                    "asset",
                    "roi",
                    "return",
                    "equity",
                    "real estate",
                    "private",
                ],
                "Investment strategies and asset allocation",
            ),
            CatalogEntry::new(
                "recruitment.md",
                &[
                    "recruit",
                    "hiring",
                    "hire",
                    "talent",
                    "team",
                    "staff",
                    "employee",
                    "headcount",
                    "remote",
                    "turnover",
                ],
                "Recruitment trends and talent management",
            ),
        ])
    }

    /// All entries in catalog order.
    pub fn lookup_all(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Markdown listing of every document and what it covers.
    pub fn summary(&self) -> String {
        let mut lines = vec!["## Available Reference Data".to_string()];
        lines.extend(
            self.entries
                .iter()
                .map(|e| format!("- **{}**: {}", e.id, e.description)),
        );
        lines.join("\n")
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Which auxiliary vocabulary opened the fallback gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateGroup {
    Compensation,
    Role,
}

/// Vocabularies that decide whether an unclassified query still warrants
/// the full reference set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackGate {
    compensation: Vec<String>,
    role: Vec<String>,
}

impl FallbackGate {
    pub fn new(compensation: &[&str], role: &[&str]) -> Self {
        let lower = |words: &[&str]| words.iter().map(|w| w.to_lowercase()).collect();
        Self {
            compensation: lower(compensation),
            role: lower(role),
        }
    }

    pub fn builtin() -> Self {
        Self::new(
            &[
                "salary",
                "salaries",
                "compensation",
                "pay",
                "bonus",
                "ltip",
                "incentive",
                "benefits",
                "package",
            ],
            &["ceo", "cfo", "cio", "chief", "director", "manager", "analyst", "head of"],
        )
    }

    /// The first group with a keyword in `query`, compensation checked first.
    pub fn matched_group(&self, query: &str) -> Option<GateGroup> {
        let q = query.to_lowercase();
        let hit = |words: &[String]| words.iter().any(|w| q.contains(w.as_str()));
        if hit(&self.compensation) {
            Some(GateGroup::Compensation)
        } else if hit(&self.role) {
            Some(GateGroup::Role)
        } else {
            None
        }
    }

    pub fn is_open(&self, query: &str) -> bool {
        self.matched_group(query).is_some()
    }
}

impl Default for FallbackGate {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_order() {
        let catalog = ReferenceCatalog::builtin();
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(
            ids,
            vec![
                "regional-uk.md",
                "regional-europe.md",
                "regional-usa.md",
                "regional-asia.md",
                "regional-australia.md",
                "regional-middleeast.md",
                "governance.md",
                "investments.md",
                "recruitment.md",
            ]
        );
        assert!(catalog.lookup_all().iter().all(|e| !e.keywords.is_empty()));
    }

    #[test]
    fn entries_without_keywords_or_repeated_ids_are_dropped() {
        let catalog = ReferenceCatalog::new(vec![
            CatalogEntry::new("a.md", &["alpha"], "A"),
            CatalogEntry::new("empty.md", &[], "never selectable"),
            CatalogEntry::new("a.md", &["again"], "duplicate"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("a.md").unwrap().description, "A");
    }

    #[test]
    fn keywords_are_lowercased() {
        let entry = CatalogEntry::new("x.md", &["Hong Kong"], "");
        assert!(entry.matches("pay in hong kong"));
    }

    #[test]
    fn summary_lists_every_document() {
        let summary = ReferenceCatalog::builtin().summary();
        assert!(summary.starts_with("## Available Reference Data\n"));
        assert!(summary.contains("- **regional-uk.md**: UK family office compensation data"));
        assert!(summary.contains("- **recruitment.md**: Recruitment trends and talent management"));
        assert_eq!(summary.lines().count(), 10);
    }

    #[test]
    fn gate_groups() {
        let gate = FallbackGate::builtin();
        assert_eq!(gate.matched_group("Typical BONUS levels?"), Some(GateGroup::Compensation));
        assert_eq!(gate.matched_group("What does a Head of Tax do?"), Some(GateGroup::Role));
        assert_eq!(gate.matched_group("Tell me about the weather"), None);
        assert!(!gate.is_open(""));
    }
}
