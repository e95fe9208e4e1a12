//! Reference assembly: turns a query into the reference block appended to
//! the system prompt.
//!
//! Sections, in order:
//!
//! 1. **Skill overview** (`SKILL.md`), labeled `# Skill Overview`, when present
//! 2. **Classified documents**, in catalog order
//! 3. **Fallback**: every catalog document, when classification is empty
//!    but the query mentions compensation or a role
//!
//! # Determinism
//!
//! For a fixed catalog the output depends only on the query text and the
//! document bodies. Nothing random or time-dependent is involved.

use crate::catalog::{FallbackGate, ReferenceCatalog};
use crate::classifier::classify;
use fobench_core::DocumentLoader;
use tracing::{debug, warn};

/// Joins the sections of the reference block.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Identifier recorded for the skill overview.
pub const OVERVIEW_ID: &str = "SKILL.md";

// ── Types ─────────────────────────────────────────────────────────────────

/// Output of one assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledReferences {
    /// Sections joined by [`SECTION_SEPARATOR`]; empty when nothing loaded.
    pub text: String,
    /// What actually made it in, overview first.
    pub loaded: Vec<String>,
    /// Whether the full catalog was loaded because classification was empty.
    pub fallback: bool,
}

impl AssembledReferences {
    /// Loaded identifiers minus the overview.
    pub fn documents(&self) -> impl Iterator<Item = &str> {
        self.loaded
            .iter()
            .map(String::as_str)
            .filter(|id| *id != OVERVIEW_ID)
    }
}

// ── Assembler ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    catalog: ReferenceCatalog,
    gate: FallbackGate,
}

impl ContextAssembler {
    pub fn new(catalog: ReferenceCatalog, gate: FallbackGate) -> Self {
        Self { catalog, gate }
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    /// Build the reference block for `query`.
    ///
    /// A document whose body cannot be loaded is skipped with a warning.
    pub fn assemble(
        &self,
        query: &str,
        overview: Option<&str>,
        loader: &dyn DocumentLoader,
    ) -> AssembledReferences {
        let mut sections = Vec::new();
        let mut loaded = Vec::new();

        if let Some(body) = overview {
            sections.push(format!("# Skill Overview\n{body}"));
            loaded.push(OVERVIEW_ID.to_string());
        }

        let classification = classify(query, &self.catalog);
        let fallback = classification.is_empty() && self.gate.is_open(query);

        let selected: Vec<&str> = if fallback {
            debug!(group = ?self.gate.matched_group(query), "No document matched, loading full catalog");
            self.catalog.ids().collect()
        } else {
            classification.ids().iter().map(String::as_str).collect()
        };

        for id in selected {
            match loader.load(id) {
                Some(body) => {
                    sections.push(body);
                    loaded.push(id.to_string());
                }
                None => warn!(id, "Reference document missing, skipping"),
            }
        }

        debug!(count = loaded.len(), fallback, "References assembled");

        AssembledReferences {
            text: sections.join(SECTION_SEPARATOR),
            loaded,
            fallback,
        }
    }
}
