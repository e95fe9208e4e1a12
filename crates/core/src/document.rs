//! DocumentLoader trait: where reference document bodies come from.

/// Resolves reference document identifiers to their text.
///
/// Loading is synchronous: bodies are small markdown files read on demand.
/// An unreadable or unknown document is reported as `None`, never as an error.
pub trait DocumentLoader: Send + Sync {
    /// Body of the reference document `id` (e.g., "regional-uk.md").
    fn load(&self, id: &str) -> Option<String>;

    /// The skill overview that precedes every reference block, if any.
    fn overview(&self) -> Option<String> {
        None
    }
}
