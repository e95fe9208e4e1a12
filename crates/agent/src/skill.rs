//! Skill directory loader.
//!
//! Layout on disk:
//!
//! ```text
//! Skill/
//!   SKILL.md            overview, optional YAML frontmatter (name, description)
//!   references/
//!     regional-uk.md
//!     ...
//! ```

use fobench_core::DocumentLoader;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const OVERVIEW_FILE: &str = "SKILL.md";
const REFERENCES_DIR: &str = "references";

/// Name and description declared in the `SKILL.md` frontmatter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkillMetadata {
    #[serde(default = "default_skill_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

fn default_skill_name() -> String {
    "Unknown Skill".into()
}

impl Default for SkillMetadata {
    fn default() -> Self {
        Self {
            name: default_skill_name(),
            description: String::new(),
        }
    }
}

/// A skill directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct SkillDirectory {
    root: PathBuf,
}

impl SkillDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The first candidate that exists as a directory.
    pub fn resolve<P: AsRef<Path>>(candidates: &[P]) -> Option<Self> {
        candidates
            .iter()
            .map(AsRef::as_ref)
            .find(|p| p.is_dir())
            .map(|p| {
                debug!(path = %p.display(), "Using skill directory");
                Self::new(p)
            })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Frontmatter of `SKILL.md`; defaults when the file or block is absent.
    pub fn metadata(&self) -> SkillMetadata {
        let Some(content) = read(&self.root.join(OVERVIEW_FILE)) else {
            return SkillMetadata::default();
        };
        let Some((frontmatter, _)) = extract_frontmatter(&content) else {
            return SkillMetadata::default();
        };
        serde_yaml::from_str(frontmatter).unwrap_or_else(|e| {
            warn!(error = %e, "Malformed SKILL.md frontmatter");
            SkillMetadata::default()
        })
    }
}

impl DocumentLoader for SkillDirectory {
    fn load(&self, id: &str) -> Option<String> {
        // identifiers are bare file names; anything else would escape references/
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            warn!(id, "Rejected reference identifier");
            return None;
        }
        read(&self.root.join(REFERENCES_DIR).join(id))
    }

    fn overview(&self) -> Option<String> {
        read(&self.root.join(OVERVIEW_FILE))
    }
}

fn read(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(s) => Some(s),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "File not readable");
            None
        }
    }
}

/// Split `---` delimited frontmatter from the body.
fn extract_frontmatter(content: &str) -> Option<(&str, &str)> {
    let trimmed = content.trim_start();
    let after_first = trimmed.strip_prefix("---")?;
    let after_first = after_first.trim_start_matches(['\r', '\n']);

    let end = after_first.find("\n---")?;
    let frontmatter = &after_first[..end];
    let body = after_first[end + 4..].trim_start_matches(['\r', '\n']);
    Some((frontmatter, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn skill_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("SKILL.md"),
            "---\nname: fo-benchmark\ndescription: Family office pay data\n---\n# Benchmarks\n",
        )
        .unwrap();
        fs::create_dir(dir.path().join("references")).unwrap();
        fs::write(dir.path().join("references/regional-uk.md"), "# UK\nCFO £250k").unwrap();
        dir
    }

    #[test]
    fn loads_references_and_overview() {
        let dir = skill_dir();
        let skill = SkillDirectory::new(dir.path());
        assert_eq!(skill.load("regional-uk.md").as_deref(), Some("# UK\nCFO £250k"));
        assert!(skill.load("regional-asia.md").is_none());
        assert!(skill.overview().unwrap().contains("# Benchmarks"));
    }

    #[test]
    fn path_like_identifiers_are_rejected() {
        let dir = skill_dir();
        let skill = SkillDirectory::new(dir.path().join("references"));
        assert!(skill.load("../SKILL.md").is_none());
        assert!(skill.load("").is_none());
    }

    #[test]
    fn metadata_from_frontmatter() {
        let dir = skill_dir();
        let meta = SkillDirectory::new(dir.path()).metadata();
        assert_eq!(meta.name, "fo-benchmark");
        assert_eq!(meta.description, "Family office pay data");
    }

    #[test]
    fn metadata_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(SkillDirectory::new(dir.path()).metadata().name, "Unknown Skill");

        fs::write(dir.path().join("SKILL.md"), "# No frontmatter").unwrap();
        assert_eq!(SkillDirectory::new(dir.path()).metadata(), SkillMetadata::default());

        fs::write(dir.path().join("SKILL.md"), "---\ndescription: only this\n---\n").unwrap();
        let meta = SkillDirectory::new(dir.path()).metadata();
        assert_eq!(meta.name, "Unknown Skill");
        assert_eq!(meta.description, "only this");
    }

    #[test]
    fn resolve_picks_first_existing() {
        let dir = skill_dir();
        let missing = dir.path().join("nope");
        let found = SkillDirectory::resolve(&[missing.as_path(), dir.path()]).unwrap();
        assert_eq!(found.root(), dir.path());
        assert!(SkillDirectory::resolve(&[missing]).is_none());
    }

    #[test]
    fn frontmatter_split() {
        let (fm, body) = extract_frontmatter("---\nkey: value\n---\nbody text").unwrap();
        assert_eq!(fm, "key: value");
        assert_eq!(body, "body text");
        assert!(extract_frontmatter("no delimiters").is_none());
    }
}
