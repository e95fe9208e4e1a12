//! Reference context assembly.
//!
//! | Section | Source | When |
//! |---------|--------|------|
//! | Skill overview | `SKILL.md` | always, if present |
//! | Classified documents | `references/<id>` | keyword hit |
//! | Full catalog | `references/*` | no hit, but compensation or role vocabulary |

pub mod assembler;

pub use assembler::{AssembledReferences, ContextAssembler, OVERVIEW_ID, SECTION_SEPARATOR};
