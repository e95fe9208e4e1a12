//! The benchmark agent: decides which reference documents a question needs,
//! builds the prompt around them, and runs one conversational turn.
//!
//! Pipeline per request:
//!
//! 1. **Classify** the question against the [`ReferenceCatalog`]
//! 2. **Assemble** the skill overview and matching documents (or the whole
//!    catalog when only compensation or role vocabulary matched)
//! 3. **Render** the [`PromptTemplate`] and append the reference block
//! 4. **Call** the model with the thread history plus the new question
//! 5. **Explain** the answer and save the extended history

pub mod catalog;
pub mod classifier;
pub mod context;
pub mod explain;
pub mod orchestrator;
pub mod skill;
pub mod template;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use catalog::{CatalogEntry, FallbackGate, GateGroup, ReferenceCatalog};
pub use classifier::{Classification, classify};
pub use context::{AssembledReferences, ContextAssembler};
pub use explain::explain;
pub use orchestrator::{AgentReply, DEFAULT_INSTRUCTIONS, Orchestrator};
pub use skill::{SkillDirectory, SkillMetadata};
pub use template::{PromptTemplate, RenderedPrompt};
