//! # fobench Core
//!
//! Domain types, traits, and error definitions for the family-office
//! benchmark agent. This crate has no framework dependencies; it defines
//! the model that the storage, provider, agent, and gateway crates
//! implement against.
//!
//! Every collaborator of the conversation pipeline is a trait here:
//! - [`Provider`]: the language-model call
//! - [`KvBackend`]: durable key-value storage
//! - [`DocumentLoader`]: reference document bodies

pub mod document;
pub mod error;
pub mod message;
pub mod provider;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use document::DocumentLoader;
pub use error::{Error, FailureClass, Result};
pub use message::{ConversationHistory, Role, ThreadId, Turn};
pub use provider::{ModelParams, Provider, ProviderRequest, ProviderResponse, Usage};
pub use store::KvBackend;
