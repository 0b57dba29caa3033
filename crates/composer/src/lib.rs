//! Stateful orchestration on top of the storage client.
//!
//! - [`session`]: server-side edit mode with the debounced autosave.
//! - [`registry`]: one composer session per project.
//! - [`publish`]: draft/published toggling and share tokens.
//! - [`generation`]: AI copy generation seeded with curated examples.
//! - [`projects`]: project creation with the default section scaffold.
//! - [`resources`]: resolving library entities for rendering.

pub mod client;
pub mod error;
pub mod generation;
pub mod projects;
pub mod publish;
pub mod registry;
pub mod resources;
pub mod session;

pub use error::{ComposerError, GenerationError, PublishError, SaveError};
pub use client::{CompletionConfig, HttpCompletionClient};
pub use generation::{GenerationBridge, TextCompletionClient};
pub use publish::PublishController;
pub use registry::ComposerRegistry;
pub use session::ComposerSession;
