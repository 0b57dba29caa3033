//! Pure domain logic for the pitch-page studio.
//!
//! Nothing in this crate performs I/O. Storage, HTTP and the stateful
//! composer live in `pitch-db`, `pitch-api` and `pitch-composer`.

pub mod analytics;
pub mod animation;
pub mod background;
pub mod content;
pub mod debounce;
pub mod error;
pub mod generation;
pub mod naming;
pub mod picker;
pub mod publish;
pub mod render;
pub mod section_type;
pub mod types;
