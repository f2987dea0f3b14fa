//! Pipeline stages that turn a semantic map into a provider prompt.
//!
//! Each submodule implements exactly one transformation step. None of them
//! performs I/O, blocks or holds mutable state, so they can be called from
//! any number of request handlers at once.
//!
//! ## Data Flow
//!
//! ```text
//! SemanticMap ──▶ render ──▶ template ──▶ compose
//!                 (outline)  (slots)      (provider prompt)
//! ```
//!
//! 1. [`render`]  : flatten hierarchy and blocks into the text outline
//! 2. [`template`]: parsed provider templates and the immutable registry
//! 3. [`compose`] : resolve the provider, fill both slots, downgrade errors

pub mod compose;
pub mod render;
pub mod template;
