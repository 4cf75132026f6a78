//! On-disk complaint documents.
//!
//! Every save produces a timestamped canonical file plus a `_latest` alias.
//! Lookups prefer the alias and regenerate from the preview when nothing on
//! disk is readable.

pub mod naming;
pub mod skeleton;
mod store;

pub use skeleton::extract_legal_document;
pub use store::{DocumentOrigin, DocumentStore, MaterializedDocument, SavedDocument};
