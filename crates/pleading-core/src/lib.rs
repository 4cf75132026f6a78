//! Domain model for the pleading workflow.
//!
//! Holds the per-session [`WorkflowState`], the collaborator traits the
//! daemon is wired with, the fixed legal-analysis and preview content, and
//! the on-disk document store.

#![deny(unsafe_code)]

pub mod analysis;
pub mod catalog;
pub mod document;
pub mod drive;
pub mod error;
pub mod preview;
pub mod processing;
pub mod state;
pub mod step;

pub use analysis::{analyze, basenames, LegalAnalysis};
pub use catalog::{Template, TemplateCatalog};
pub use document::{DocumentOrigin, DocumentStore, MaterializedDocument, SavedDocument};
pub use drive::{DriveAdapter, DriveEntry};
pub use error::{AdapterError, DocumentError, WorkflowError};
pub use preview::{build_preview, PreviewDocument};
pub use processing::{CaseModel, ContentType, MissingContent, ProcessedCase, ProcessingResult};
pub use state::WorkflowState;
pub use step::Step;
