//! Default collaborators for the pleading workflow.
//!
//! [`LocalDriveAdapter`] serves a directory tree as the user's drive and
//! [`StaticTemplateCatalog`] offers the built-in FCRA templates, classifying
//! selected documents by filename.

#![deny(unsafe_code)]

mod catalog;
mod drive;

pub use catalog::{classify, StaticTemplateCatalog};
pub use drive::LocalDriveAdapter;
