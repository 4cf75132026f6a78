//! Pleading daemon library
//!
//! This module provides the components of the complaint workflow service:
//! - HTMX workflow endpoints
//! - Session storage and expiry
//! - Step dispatching and page rendering
//! - Server lifecycle management

#![deny(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod render;
pub mod server;
pub mod storage;
pub mod workflow;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError};
pub use render::{MiniJinjaRenderer, TemplateRenderer};
pub use server::Server;
pub use storage::SessionStore;
pub use workflow::StepDispatcher;
