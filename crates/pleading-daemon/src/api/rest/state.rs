//! Application state for API handlers

use crate::config::DaemonConfig;
use crate::error::ApiResult;
use crate::render::{RenderError, TemplateRenderer};
use crate::storage::SessionStore;
use crate::workflow::{StepDispatcher, View};
use axum::response::Html;
use pleading_core::DocumentStore;
use serde::Serialize;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Per-session workflow state
    pub sessions: Arc<SessionStore>,

    /// Step dispatcher wired to the drive and template catalog
    pub dispatcher: Arc<StepDispatcher>,

    /// Page and fragment renderer
    pub renderer: Arc<dyn TemplateRenderer>,

    /// Saved complaint documents
    pub documents: Arc<DocumentStore>,

    /// Daemon configuration
    pub config: Arc<DaemonConfig>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        dispatcher: Arc<StepDispatcher>,
        renderer: Arc<dyn TemplateRenderer>,
        documents: Arc<DocumentStore>,
        config: Arc<DaemonConfig>,
    ) -> Self {
        Self {
            sessions: dispatcher.sessions().clone(),
            dispatcher,
            renderer,
            documents,
            config,
        }
    }

    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> ApiResult<Html<String>> {
        let value = serde_json::to_value(data).map_err(RenderError::from)?;
        Ok(Html(self.renderer.render(template, &value)?))
    }

    pub fn render_view(&self, view: &View) -> ApiResult<Html<String>> {
        self.render(view.template, &view.page)
    }
}
