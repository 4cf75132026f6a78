//! HTML rendering
//!
//! Pages and HTMX fragments are minijinja templates compiled into the
//! binary. Handlers only see the [`TemplateRenderer`] trait, so tests can
//! swap in a recording renderer.

use minijinja::Environment;
use thiserror::Error;

/// Rendering failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Could not serialize page data: {0}")]
    Data(#[from] serde_json::Error),

    #[error(transparent)]
    Template(#[from] minijinja::Error),
}

/// Renders a named template with a JSON data tree.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, name: &str, data: &serde_json::Value) -> Result<String, RenderError>;
}

/// Template names known to the renderer.
pub mod views {
    pub const INDEX: &str = "index.html";
    pub const STEP_WRAPPER: &str = "step_wrapper.html";
    pub const STEP0_CASE_SETUP: &str = "step0_case_setup.html";
    pub const STEP1_DOCUMENT_SELECTION: &str = "step1_document_selection.html";
    pub const STEP2_TEMPLATE_SELECTION: &str = "step2_template_selection.html";
    pub const STEP3_REVIEW: &str = "step3_review.html";
    pub const ERROR_FRAGMENT: &str = "error_fragment.html";
    pub const DRIVE_FOLDER_LIST: &str = "drive_folder_list.html";
    pub const CASE_FOLDER_LIST: &str = "case_folder_list.html";
    pub const DRIVE_SETUP_MODAL: &str = "drive_setup_modal.html";
    pub const DRIVE_AUTH_SUCCESS: &str = "drive_auth_success.html";
    pub const DRIVE_AUTH_ERROR: &str = "drive_auth_error.html";
    pub const DOCUMENT_PREVIEW: &str = "document_preview.html";
    pub const DOCUMENT_VIEWER: &str = "document_viewer.html";
    pub const DOCUMENT_EDITOR: &str = "document_editor.html";
}

const TEMPLATES: &[(&str, &str)] = &[
    (views::INDEX, include_str!("../templates/index.html")),
    (views::STEP_WRAPPER, include_str!("../templates/step_wrapper.html")),
    (views::STEP0_CASE_SETUP, include_str!("../templates/step0_case_setup.html")),
    (
        views::STEP1_DOCUMENT_SELECTION,
        include_str!("../templates/step1_document_selection.html"),
    ),
    (
        views::STEP2_TEMPLATE_SELECTION,
        include_str!("../templates/step2_template_selection.html"),
    ),
    (views::STEP3_REVIEW, include_str!("../templates/step3_review.html")),
    (views::ERROR_FRAGMENT, include_str!("../templates/error_fragment.html")),
    (views::DRIVE_FOLDER_LIST, include_str!("../templates/drive_folder_list.html")),
    (views::CASE_FOLDER_LIST, include_str!("../templates/case_folder_list.html")),
    (views::DRIVE_SETUP_MODAL, include_str!("../templates/drive_setup_modal.html")),
    (views::DRIVE_AUTH_SUCCESS, include_str!("../templates/drive_auth_success.html")),
    (views::DRIVE_AUTH_ERROR, include_str!("../templates/drive_auth_error.html")),
    (views::DOCUMENT_PREVIEW, include_str!("../templates/document_preview.html")),
    (views::DOCUMENT_VIEWER, include_str!("../templates/document_viewer.html")),
    (views::DOCUMENT_EDITOR, include_str!("../templates/document_editor.html")),
];

/// The built-in templates, HTML auto-escaped.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, name: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|_| RenderError::UnknownTemplate(name.to_string()))?;
        Ok(template.render(data)?)
    }
}
