//! Data handed to the HTML templates

use pleading_core::{
    DriveEntry, LegalAnalysis, MissingContent, PreviewDocument, ProcessedCase, Step, Template,
    WorkflowState,
};
use serde::Serialize;

/// Shown until real sign-in exists.
pub const DEFAULT_USERNAME: &str = "User";

/// One entry of the step progress bar.
#[derive(Debug, Clone, Serialize)]
pub struct StepLink {
    pub index: u8,
    pub title: &'static str,
    /// `complete`, `active` or `pending`
    pub status: &'static str,
}

impl StepLink {
    fn all(active: Step, reached: Step) -> Vec<StepLink> {
        Step::ALL
            .iter()
            .map(|&step| StepLink {
                index: step.index(),
                title: step.title(),
                status: if step == active {
                    "active"
                } else if step <= reached {
                    "complete"
                } else {
                    "pending"
                },
            })
            .collect()
    }
}

/// Everything a workflow page or fragment may display.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageData {
    pub current_step: u8,
    pub steps: Vec<StepLink>,
    pub username: String,
    pub cloud_connected: bool,
    pub cloud_username: Option<String>,
    pub selected_parent_folder: Option<String>,
    pub selected_case_folder: Option<String>,
    pub selected_documents: Vec<String>,
    pub selected_template: Option<String>,
    pub is_returning_user: bool,

    pub folders: Vec<DriveEntry>,
    pub case_folders: Vec<DriveEntry>,
    pub parent_folder: Option<String>,
    pub documents: Vec<DriveEntry>,
    pub templates: Vec<Template>,

    pub processed: Option<ProcessedCase>,
    pub legal_analysis: Option<LegalAnalysis>,
    /// Case-folder documents the user left out of the selection.
    pub unselected_documents: Vec<DriveEntry>,
    pub missing_content: Vec<MissingContent>,
    pub preview: Option<PreviewDocument>,

    pub error: Option<String>,
    pub retry_action: Option<String>,
}

impl PageData {
    /// Page for `step` seeded from the session's persisted selections.
    pub fn for_step(step: Step, state: &WorkflowState) -> Self {
        Self {
            current_step: step.index(),
            steps: StepLink::all(step, state.current_step()),
            cloud_connected: state.cloud_connected(),
            cloud_username: state.cloud_username().map(str::to_string),
            selected_parent_folder: state.selected_parent_folder().map(str::to_string),
            selected_case_folder: state.selected_case_folder().map(str::to_string),
            selected_documents: state.selected_documents().to_vec(),
            selected_template: state.selected_template().map(str::to_string),
            is_returning_user: state.is_returning_to(step),
            processed: state.processed().cloned(),
            ..Self::default()
        }
    }

    /// Bare fragment carrying an error and an optional retry URL.
    pub fn error(message: impl Into<String>, retry_action: Option<String>) -> Self {
        Self {
            error: Some(message.into()),
            retry_action,
            ..Self::default()
        }
    }

    /// Re-targets the page at an earlier step without touching the session.
    pub fn show_step(&mut self, step: Step, reached: Step) {
        self.current_step = step.index();
        self.steps = StepLink::all(step, reached);
        self.is_returning_user = reached > step;
    }

    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Data for the document viewer and editor.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentPage {
    pub client_name: String,
    pub document_title: String,
    pub document_filename: String,
    /// Extracted `legal-document` markup, rendered unescaped.
    pub document_html: String,
    pub last_saved: Option<String>,
    pub preview: Option<PreviewDocument>,
    pub source_path: String,
    pub view_url: String,
    pub edit_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_links_mark_progress() {
        let mut state = WorkflowState::new();
        state.select_case_folder("/Cases/Smith");
        state.advance_to(Step::TemplateSelection);

        let page = PageData::for_step(Step::DocumentSelection, &state);
        let statuses: Vec<&str> = page.steps.iter().map(|s| s.status).collect();
        assert_eq!(statuses, ["complete", "active", "complete", "pending"]);
        assert!(page.is_returning_user);
        assert_eq!(page.selected_case_folder.as_deref(), Some("/Cases/Smith"));
    }

    #[test]
    fn test_show_step_keeps_selections() {
        let mut state = WorkflowState::new();
        state.select_documents(["/Cases/Smith/a.pdf"]);
        let mut page = PageData::for_step(Step::Review, &state);
        page.show_step(Step::TemplateSelection, Step::CaseSetup);
        assert_eq!(page.current_step, 2);
        assert!(!page.is_returning_user);
        assert_eq!(page.selected_documents, ["/Cases/Smith/a.pdf"]);
    }

    #[test]
    fn test_error_page_serializes() {
        let value = PageData::error("boom", Some("/ui/icloud-folders".into()))
            .to_value()
            .unwrap();
        assert_eq!(value["error"], "boom");
        assert_eq!(value["retry_action"], "/ui/icloud-folders");
    }
}
