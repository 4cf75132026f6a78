//! Step dispatcher
//!
//! Decides, for a requested step and the session's persisted state, which
//! data to load, which prerequisite messages to show and whether derived
//! artifacts must be rebuilt. Every session write goes through the store's
//! update closure.

use pleading_core::{
    analyze, basenames, AdapterError, DriveAdapter, DriveEntry, ProcessedCase, Step, Template,
    TemplateCatalog, WorkflowState,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::page::PageData;
use crate::render::views;
use crate::storage::SessionStore;

/// Where a session without progress is sent.
pub const CASE_SETUP_URL: &str = "/ui/step/0";

/// A template to render with its data.
#[derive(Debug, Clone)]
pub struct View {
    pub template: &'static str,
    pub page: PageData,
}

impl View {
    pub fn new(template: &'static str, page: PageData) -> Self {
        Self { template, page }
    }

    pub fn error(message: impl Into<String>, retry_action: Option<String>) -> Self {
        Self::new(views::ERROR_FRAGMENT, PageData::error(message, retry_action))
    }
}

/// Result of a step request.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    Render(View),
    /// Client-side redirect via `HX-Redirect`.
    Redirect(String),
}

/// Drives the four-step workflow against the session store and collaborators.
pub struct StepDispatcher {
    sessions: Arc<SessionStore>,
    drive: Arc<dyn DriveAdapter>,
    catalog: Arc<dyn TemplateCatalog>,
}

impl StepDispatcher {
    pub fn new(
        sessions: Arc<SessionStore>,
        drive: Arc<dyn DriveAdapter>,
        catalog: Arc<dyn TemplateCatalog>,
    ) -> Self {
        Self {
            sessions,
            drive,
            catalog,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Renders `step` for the session. `drive_connected` is the client's own
    /// claim that the drive is connected, honoured alongside the session flag.
    pub async fn render_step(
        &self,
        session_id: &str,
        step: Step,
        drive_connected: bool,
    ) -> StepOutcome {
        let state = self.sessions.get(session_id).await;
        if step > Step::CaseSetup && state.is_pristine() {
            warn!(
                session_id = %session_id,
                step = %step,
                "No session state for step, redirecting to case setup"
            );
            return StepOutcome::Redirect(CASE_SETUP_URL.to_string());
        }

        debug!(
            session_id = %session_id,
            step = %step,
            current_step = %state.current_step(),
            has_case_folder = state.selected_case_folder().is_some(),
            documents = state.selected_documents().len(),
            has_template = state.selected_template().is_some(),
            "Dispatching step"
        );

        let returning = state.is_returning_to(step);
        if step > state.current_step() {
            self.sessions
                .update(session_id, |s| {
                    s.advance_to(step);
                })
                .await;
            info!(session_id = %session_id, step = %step, "Advanced workflow");
        }

        let mut page = PageData::for_step(step, &state);
        page.show_step(step, state.current_step().max(step));
        page.cloud_connected = drive_connected || state.cloud_connected();

        match step {
            Step::CaseSetup => self.load_case_setup(&state, &mut page).await,
            Step::DocumentSelection => {
                self.load_document_selection(&state, &mut page, returning)
                    .await
            }
            Step::TemplateSelection => {
                if state.selected_documents().is_empty() && !returning {
                    warn!(
                        session_id = %session_id,
                        "Template selection requested without documents"
                    );
                    page.error = Some("Please select documents first.".to_string());
                }
                match self.catalog.list_templates().await {
                    Ok(templates) => page.templates = templates,
                    Err(err) => {
                        error!(error = %err, "Failed to load templates");
                        page.error =
                            Some("Could not load templates. Please try again.".to_string());
                    }
                }
            }
            Step::Review => self.load_review(session_id, &state, &mut page, returning).await,
        }

        StepOutcome::Render(View::new(views::STEP_WRAPPER, page))
    }

    async fn load_case_setup(&self, state: &WorkflowState, page: &mut PageData) {
        if page.cloud_connected {
            match self.drive.list_root_folders().await {
                Ok(folders) => {
                    debug!(count = folders.len(), "Loaded drive folders for connected user");
                    page.folders = folders;
                }
                Err(err) => {
                    error!(error = %err, "Failed to load drive folders");
                    page.error =
                        Some("Could not load iCloud folders. Please try again.".to_string());
                }
            }
        }
        if let Some(parent) = state.selected_parent_folder() {
            match self.drive.list_subfolders(parent).await {
                Ok(folders) => page.case_folders = folders,
                Err(err) => error!(folder = %parent, error = %err, "Failed to load case folders"),
            }
        }
    }

    async fn load_document_selection(
        &self,
        state: &WorkflowState,
        page: &mut PageData,
        returning: bool,
    ) {
        let Some(folder) = state.selected_case_folder() else {
            let message = if returning {
                "Could not load documents. Please select a case folder."
            } else {
                warn!("Document selection requested without a case folder");
                "Please select a case folder first."
            };
            page.error = Some(message.to_string());
            return;
        };

        match self.drive.list_documents(folder).await {
            Ok(documents) => page.documents = documents,
            Err(err) => {
                warn!(folder = %folder, error = %err, "Failed to load documents, retrying");
                match self.drive.list_documents(folder).await {
                    Ok(documents) => page.documents = documents,
                    Err(err) => {
                        error!(folder = %folder, error = %err, "Fallback document loading failed");
                        page.error = Some(
                            "Could not load documents. Please check your case folder selection."
                                .to_string(),
                        );
                    }
                }
            }
        }
    }

    async fn load_review(
        &self,
        session_id: &str,
        state: &WorkflowState,
        page: &mut PageData,
        returning: bool,
    ) {
        let folder_documents = self.case_folder_documents(state).await;

        if state.selected_template().is_none() && !returning {
            warn!(session_id = %session_id, "Review requested without a template");
            self.fall_back_to_templates(page, "Please select a template first.")
                .await;
            return;
        }

        let processed = match state.processed() {
            Some(processed) => processed.clone(),
            None => match (state.selected_template(), state.selected_documents()) {
                (Some(template), documents) if !documents.is_empty() => {
                    info!(
                        session_id = %session_id,
                        template = %template,
                        "Reprocessing documents for review"
                    );
                    match self.process_and_record(session_id, template, documents).await {
                        Ok(processed) => processed,
                        Err(err) => {
                            error!(
                                session_id = %session_id,
                                error = %err,
                                "Failed to reprocess documents"
                            );
                            self.fall_back_to_templates(
                                page,
                                "Failed to process documents. Please try again.",
                            )
                            .await;
                            return;
                        }
                    }
                }
                _ => {
                    error!(session_id = %session_id, "Cannot review without processed documents");
                    self.fall_back_to_templates(
                        page,
                        "Session data missing. Please select your documents and template again.",
                    )
                    .await;
                    return;
                }
            },
        };

        fill_review(page, state.selected_documents(), processed, folder_documents);
    }

    /// Shows step 2 in place of the review; the persisted step is kept.
    async fn fall_back_to_templates(&self, page: &mut PageData, message: &str) {
        page.show_step(Step::TemplateSelection, Step::Review);
        page.error = Some(message.to_string());
        page.templates = self.templates_or_empty().await;
    }

    async fn templates_or_empty(&self) -> Vec<Template> {
        self.catalog.list_templates().await.unwrap_or_else(|err| {
            error!(error = %err, "Failed to load templates");
            Vec::new()
        })
    }

    async fn case_folder_documents(&self, state: &WorkflowState) -> Vec<DriveEntry> {
        let Some(folder) = state.selected_case_folder() else {
            return Vec::new();
        };
        match self.drive.list_documents(folder).await {
            Ok(documents) => documents,
            Err(err) => {
                error!(folder = %folder, error = %err, "Failed to load case folder documents");
                Vec::new()
            }
        }
    }

    /// Runs the processor and stores the result, unless the selection moved
    /// on while it ran.
    async fn process_and_record(
        &self,
        session_id: &str,
        template: &str,
        documents: &[String],
    ) -> Result<ProcessedCase, AdapterError> {
        let processed = self.catalog.process(documents, template).await?;
        let stored = processed.clone();
        let recorded = self
            .sessions
            .update(session_id, |s| {
                let current = s.selected_template() == Some(template)
                    && s.selected_documents() == documents;
                if current {
                    s.record_processing(stored);
                }
                current
            })
            .await;
        if !recorded {
            debug!(
                session_id = %session_id,
                "Selection changed during processing, result not stored"
            );
        }
        Ok(processed)
    }

    /// Root folder fragment.
    pub async fn root_folders(&self) -> View {
        match self.drive.list_root_folders().await {
            Ok(folders) => View::new(
                views::DRIVE_FOLDER_LIST,
                PageData {
                    folders,
                    ..PageData::default()
                },
            ),
            Err(err) => {
                error!(error = %err, "Failed to load drive folders");
                View::error(
                    format!("Could not load iCloud folders: {}", err),
                    Some("/ui/icloud-folders".to_string()),
                )
            }
        }
    }

    /// Case folder fragment for `parent`.
    pub async fn case_folders(&self, parent: Option<&str>) -> View {
        let Some(parent) = parent.filter(|p| !p.is_empty()) else {
            return View::error("Parent folder parameter required", None);
        };
        match self.drive.list_subfolders(parent).await {
            Ok(case_folders) => View::new(
                views::CASE_FOLDER_LIST,
                PageData {
                    case_folders,
                    parent_folder: Some(parent.to_string()),
                    ..PageData::default()
                },
            ),
            Err(err) => {
                error!(folder = %parent, error = %err, "Failed to load case folders");
                View::error(
                    format!("Could not load case folders: {}", err),
                    Some(with_query("/ui/case-folders", "parent", parent)),
                )
            }
        }
    }

    /// Marks the drive as connected for the session.
    pub async fn connect_drive(
        &self,
        session_id: &str,
        username: &str,
        app_password: &str,
    ) -> View {
        if username.is_empty() || app_password.is_empty() {
            return View::new(
                views::DRIVE_AUTH_ERROR,
                PageData::error("Please enter both username and app password", None),
            );
        }

        info!(session_id = %session_id, user = %username, "Drive connected");
        let state = self
            .sessions
            .update(session_id, |s| {
                s.connect_cloud(username);
                s.clone()
            })
            .await;
        View::new(
            views::DRIVE_AUTH_SUCCESS,
            PageData::for_step(Step::CaseSetup, &state),
        )
    }

    pub async fn select_parent_folder(&self, session_id: &str, folder: &str) -> View {
        let state = self
            .sessions
            .update(session_id, |s| {
                s.select_parent_folder(folder);
                s.clone()
            })
            .await;
        info!(session_id = %session_id, folder = %folder, "Selected parent folder");

        let case_folders = self.drive.list_subfolders(folder).await.unwrap_or_else(|err| {
            error!(folder = %folder, error = %err, "Failed to load case folders");
            Vec::new()
        });

        let mut page = PageData::for_step(Step::CaseSetup, &state);
        page.cloud_connected = true;
        page.case_folders = case_folders;
        page.parent_folder = Some(folder.to_string());
        View::new(views::STEP0_CASE_SETUP, page)
    }

    pub async fn select_case_folder(&self, session_id: &str, folder: &str) -> View {
        let state = self
            .sessions
            .update(session_id, |s| {
                s.select_case_folder(folder);
                s.advance_to(Step::DocumentSelection);
                s.clone()
            })
            .await;
        info!(session_id = %session_id, folder = %folder, "Selected case folder");

        let mut page = PageData::for_step(Step::DocumentSelection, &state);
        page.cloud_connected = true;
        match self.drive.list_documents(folder).await {
            Ok(documents) => {
                if documents.is_empty() {
                    info!(folder = %folder, "Case folder has no readable documents");
                }
                page.documents = documents;
            }
            Err(err) => {
                error!(folder = %folder, error = %err, "Failed to load documents from case folder");
                page.error = Some(format!(
                    "Could not load documents from case folder '{}'. Please check your iCloud Drive connection and ensure the folder exists.",
                    folder
                ));
            }
        }
        View::new(views::STEP_WRAPPER, page)
    }

    /// Document list fragment; listing failures show an empty list.
    pub async fn documents_in(&self, folder: &str) -> View {
        let documents = self.drive.list_documents(folder).await.unwrap_or_else(|err| {
            error!(folder = %folder, error = %err, "Failed to load documents");
            Vec::new()
        });
        View::new(
            views::STEP1_DOCUMENT_SELECTION,
            PageData {
                current_step: Step::DocumentSelection.index(),
                cloud_connected: true,
                selected_case_folder: Some(folder.to_string()),
                documents,
                ..PageData::default()
            },
        )
    }

    pub async fn select_documents(
        &self,
        session_id: &str,
        documents: Vec<String>,
        case_folder: Option<String>,
    ) -> View {
        if documents.iter().all(|d| d.trim().is_empty()) {
            return View::error("Please select at least one document", None);
        }

        let state = self
            .sessions
            .update(session_id, |s| {
                if let Some(folder) = case_folder.filter(|f| !f.is_empty()) {
                    if s.selected_case_folder().is_none() {
                        s.select_case_folder(folder);
                    }
                }
                s.select_documents(documents);
                s.advance_to(Step::TemplateSelection);
                s.clone()
            })
            .await;
        info!(
            session_id = %session_id,
            documents = state.selected_documents().len(),
            "Selected documents"
        );

        let mut page = PageData::for_step(Step::TemplateSelection, &state);
        page.cloud_connected = true;
        page.templates = self.templates_or_empty().await;
        View::new(views::STEP_WRAPPER, page)
    }

    /// Stores the template and documents, then processes them for review.
    pub async fn select_template(
        &self,
        session_id: &str,
        template: &str,
        documents: Vec<String>,
    ) -> View {
        if template.is_empty() {
            return View::error("Please select a template", None);
        }

        let selected = self
            .sessions
            .update(session_id, |s| {
                let result = s.select_template(template, documents);
                if result.is_ok() {
                    s.advance_to(Step::Review);
                }
                result.map(|_| s.clone())
            })
            .await;

        let state = match selected {
            Ok(state) => state,
            Err(err) => {
                warn!(
                    session_id = %session_id,
                    error = %err,
                    "Template selected without documents"
                );
                let state = self.sessions.get(session_id).await;
                let mut page = PageData::for_step(Step::TemplateSelection, &state);
                page.cloud_connected = true;
                page.templates = self.templates_or_empty().await;
                page.error = Some(
                    "No documents selected for processing. Please go back to Step 1 and select documents."
                        .to_string(),
                );
                return View::new(views::STEP_WRAPPER, page);
            }
        };
        info!(session_id = %session_id, template = %template, "Selected template");

        let processed = match self
            .process_and_record(session_id, template, state.selected_documents())
            .await
        {
            Ok(processed) => processed,
            Err(err) => {
                error!(
                    session_id = %session_id,
                    error = %err,
                    "Error processing selected documents"
                );
                return View::error(format!("Error processing documents: {}", err), None);
            }
        };
        debug!(
            session_id = %session_id,
            coverage = processed.result.data_coverage,
            "Processed documents for review"
        );

        let folder_documents = self.case_folder_documents(&state).await;
        let mut page = PageData::for_step(Step::Review, &state);
        page.cloud_connected = true;
        fill_review(&mut page, state.selected_documents(), processed, folder_documents);
        View::new(views::STEP_WRAPPER, page)
    }
}

fn fill_review(
    page: &mut PageData,
    selected: &[String],
    processed: ProcessedCase,
    folder_documents: Vec<DriveEntry>,
) {
    page.unselected_documents = folder_documents
        .into_iter()
        .filter(|doc| !selected.contains(&doc.path))
        .collect();
    page.missing_content = processed.result.missing_content.clone();
    page.processed = Some(processed);
    page.legal_analysis = Some(analyze(&basenames(selected)));
}

/// `base?key=value` with the value form-encoded.
pub fn with_query(base: &str, key: &str, value: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(value.as_bytes()).collect();
    format!("{}?{}={}", base, key, encoded)
}
