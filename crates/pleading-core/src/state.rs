//! Per-session workflow state.
//!
//! Fields are private so every mutation goes through a method that keeps the
//! state's invariants:
//!
//! - a selected template implies at least one selected document
//! - the processing result and case model are set and cleared together
//! - (re)selecting a template clears any processing result
//! - disconnecting the drive clears the folder selections

use crate::error::WorkflowError;
use crate::processing::ProcessedCase;
use crate::step::Step;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    current_step: Step,
    cloud_connected: bool,
    cloud_username: Option<String>,
    selected_parent_folder: Option<String>,
    selected_case_folder: Option<String>,
    selected_documents: Vec<String>,
    selected_template: Option<String>,
    processed: Option<ProcessedCase>,
    last_updated: DateTime<Utc>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::created_at(Utc::now())
    }

    pub fn created_at(now: DateTime<Utc>) -> Self {
        Self {
            current_step: Step::CaseSetup,
            cloud_connected: false,
            cloud_username: None,
            selected_parent_folder: None,
            selected_case_folder: None,
            selected_documents: Vec::new(),
            selected_template: None,
            processed: None,
            last_updated: now,
        }
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    pub fn cloud_connected(&self) -> bool {
        self.cloud_connected
    }

    pub fn cloud_username(&self) -> Option<&str> {
        self.cloud_username.as_deref()
    }

    pub fn selected_parent_folder(&self) -> Option<&str> {
        self.selected_parent_folder.as_deref()
    }

    pub fn selected_case_folder(&self) -> Option<&str> {
        self.selected_case_folder.as_deref()
    }

    pub fn selected_documents(&self) -> &[String] {
        &self.selected_documents
    }

    pub fn selected_template(&self) -> Option<&str> {
        self.selected_template.as_deref()
    }

    pub fn processed(&self) -> Option<&ProcessedCase> {
        self.processed.as_ref()
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// A state nobody has touched: no connection, no selections, step 0.
    pub fn is_pristine(&self) -> bool {
        self.current_step == Step::CaseSetup
            && !self.cloud_connected
            && self.cloud_username.is_none()
            && self.selected_parent_folder.is_none()
            && self.selected_case_folder.is_none()
            && self.selected_documents.is_empty()
            && self.selected_template.is_none()
            && self.processed.is_none()
    }

    /// Whether a visitor to `step` has already been further along the flow.
    pub fn is_returning_to(&self, step: Step) -> bool {
        self.current_step > step
    }

    /// Basenames of the selected documents, in selection order.
    pub fn selected_document_names(&self) -> Vec<String> {
        self.selected_documents
            .iter()
            .map(|path| basename(path).to_string())
            .collect()
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.last_updated > ttl
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_updated = now;
    }

    /// Moves forward to `step`; never moves backwards.
    pub fn advance_to(&mut self, step: Step) -> bool {
        if step > self.current_step {
            self.current_step = step;
            true
        } else {
            false
        }
    }

    pub fn connect_cloud(&mut self, username: impl Into<String>) {
        self.cloud_connected = true;
        self.cloud_username = Some(username.into());
    }

    #[cfg(test)]
    pub(crate) fn disconnect_cloud(&mut self) {
        self.cloud_connected = false;
        self.cloud_username = None;
        self.selected_parent_folder = None;
        self.selected_case_folder = None;
    }

    pub fn select_parent_folder(&mut self, folder: impl Into<String>) {
        self.selected_parent_folder = non_empty(folder.into());
    }

    pub fn select_case_folder(&mut self, folder: impl Into<String>) {
        self.selected_case_folder = non_empty(folder.into());
    }

    /// Replaces the document selection, dropping blanks and repeats.
    ///
    /// Clearing the selection also clears the template and any processing
    /// result, since neither can stand without documents.
    pub fn select_documents<I, S>(&mut self, documents: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected: Vec<String> = Vec::new();
        for doc in documents {
            let doc = doc.into();
            if !doc.trim().is_empty() && !selected.contains(&doc) {
                selected.push(doc);
            }
        }

        if selected.is_empty() {
            self.selected_template = None;
            self.processed = None;
        } else if selected != self.selected_documents {
            self.processed = None;
        }
        self.selected_documents = selected;
    }

    /// Assigns the template together with the documents it applies to.
    ///
    /// Always clears the processing result, even when the template is
    /// unchanged. Leaves the state untouched on error.
    pub fn select_template<I, S>(
        &mut self,
        template: &str,
        documents: I,
    ) -> Result<(), WorkflowError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut candidate = self.clone();
        candidate.select_documents(documents);
        if candidate.selected_documents.is_empty() {
            return Err(WorkflowError::TemplateWithoutDocuments(template.to_string()));
        }
        candidate.selected_template = non_empty(template.to_string());
        candidate.processed = None;
        *self = candidate;
        Ok(())
    }

    /// Stores a processing result for the current selection.
    pub fn record_processing(&mut self, processed: ProcessedCase) {
        self.processed = Some(processed);
    }

    pub fn clear_processing(&mut self) {
        self.processed = None;
    }
}

/// Last `/`-separated segment of a document path.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{CaseModel, ProcessingResult};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn processed(coverage: f64) -> ProcessedCase {
        ProcessedCase::new(
            ProcessingResult {
                selected_documents: Vec::new(),
                extracted_data: BTreeMap::new(),
                missing_content: Vec::new(),
                data_coverage: coverage,
            },
            CaseModel::default(),
        )
    }

    #[test]
    fn fresh_state_is_pristine_at_step_zero() {
        let state = WorkflowState::new();
        assert!(state.is_pristine());
        assert_eq!(state.current_step(), Step::CaseSetup);
        assert!(state.processed().is_none());
    }

    #[test]
    fn advance_never_moves_backwards() {
        let mut state = WorkflowState::new();
        assert!(state.advance_to(Step::TemplateSelection));
        assert!(!state.advance_to(Step::DocumentSelection));
        assert_eq!(state.current_step(), Step::TemplateSelection);
        assert!(state.is_returning_to(Step::DocumentSelection));
        assert!(!state.is_returning_to(Step::TemplateSelection));
    }

    #[test]
    fn document_selection_keeps_order_and_drops_duplicates() {
        let mut state = WorkflowState::new();
        state.select_documents(["/c/b.docx", "/c/a.pdf", "/c/b.docx", " "]);
        assert_eq!(state.selected_documents(), ["/c/b.docx", "/c/a.pdf"]);
        assert_eq!(state.selected_document_names(), ["b.docx", "a.pdf"]);
    }

    #[test]
    fn template_requires_documents() {
        let mut state = WorkflowState::new();
        let err = state
            .select_template("fcra", Vec::<String>::new())
            .unwrap_err();
        assert_eq!(err, WorkflowError::TemplateWithoutDocuments("fcra".into()));
        assert!(state.selected_template().is_none());
    }

    #[test]
    fn reselecting_template_clears_processing() {
        let mut state = WorkflowState::new();
        state.select_template("fcra", ["a.pdf"]).unwrap();
        state.record_processing(processed(40.0));
        state.select_template("fcra", ["a.pdf"]).unwrap();
        assert!(state.processed().is_none());
    }

    #[test]
    fn clearing_documents_clears_template() {
        let mut state = WorkflowState::new();
        state.select_template("fcra", ["a.pdf"]).unwrap();
        state.record_processing(processed(40.0));
        state.select_documents(Vec::<String>::new());
        assert!(state.selected_template().is_none());
        assert!(state.processed().is_none());
    }

    #[test]
    fn disconnect_clears_folders() {
        let mut state = WorkflowState::new();
        state.connect_cloud("alice");
        state.select_parent_folder("/Cases");
        state.select_case_folder("/Cases/Smith");
        state.disconnect_cloud();
        assert!(!state.cloud_connected());
        assert!(state.selected_parent_folder().is_none());
        assert!(state.selected_case_folder().is_none());
    }

    #[test]
    fn expiry_is_strictly_after_ttl() {
        let start = Utc::now();
        let state = WorkflowState::created_at(start);
        let ttl = chrono::Duration::hours(24);
        assert!(!state.is_expired(start + ttl, ttl));
        assert!(state.is_expired(start + ttl + chrono::Duration::seconds(1), ttl));
    }

    #[test]
    fn basename_takes_last_segment() {
        assert_eq!(basename("/Users/alice/Cases/Smith/a.pdf"), "a.pdf");
        assert_eq!(basename("a.pdf"), "a.pdf");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Documents(Vec<String>),
        Template(String, Vec<String>),
        Process,
        Connect,
        Disconnect,
        ParentFolder(String),
        CaseFolder(String),
        Advance(u8),
    }

    fn arb_docs() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-c]{1,2}\\.pdf", 0..4)
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            arb_docs().prop_map(Op::Documents),
            ("[a-z]{0,5}", arb_docs()).prop_map(|(t, d)| Op::Template(t, d)),
            Just(Op::Process),
            Just(Op::Connect),
            Just(Op::Disconnect),
            "/[A-Z][a-z]{0,5}".prop_map(Op::ParentFolder),
            "/[A-Z][a-z]{0,5}/[A-Z][a-z]{0,5}".prop_map(Op::CaseFolder),
            (0u8..4).prop_map(Op::Advance),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_after_every_update(ops in prop::collection::vec(arb_op(), 1..40)) {
            let mut state = WorkflowState::new();
            for op in ops {
                let template_before = state.selected_template().map(str::to_string);
                let mut template_assigned = false;
                match op {
                    Op::Documents(docs) => state.select_documents(docs),
                    Op::Template(t, docs) => {
                        template_assigned = state.select_template(&t, docs).is_ok();
                    }
                    Op::Process => {
                        if state.selected_template().is_some() {
                            state.record_processing(processed(50.0));
                        }
                    }
                    Op::Connect => state.connect_cloud("alice"),
                    Op::Disconnect => state.disconnect_cloud(),
                    // Folders are only offered once the drive is connected.
                    Op::ParentFolder(folder) => {
                        if state.cloud_connected() {
                            state.select_parent_folder(folder);
                        }
                    }
                    Op::CaseFolder(folder) => {
                        if state.cloud_connected() {
                            state.select_case_folder(folder);
                        }
                    }
                    Op::Advance(i) => {
                        state.advance_to(Step::from_index(i).unwrap());
                    }
                }

                if state.selected_template().is_some() {
                    prop_assert!(!state.selected_documents().is_empty());
                }
                let template_after = state.selected_template().map(str::to_string);
                if template_assigned || template_after != template_before {
                    prop_assert!(state.processed().is_none());
                }
                if !state.cloud_connected() {
                    prop_assert!(state.selected_parent_folder().is_none());
                    prop_assert!(state.selected_case_folder().is_none());
                }
            }
        }

        #[test]
        fn document_names_are_basenames(
            dirs in prop::collection::vec("[a-z]{1,6}", 1..4),
            names in prop::collection::vec("[a-z]{1,6}\\.pdf", 1..5),
        ) {
            let prefix = format!("/{}", dirs.join("/"));
            let mut state = WorkflowState::new();
            state.select_documents(names.iter().map(|n| format!("{}/{}", prefix, n)));
            let mut expected: Vec<String> = Vec::new();
            for n in &names {
                if !expected.contains(n) {
                    expected.push(n.clone());
                }
            }
            prop_assert_eq!(state.selected_document_names(), expected);
        }
    }
}
