//! Output of the template processor.
//!
//! The workflow only inspects [`ProcessingResult::data_coverage`]; everything
//! else is carried through to the review page untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of legal document, inferred from its filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    AttorneyNotes,
    AdverseAction,
    CivilCoverSheet,
    Summons,
    SummonsEquifax,
    ComplaintForm,
    Unknown,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::AttorneyNotes => "attorney_notes",
            ContentType::AdverseAction => "adverse_action",
            ContentType::CivilCoverSheet => "civil_cover_sheet",
            ContentType::Summons => "summons",
            ContentType::SummonsEquifax => "summons_equifax",
            ContentType::ComplaintForm => "complaint_form",
            ContentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selected document as seen by the processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub name: String,
    /// Lowercased extension including the dot, e.g. `.pdf`.
    pub extension: String,
    pub path: String,
    pub content_type: ContentType,
}

/// A field or document the complaint still needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingContent {
    pub field: String,
    pub description: String,
    pub source: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub selected_documents: Vec<DocumentRecord>,
    pub extracted_data: BTreeMap<String, serde_json::Value>,
    pub missing_content: Vec<MissingContent>,
    /// Percentage (0-100) of required data points that were covered.
    pub data_coverage: f64,
}

/// Structured case facts assembled from the selected documents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CaseModel {
    pub template_id: String,
    pub client_name: Option<String>,
    pub court_jurisdiction: Option<String>,
    pub defendants: Vec<String>,
    pub document_types: Vec<ContentType>,
}

/// The processing result and case model always travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedCase {
    pub result: ProcessingResult,
    pub case: CaseModel,
}

impl ProcessedCase {
    pub fn new(result: ProcessingResult, case: CaseModel) -> Self {
        Self { result, case }
    }
}
