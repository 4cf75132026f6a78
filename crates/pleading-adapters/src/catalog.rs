use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use pleading_core::processing::DocumentRecord;
use pleading_core::state::basename;
use pleading_core::{
    AdapterError, CaseModel, ContentType, MissingContent, ProcessedCase, ProcessingResult,
    Template, TemplateCatalog,
};
use serde_json::json;
use tracing::info;

/// Document kinds that count towards data coverage.
const EVIDENCE: [ContentType; 5] = [
    ContentType::AttorneyNotes,
    ContentType::AdverseAction,
    ContentType::CivilCoverSheet,
    ContentType::Summons,
    ContentType::ComplaintForm,
];

/// The built-in FCRA templates with a filename-based processor.
#[derive(Debug, Clone)]
pub struct StaticTemplateCatalog {
    templates: Vec<Template>,
}

impl Default for StaticTemplateCatalog {
    fn default() -> Self {
        Self {
            templates: vec![
                Template::new(
                    "fcra-credit-card-fraud",
                    "FCRA Complaint - Credit Card Fraud",
                    "For cases involving fraudulent credit card transactions",
                ),
                Template::new(
                    "fcra-identity-theft",
                    "FCRA Complaint - Identity Theft",
                    "For cases involving wider identity theft issues",
                ),
                Template::new(
                    "fcra-inaccurate-reporting",
                    "FCRA Complaint - Inaccurate Reporting",
                    "For cases involving credit report errors",
                ),
            ],
        }
    }
}

impl StaticTemplateCatalog {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }
}

/// Infers the document kind from its filename.
pub fn classify(file_name: &str) -> ContentType {
    let name = file_name.to_lowercase();
    if name.contains("attorney") || name.contains("atty") {
        ContentType::AttorneyNotes
    } else if name.contains("adverse") || name.contains("denial") {
        ContentType::AdverseAction
    } else if name.contains("civil") && name.contains("cover") {
        ContentType::CivilCoverSheet
    } else if name.contains("summons") {
        if name.contains("equifax") {
            ContentType::SummonsEquifax
        } else {
            ContentType::Summons
        }
    } else if name.contains("complaint") {
        ContentType::ComplaintForm
    } else {
        ContentType::Unknown
    }
}

fn extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => format!(".{}", ext.to_lowercase()),
        None => String::new(),
    }
}

fn extracted_key(kind: ContentType) -> Option<&'static str> {
    match kind {
        ContentType::AttorneyNotes => Some("attorneyNotes"),
        ContentType::AdverseAction => Some("adverseAction"),
        ContentType::CivilCoverSheet => Some("civilCoverSheet"),
        ContentType::Summons | ContentType::SummonsEquifax => Some("summons"),
        ContentType::ComplaintForm => Some("complaintForm"),
        ContentType::Unknown => None,
    }
}

fn defendants_named_in(names: &[String]) -> Vec<String> {
    let bureaus = [
        ("equifax", "Equifax Information Services LLC"),
        ("experian", "Experian Information Solutions Inc."),
        ("trans", "Trans Union LLC"),
    ];
    bureaus
        .iter()
        .filter(|(needle, _)| {
            names.iter().any(|name| {
                let name = name.to_lowercase();
                name.contains("summons") && name.contains(needle)
            })
        })
        .map(|(_, full)| full.to_string())
        .collect()
}

fn missing_content(kinds: &BTreeSet<ContentType>) -> Vec<MissingContent> {
    let mut missing = Vec::new();
    if !kinds.contains(&ContentType::AttorneyNotes) {
        missing.push(MissingContent {
            field: "Attorney Notes".to_string(),
            description: "Attorney notes containing case details".to_string(),
            source: "Attorney Notes Document".to_string(),
            required: true,
        });
    }
    if !kinds.contains(&ContentType::AdverseAction) {
        missing.push(MissingContent {
            field: "Credit Impact Details".to_string(),
            description: "Documentation of credit denials or impacts".to_string(),
            source: "Adverse Action Letters".to_string(),
            required: true,
        });
    }
    if !kinds.contains(&ContentType::CivilCoverSheet) {
        missing.push(MissingContent {
            field: "Civil Cover Sheet".to_string(),
            description: "Court filing cover sheet".to_string(),
            source: "Civil Cover Sheet".to_string(),
            required: false,
        });
    }
    missing
}

fn coverage(kinds: &BTreeSet<ContentType>) -> f64 {
    let covered = EVIDENCE
        .iter()
        .filter(|kind| match kind {
            ContentType::Summons => {
                kinds.contains(&ContentType::Summons)
                    || kinds.contains(&ContentType::SummonsEquifax)
            }
            other => kinds.contains(*other),
        })
        .count();
    (covered * 100) as f64 / EVIDENCE.len() as f64
}

#[async_trait]
impl TemplateCatalog for StaticTemplateCatalog {
    async fn list_templates(&self) -> Result<Vec<Template>, AdapterError> {
        Ok(self.templates.clone())
    }

    async fn process(
        &self,
        document_ids: &[String],
        template_id: &str,
    ) -> Result<ProcessedCase, AdapterError> {
        if !self.templates.iter().any(|t| t.id == template_id) {
            return Err(AdapterError::UnknownTemplate(template_id.to_string()));
        }

        let mut documents = Vec::with_capacity(document_ids.len());
        let mut extracted = BTreeMap::new();
        let mut kinds = BTreeSet::new();
        let mut names = Vec::with_capacity(document_ids.len());

        for (i, path) in document_ids.iter().enumerate() {
            let name = basename(path).to_string();
            let kind = classify(&name);
            kinds.insert(kind);
            if let Some(key) = extracted_key(kind) {
                extracted.entry(key.to_string()).or_insert_with(|| json!(name));
            }
            documents.push(DocumentRecord {
                id: format!("doc_{}", i + 1),
                extension: extension(&name),
                name: name.clone(),
                path: path.clone(),
                content_type: kind,
            });
            names.push(name);
        }
        extracted.insert("documentCount".to_string(), json!(documents.len()));

        let result = ProcessingResult {
            selected_documents: documents,
            extracted_data: extracted,
            missing_content: missing_content(&kinds),
            data_coverage: coverage(&kinds),
        };
        let case = CaseModel {
            template_id: template_id.to_string(),
            client_name: None,
            court_jurisdiction: None,
            defendants: defendants_named_in(&names),
            document_types: kinds.into_iter().collect(),
        };

        info!(
            template = %template_id,
            documents = result.selected_documents.len(),
            coverage = result.data_coverage,
            "Processed selected documents"
        );
        Ok(ProcessedCase::new(result, case))
    }
}
