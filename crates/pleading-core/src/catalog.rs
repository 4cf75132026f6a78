//! Template catalog and document processor collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AdapterError;
use crate::processing::ProcessedCase;

/// A complaint template the user can pick on step 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Template {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            path: None,
        }
    }
}

/// Lists templates and turns selected documents into a processed case.
///
/// `process` must be deterministic for the same inputs.
#[async_trait]
pub trait TemplateCatalog: Send + Sync {
    async fn list_templates(&self) -> Result<Vec<Template>, AdapterError>;

    async fn process(
        &self,
        document_ids: &[String],
        template_id: &str,
    ) -> Result<ProcessedCase, AdapterError>;
}
