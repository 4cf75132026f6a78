use thiserror::Error;

/// Violations of the workflow state rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Invalid workflow step: {0}")]
    InvalidStep(String),

    #[error("Template '{0}' selected without any documents")]
    TemplateWithoutDocuments(String),
}

/// Failures reported by the drive adapter or the template catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("Drive not available: {0}")]
    Unavailable(String),

    #[error("Folder does not exist: {0}")]
    FolderNotFound(String),

    #[error("Failed to read folder {folder}: {message}")]
    Read { folder: String, message: String },

    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("Document processing failed: {0}")]
    Processing(String),
}

impl AdapterError {
    pub fn read(folder: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Read {
            folder: folder.into(),
            message: err.to_string(),
        }
    }
}

/// Filesystem failures while materializing or saving a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Could not create document directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error saving document to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading document {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Empty document content")]
    EmptyContent,

    #[error("Invalid {field}: {value}")]
    InvalidName { field: &'static str, value: String },
}

impl DocumentError {
    /// Whether the caller supplied bad input rather than the filesystem failing.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DocumentError::EmptyContent | DocumentError::InvalidName { .. }
        )
    }
}
