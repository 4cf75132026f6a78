//! Cloud-drive collaborator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AdapterError;

/// A folder or document listed by the drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveEntry {
    pub id: String,
    pub name: String,
    /// Drive path, rooted at `/`.
    pub path: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    /// `pdf`, `docx`, `doc`, `txt`, `image` or the bare extension. Empty for folders.
    pub kind: String,
    pub is_directory: bool,
}

impl DriveEntry {
    pub fn folder(id: impl Into<String>, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
            size: 0,
            modified: Utc::now(),
            kind: String::new(),
            is_directory: true,
        }
    }

    pub fn document(
        id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let kind = kind_for_name(&name);
        Self {
            id: id.into(),
            name,
            path: path.into(),
            size: 0,
            modified: Utc::now(),
            kind,
            is_directory: false,
        }
    }

    /// Human-readable size, e.g. `12.3 KB`.
    pub fn display_size(&self) -> String {
        format_size(self.size)
    }
}

/// Classifies a document by its extension.
pub fn kind_for_name(name: &str) -> String {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return String::new(),
    };
    match ext.as_str() {
        "pdf" | "docx" | "doc" | "txt" => ext,
        "jpg" | "jpeg" | "png" => "image".to_string(),
        _ => ext,
    }
}

pub fn format_size(size: u64) -> String {
    if size < 1024 {
        format!("{} B", size)
    } else if size < 1024 * 1024 {
        format!("{:.1} KB", size as f64 / 1024.0)
    } else {
        format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
    }
}

/// Enumerates folders and documents in the user's drive.
#[async_trait]
pub trait DriveAdapter: Send + Sync {
    async fn list_root_folders(&self) -> Result<Vec<DriveEntry>, AdapterError>;

    async fn list_subfolders(&self, parent: &str) -> Result<Vec<DriveEntry>, AdapterError>;

    async fn list_documents(&self, folder: &str) -> Result<Vec<DriveEntry>, AdapterError>;
}
