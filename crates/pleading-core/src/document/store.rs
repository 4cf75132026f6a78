use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::naming::{self, LAST_SAVED_FORMAT};
use super::skeleton;
use crate::analysis::DEFAULT_SOURCE_DOCS;
use crate::error::DocumentError;
use crate::preview::build_preview_on;

const COMPLAINT: &str = "complaint";

/// Where a materialized document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentOrigin {
    Latest,
    Legacy,
    Newest,
    Generated,
}

#[derive(Debug, Clone)]
pub struct MaterializedDocument {
    pub path: PathBuf,
    /// Full file content.
    pub html: String,
    pub origin: DocumentOrigin,
    /// Clock time shown as "last saved" in the editor.
    pub last_saved: String,
}

impl MaterializedDocument {
    pub fn legal_document(&self) -> &str {
        skeleton::extract_legal_document(&self.html)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedDocument {
    pub path: String,
    pub latest_path: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
}

/// Rendered complaints on disk, one canonical file per save plus a
/// `_latest` alias per client and document type.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    save_dir: PathBuf,
    legacy_stamps: Vec<String>,
    default_client: String,
    default_document_type: String,
}

impl DocumentStore {
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
            legacy_stamps: Vec::new(),
            default_client: "Eman Youssef".to_string(),
            default_document_type: COMPLAINT.to_string(),
        }
    }

    /// Stamps probed, in order, after the alias and before the newest match.
    pub fn with_legacy_stamps(mut self, stamps: Vec<String>) -> Self {
        self.legacy_stamps = stamps;
        self
    }

    pub fn with_defaults(
        mut self,
        client: impl Into<String>,
        document_type: impl Into<String>,
    ) -> Self {
        self.default_client = client.into();
        self.default_document_type = document_type.into();
        self
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    pub fn default_client(&self) -> &str {
        &self.default_client
    }

    /// Creates the save directory (mode 0755) if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<(), DocumentError> {
        let mut builder = tokio::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o755);
        builder
            .create(&self.save_dir)
            .await
            .map_err(|source| DocumentError::CreateDir {
                path: self.save_dir.display().to_string(),
                source,
            })
    }

    pub async fn locate_or_generate(
        &self,
        client_name: &str,
        selected_docs: &[String],
    ) -> Result<MaterializedDocument, DocumentError> {
        self.locate_or_generate_at(client_name, selected_docs, Local::now())
            .await
    }

    /// Returns the first readable of: the alias, a legacy stamped file, the
    /// greatest-named canonical file. Generates and persists a new document
    /// when none can be read.
    pub async fn locate_or_generate_at(
        &self,
        client_name: &str,
        selected_docs: &[String],
        now: DateTime<Local>,
    ) -> Result<MaterializedDocument, DocumentError> {
        let key = checked_name("client name", naming::client_key(client_name))?;
        self.ensure_dir().await?;

        let alias = self.save_dir.join(naming::alias_name(COMPLAINT, &key));
        if let Some(html) = read_if_present(&alias).await {
            let last_saved = modified_at(&alias).await.unwrap_or(now);
            info!(path = %alias.display(), "Using latest document");
            return Ok(MaterializedDocument {
                path: alias,
                html,
                origin: DocumentOrigin::Latest,
                last_saved: last_saved.format(LAST_SAVED_FORMAT).to_string(),
            });
        }

        for stamp in &self.legacy_stamps {
            let path = self
                .save_dir
                .join(naming::canonical_name(COMPLAINT, &key, stamp));
            if let Some(html) = read_if_present(&path).await {
                info!(path = %path.display(), "Using legacy stamped document");
                let last_saved = stamped_time(&path, now).await;
                return Ok(MaterializedDocument {
                    path,
                    html,
                    origin: DocumentOrigin::Legacy,
                    last_saved,
                });
            }
        }

        if let Some(path) = self.newest_canonical(&key).await {
            if let Some(html) = read_if_present(&path).await {
                info!(path = %path.display(), "Using most recent document");
                let last_saved = stamped_time(&path, now).await;
                return Ok(MaterializedDocument {
                    path,
                    html,
                    origin: DocumentOrigin::Newest,
                    last_saved,
                });
            }
        }

        info!(client = %client_name, "No existing document found, generating from preview");
        self.generate(client_name, &key, selected_docs, now).await
    }

    async fn generate(
        &self,
        client_name: &str,
        key: &str,
        selected_docs: &[String],
        now: DateTime<Local>,
    ) -> Result<MaterializedDocument, DocumentError> {
        let sources: Vec<String> = if selected_docs.is_empty() {
            DEFAULT_SOURCE_DOCS.iter().map(|s| s.to_string()).collect()
        } else {
            selected_docs.to_vec()
        };
        let preview = build_preview_on(&sources, now.date_naive());
        let html = skeleton::wrap_page(client_name, &skeleton::render_preview(&preview));

        let stamp = naming::stamp(now);
        let canonical = self
            .save_dir
            .join(naming::canonical_name(COMPLAINT, key, &stamp));
        let alias = self.save_dir.join(naming::alias_name(COMPLAINT, key));
        self.write_pair(&canonical, &alias, &html).await?;

        info!(path = %canonical.display(), "Generated and saved new document");
        Ok(MaterializedDocument {
            path: canonical,
            html,
            origin: DocumentOrigin::Generated,
            last_saved: "Just Now".to_string(),
        })
    }

    pub async fn save(
        &self,
        content: &str,
        client_name: Option<&str>,
        document_type: Option<&str>,
    ) -> Result<SavedDocument, DocumentError> {
        self.save_at(content, client_name, document_type, Local::now())
            .await
    }

    /// Writes the timestamped file and refreshes the alias.
    ///
    /// Blank client name and document type fall back to the configured
    /// defaults.
    pub async fn save_at(
        &self,
        content: &str,
        client_name: Option<&str>,
        document_type: Option<&str>,
        now: DateTime<Local>,
    ) -> Result<SavedDocument, DocumentError> {
        if content.is_empty() {
            return Err(DocumentError::EmptyContent);
        }
        let client_name = match client_name.filter(|c| !c.is_empty()) {
            Some(client) => client,
            None => {
                warn!(default = %self.default_client, "Client name not provided, using default");
                self.default_client.as_str()
            }
        };
        let document_type = match document_type.filter(|t| !t.is_empty()) {
            Some(kind) => kind,
            None => {
                warn!(
                    default = %self.default_document_type,
                    "Document type not provided, using default"
                );
                self.default_document_type.as_str()
            }
        };

        let document_type = checked_name("document type", document_type.to_string())?;
        let key = checked_name("client name", naming::client_key(client_name))?;
        self.ensure_dir().await?;
        let canonical = self
            .save_dir
            .join(naming::canonical_name(&document_type, &key, &naming::stamp(now)));
        let alias = self.save_dir.join(naming::alias_name(&document_type, &key));
        let html = skeleton::wrap_page(client_name, &skeleton::wrap_legal_document(content));
        self.write_pair(&canonical, &alias, &html).await?;

        info!(path = %canonical.display(), "Document saved");
        Ok(SavedDocument {
            path: canonical.display().to_string(),
            latest_path: alias.display().to_string(),
            timestamp: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }

    async fn write_pair(
        &self,
        canonical: &Path,
        alias: &Path,
        html: &str,
    ) -> Result<(), DocumentError> {
        tokio::fs::write(canonical, html)
            .await
            .map_err(|source| DocumentError::Write {
                path: canonical.display().to_string(),
                source,
            })?;
        if let Err(err) = tokio::fs::write(alias, html).await {
            warn!(path = %alias.display(), error = %err, "Failed to update latest alias");
        }
        Ok(())
    }

    /// Greatest `complaint_{key}_{YYYYMMDD_HHMMSS}.html` by name.
    async fn newest_canonical(&self, key: &str) -> Option<PathBuf> {
        let prefix = format!("{}_{}_", COMPLAINT, key);

        let mut entries = match tokio::fs::read_dir(&self.save_dir).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    path = %self.save_dir.display(),
                    error = %err,
                    "Could not list saved documents"
                );
                return None;
            }
        };

        let mut best: Option<String> = None;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "Error while listing saved documents");
                    break;
                }
            };
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let stamped = name
                .strip_prefix(&prefix)
                .and_then(naming::exact_stamp)
                .is_some();
            if !stamped {
                continue;
            }
            if best.as_deref().map_or(true, |current| name.as_str() > current) {
                best = Some(name);
            }
        }
        best.map(|name| self.save_dir.join(name))
    }
}

fn checked_name(field: &'static str, value: String) -> Result<String, DocumentError> {
    if naming::is_safe_component(&value) {
        Ok(value)
    } else {
        Err(DocumentError::InvalidName { field, value })
    }
}

async fn read_if_present(path: &Path) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(html) => Some(html),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "Error reading document, trying next candidate"
            );
            None
        }
    }
}

async fn modified_at(path: &Path) -> Option<DateTime<Local>> {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    metadata.modified().ok().map(DateTime::<Local>::from)
}

async fn stamped_time(path: &Path, now: DateTime<Local>) -> String {
    let from_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(naming::parse_stamp);
    let time = match from_name {
        Some(time) => time,
        None => {
            debug!(path = %path.display(), "No stamp in filename, using file mtime");
            modified_at(path).await.unwrap_or(now)
        }
    };
    time.format(LAST_SAVED_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn store(dir: &TempDir) -> DocumentStore {
        DocumentStore::new(dir.path().join("saved_documents"))
            .with_legacy_stamps(vec!["20250605_010420".to_string()])
    }

    #[tokio::test]
    async fn alias_wins_over_stamped_files() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.ensure_dir().await.unwrap();
        let save_dir = store.save_dir().to_path_buf();
        tokio::fs::write(save_dir.join("complaint_alice_latest.html"), "A").await.unwrap();
        tokio::fs::write(save_dir.join("complaint_alice_20250101_000000.html"), "B").await.unwrap();

        let doc = store.locate_or_generate("Alice", &[]).await.unwrap();
        assert_eq!(doc.origin, DocumentOrigin::Latest);
        assert_eq!(doc.html, "A");
    }

    #[tokio::test]
    async fn greatest_stamp_wins_without_alias() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path());
        tokio::fs::write(dir.path().join("complaint_alice_20250101_000000.html"), "old")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("complaint_alice_20250301_000000.html"), "new")
            .await
            .unwrap();

        let doc = store.locate_or_generate("Alice", &[]).await.unwrap();
        assert_eq!(doc.origin, DocumentOrigin::Newest);
        assert_eq!(doc.html, "new");
        assert_eq!(doc.last_saved, "12:00:00 AM");
    }

    #[tokio::test]
    async fn legacy_stamp_is_probed_before_newest() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.ensure_dir().await.unwrap();
        let save_dir = store.save_dir().to_path_buf();
        tokio::fs::write(save_dir.join("complaint_alice_20250605_010420.html"), "legacy")
            .await
            .unwrap();
        tokio::fs::write(save_dir.join("complaint_alice_20260101_000000.html"), "newer")
            .await
            .unwrap();

        let doc = store.locate_or_generate("Alice", &[]).await.unwrap();
        assert_eq!(doc.origin, DocumentOrigin::Legacy);
        assert_eq!(doc.html, "legacy");
        assert_eq!(doc.last_saved, "1:04:20 AM");
    }

    #[tokio::test]
    async fn generation_writes_canonical_and_alias_with_same_content() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let now = at(2025, 7, 1, 9, 30, 5);

        let doc = store
            .locate_or_generate_at("Alice Smith", &["notes.txt".to_string()], now)
            .await
            .unwrap();
        assert_eq!(doc.origin, DocumentOrigin::Generated);
        assert_eq!(doc.last_saved, "Just Now");

        let canonical = store.save_dir().join("complaint_alice_smith_20250701_093005.html");
        let alias = store.save_dir().join("complaint_alice_smith_latest.html");
        assert_eq!(doc.path, canonical);
        let a = tokio::fs::read_to_string(&canonical).await.unwrap();
        let b = tokio::fs::read_to_string(&alias).await.unwrap();
        assert_eq!(a, b);
        assert!(doc.legal_document().starts_with("<div class=\"legal-document\">"));
        assert!(a.contains("<title>Legal Complaint - Alice Smith</title>"));
    }

    #[tokio::test]
    async fn save_writes_both_files_and_formats_timestamp() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let now = at(2025, 6, 5, 13, 44, 20);

        let saved = store
            .save_at("<p>Edited</p>", Some("Eman Youssef"), None, now)
            .await
            .unwrap();
        assert!(saved.path.ends_with("complaint_eman_youssef_20250605_134420.html"));
        assert!(saved.latest_path.ends_with("complaint_eman_youssef_latest.html"));
        assert_eq!(saved.timestamp, "2025-06-05 13:44:20");

        let alias = tokio::fs::read_to_string(&saved.latest_path).await.unwrap();
        let body = skeleton::extract_legal_document(&alias);
        assert!(body.starts_with("<div class=\"legal-document\">"));
        assert!(body.contains("<p>Edited</p>"));
    }

    #[tokio::test]
    async fn save_rejects_empty_content() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let err = store.save("", None, None).await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn save_uses_defaults_for_blank_fields() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir).with_defaults("Jane Doe", "motion");
        let saved = store.save("x", Some(""), Some("")).await.unwrap();
        assert!(saved.latest_path.ends_with("motion_jane_doe_latest.html"));
    }

    #[tokio::test]
    async fn traversal_in_names_is_refused() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let err = store
            .save("<p>x</p>", Some("Bob"), Some("../escaped"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidName { field: "document type", .. }));
        assert!(err.is_client_error());

        let err = store.locate_or_generate("Acme/Bob", &[]).await.unwrap_err();
        assert!(matches!(err, DocumentError::InvalidName { field: "client name", .. }));

        let err = store.save("<p>x</p>", Some("..\\Bob"), None).await.unwrap_err();
        assert!(err.is_client_error());

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert!(names.iter().all(|n| n == "saved_documents"), "{names:?}");
    }

    #[tokio::test]
    async fn newest_ignores_clients_sharing_a_key_prefix() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path());
        store
            .save_at("<p>smith</p>", Some("Bob Smith"), None, at(2026, 1, 1, 0, 0, 0))
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("complaint_bob_20250101_000000.html"), "bob")
            .await
            .unwrap();

        let doc = store.locate_or_generate("Bob", &[]).await.unwrap();
        assert_eq!(doc.origin, DocumentOrigin::Newest);
        assert_eq!(doc.html, "bob");
        assert_eq!(doc.path, dir.path().join("complaint_bob_20250101_000000.html"));
    }

    #[tokio::test]
    async fn other_clients_files_do_not_block_generation() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path());
        store
            .save_at("<p>smith</p>", Some("Bob Smith"), None, at(2026, 1, 1, 0, 0, 0))
            .await
            .unwrap();

        let doc = store
            .locate_or_generate_at("Bob", &[], at(2026, 2, 1, 8, 0, 0))
            .await
            .unwrap();
        assert_eq!(doc.origin, DocumentOrigin::Generated);
        assert!(!doc.html.contains("<p>smith</p>"));
    }

    #[tokio::test]
    async fn unwritable_save_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        tokio::fs::write(&blocker, "x").await.unwrap();
        let store = DocumentStore::new(blocker.join("nested"));
        let err = store.save("x", None, None).await.unwrap_err();
        assert!(matches!(err, DocumentError::CreateDir { .. }));
    }
}
