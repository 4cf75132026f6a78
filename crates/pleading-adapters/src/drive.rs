use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pleading_core::drive::kind_for_name;
use pleading_core::{AdapterError, DriveAdapter, DriveEntry};
use tracing::debug;

/// Serves a local directory as the drive; drive paths are rooted at `/`.
#[derive(Debug, Clone)]
pub struct LocalDriveAdapter {
    root: PathBuf,
}

struct Listed {
    name: String,
    is_dir: bool,
    size: u64,
    modified: DateTime<Utc>,
}

impl LocalDriveAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a drive path onto the local root, refusing to leave it.
    fn resolve(&self, drive_path: &str) -> Result<PathBuf, AdapterError> {
        let relative = Path::new(drive_path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return Err(AdapterError::FolderNotFound(drive_path.to_string())),
            }
        }
        Ok(resolved)
    }

    /// Sorted listing of `dir`, hidden entries included so indices stay stable.
    async fn list(&self, dir: &Path, shown_as: &str) -> Result<Vec<Listed>, AdapterError> {
        match tokio::fs::metadata(dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(AdapterError::FolderNotFound(shown_as.to_string())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(AdapterError::FolderNotFound(shown_as.to_string()))
            }
            Err(err) => return Err(AdapterError::read(shown_as, err)),
        }

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|err| AdapterError::read(shown_as, err))?;
        let mut listed = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| AdapterError::read(shown_as, err))?
        {
            let Ok(meta) = entry.metadata().await else {
                continue;
            };
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            listed.push(Listed {
                name,
                is_dir: meta.is_dir(),
                size: if meta.is_dir() { 0 } else { meta.len() },
                modified: meta.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now()),
            });
        }
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listed)
    }

    async fn folders(
        &self,
        drive_path: &str,
        id_prefix: &str,
    ) -> Result<Vec<DriveEntry>, AdapterError> {
        let dir = self.resolve(drive_path)?;
        let listed = self.list(&dir, drive_path).await?;
        let parent = drive_path.trim_end_matches('/');

        let folders: Vec<DriveEntry> = listed
            .into_iter()
            .enumerate()
            .filter(|(_, item)| item.is_dir && !item.name.starts_with('.'))
            .map(|(i, item)| DriveEntry {
                id: format!("{}_{}", id_prefix, i),
                path: format!("{}/{}", parent, item.name),
                name: item.name,
                size: 0,
                modified: item.modified,
                kind: String::new(),
                is_directory: true,
            })
            .collect();
        debug!(folder = %drive_path, count = folders.len(), "Listed drive folders");
        Ok(folders)
    }
}

#[async_trait]
impl DriveAdapter for LocalDriveAdapter {
    async fn list_root_folders(&self) -> Result<Vec<DriveEntry>, AdapterError> {
        if tokio::fs::metadata(&self.root).await.is_err() {
            return Err(AdapterError::Unavailable(format!(
                "drive root {} is not available",
                self.root.display()
            )));
        }
        self.folders("/", "icloud_folder").await
    }

    async fn list_subfolders(&self, parent: &str) -> Result<Vec<DriveEntry>, AdapterError> {
        self.folders(parent, "icloud_subfolder").await
    }

    async fn list_documents(&self, folder: &str) -> Result<Vec<DriveEntry>, AdapterError> {
        let dir = self.resolve(folder)?;
        let listed = self.list(&dir, folder).await?;
        let parent = folder.trim_end_matches('/');

        let documents: Vec<DriveEntry> = listed
            .into_iter()
            .enumerate()
            .filter(|(_, item)| !item.is_dir && !item.name.starts_with('.'))
            .map(|(i, item)| DriveEntry {
                id: format!("icloud_doc_{}", i),
                path: format!("{}/{}", parent, item.name),
                kind: kind_for_name(&item.name),
                name: item.name,
                size: item.size,
                modified: item.modified,
                is_directory: false,
            })
            .collect();
        debug!(folder = %folder, count = documents.len(), "Listed drive documents");
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn drive() -> (TempDir, LocalDriveAdapter) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        tokio::fs::create_dir_all(root.join("Cases/Smith")).await.unwrap();
        tokio::fs::create_dir_all(root.join("Cases/Jones")).await.unwrap();
        tokio::fs::create_dir_all(root.join(".Trash")).await.unwrap();
        tokio::fs::write(root.join("Cases/Smith/Attorney_Notes.txt"), "notes").await.unwrap();
        tokio::fs::write(root.join("Cases/Smith/Denial.PDF"), "pdf").await.unwrap();
        tokio::fs::write(root.join("Cases/Smith/.DS_Store"), "").await.unwrap();
        let adapter = LocalDriveAdapter::new(root);
        (dir, adapter)
    }

    #[tokio::test]
    async fn root_skips_hidden_folders() {
        let (_dir, drive) = drive().await;
        let folders = drive.list_root_folders().await.unwrap();
        let paths: Vec<&str> = folders.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["/Cases"]);
        assert!(folders[0].id.starts_with("icloud_folder_"));
    }

    #[tokio::test]
    async fn subfolders_are_joined_to_parent() {
        let (_dir, drive) = drive().await;
        let folders = drive.list_subfolders("/Cases").await.unwrap();
        let paths: Vec<&str> = folders.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["/Cases/Jones", "/Cases/Smith"]);
    }

    #[tokio::test]
    async fn documents_are_typed_by_extension() {
        let (_dir, drive) = drive().await;
        let docs = drive.list_documents("/Cases/Smith").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].name, "Attorney_Notes.txt");
        assert_eq!(docs[0].kind, "txt");
        assert_eq!(docs[0].size, 5);
        assert_eq!(docs[1].kind, "pdf");
        assert_eq!(docs[1].path, "/Cases/Smith/Denial.PDF");
    }

    #[tokio::test]
    async fn missing_folder_is_reported() {
        let (_dir, drive) = drive().await;
        let err = drive.list_documents("/Cases/Nobody").await.unwrap_err();
        assert_eq!(err, AdapterError::FolderNotFound("/Cases/Nobody".into()));
    }

    #[tokio::test]
    async fn parent_components_are_rejected() {
        let (_dir, drive) = drive().await;
        let err = drive.list_subfolders("/../etc").await.unwrap_err();
        assert!(matches!(err, AdapterError::FolderNotFound(_)));
    }

    #[tokio::test]
    async fn absent_root_is_unavailable() {
        let drive = LocalDriveAdapter::new("/definitely/not/here");
        let err = drive.list_root_folders().await.unwrap_err();
        assert!(matches!(err, AdapterError::Unavailable(_)));
    }
}
