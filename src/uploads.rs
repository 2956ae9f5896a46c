//! Document upload store
//!
//! Users can upload supporting documents (statements, plans) alongside
//! their chat queries. The store keeps them on disk and contributes an
//! "available documents" context line to queries so backend agents know
//! what can be analyzed. Document parsing itself belongs to the agents.

use crate::error::RouterError;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "doc", "docx"];

pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Open the store, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        debug!(dir = %dir.display(), "Upload store ready");
        Ok(Self { dir })
    }

    /// Persist one uploaded file. Returns the sanitized filename actually
    /// stored.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let filename = sanitize_filename(filename)?;

        if !is_allowed(&filename) {
            return Err(RouterError::UploadError(format!(
                "File type not allowed: {} (allowed: {})",
                filename,
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        let path = self.dir.join(&filename);
        tokio::fs::write(&path, bytes).await?;

        info!(file = %filename, size = bytes.len(), "Stored uploaded document");
        Ok(filename)
    }

    /// Names of all stored documents, sorted.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Append uploaded-document context to a query when documents exist.
    pub async fn enhance_query(&self, query: &str) -> Result<String> {
        let files = self.list().await?;

        if files.is_empty() {
            return Ok(query.to_string());
        }

        Ok(format!(
            "{}\n\nAvailable uploaded documents: {}. Please analyze these documents \
             if they're relevant to the user's question.",
            query,
            files.join(", ")
        ))
    }
}

fn is_allowed(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Strip any path components so an uploaded name can never escape the
/// store directory.
fn sanitize_filename(filename: &str) -> Result<String> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .unwrap_or_default();

    if name.is_empty() || name.starts_with('.') {
        return Err(RouterError::UploadError(format!(
            "Invalid filename: {}",
            filename
        )));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_and_list() {
        let dir = tempdir().unwrap();
        let store = UploadStore::open(dir.path()).await.unwrap();

        store.save("statement.pdf", b"pdf bytes").await.unwrap();
        store.save("notes.txt", b"some notes").await.unwrap();

        let files = store.list().await.unwrap();
        assert_eq!(files, vec!["notes.txt", "statement.pdf"]);
    }

    #[tokio::test]
    async fn test_disallowed_extension_rejected() {
        let dir = tempdir().unwrap();
        let store = UploadStore::open(dir.path()).await.unwrap();

        let result = store.save("script.exe", b"nope").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_path_components_are_stripped() {
        let dir = tempdir().unwrap();
        let store = UploadStore::open(dir.path()).await.unwrap();

        let stored = store.save("../../etc/plan.txt", b"content").await.unwrap();
        assert_eq!(stored, "plan.txt");

        let files = store.list().await.unwrap();
        assert_eq!(files, vec!["plan.txt"]);
    }

    #[tokio::test]
    async fn test_enhance_query_with_and_without_documents() {
        let dir = tempdir().unwrap();
        let store = UploadStore::open(dir.path()).await.unwrap();

        let plain = store.enhance_query("How should I invest?").await.unwrap();
        assert_eq!(plain, "How should I invest?");

        store.save("portfolio.txt", b"AAPL 40%").await.unwrap();
        let enhanced = store.enhance_query("How should I invest?").await.unwrap();
        assert!(enhanced.starts_with("How should I invest?"));
        assert!(enhanced.contains("Available uploaded documents: portfolio.txt"));
    }
}
