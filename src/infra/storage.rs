use anyhow::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem-backed store for uploaded post images. Files are written
/// under a single root directory and addressed by key; the HTTP layer
/// serves them back under /media/.
#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub async fn new(root: &str) -> Result<Self> {
        tokio::fs::create_dir_all(root).await?;
        Ok(Self {
            root: PathBuf::from(root),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an uploaded file and return its store key. The key is a
    /// fresh uuid; the extension is taken from the client filename but
    /// restricted to short ascii-alphanumeric suffixes.
    pub async fn store(&self, original_name: &str, data: &[u8]) -> Result<String> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin");

        let key = format!("{}.{}", Uuid::new_v4(), ext.to_ascii_lowercase());
        tokio::fs::write(self.root.join(&key), data).await?;
        Ok(key)
    }

    /// Public URL for a stored key, as returned in post responses.
    pub fn public_url(&self, key: &str) -> String {
        format!("/media/{}", key)
    }
}
