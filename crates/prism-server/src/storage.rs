//! File-backed metadata and image store
//!
//! Metadata documents live in `{metadata_dir}/{uuid}.json`, uploaded images
//! in `{metadata_dir}/assets/{uuid}.{ext}`. Both are served back by name.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct MetadataStore {
    metadata_dir: PathBuf,
    assets_dir: PathBuf,
    public_base_url: String,
}

impl MetadataStore {
    pub fn new(metadata_dir: impl AsRef<Path>, public_base_url: &str) -> Self {
        let metadata_dir = metadata_dir.as_ref().to_path_buf();
        Self {
            assets_dir: metadata_dir.join("assets"),
            metadata_dir,
            public_base_url: public_base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Create the storage directories if missing
    pub async fn init(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.assets_dir).await?;
        tracing::debug!(dir = %self.metadata_dir.display(), "Metadata store ready");
        Ok(())
    }

    /// Persist a metadata object and return its public URI
    pub async fn save_metadata(&self, metadata: &Value) -> AppResult<String> {
        if !metadata.is_object() {
            return Err(AppError::InvalidParam("Missing metadata payload".to_string()));
        }
        if self.public_base_url.is_empty() {
            return Err(AppError::Config("storage.public_base_url is not configured".to_string()));
        }

        let file_name = format!("{}.json", Uuid::new_v4());
        let body = serde_json::to_vec_pretty(metadata)
            .map_err(|e| AppError::Internal(format!("Failed to encode metadata: {e}")))?;
        tokio::fs::write(self.metadata_dir.join(&file_name), body).await?;

        tracing::info!(file = %file_name, "Stored metadata document");
        Ok(format!("{}/metadata/{}", self.public_base_url, file_name))
    }

    /// Persist a base64 image (raw or data URL) and return its public URL
    pub async fn save_image(&self, image: &str) -> AppResult<String> {
        let (extension, encoded) = split_data_url(image);
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AppError::InvalidParam(format!("Invalid base64 image: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::InvalidParam("Empty image".to_string()));
        }

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(self.assets_dir.join(&file_name), &bytes).await?;

        tracing::info!(file = %file_name, size = bytes.len(), "Stored image asset");
        Ok(format!("{}/assets/{}", self.public_base_url, file_name))
    }

    pub async fn read_metadata(&self, name: &str) -> AppResult<Value> {
        let file_name = metadata_file_name(name)
            .ok_or_else(|| AppError::NotFound("Metadata not found".to_string()))?;
        let raw = read_existing(&self.metadata_dir.join(file_name), "Metadata not found").await?;
        serde_json::from_slice(&raw)
            .map_err(|e| AppError::Storage(format!("Corrupt metadata file: {e}")))
    }

    /// Image bytes and their content type
    pub async fn read_asset(&self, name: &str) -> AppResult<(Vec<u8>, &'static str)> {
        let file_name =
            asset_file_name(name).ok_or_else(|| AppError::NotFound("Asset not found".to_string()))?;
        let bytes = read_existing(&self.assets_dir.join(&file_name), "Asset not found").await?;
        Ok((bytes, content_type(&file_name)))
    }
}

async fn read_existing(path: &Path, missing: &str) -> AppResult<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(missing.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Trimmed name, rejecting anything that could leave the directory
pub fn asset_file_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains("..") || trimmed.contains('/') || trimmed.contains('\\') {
        return None;
    }
    Some(trimmed.to_string())
}

pub fn metadata_file_name(raw: &str) -> Option<String> {
    let name = asset_file_name(raw)?;
    if name.ends_with(".json") {
        Some(name)
    } else {
        Some(format!("{name}.json"))
    }
}

pub fn content_type(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

/// `data:image/webp;base64,AAAA` -> ("webp", "AAAA"); bare base64 is png
fn split_data_url(image: &str) -> (&'static str, &str) {
    let Some(rest) = image.trim().strip_prefix("data:") else {
        return ("png", image);
    };
    let Some((header, data)) = rest.split_once(',') else {
        return ("png", image);
    };

    let extension = match header.split(';').next().unwrap_or_default() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    };
    (extension, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    async fn store() -> (TempDir, MetadataStore) {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path(), "https://meta.test/");
        store.init().await.unwrap();
        (dir, store)
    }

    #[test]
    fn test_file_name_rules() {
        assert_eq!(metadata_file_name(" abc "), Some("abc.json".to_string()));
        assert_eq!(metadata_file_name("abc.json"), Some("abc.json".to_string()));
        assert_eq!(metadata_file_name(""), None);
        assert_eq!(metadata_file_name("../secret"), None);
        assert_eq!(asset_file_name("a/b.png"), None);
        assert_eq!(asset_file_name("a\\b.png"), None);
        assert_eq!(asset_file_name("card.png"), Some("card.png".to_string()));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("x.png"), "image/png");
        assert_eq!(content_type("x.JPEG"), "image/jpeg");
        assert_eq!(content_type("x.webp"), "image/webp");
        assert_eq!(content_type("x.bin"), "application/octet-stream");
    }

    #[test]
    fn test_split_data_url() {
        assert_eq!(split_data_url("data:image/jpeg;base64,QUJD"), ("jpg", "QUJD"));
        assert_eq!(split_data_url("QUJD"), ("png", "QUJD"));
    }

    #[tokio::test]
    async fn test_metadata_round_trip() {
        let (_dir, store) = store().await;
        let uri = store.save_metadata(&json!({ "name": "Prism" })).await.unwrap();
        assert!(uri.starts_with("https://meta.test/metadata/"));
        assert!(uri.ends_with(".json"));

        let name = uri.rsplit('/').next().unwrap();
        let id = name.trim_end_matches(".json");
        assert_eq!(store.read_metadata(id).await.unwrap()["name"], "Prism");
        assert_eq!(store.read_metadata(name).await.unwrap()["name"], "Prism");
    }

    #[tokio::test]
    async fn test_metadata_must_be_object() {
        let (_dir, store) = store().await;
        let err = store.save_metadata(&json!("just a string")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidParam(_)));
    }

    #[tokio::test]
    async fn test_image_upload() {
        let (_dir, store) = store().await;
        let url = store.save_image("data:image/webp;base64,UklGRg==").await.unwrap();
        assert!(url.ends_with(".webp"));

        let name = url.rsplit('/').next().unwrap();
        let (bytes, mime) = store.read_asset(name).await.unwrap();
        assert_eq!(bytes, b"RIFF");
        assert_eq!(mime, "image/webp");

        let err = store.save_image("***").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidParam(_)));
    }

    #[tokio::test]
    async fn test_missing_files_are_not_found() {
        let (_dir, store) = store().await;
        assert!(matches!(
            store.read_metadata("nope").await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            store.read_asset("../etc/passwd").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
