use crate::config::PhotogramPaths;
use crate::error::{DomainError, DomainResult};
use anyhow::Context;
use rand::Rng;
use std::path::Path;
use tokio::fs;

/// Validates and stores uploaded image bytes under the uploads directory,
/// returning a locator usable to serve the blob statically.
#[derive(Clone)]
pub struct FileService {
    paths: PhotogramPaths,
    max_upload_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct UploadInput {
    pub original_name: Option<String>,
    pub declared_mime: Option<String>,
    pub declared_size: Option<u64>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub locator: String,
    pub size_bytes: u64,
}

impl FileService {
    pub fn new(paths: PhotogramPaths, max_upload_bytes: u64) -> Self {
        Self {
            paths,
            max_upload_bytes,
        }
    }

    pub async fn accept(&self, input: UploadInput) -> DomainResult<StoredBlob> {
        let mime = input.declared_mime.as_deref().unwrap_or("");
        if !mime.starts_with("image/") {
            return Err(DomainError::UnsupportedMediaType);
        }
        if input.data.is_empty() {
            return Err(DomainError::Validation("No image file provided".into()));
        }
        // The declared size is a hint only; the actual byte count is what
        // the ceiling applies to.
        if input.declared_size.unwrap_or(0) > self.max_upload_bytes
            || input.data.len() as u64 > self.max_upload_bytes
        {
            return Err(DomainError::PayloadTooLarge);
        }

        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: u32 = rand::rng().random();
        let original = input
            .original_name
            .as_deref()
            .map(sanitize_filename)
            .unwrap_or_else(|| "upload".into());
        let stored_name = format!("{millis}-{suffix}-{original}");

        fs::create_dir_all(&self.paths.uploads_dir)
            .await
            .with_context(|| {
                format!(
                    "failed to create upload directory {}",
                    self.paths.uploads_dir.display()
                )
            })?;
        let absolute_path = self.paths.uploads_dir.join(&stored_name);
        fs::write(&absolute_path, &input.data)
            .await
            .with_context(|| {
                format!(
                    "failed to write uploaded file to {}",
                    absolute_path.display()
                )
            })?;

        Ok(StoredBlob {
            locator: format!("/uploads/{stored_name}"),
            size_bytes: input.data.len() as u64,
        })
    }
}

fn sanitize_filename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|file| file.to_str())
        .unwrap_or("upload")
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}
