//! Image uploads: validation and derived storage names.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{ALLOWED_IMAGE_TYPES, IMAGE_FIELD_NAME, MAX_IMAGE_BYTES};
use crate::errors::{AppError, AppResult};

/// Extensions accepted verbatim from the client file name
const KNOWN_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "jfif"];

/// A file received from a multipart form, held in memory
#[derive(Clone)]
pub struct ImageUpload {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("original_name", &self.original_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    pub fn new(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Check the MIME allow-list and the size ceiling
    pub fn validate(&self) -> AppResult<()> {
        let content_type = self.content_type.to_ascii_lowercase();
        if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::validation(
                IMAGE_FIELD_NAME,
                format!(
                    "File {} has unsupported type {}",
                    self.original_name, self.content_type
                ),
            ));
        }

        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::validation(
                IMAGE_FIELD_NAME,
                format!(
                    "File {} exceeds the maximum size of {} bytes",
                    self.original_name, MAX_IMAGE_BYTES
                ),
            ));
        }

        Ok(())
    }

    /// Extension for the stored file: taken from the original name when
    /// recognised, otherwise from the MIME subtype.
    pub fn extension(&self) -> String {
        let from_name = self
            .original_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| KNOWN_EXTENSIONS.contains(&ext.as_str()));

        from_name.unwrap_or_else(|| {
            match self.content_type.to_ascii_lowercase().as_str() {
                "image/png" => "png",
                "image/jfif" => "jfif",
                _ => "jpg",
            }
            .to_string()
        })
    }

    /// Deterministic stored name: `hex(sha256(pet_id ++ original_name)).ext`
    pub fn stored_name(&self, pet_id: Uuid) -> String {
        let mut hasher = Sha256::new();
        hasher.update(pet_id.to_string().as_bytes());
        hasher.update(self.original_name.as_bytes());
        format!("{}.{}", hex::encode(hasher.finalize()), self.extension())
    }
}

/// Validate every upload before anything is persisted
pub fn validate_all(uploads: &[ImageUpload]) -> AppResult<()> {
    uploads.iter().try_for_each(ImageUpload::validate)
}
