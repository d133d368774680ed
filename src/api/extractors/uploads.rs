//! Multipart extractors for pet forms and image files.

use axum::{
    async_trait,
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
};

use crate::config::IMAGE_FIELD_NAME;
use crate::domain::ImageUpload;
use crate::errors::AppError;
use crate::schemas::PetForm;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Text fields and files of a multipart pet request.
///
/// Fields named `images`, or carrying a file name, are collected as uploads;
/// every other field is treated as a form value.
pub struct PetMultipart {
    pub form: PetForm,
    pub images: Vec<ImageUpload>,
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::bad_request(e.body_text())
}

#[async_trait]
impl<S> FromRequest<S> for PetMultipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        let mut form = PetForm::default();
        let mut images = Vec::new();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == IMAGE_FIELD_NAME || field.file_name().is_some() {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;

                // Browsers send an empty part when no file was picked
                if original_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                images.push(ImageUpload::new(original_name, content_type, bytes.to_vec()));
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.set(&name, value);
            }
        }

        tracing::debug!(files = images.len(), "Multipart pet request parsed");
        Ok(PetMultipart { form, images })
    }
}
