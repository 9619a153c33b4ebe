use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use futures::TryStreamExt;

use crate::domain::DomainError;
use crate::services::{SubmittedForm, UploadStore};

/// Split a multipart body into scalar fields and at most one stored image.
///
/// A part carrying a non-empty filename is a file part; the first one is
/// streamed into `uploads`, later ones are skipped. If reading fails after
/// the image was stored, the image is removed again.
pub async fn read_contact_form(
    mut multipart: Multipart,
    uploads: &UploadStore,
) -> Result<SubmittedForm, DomainError> {
    let mut form = SubmittedForm::default();

    let result = read_parts(&mut multipart, uploads, &mut form).await;

    if let Err(e) = result {
        if let Some(path) = form.image.take() {
            uploads.discard(&path).await;
        }
        return Err(e);
    }

    Ok(form)
}

async fn read_parts(
    multipart: &mut Multipart,
    uploads: &UploadStore,
    form: &mut SubmittedForm,
) -> Result<(), DomainError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match field.file_name().map(str::to_string) {
            Some(original) if !original.trim().is_empty() => {
                if form.image.is_some() {
                    tracing::warn!("Ignoring extra file part '{}' ({})", name, original);
                    continue;
                }
                let chunks = field.map_err(multipart_error);
                form.image = Some(uploads.store(&original, chunks).await?);
            }
            // Browsers send an empty file part when nothing was selected
            Some(_) => tracing::debug!("Skipping empty file part '{}'", name),
            None => {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(())
}

/// Keep the client/server split axum reports for a broken multipart body
fn multipart_error(e: MultipartError) -> DomainError {
    let status = e.status();
    let detail = e.body_text();

    if status == StatusCode::PAYLOAD_TOO_LARGE {
        DomainError::PayloadTooLarge(detail)
    } else if status.is_client_error() {
        DomainError::Validation(format!("Malformed multipart data: {}", detail))
    } else {
        DomainError::Upload(format!("Failed to read multipart data: {}", detail))
    }
}
