//! Media upload handlers.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::MEDIA_URL_PREFIX;
use crate::storage::MediaStore;

/// Upper bound on an uploaded attachment.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    /// Media key to reference from a post submission.
    pub key: String,
    /// Public URL path the attachment is served from.
    pub url: String,
}

/// POST /media/images
///
/// Accepts one multipart `image` field, verifies the payload sniffs as an
/// image and stores it under the posts prefix. The returned key is what a
/// post create/edit submission references.
pub async fn upload_image(
    store: web::Data<MediaStore>,
    user: UserId,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut bytes: Vec<u8> = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        if field.name() != Some("image") {
            continue;
        }

        while let Some(chunk) = field.next().await {
            let data =
                chunk.map_err(|e| AppError::BadRequest(format!("Upload read error: {}", e)))?;
            if bytes.len() + data.len() > MAX_IMAGE_BYTES {
                return Err(AppError::BadRequest("Image too large".to_string()));
            }
            bytes.extend_from_slice(&data);
        }
    }

    if bytes.is_empty() {
        return Err(AppError::BadRequest("No image provided".to_string()));
    }

    let key = store.store_post_image(&bytes).await?;
    tracing::info!(user_id = %user.0, %key, size = bytes.len(), "attachment stored");

    Ok(HttpResponse::Created().json(UploadImageResponse {
        url: format!("{}/{}", MEDIA_URL_PREFIX, key),
        key,
    }))
}
