//! Product image upload and download.

use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, Request, State, multipart::MultipartRejection},
    http::StatusCode,
    response::Response,
};
use serde::Serialize;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::Result;
use crate::services::files::{FileError, image_extension};
use crate::state::AppState;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// Upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub secure_url: String,
}

/// Store an uploaded product image and return its public URL.
pub async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let extension = image_extension(field.content_type(), field.file_name())
            .ok_or(FileError::NotAnImage)?;
        let bytes = field.bytes().await?;

        let name = state.files().save(&extension, &bytes).await?;
        let secure_url = state.files().secure_url(&name);
        return Ok((StatusCode::CREATED, Json(UploadResponse { secure_url })));
    }

    Err(FileError::NotAnImage.into())
}

/// Stream a stored product image.
pub async fn download(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request,
) -> Result<Response> {
    let path = state.files().locate(&name).await?;

    let response = ServeFile::new(path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});

    Ok(response.map(Body::new))
}
