//! File upload and download endpoints

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::Multipart;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

use super::{AuthenticatedUser, MessageResponse};

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    /// Stored file names, usable with the download endpoint
    pub files: Vec<String>,
}

/// Upload one or more files (multipart field `files`)
#[utoipa::path(
    post,
    path = "/files/upload",
    tag = "files",
    security(("bearer_auth" = [])),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Repeated `files` parts"),
    responses(
        (status = 200, description = "Files stored", body = UploadResponse),
        (status = 400, description = "Invalid file name, oversized file or no files")
    )
)]
pub async fn upload(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut stored = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("File part without a file name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read {}: {}", name, e)))?;
        stored.push(state.services.files.store(&name, &bytes).await?);
    }

    if stored.is_empty() {
        return Err(AppError::BadRequest("No files uploaded".to_string()));
    }
    Ok(Json(UploadResponse { files: stored }))
}

/// Download a stored file as an attachment
#[utoipa::path(
    get,
    path = "/files/download/{name}",
    tag = "files",
    params(("name" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "File contents"),
        (status = 404, description = "File not found")
    )
)]
pub async fn download(
    State(state): State<crate::AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let (bytes, content_type) = state.services.files.read(&name).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        crate::services::files::sanitize_file_name(&name)?
    );
    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// Delete a stored file
#[utoipa::path(
    delete,
    path = "/files/{name}",
    tag = "files",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 404, description = "File not found")
    )
)]
pub async fn delete_file(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(name): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.files.delete(&name).await?;
    Ok(Json(MessageResponse::new(format!("File {} deleted", name))))
}
