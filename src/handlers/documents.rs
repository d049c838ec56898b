// ABOUTME: Case document endpoints: multipart upload, metadata-only invoices and deletion
// ABOUTME: The request Content-Type picks the creation mode; uploads are buffered then forwarded

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{StatusCode, header},
    response::Json,
};
use uuid::Uuid;

use crate::AppState;
use crate::auth_helpers::CurrentUser;
use crate::entities::case_document::DocumentKind;
use crate::error::{AppError, Result};
use crate::extract::{JsonBody, PathId};
use crate::storage::NewDocument;
use crate::types::{DocumentMetadata, DocumentResponse, MessageResponse};
use crate::uploads;

const UPLOAD_FIELD: &str = "file";
const DEFAULT_FILE_NAME: &str = "document";

/// Keeps only the basename and a conservative character set.
fn safe_file_name(raw: &str) -> String {
    let cleaned: String = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ' | '(' | ')'))
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        DEFAULT_FILE_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

pub async fn create_document(
    State(state): State<AppState>,
    user: CurrentUser,
    PathId(case_id): PathId<Uuid>,
    request: Request,
) -> Result<Json<DocumentResponse>> {
    let case = state.storage.find_owned_case(user.id, case_id).await?;

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let document = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        receive_upload(&state, multipart).await?
    } else if content_type.starts_with("application/json") {
        let JsonBody(meta) = JsonBody::<DocumentMetadata>::from_request(request, &state).await?;
        if meta.kind == DocumentKind::Upload {
            return Err(AppError::Validation(
                "Uploaded documents must be sent as multipart/form-data".to_string(),
            ));
        }
        NewDocument {
            name: meta.name,
            kind: meta.kind,
            size: meta.size,
            url: None,
            public_id: None,
        }
    } else {
        return Err(AppError::UnsupportedMediaType(
            "Expected multipart/form-data or application/json".to_string(),
        ));
    };

    let document = state
        .storage
        .record_document(case.id, document, user.display_name())
        .await?;
    Ok(Json(document.into()))
}

/// Reads the `file` field into memory and hands it to object storage.
async fn receive_upload(state: &AppState, mut multipart: Multipart) -> Result<NewDocument> {
    let limit = state.settings.max_upload_bytes;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = safe_file_name(field.file_name().unwrap_or(DEFAULT_FILE_NAME));
        let data = field.bytes().await.map_err(multipart_error)?;

        if data.len() > limit {
            return Err(AppError::PayloadTooLarge(format!(
                "File '{}' exceeds the {} byte upload limit",
                file_name, limit
            )));
        }

        tracing::debug!(%file_name, bytes = data.len(), "Forwarding upload");
        return uploads::intake_upload(
            state.objects.as_ref(),
            &state.settings.upload_folder,
            &file_name,
            data,
        )
        .await;
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("Multipart read error: {}", err.body_text()))
    }
}

pub async fn delete_document(
    State(state): State<AppState>,
    user: CurrentUser,
    PathId(document_id): PathId<Uuid>,
) -> Result<Json<MessageResponse>> {
    state.storage.delete_document(user.id, document_id).await?;
    Ok(Json(MessageResponse::new("Deleted successfully")))
}
