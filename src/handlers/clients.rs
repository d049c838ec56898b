// ABOUTME: Client endpoints: list, create, patch and delete under the caller's ownership
// ABOUTME: Update and delete accept the client id from the JSON body or the `id` query parameter

use axum::{extract::State, response::Json};

use crate::AppState;
use crate::auth_helpers::CurrentUser;
use crate::error::{AppError, Result};
use crate::extract::{JsonBody, QueryParams};
use crate::types::{ClientResponse, IdParam, MessageResponse, NewClient, UpdateClientRequest};

pub async fn list_clients(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<ClientResponse>>> {
    let clients = state.storage.list_clients(user.id).await?;
    Ok(Json(clients.into_iter().map(ClientResponse::from).collect()))
}

pub async fn create_client(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(req): JsonBody<NewClient>,
) -> Result<Json<ClientResponse>> {
    let client = state.storage.create_client(user.id, req).await?;
    Ok(Json(client.into()))
}

pub async fn update_client(
    State(state): State<AppState>,
    user: CurrentUser,
    QueryParams(query): QueryParams<IdParam>,
    JsonBody(req): JsonBody<UpdateClientRequest>,
) -> Result<Json<ClientResponse>> {
    let client_id = req
        .id
        .or(query.id)
        .ok_or_else(|| AppError::Validation("ID required".to_string()))?;

    let client = state
        .storage
        .update_client(user.id, client_id, req.patch)
        .await?;
    Ok(Json(client.into()))
}

/// Succeeds whether or not a matching client existed.
pub async fn delete_client(
    State(state): State<AppState>,
    user: CurrentUser,
    QueryParams(query): QueryParams<IdParam>,
    body: Option<JsonBody<IdParam>>,
) -> Result<Json<MessageResponse>> {
    let client_id = query
        .id
        .or_else(|| body.and_then(|JsonBody(param)| param.id))
        .ok_or_else(|| AppError::Validation("ID required".to_string()))?;

    state.storage.delete_client(user.id, client_id).await?;
    Ok(Json(MessageResponse::new("Deleted successfully")))
}
