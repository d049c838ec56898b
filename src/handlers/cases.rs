// ABOUTME: Case and case-note endpoints scoped to the caller
// ABOUTME: Case detail bundles notes and documents; notes are attributed to the caller's display name

use axum::{extract::State, response::Json};
use uuid::Uuid;

use crate::AppState;
use crate::auth_helpers::CurrentUser;
use crate::error::Result;
use crate::extract::{JsonBody, PathId};
use crate::types::{CaseDetail, CasePatch, CaseSummary, NewCase, NewNoteRequest, NoteResponse};

pub async fn list_cases(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<CaseSummary>>> {
    let cases = state.storage.list_cases(user.id).await?;
    Ok(Json(cases.into_iter().map(CaseSummary::from).collect()))
}

pub async fn get_case(
    State(state): State<AppState>,
    user: CurrentUser,
    PathId(case_id): PathId<Uuid>,
) -> Result<Json<CaseDetail>> {
    let (case, notes, documents) = state.storage.get_case_detail(user.id, case_id).await?;

    Ok(Json(CaseDetail {
        case: case.into(),
        notes: notes.into_iter().map(Into::into).collect(),
        documents: documents.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_case(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(req): JsonBody<NewCase>,
) -> Result<Json<CaseSummary>> {
    let case = state.storage.create_case(user.id, req).await?;
    Ok(Json(case.into()))
}

pub async fn update_case(
    State(state): State<AppState>,
    user: CurrentUser,
    PathId(case_id): PathId<Uuid>,
    JsonBody(patch): JsonBody<CasePatch>,
) -> Result<Json<CaseSummary>> {
    let case = state.storage.update_case(user.id, case_id, patch).await?;
    Ok(Json(case.into()))
}

pub async fn add_note(
    State(state): State<AppState>,
    user: CurrentUser,
    PathId(case_id): PathId<Uuid>,
    JsonBody(req): JsonBody<NewNoteRequest>,
) -> Result<Json<NoteResponse>> {
    let note = state
        .storage
        .add_note(user.id, case_id, &req.content, user.display_name())
        .await?;
    Ok(Json(note.into()))
}
