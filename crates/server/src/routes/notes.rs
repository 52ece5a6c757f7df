use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use common::types::MessageResponse;
use models::NoteUpdate;

use crate::{errors::ApiError, state::AppState};

#[utoipa::path(
    put, path = "/api/notes/{id}", tag = "timeline",
    params(("id" = String, Path, description = "Interaction ID")),
    request_body = crate::openapi::NoteUpdateDoc,
    responses(
        (status = 200, description = "Note updated", body = crate::openapi::MessageResponseDoc),
        (status = 400, description = "Missing required 'details' field"),
        (status = 500, description = "Could not update note")
    )
)]
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NoteUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(input) = payload?;
    state
        .timeline
        .update_interaction(&id, input)
        .await
        .map_err(|e| ApiError::from_service(e, "Could not update note"))?;
    Ok(Json(MessageResponse::new(id, "Note updated successfully")))
}

#[utoipa::path(
    delete, path = "/api/notes/{id}", tag = "timeline",
    params(("id" = String, Path, description = "Interaction ID")),
    responses(
        (status = 200, description = "Note deleted (also when it did not exist)", body = crate::openapi::MessageResponseDoc),
        (status = 500, description = "Could not delete note")
    )
)]
pub async fn delete_note(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<MessageResponse>, ApiError> {
    state
        .timeline
        .delete_interaction(&id)
        .await
        .map_err(|e| ApiError::from_service(e, "Could not delete note"))?;
    Ok(Json(MessageResponse::new(id, "Note deleted successfully")))
}
