use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use models::{Interaction, NewInteraction, Student};
use serde::Serialize;
use tracing::info;

use crate::{errors::ApiError, state::AppState};

/// Created record echoed back with a confirmation message.
#[derive(Debug, Serialize)]
pub struct CreatedInteraction {
    pub message: &'static str,
    #[serde(flatten)]
    pub interaction: Interaction,
}

#[utoipa::path(
    get, path = "/api/students", tag = "students",
    responses(
        (status = 200, description = "All students, without progress"),
        (status = 500, description = "Could not retrieve students")
    )
)]
pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    let students = state
        .directory
        .list_students()
        .await
        .map_err(|e| ApiError::from_service(e, "Could not retrieve students"))?;
    info!(count = students.len(), "list students");
    Ok(Json(students))
}

#[utoipa::path(
    get, path = "/api/students/{id}", tag = "students",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student profile including progress"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Could not retrieve profile")
    )
)]
pub async fn get_student(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Student>, ApiError> {
    let student = state
        .directory
        .get_student(&id)
        .await
        .map_err(|e| ApiError::from_service(e, "Could not retrieve profile"))?;
    Ok(Json(student))
}

#[utoipa::path(
    get, path = "/api/students/{id}/interactions", tag = "timeline",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Interactions, newest first"),
        (status = 500, description = "Could not retrieve interactions")
    )
)]
pub async fn list_interactions(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<Interaction>>, ApiError> {
    let items = state
        .timeline
        .list_interactions(&student_id)
        .await
        .map_err(|e| ApiError::from_service(e, "Could not retrieve interactions"))?;
    info!(%student_id, count = items.len(), "list interactions");
    Ok(Json(items))
}

#[utoipa::path(
    post, path = "/api/students/{id}/interactions", tag = "timeline",
    params(("id" = String, Path, description = "Student ID")),
    request_body = crate::openapi::NewInteractionDoc,
    responses(
        (status = 201, description = "Interaction logged"),
        (status = 400, description = "Missing required 'details' field"),
        (status = 500, description = "Could not log interaction")
    )
)]
pub async fn add_interaction(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    payload: Result<Json<NewInteraction>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedInteraction>), ApiError> {
    let Json(input) = payload?;
    let interaction = state
        .timeline
        .add_interaction(&student_id, input)
        .await
        .map_err(|e| ApiError::from_service(e, "Could not log interaction"))?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedInteraction { message: "Interaction logged successfully", interaction }),
    ))
}
