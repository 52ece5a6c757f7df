use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::{errors::ApiError, openapi::ApiDoc, state::AppState};

pub mod notes;
pub mod students;

#[utoipa::path(
    get, path = "/", tag = "health",
    responses(
        (status = 200, description = "API running; reports whether the student collection has data", body = crate::openapi::HealthResponse),
        (status = 500, description = "Document store unreachable")
    )
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<Health>, ApiError> {
    match state.directory.has_students().await {
        Ok(true) => Ok(Json(Health::ok("Undergraduation Dashboard API Running", "Storage Connection OK"))),
        Ok(false) => Ok(Json(Health::empty("API Running, but Students collection is Empty"))),
        Err(e) => {
            error!(event = "storage_unreachable", error = %e, "health check failed");
            Err(ApiError::Internal("Failed to connect to document store".into()))
        }
    }
}

/// Build the full application router: health, directory, timeline and API docs.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/", get(health))
        .route("/api/students", get(students::list_students))
        .route("/api/students/:id", get(students::get_student))
        .route(
            "/api/students/:id/interactions",
            get(students::list_interactions).post(students::add_interaction),
        )
        .route("/api/notes/:id", put(notes::update_note).delete(notes::delete_note));

    let docs = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    api.merge(docs)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
