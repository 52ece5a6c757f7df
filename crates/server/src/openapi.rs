use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub message: String, pub status: Option<String> }

#[derive(ToSchema)]
pub struct NewInteractionDoc {
    #[schema(rename = "type", example = "Note")]
    pub kind: Option<String>,
    #[schema(example = "Internal")]
    pub subtype: Option<String>,
    #[schema(example = "called parent")]
    pub details: String,
    #[schema(example = "API User")]
    pub team_member: Option<String>,
    /// Epoch milliseconds; the server time is used when omitted.
    pub timestamp: Option<i64>,
}

#[derive(ToSchema)]
pub struct NoteUpdateDoc {
    pub details: String,
    pub team_member: Option<String>,
}

#[derive(ToSchema)]
pub struct MessageResponseDoc { pub id: String, pub message: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::students::list_students,
        crate::routes::students::get_student,
        crate::routes::students::list_interactions,
        crate::routes::students::add_interaction,
        crate::routes::notes::update_note,
        crate::routes::notes::delete_note,
    ),
    components(
        schemas(
            HealthResponse,
            NewInteractionDoc,
            NoteUpdateDoc,
            MessageResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "students"),
        (name = "timeline")
    )
)]
pub struct ApiDoc;
