use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use configs::StorageConfig;
use server::{routes, state::AppState};
use service::storage::{DocumentStore, JsonFileStore};

struct TestApp {
    base_url: String,
    store: Arc<dyn DocumentStore>,
    data_dir: std::path::PathBuf,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn add_student(&self, body: Value) -> String {
        let Value::Object(data) = body else { panic!("student body must be an object") };
        self.store.create("Students", data).await.expect("insert student")
    }

    async fn add_interaction_doc(&self, body: Value) -> String {
        let Value::Object(data) = body else { panic!("interaction body must be an object") };
        self.store.create("Interactions", data).await.expect("insert interaction")
    }

    /// Replace a collection file with something the store cannot parse.
    /// Collections load lazily, so call this before the first request.
    fn corrupt_collection(&self, collection: &str) {
        std::fs::write(self.data_dir.join(format!("{collection}.json")), b"{not json").expect("corrupt collection");
    }

    async fn interaction_count(&self) -> usize {
        self.store.list("Interactions").await.expect("list interactions").len()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    // isolated data directory per test
    let data_dir = std::env::temp_dir().join(format!("dashboard_api_test_{}", Uuid::new_v4()));
    let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::new(&data_dir).await?);
    let state = AppState::new(Arc::clone(&store), &StorageConfig::default());

    let app = routes::build_router(state, CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, store, data_dir })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn health_reports_empty_then_running() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.get(app.url("/")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "API Running, but Students collection is Empty");
    assert!(body.get("status").is_none());

    app.add_student(json!({"name": "Anya Sharma"})).await;
    let body = c.get(app.url("/")).send().await?.json::<Value>().await?;
    assert_eq!(body["message"], "Undergraduation Dashboard API Running");
    assert_eq!(body["status"], "Storage Connection OK");
    Ok(())
}

#[tokio::test]
async fn listing_students_never_includes_progress() -> anyhow::Result<()> {
    let app = start_server().await?;
    let a = app
        .add_student(json!({"name": "Anya Sharma", "app_status": "Applying", "progress": {"resume_uploaded": true, "activities_added_count": 5}}))
        .await;
    let b = app.add_student(json!({"name": "Ben Carter", "progress": {"resume_uploaded": false}})).await;

    let res = client().get(app.url("/api/students")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Vec<Value>>().await?;
    assert_eq!(body.len(), 2);
    for student in &body {
        assert!(student.get("progress").is_none(), "progress leaked: {student}");
    }
    let mut ids: Vec<&str> = body.iter().filter_map(|s| s["id"].as_str()).collect();
    ids.sort_unstable();
    let mut expected = vec![a.as_str(), b.as_str()];
    expected.sort_unstable();
    assert_eq!(ids, expected);
    Ok(())
}

#[tokio::test]
async fn fetching_a_student_includes_progress_and_missing_is_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let id = app
        .add_student(json!({"name": "David Lee", "progress": {"resume_uploaded": true, "activities_added_count": 9}}))
        .await;
    let c = client();

    let res = c.get(app.url(&format!("/api/students/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["name"], "David Lee");
    assert_eq!(body["progress"]["activities_added_count"], 9);

    let res = c.get(app.url("/api/students/does-not-exist")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Student not found");
    Ok(())
}

#[tokio::test]
async fn posting_only_details_applies_defaults() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = client()
        .post(app.url("/api/students/S1/interactions"))
        .json(&json!({"details": "called parent"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["student_id"], "S1");
    assert_eq!(body["type"], "Note");
    assert_eq!(body["subtype"], "Internal");
    assert_eq!(body["team_member"], "API User");
    assert_eq!(body["details"], "called parent");
    assert_eq!(body["message"], "Interaction logged successfully");
    assert!(body["timestamp"].as_i64().is_some());
    assert!(!body["id"].as_str().unwrap_or_default().is_empty());
    assert_eq!(app.interaction_count().await, 1);
    Ok(())
}

#[tokio::test]
async fn posting_without_details_is_rejected_and_creates_nothing() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .post(app.url("/api/students/S1/interactions"))
        .json(&json!({"type": "Note", "team_member": "Sarah J."}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Missing required 'details' field.");

    // not JSON at all
    let res = c
        .post(app.url("/api/students/S1/interactions"))
        .header("content-type", "application/json")
        .body("{oops")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    assert_eq!(app.interaction_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn timeline_is_newest_first_with_undated_last() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.add_interaction_doc(json!({"student_id": "S1", "details": "undated"})).await;
    app.add_interaction_doc(json!({"student_id": "S1", "details": "older", "timestamp": 1_000})).await;
    app.add_interaction_doc(json!({"student_id": "S2", "details": "someone else", "timestamp": 5_000})).await;
    let c = client();
    let res = c
        .post(app.url("/api/students/S1/interactions"))
        .json(&json!({"details": "newer", "timestamp": 2_000}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c.get(app.url("/api/students/S1/interactions")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Vec<Value>>().await?;
    let details: Vec<&str> = body.iter().filter_map(|i| i["details"].as_str()).collect();
    assert_eq!(details, ["newer", "older", "undated"]);
    Ok(())
}

#[tokio::test]
async fn editing_a_note() -> anyhow::Result<()> {
    let app = start_server().await?;
    let id = app
        .add_interaction_doc(json!({"student_id": "S1", "type": "Note", "subtype": "Internal", "details": "draft", "team_member": "Sarah J.", "timestamp": 10}))
        .await;
    let c = client();

    let res = c.put(app.url(&format!("/api/notes/{id}"))).json(&json!({"details": "final"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"id": id.as_str(), "message": "Note updated successfully"}));

    let timeline = c.get(app.url("/api/students/S1/interactions")).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(timeline[0]["details"], "final");
    assert_eq!(timeline[0]["team_member"], "API User");
    assert!(timeline[0]["last_updated"].as_i64().is_some());
    assert_eq!(timeline[0]["timestamp"], 10);

    let res = c.put(app.url(&format!("/api/notes/{id}"))).json(&json!({"team_member": "X"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    // no existence check up front; the store's failure surfaces as a 500
    let res = c.put(app.url("/api/notes/ghost")).json(&json!({"details": "x"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert!(body["error"].as_str().unwrap_or_default().starts_with("Could not update note:"));
    Ok(())
}

#[tokio::test]
async fn deleting_is_idempotent() -> anyhow::Result<()> {
    let app = start_server().await?;
    let id = app.add_interaction_doc(json!({"student_id": "S1", "details": "temp"})).await;
    let c = client();

    for _ in 0..2 {
        let res = c.delete(app.url(&format!("/api/notes/{id}"))).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
        let body = res.json::<Value>().await?;
        assert_eq!(body, json!({"id": id.as_str(), "message": "Note deleted successfully"}));
    }

    let res = c.delete(app.url("/api/notes/never-existed")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(app.interaction_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(app.url("/api-docs/openapi.json")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert!(body["paths"].get("/api/notes/{id}").is_some());
    Ok(())
}

#[tokio::test]
async fn unreadable_student_collection_is_a_500() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.corrupt_collection("Students");
    let c = client();

    let res = c.get(app.url("/")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Failed to connect to document store"}));

    let res = c.get(app.url("/api/students")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    let msg = body["error"].as_str().unwrap_or_default();
    assert!(msg.starts_with("Could not retrieve students: "), "{msg}");
    assert!(msg.contains("Students"), "{msg}");
    Ok(())
}

#[tokio::test]
async fn unreadable_interaction_collection_is_a_500() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.corrupt_collection("Interactions");
    let c = client();

    let res = c.get(app.url("/api/students/S1/interactions")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert!(body["error"].as_str().unwrap_or_default().starts_with("Could not retrieve interactions: "));

    let res = c
        .post(app.url("/api/students/S1/interactions"))
        .json(&json!({"details": "called parent"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert!(body["error"].as_str().unwrap_or_default().starts_with("Could not log interaction: "));
    Ok(())
}

#[tokio::test]
async fn stored_students_with_nulls_and_floats_still_list() -> anyhow::Result<()> {
    let app = start_server().await?;
    app.add_student(json!({"name": "Anya Sharma", "sat_e": 750})).await;
    let ben = app.add_student(json!({"name": "Ben", "phone": null, "sat_e": 650.0, "nickname": "B"})).await;

    let res = client().get(app.url("/api/students")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Vec<Value>>().await?;
    assert_eq!(body.len(), 2);
    let ben = body.iter().find(|s| s["id"] == ben.as_str()).expect("ben listed");
    assert_eq!(ben["sat_e"], json!(650.0));
    assert_eq!(ben["nickname"], "B");
    assert!(ben.get("email").is_none());
    Ok(())
}
