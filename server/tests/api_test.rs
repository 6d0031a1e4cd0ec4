//! End-to-end tests driving the full router

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use institute_site::{
    api,
    app::{self, AppState},
    config::{Config, StoreBackend},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

async fn create_app(backend: StoreBackend) -> (Router, AppState, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::for_data_dir(temp_dir.path().to_path_buf(), backend);
    let state = app::setup(&config).await.unwrap();
    let router = api::create_router(state.clone()).unwrap();
    (router, state, temp_dir)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

fn application() -> Value {
    json!({
        "fullName": "Amina Yusuf",
        "dob": "2012-04-01",
        "gender": "Female",
        "guardianName": "Yusuf Ali",
        "contact": "555-0101",
        "address": "12 Canal Road",
        "program": "Hifz"
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _state, _temp) = create_app(StoreBackend::File).await;

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_alumni_flow() {
    for backend in [StoreBackend::File, StoreBackend::Database] {
        let (app, _state, _temp) = create_app(backend).await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/alumni",
            Some(json!({"name": "Dr. Ahmed Bilal", "year": "2010", "position": "Senior Researcher"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["visible"], true);
        let id = created["id"].as_i64().unwrap();

        let (status, list) = send(&app, Method::GET, "/api/alumni", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(list.as_array().unwrap().iter().any(|a| a["id"] == id));

        let (status, patched) = send(
            &app,
            Method::PATCH,
            "/api/alumni",
            Some(json!({"id": id, "visible": false})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["visible"], false);
        assert_eq!(patched["name"], "Dr. Ahmed Bilal");

        let (_, list) = send(&app, Method::GET, "/api/alumni", None).await;
        assert_eq!(list[0]["visible"], false);

        let uri = format!("/api/alumni?id={}", id);
        let (status, deleted) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["message"], "Alumni profile deleted");

        let (_, list) = send(&app, Method::GET, "/api/alumni", None).await;
        assert!(list.as_array().unwrap().is_empty());

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_delete_requires_id() {
    let (app, _state, _temp) = create_app(StoreBackend::File).await;

    let (status, body) = send(&app, Method::DELETE, "/api/news", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID is required");

    let (status, body) = send(&app, Method::DELETE, "/api/news?id=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID is required");

    let (status, _) = send(&app, Method::DELETE, "/api/news?id=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admission_defaults_and_approval() {
    let (app, _state, _temp) = create_app(StoreBackend::Database).await;

    let mut payload = application();
    payload["status"] = json!("Approved");
    let (status, created) = send(&app, Method::POST, "/api/admissions", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "Pending");
    assert_eq!(created["dateOfBirth"], "2012-04-01");
    assert_eq!(created["parentName"], "Yusuf Ali");
    assert_eq!(created["contactNumber"], "555-0101");
    assert_eq!(created["course"], "Hifz");

    // Ids arrive as strings from some admin forms.
    let id = created["id"].as_i64().unwrap();
    let (status, approved) = send(
        &app,
        Method::PATCH,
        "/api/admissions",
        Some(json!({"id": id.to_string(), "status": "Approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "Approved");
    assert_eq!(approved["fullName"], created["fullName"]);
    assert_eq!(approved["createdAt"], created["createdAt"]);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/admissions",
        Some(json!({"id": id, "status": "Pending"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_errors() {
    let (app, _state, _temp) = create_app(StoreBackend::File).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/messages",
        Some(json!({"read": true})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID is required");

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/messages",
        Some(json!({"id": 999, "read": true})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Message not found");
}

#[tokio::test]
async fn test_invalid_create_payload() {
    let (app, _state, _temp) = create_app(StoreBackend::File).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/admissions",
        Some(json!({"fullName": "Incomplete"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/news")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unexposed_methods() {
    let (app, _state, _temp) = create_app(StoreBackend::File).await;

    let (status, _) = send(&app, Method::DELETE, "/api/admissions?id=1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/news",
        Some(json!({"id": 1, "status": "Published"})),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_news_defaults() {
    let (app, _state, _temp) = create_app(StoreBackend::Database).await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/news",
        Some(json!({"title": "Library Wing", "date": "2025-08-20", "category": "Campus"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "Draft");
    assert_eq!(created["content"], "");
    assert_eq!(created["image"], "");
}

#[tokio::test]
async fn test_message_received_unread() {
    let (app, _state, _temp) = create_app(StoreBackend::File).await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/messages",
        Some(json!({
            "name": "John Doe",
            "email": "john@example.com",
            "subject": "Admission Inquiry",
            "message": "Fee structure?"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["read"], false);
    assert_eq!(created["date"].as_str().unwrap().len(), "2025-01-01".len());

    let (_, stats) = send(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(stats["unreadMessages"], 1);
    assert_eq!(stats["totalAdmissions"], 0);
}

#[tokio::test]
async fn test_settings_upsert() {
    for backend in [StoreBackend::File, StoreBackend::Database] {
        let (app, state, _temp) = create_app(backend).await;

        let (status, body) = send(&app, Method::GET, "/api/settings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/settings",
            Some(json!({"institutionName": "First", "phone1": "111", "facebookUrl": "fb"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Settings saved successfully");
        assert_eq!(body["settings"]["phone"], "111");

        send(
            &app,
            Method::POST,
            "/api/settings",
            Some(json!({"institutionName": "Second"})),
        )
        .await;

        let (_, body) = send(&app, Method::GET, "/api/settings", None).await;
        assert_eq!(body["institutionName"], "Second");
        assert_eq!(body["phone"], "");
        assert_eq!(body["facebook"], "#");

        state.settings.invalidate().await;
        let stored = state.settings.current().await.unwrap().unwrap();
        assert_eq!(stored.institution_name, "Second");
    }
}

#[tokio::test]
async fn test_settings_form_round_trip() {
    for backend in [StoreBackend::File, StoreBackend::Database] {
        let (app, _state, _temp) = create_app(backend).await;

        send(
            &app,
            Method::POST,
            "/api/settings",
            Some(json!({
                "institutionName": "Darul Huda",
                "phone1": "111",
                "phone2": "222",
                "facebookUrl": "https://facebook.com/old"
            })),
        )
        .await;

        // The admin form posts back the loaded record with its own keys edited.
        let (_, mut form) = send(&app, Method::GET, "/api/settings", None).await;
        assert_eq!(form["phone"], "111");
        form["phone1"] = json!("999");
        form["facebookUrl"] = json!("https://facebook.com/new");

        let (status, body) = send(&app, Method::POST, "/api/settings", Some(form)).await;
        assert_eq!(status, StatusCode::OK, "{:?}", body);

        let (_, saved) = send(&app, Method::GET, "/api/settings", None).await;
        assert_eq!(saved["phone"], "999");
        assert_eq!(saved["phoneSecondary"], "222");
        assert_eq!(saved["facebook"], "https://facebook.com/new");
        assert_eq!(saved["institutionName"], "Darul Huda");
    }
}

#[tokio::test]
async fn test_admission_with_current_and_legacy_names() {
    let (app, _state, _temp) = create_app(StoreBackend::File).await;

    let mut payload = application();
    payload["dateOfBirth"] = json!("2012-05-20");
    payload["parentName"] = json!("Maryam Yusuf");

    let (status, created) = send(&app, Method::POST, "/api/admissions", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "{:?}", created);
    assert_eq!(created["dateOfBirth"], "2012-05-20");
    assert_eq!(created["parentName"], "Maryam Yusuf");
    assert_eq!(created["contactNumber"], "555-0101");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simultaneous_admission_decisions() {
    for backend in [StoreBackend::File, StoreBackend::Database] {
        let (app, _state, _temp) = create_app(backend).await;

        let (_, created) = send(&app, Method::POST, "/api/admissions", Some(application())).await;
        let id = created["id"].as_i64().unwrap();

        let ((first, _), (second, _)) = tokio::join!(
            send(
                &app,
                Method::PATCH,
                "/api/admissions",
                Some(json!({"id": id, "status": "Approved"})),
            ),
            send(
                &app,
                Method::PATCH,
                "/api/admissions",
                Some(json!({"id": id, "status": "Rejected"})),
            )
        );

        let mut statuses = vec![first, second];
        statuses.sort();
        assert_eq!(statuses, vec![StatusCode::OK, StatusCode::BAD_REQUEST]);

        // Repeating a decision after the fact is refused too.
        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/admissions",
            Some(json!({"id": id, "status": "Approved"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_failure_messages_per_resource() {
    let (app, _state, temp) = create_app(StoreBackend::File).await;

    std::fs::write(temp.path().join("messages.json"), "{corrupt").unwrap();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/messages",
        Some(json!({
            "name": "John Doe",
            "email": "john@example.com",
            "subject": "Admission Inquiry",
            "message": "Fee structure?"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to send message");

    std::fs::write(temp.path().join("alumni.json"), "{corrupt").unwrap();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/alumni",
        Some(json!({"name": "Fatima Zahra", "year": "2012", "position": "Engineer"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to save alumni");
}
