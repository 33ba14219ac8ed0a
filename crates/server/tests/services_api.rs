use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::{AppConfig, ReadFailurePolicy};
use serde_json::{json, Value};
use tower::Service;
use uuid::Uuid;

struct TestApp {
    router: Router,
    dir: PathBuf,
}

impl TestApp {
    fn services_file(&self) -> PathBuf {
        self.dir.join("services.json")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

async fn build_app_with(policy: ReadFailurePolicy) -> anyhow::Result<TestApp> {
    let dir = std::env::temp_dir().join(format!("homeserve_api_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.storage.services_file = dir.join("services.json").to_string_lossy().into_owned();
    cfg.storage.on_read_error = policy;
    let router = server::startup::build_app(&cfg).await?;
    Ok(TestApp { router, dir })
}

async fn build_app() -> anyhow::Result<TestApp> {
    build_app_with(ReadFailurePolicy::Fail).await
}

async fn send(app: &TestApp, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.router.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Ok((status, value))
}

fn ac_cleaning() -> Value {
    json!({
        "title": "AC Cleaning",
        "category": "Home Maintenance",
        "description": "...",
        "originalPrice": 50,
        "discountedPrice": 40
    })
}

#[tokio::test]
async fn create_returns_201_with_server_fields() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, "POST", "/api/services", Some(ac_cleaning())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_i64());
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());
    for (k, v) in ac_cleaning().as_object().unwrap() {
        assert_eq!(&body[k], v, "field {k} not echoed");
    }

    let id = body["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/services/{id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
    Ok(())
}

#[tokio::test]
async fn client_supplied_id_and_timestamps_are_ignored() -> anyhow::Result<()> {
    let app = build_app().await?;
    let mut input = ac_cleaning();
    input["id"] = json!(1);
    input["createdAt"] = json!("1999-01-01T00:00:00Z");
    let (status, body) = send(&app, "POST", "/api/services", Some(input)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(body["id"], json!(1));
    assert_ne!(body["createdAt"], json!("1999-01-01T00:00:00Z"));
    Ok(())
}

#[tokio::test]
async fn unknown_id_is_404_with_error_body() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, "GET", "/api/services/999999", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Service not found");

    let (status, _) = send(&app, "GET", "/api/services/not-a-number", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_then_get_is_404() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (_, created) = send(&app, "POST", "/api/services", Some(ac_cleaning())).await?;
    let uri = format!("/api/services/{}", created["id"]);

    let (status, body) = send(&app, "DELETE", &uri, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Service deleted successfully");

    let (status, _) = send(&app, "GET", &uri, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, "DELETE", &uri, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Service not found");
    Ok(())
}

#[tokio::test]
async fn put_merges_supplied_fields_only() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (_, created) = send(&app, "POST", "/api/services", Some(ac_cleaning())).await?;
    let uri = format!("/api/services/{}", created["id"]);

    let (status, updated) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({"discountedPrice": 35, "includes": ["Filter wash"], "id": 5})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["discountedPrice"], 35);
    assert_eq!(updated["includes"], json!(["Filter wash"]));
    assert_eq!(updated["title"], "AC Cleaning");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (status, _) = send(&app, "PUT", "/api/services/999999", Some(json!({"title": "x"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn display_category_route_filters_in_order() -> anyhow::Result<()> {
    let app = build_app().await?;
    for (title, display, category) in [
        ("Fan Repair", "Trending", "Home Maintenance"),
        ("Haircut", "General", "Salon"),
        ("Physio", "Trending", "Healthcare"),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/services",
            Some(json!({"title": title, "displayCategory": display, "category": category})),
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, all) = send(&app, "GET", "/api/services", None).await?;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = all.as_array().unwrap().iter().map(|s| s["title"].clone()).collect();
    assert_eq!(titles, vec![json!("Fan Repair"), json!("Haircut"), json!("Physio")]);

    let (status, trending) = send(&app, "GET", "/api/services/category/Trending", None).await?;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = trending.as_array().unwrap().iter().map(|s| s["title"].clone()).collect();
    assert_eq!(titles, vec![json!("Fan Repair"), json!("Physio")]);

    let (_, top) = send(&app, "GET", "/api/services/category/Top%20Picks", None).await?;
    assert_eq!(top, json!([]));

    let (_, salon) = send(&app, "GET", "/api/services?category=Salon", None).await?;
    assert_eq!(salon.as_array().unwrap().len(), 1);
    assert_eq!(salon[0]["title"], "Haircut");
    Ok(())
}

#[tokio::test]
async fn unreadable_document_is_500_by_default() -> anyhow::Result<()> {
    let app = build_app().await?;
    std::fs::write(app.services_file(), b"not json")?;
    let (status, body) = send(&app, "GET", "/api/services", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to fetch services"}));

    let (status, body) = send(&app, "POST", "/api/services", Some(ac_cleaning())).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to create service"}));
    assert_eq!(std::fs::read(app.services_file())?, b"not json");
    Ok(())
}

#[tokio::test]
async fn unreadable_document_reads_as_empty_when_configured() -> anyhow::Result<()> {
    let app = build_app_with(ReadFailurePolicy::Empty).await?;
    std::fs::write(app.services_file(), b"not json")?;
    let (status, body) = send(&app, "GET", "/api/services", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn non_object_body_is_rejected() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, "POST", "/api/services", Some(json!([1, 2, 3]))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (created, _) = send(&app, "POST", "/api/services", Some(ac_cleaning())).await?;
    assert_eq!(created, StatusCode::CREATED);
    let (_, all) = send(&app, "GET", "/api/services", None).await?;
    let id = all[0]["id"].as_i64().unwrap();
    assert_eq!(all.as_array().map(Vec::len), Some(1));
    let (status, body) = send(&app, "PUT", &format!("/api/services/{id}"), Some(json!("title"))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
    let (_, after) = send(&app, "GET", "/api/services", None).await?;
    assert_eq!(after, all);
    Ok(())
}

#[tokio::test]
async fn malformed_body_uses_json_error_shape() -> anyhow::Result<()> {
    let app = build_app().await?;
    let req = Request::builder()
        .method("POST")
        .uri("/api/services")
        .header("content-type", "application/json")
        .body(Body::from("{\"title\": "))?;
    let resp = app.router.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));

    let (status, body) = send(&app, "POST", "/api/services", None).await?;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn failed_write_answers_500_and_keeps_document() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (_, created) = send(&app, "POST", "/api/services", Some(ac_cleaning())).await?;
    let id = created["id"].as_i64().unwrap();

    // a directory where the temp file goes makes every write fail
    std::fs::create_dir(app.dir.join(".services.json.tmp"))?;

    let (status, body) = send(&app, "POST", "/api/services", Some(ac_cleaning())).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to create service"}));

    let uri = format!("/api/services/{id}");
    let (status, body) = send(&app, "PUT", &uri, Some(json!({"title": "Changed"}))).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to update service"}));

    let (status, body) = send(&app, "DELETE", &uri, None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to delete service"}));

    let (status, _) = send(&app, "DELETE", "/api/services/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, all) = send(&app, "GET", "/api/services", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([created]));
    Ok(())
}

#[tokio::test]
async fn hand_seeded_records_without_timestamps_are_served() -> anyhow::Result<()> {
    let app = build_app().await?;
    std::fs::write(
        app.services_file(),
        r#"[
  {"id": 1, "title": "Seeded"},
  {"id": 2, "title": "Complete", "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-02T00:00:00Z"}
]"#,
    )?;

    let (status, all) = send(&app, "GET", "/api/services", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().map(Vec::len), Some(2));

    let (status, body) = send(&app, "GET", "/api/services/2", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Complete");

    let (status, body) = send(&app, "PUT", "/api/services/1", Some(json!({"title": "Edited"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Edited");
    assert!(body["createdAt"].as_str().is_some_and(|t| t.starts_with("1970-01-01")));
    Ok(())
}

#[tokio::test]
async fn id_path_reads_leading_integer() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (_, created) = send(&app, "POST", "/api/services", Some(ac_cleaning())).await?;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/services/{id}abc"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
    let (status, _) = send(&app, "GET", &format!("/api/services/{id}.9"), None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/services/abc", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Service not found"}));
    Ok(())
}

#[tokio::test]
async fn health_and_openapi_are_served() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/services"].is_object());
    Ok(())
}

#[tokio::test]
async fn cors_allows_browser_origin() -> anyhow::Result<()> {
    let app = build_app().await?;
    let req = Request::builder()
        .method("GET")
        .uri("/api/services")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())?;
    let resp = app.router.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("access-control-allow-origin").is_some());
    Ok(())
}
