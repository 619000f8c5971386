use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use scribe_api::app::AppServices;
use scribe_core::TenantId;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let services = Arc::new(AppServices::in_memory());
        let app = scribe_api::app::build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn note_body(character_id: &str, message: &str) -> serde_json::Value {
    json!({
        "characterId": character_id,
        "senderId": "2",
        "message": message,
        "flag": "0",
    })
}

#[tokio::test]
async fn tenant_header_is_required_for_note_routes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/notes", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/notes", srv.base_url))
        .header("X-Tenant-Id", "not-a-uuid")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_does_not_require_a_tenant() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn note_lifecycle_create_read_update_delete() {
    let srv = TestServer::spawn().await;
    let tenant = TenantId::new().to_string();
    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(format!("{}/notes", srv.base_url))
        .header("X-Tenant-Id", &tenant)
        .json(&note_body("1", "Hello!"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["characterId"], "1");
    assert_eq!(created["message"], "Hello!");
    assert!(!created["timestamp"].as_str().unwrap().is_empty());

    // Read back
    let res = client
        .get(format!("{}/notes/{}", srv.base_url, id))
        .header("X-Tenant-Id", &tenant)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched, created);

    // Listed
    let res = client
        .get(format!("{}/notes", srv.base_url))
        .header("X-Tenant-Id", &tenant)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Update
    let res = client
        .patch(format!("{}/notes/{}", srv.base_url, id))
        .header("X-Tenant-Id", &tenant)
        .json(&json!({
            "id": id,
            "characterId": "1",
            "senderId": "2",
            "message": "Edited",
            "flag": "1",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["message"], "Edited");
    assert_eq!(updated["flag"], "1");
    // Creation time survives the update.
    assert_eq!(updated["timestamp"], created["timestamp"]);

    // Delete
    let res = client
        .delete(format!("{}/notes/{}", srv.base_url, id))
        .header("X-Tenant-Id", &tenant)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // Gone
    let res = client
        .get(format!("{}/notes/{}", srv.base_url, id))
        .header("X-Tenant-Id", &tenant)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_fields_are_rejected() {
    let srv = TestServer::spawn().await;
    let tenant = TenantId::new().to_string();
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/notes", srv.base_url))
        .header("X-Tenant-Id", &tenant)
        .json(&json!({
            "characterId": "one",
            "senderId": "2",
            "message": "hi",
            "flag": "0",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/notes/abc", srv.base_url))
        .header("X-Tenant-Id", &tenant)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_rejects_body_id_that_disagrees_with_path() {
    let srv = TestServer::spawn().await;
    let tenant = TenantId::new().to_string();
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/notes", srv.base_url))
        .header("X-Tenant-Id", &tenant)
        .json(&note_body("1", "Hello!"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let res = client
        .patch(format!("{}/notes/{}", srv.base_url, id))
        .header("X-Tenant-Id", &tenant)
        .json(&json!({
            "id": "999999",
            "characterId": "1",
            "senderId": "2",
            "message": "Edited",
            "flag": "0",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn character_scoped_listing_and_bulk_delete() {
    let srv = TestServer::spawn().await;
    let tenant = TenantId::new().to_string();
    let client = reqwest::Client::new();

    for message in ["a", "b"] {
        let res = client
            .post(format!("{}/notes", srv.base_url))
            .header("X-Tenant-Id", &tenant)
            .json(&note_body("7", message))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }
    let res = client
        .post(format!("{}/notes", srv.base_url))
        .header("X-Tenant-Id", &tenant)
        .json(&note_body("8", "other"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/characters/7/notes", srv.base_url))
        .header("X-Tenant-Id", &tenant)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let res = client
        .delete(format!("{}/characters/7/notes", srv.base_url))
        .header("X-Tenant-Id", &tenant)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/characters/7/notes", srv.base_url))
        .header("X-Tenant-Id", &tenant)
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert!(listed.as_array().unwrap().is_empty());

    // The unrelated character keeps its note.
    let res = client
        .get(format!("{}/characters/8/notes", srv.base_url))
        .header("X-Tenant-Id", &tenant)
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn tenant_isolation_blocks_cross_tenant_reads() {
    let srv = TestServer::spawn().await;
    let tenant1 = TenantId::new().to_string();
    let tenant2 = TenantId::new().to_string();
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/notes", srv.base_url))
        .header("X-Tenant-Id", &tenant1)
        .json(&note_body("1", "secret"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let res = client
        .get(format!("{}/notes/{}", srv.base_url, id))
        .header("X-Tenant-Id", &tenant2)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/notes/{}", srv.base_url, id))
        .header("X-Tenant-Id", &tenant2)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
