//! Registry administration over HTTP.

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{client, location, FailingStore, TestServer};

#[tokio::test]
async fn test_save_get_list_delete() {
    let server = TestServer::start().await;
    let client = client();

    let res = client
        .post(server.url("/apiz/save"))
        .json(&json!({ "source": "docs", "destination": "https://example.com/docs" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(server.url("/docs")).send().await.unwrap();
    assert_eq!(location(&res), "https://example.com/docs");

    let res = client.get(server.url("/apiz/entries/docs")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let entry: Value = res.json().await.unwrap();
    assert_eq!(entry, json!({ "source": "docs", "destination": "https://example.com/docs" }));

    client
        .post(server.url("/apiz/save"))
        .json(&json!({ "source": "/team/%s", "destination": "https://chat.example.com/%s" }))
        .send()
        .await
        .unwrap();

    let res = client.get(server.url("/registryz")).send().await.unwrap();
    let entries: Vec<Value> = res.json().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["source"], "docs");
    assert_eq!(entries[1]["source"], "team/%s");

    // An empty destination deletes.
    let res = client
        .post(server.url("/apiz/save"))
        .json(&json!({ "source": "docs", "destination": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(server.url("/apiz/entries/docs")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(server.url("/docs")).send().await.unwrap();
    assert_eq!(location(&res), "/edit/docs");
}

#[tokio::test]
async fn test_malformed_entries_are_rejected() {
    let server = TestServer::start().await;
    let client = client();

    for body in [
        json!({ "source": "a/%s/%s", "destination": "https://x/%s" }),
        json!({ "source": "a%s", "destination": "https://x" }),
        json!({ "source": "docs", "destination": "not a url" }),
        json!({ "source": "", "destination": "https://x" }),
    ] {
        let res = client
            .post(server.url("/apiz/save"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let error: Value = res.json().await.unwrap();
        assert!(error["error"].is_string());
    }

    let res = client
        .post(server.url("/apiz/save"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error());

    assert!(server.registry.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_resolve_endpoint() {
    let server = TestServer::start().await;
    server.seed(&[("team/%s", "https://chat.example.com/%s")]);
    let client = client();

    let res = client.get(server.url("/apiz/resolve/team/eng")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let redirect: Value = res.json().await.unwrap();
    assert_eq!(redirect["destination"], "https://chat.example.com/eng");
    assert_eq!(redirect["wildcard"]["key"], "team/%s");
    assert_eq!(redirect["wildcard"]["segment"], "eng");

    // Same trailing-slash rule as the redirect itself.
    let res = client.get(server.url("/apiz/resolve/team/eng/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let redirect: Value = res.json().await.unwrap();
    assert_eq!(redirect["destination"], "https://chat.example.com/eng");

    let res = client.get(server.url("/apiz/resolve/team")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_is_server_error() {
    let server = TestServer::start_with_store(Arc::new(FailingStore)).await;
    let client = client();

    let res = client.get(server.url("/registryz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = client
        .post(server.url("/apiz/save"))
        .json(&json!({ "source": "docs", "destination": "https://example.com/docs" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = res.json().await.unwrap();
    assert!(error["error"].is_string());
}

#[tokio::test]
async fn test_status() {
    let server = TestServer::start().await;
    let res = client().get(server.url("/apiz/status")).send().await.unwrap();
    let status: Value = res.json().await.unwrap();
    assert_eq!(status["status"], "operational");
    assert_eq!(status["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_api_key_required_when_configured() {
    let server = TestServer::start_with(|config| {
        config.admin.api_key = Some("s3cret".into());
    })
    .await;
    server.seed(&[("docs", "https://example.com/docs")]);
    let client = client();

    let res = client.get(server.url("/registryz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(server.url("/apiz/save"))
        .bearer_auth("wrong")
        .json(&json!({ "source": "docs", "destination": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(server.registry.get("docs").unwrap().is_some());

    let res = client
        .get(server.url("/registryz"))
        .bearer_auth("s3cret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Redirects stay public.
    let res = client.get(server.url("/docs")).send().await.unwrap();
    assert_eq!(location(&res), "https://example.com/docs");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let server = TestServer::start_with(|config| {
        config.security.max_body_size = 256;
    })
    .await;

    let destination = format!("https://example.com/{}", "a".repeat(1024));
    let res = client()
        .post(server.url("/apiz/save"))
        .json(&json!({ "source": "big", "destination": destination }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(server.registry.get("big").unwrap().is_none());
}
