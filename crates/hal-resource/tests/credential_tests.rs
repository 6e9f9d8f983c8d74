//! Bearer credentials backed by token resources.

mod common;

use common::{MAINFRAME, Reply, ScriptedTransport, client};
use hal_resource::{Credential, HttpMethod, ResourceError};
use serde_json::json;

#[tokio::test]
async fn unloaded_token_resource_is_fetched_before_the_request() {
    let transport = ScriptedTransport::new();
    transport.on(
        HttpMethod::Get,
        "/tokens/1",
        [Reply::Json(200, json!({"access_token": "from-token"}))],
    );
    transport.on(HttpMethod::Get, "/mainframes/1", [Reply::Json(200, json!({"id": 1}))]);
    let client = client(transport.clone());

    let token = client.node("/tokens/1");
    let mut node = client
        .node_of(&MAINFRAME, "/mainframes/1")
        .with_credential(Credential::from(token));
    node.get().await.unwrap();
    node.get().await.unwrap();

    let calls = transport.calls();
    let authorized: Vec<_> = calls
        .iter()
        .filter(|call| call.url.ends_with("/mainframes/1"))
        .map(|call| call.headers.get("authorization").cloned())
        .collect();
    assert_eq!(authorized.len(), 2);
    assert!(authorized.iter().all(|auth| auth.as_ref().is_some_and(|v| v == "Bearer from-token")));
    assert_eq!(transport.count(HttpMethod::Get, "/tokens/1"), 1);
}

#[tokio::test]
async fn token_without_a_bearer_value_fails_without_sending() {
    let transport = ScriptedTransport::new();
    transport.on(HttpMethod::Get, "/tokens/1", [Reply::Json(200, json!({"id": 1}))]);
    transport.on(HttpMethod::Get, "/mainframes/1", [Reply::Json(200, json!({"id": 1}))]);
    let client = client(transport.clone());

    let mut node = client
        .node_of(&MAINFRAME, "/mainframes/1")
        .with_credential(Credential::from(client.node("/tokens/1")));
    let err = node.get().await.unwrap_err();

    assert!(matches!(err, ResourceError::MissingCredential { .. }));
    assert_eq!(transport.count(HttpMethod::Get, "/mainframes/1"), 0);
}

#[tokio::test]
async fn token_fetch_failure_is_returned() {
    let transport = ScriptedTransport::new();
    transport.on(HttpMethod::Get, "/tokens/1", [Reply::Json(401, json!({"error": "expired"}))]);
    let client = client(transport.clone());

    let mut node = client
        .node_of(&MAINFRAME, "/mainframes/1")
        .with_credential(Credential::from(client.node("/tokens/1")));
    let err = node.get().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(transport.count(HttpMethod::Get, "/mainframes/1"), 0);
}
