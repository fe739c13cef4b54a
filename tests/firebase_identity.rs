//! FirebaseIdentity against a local stand-in for the Identity Toolkit REST API.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use grocery_checkout::{
    services::{Credentials, FirebaseIdentity, IdentityProvider},
    AuthError,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const API_KEY: &str = "test-key";

fn failure(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": { "code": 400, "message": message, "errors": [] } })),
    )
        .into_response()
}

async fn accounts(
    Path(method): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if query.get("key").map(String::as_str) != Some(API_KEY) {
        return failure("API key not valid. Please pass a valid API key.");
    }
    assert_eq!(body["returnSecureToken"], true);

    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    match (method.as_str(), email, password) {
        ("accounts:signInWithPassword", "shopper@example.com", "hunter22") => Json(json!({
            "localId": "uid-1",
            "email": email,
            "displayName": "",
            "idToken": "id-token",
            "refreshToken": "refresh-token",
            "expiresIn": "3600",
            "registered": true
        }))
        .into_response(),
        ("accounts:signInWithPassword", "locked@example.com", _) => {
            failure("TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account has been temporarily disabled")
        }
        ("accounts:signInWithPassword", _, _) => failure("INVALID_LOGIN_CREDENTIALS"),
        ("accounts:signUp", "taken@example.com", _) => failure("EMAIL_EXISTS"),
        ("accounts:signUp", _, p) if p.len() < 6 => {
            failure("WEAK_PASSWORD : Password should be at least 6 characters")
        }
        ("accounts:signUp", _, _) => Json(json!({
            "localId": "uid-2",
            "email": email,
            "displayName": body["displayName"],
            "idToken": "new-token",
            "refreshToken": "new-refresh",
            "expiresIn": "1800"
        }))
        .into_response(),
        _ => failure("INVALID_EMAIL"),
    }
}

async fn spawn_toolkit() -> String {
    let app = Router::new().route("/v1/:method", post(accounts));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn creds(email: &str, password: &str) -> Credentials {
    Credentials::new(email, password).unwrap()
}

#[tokio::test]
async fn sign_in_success_maps_response() {
    let identity = FirebaseIdentity::new(API_KEY, spawn_toolkit().await).unwrap();

    let session = identity
        .sign_in(&creds("shopper@example.com", "hunter22"))
        .await
        .unwrap();
    assert_eq!(session.uid, "uid-1");
    assert_eq!(session.id_token, "id-token");
    assert_eq!(session.display_name, None);
    assert_eq!(session.expires_in_seconds, 3600);
}

#[tokio::test]
async fn sign_in_failures_are_classified() {
    let identity = FirebaseIdentity::new(API_KEY, spawn_toolkit().await).unwrap();

    assert_eq!(
        identity.sign_in(&creds("shopper@example.com", "wrong")).await,
        Err(AuthError::InvalidCredentials)
    );
    assert_eq!(
        identity.sign_in(&creds("locked@example.com", "hunter22")).await,
        Err(AuthError::TooManyRequests)
    );
}

#[tokio::test]
async fn sign_up_paths() {
    let identity = FirebaseIdentity::new(API_KEY, spawn_toolkit().await).unwrap();

    let session = identity
        .sign_up(&creds("new@example.com", "hunter22"), Some("New Shopper"))
        .await
        .unwrap();
    assert_eq!(session.display_name.as_deref(), Some("New Shopper"));
    assert_eq!(session.expires_in_seconds, 1800);

    assert_eq!(
        identity.sign_up(&creds("taken@example.com", "hunter22"), None).await,
        Err(AuthError::EmailInUse)
    );
    assert_eq!(
        identity.sign_up(&creds("new@example.com", "abc"), None).await,
        Err(AuthError::WeakPassword)
    );
}

#[tokio::test]
async fn bad_api_key_is_unknown_failure() {
    let identity = FirebaseIdentity::new("wrong-key", spawn_toolkit().await).unwrap();

    let err = identity
        .sign_in(&creds("shopper@example.com", "hunter22"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unknown(_)));
    assert_eq!(err.to_string(), "Login failed. Please try again.");
}

#[tokio::test]
async fn unreachable_provider_is_unknown_failure() {
    let identity = FirebaseIdentity::new(API_KEY, "http://127.0.0.1:9").unwrap();

    assert!(matches!(
        identity.sign_in(&creds("shopper@example.com", "hunter22")).await,
        Err(AuthError::Unknown(_))
    ));
}
