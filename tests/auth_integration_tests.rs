mod common;

use article_portal::{
    AppState, InMemoryRepository,
    auth::{AuthUser, Claims},
    error::ApiError,
    models::Identity,
};
use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::sync::Arc;
use uuid::Uuid;

// --- Helper Functions ---

const TEST_USER_ID: Uuid = Uuid::from_u128(1);

fn identity() -> Identity {
    Identity {
        user_id: TEST_USER_ID,
        fullname: "Grace Hopper".to_string(),
        is_admin: false,
    }
}

fn app_state() -> AppState {
    common::create_state(Arc::new(InMemoryRepository::new()))
}

/// Signs claims by hand so tests can forge expiry and secret.
fn forge_token(secret: &str, exp_offset: Duration) -> String {
    let now = Utc::now();
    let claims = Claims {
        user_id: TEST_USER_ID,
        fullname: "Grace Hopper".to_string(),
        is_admin: true,
        iat: now.timestamp(),
        exp: (now + exp_offset).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(authorization: Option<&str>) -> Parts {
    let mut builder = Request::builder()
        .method(Method::GET)
        .uri("/api/users".parse::<Uri>().unwrap());
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let (parts, _) = builder.body(axum::body::Body::empty()).unwrap().into_parts();
    parts
}

async fn extract(state: &AppState, authorization: Option<&str>) -> Result<AuthUser, ApiError> {
    let mut parts = get_request_parts(authorization);
    AuthUser::from_request_parts(&mut parts, state).await
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_token() {
    let state = app_state();
    let token = state.issuer.issue(&identity()).unwrap();

    let AuthUser(user) = extract(&state, Some(&format!("Bearer {token}")))
        .await
        .expect("valid token should authenticate");

    assert_eq!(user, identity());
}

#[tokio::test]
async fn test_scheme_word_is_not_checked() {
    let state = app_state();
    let token = state.issuer.issue(&identity()).unwrap();

    let result = extract(&state, Some(&format!("Token {token}"))).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let result = extract(&app_state(), None).await;

    assert_eq!(
        result.unwrap_err(),
        ApiError::Unauthorized("Token missing".to_string())
    );
}

#[tokio::test]
async fn test_header_without_token_segment_is_missing() {
    let result = extract(&app_state(), Some("Bearer")).await;

    assert_eq!(
        result.unwrap_err(),
        ApiError::Unauthorized("Token missing".to_string())
    );
}

#[tokio::test]
async fn test_auth_failure_with_expired_token() {
    let state = app_state();
    let token = forge_token(&common::test_config().jwt_secret, Duration::seconds(-1));

    let result = extract(&state, Some(&format!("Bearer {token}"))).await;

    let err = result.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(err, ApiError::Unauthorized("Token expired".to_string()));
}

#[tokio::test]
async fn test_auth_failure_with_foreign_secret() {
    let token = forge_token("someone-elses-secret", Duration::hours(1));

    let result = extract(&app_state(), Some(&format!("Bearer {token}"))).await;

    assert_eq!(
        result.unwrap_err(),
        ApiError::Unauthorized("Token invalid".to_string())
    );
}

#[tokio::test]
async fn test_auth_failure_with_garbage() {
    let result = extract(&app_state(), Some("Bearer not.a.jwt")).await;

    assert_eq!(result.unwrap_err().status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_claim_survives_round_trip() {
    let state = app_state();
    let token = forge_token(&common::test_config().jwt_secret, Duration::minutes(30));

    let AuthUser(user) = extract(&state, Some(&format!("Bearer {token}")))
        .await
        .unwrap();

    assert!(user.is_admin);
    assert_eq!(user.fullname, "Grace Hopper");
}
