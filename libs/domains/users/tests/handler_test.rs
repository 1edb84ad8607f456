use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use axum_helpers::{ErrorResponse, JwtAuth, JwtConfig};
use domain_users::{InMemoryUserRepository, LoginResponse, UserResponse, UserService, handlers};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "handler-test-secret-0123456789abcdef";

fn jwt() -> JwtAuth {
    JwtAuth::new(&JwtConfig::new(SECRET).unwrap())
}

fn app() -> Router {
    let service = UserService::new(InMemoryUserRepository::new());
    handlers::router(service, jwt())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn registration(email: &str) -> Value {
    json!({ "name": "Ada", "email": email, "password": "analytical-engine" })
}

#[tokio::test]
async fn test_register_returns_created_user() {
    let response = app()
        .oneshot(post_json("/register", registration("ada@example.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let user: UserResponse = body_json(response).await;
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.name, "Ada");
}

#[tokio::test]
async fn test_register_response_hides_password_hash() {
    let response = app()
        .oneshot(post_json("/register", registration("ada@example.com")))
        .await
        .unwrap();

    let body: Value = body_json(response).await;
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = app();

    let first = app
        .clone()
        .oneshot(post_json("/register", registration("ada@example.com")))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_json("/register", registration("ada@example.com")))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let error: ErrorResponse = body_json(second).await;
    assert_eq!(error.error, "CONFLICT");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let response = app()
        .oneshot(post_json(
            "/register",
            json!({ "name": "Ada", "email": "ada@example.com", "password": "short" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_issues_valid_token() {
    let app = app();

    let registered = app
        .clone()
        .oneshot(post_json("/register", registration("ada@example.com")))
        .await
        .unwrap();
    let user: UserResponse = body_json(registered).await;

    let response = app
        .oneshot(post_json(
            "/login",
            json!({ "email": "ada@example.com", "password": "analytical-engine" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let login: LoginResponse = body_json(response).await;
    assert_eq!(login.token_type, "Bearer");
    assert_eq!(login.expires_in, 24 * 3600);

    let claims = jwt().validate(&login.token).unwrap();
    assert_eq!(claims.user_id, user.id);
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_the_same() {
    let app = app();
    app.clone()
        .oneshot(post_json("/register", registration("ada@example.com")))
        .await
        .unwrap();

    let wrong_password = app
        .clone()
        .oneshot(post_json(
            "/login",
            json!({ "email": "ada@example.com", "password": "difference-engine" }),
        ))
        .await
        .unwrap();
    let unknown_email = app
        .oneshot(post_json(
            "/login",
            json!({ "email": "babbage@example.com", "password": "analytical-engine" }),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a: ErrorResponse = body_json(wrong_password).await;
    let b: ErrorResponse = body_json(unknown_email).await;
    assert_eq!(a.message, b.message);
}

#[tokio::test]
async fn test_login_email_is_case_sensitive() {
    let app = app();
    app.clone()
        .oneshot(post_json("/register", registration("ada@example.com")))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json(
            "/login",
            json!({ "email": "Ada@Example.com", "password": "analytical-engine" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
