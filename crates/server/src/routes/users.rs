//! User registration and lookup handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use user_registry_core::UserInput;

use crate::error::{AppError, Result};
use crate::models::User;
use crate::state::AppState;

/// Register a user from a JSON body.
///
/// Absent keys count as empty fields and are reported as missing.
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<User>)> {
    let Json(input) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        AppError::BadRequest("invalid JSON body".to_owned())
    })?;

    let user = state.registry().create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Look up a user by email.
pub async fn show_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<User>> {
    let user = state.registry().get_user_by_email(&email).await?;
    Ok(Json(user))
}

/// Look up a user by id.
pub async fn show_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    let user = state.registry().get_user_by_id(&id).await?;
    Ok(Json(user))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::StatusCode;
    use crate::db::MemoryUserStore;
    use crate::middleware::REQUEST_ID_HEADER;
    use crate::routes::router;
    use crate::state::AppState;

    fn app() -> (Router, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        (router(AppState::new(store.clone())), store)
    }

    fn eli_json() -> Value {
        json!({
            "first_name": "Eli",
            "last_name": "Fuchsman",
            "email": "test@mail.com",
            "address": "1123 Street St.",
            "city": "Denver",
            "state": "CO",
            "zip": "80108",
            "dob": "12/14/1993",
        })
    }

    fn post_json(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/users/create")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_create_returns_created_record() {
        let (app, _) = app();

        let (status, body) = send(&app, post_json(&eli_json())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"].as_str().unwrap().len(), 10);
        assert_eq!(body["email"], "test@mail.com");
        assert_eq!(body["zip"], "80108");
        assert_eq!(body["dob"], "12/14/1993");
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let (app, store) = app();
        send(&app, post_json(&eli_json())).await;

        let mut shouted = eli_json();
        shouted["email"] = json!("TEST@MAIL.COM");
        let (status, body) = send(&app, post_json(&shouted)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "email is already in use");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_fields_are_listed() {
        let (app, _) = app();
        let mut partial = eli_json();
        partial["city"] = json!("");
        partial.as_object_mut().unwrap().remove("dob");

        let (status, body) = send(&app, post_json(&partial)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing required fields: City, Date of Birth");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/users/create")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid JSON body");
    }

    #[tokio::test]
    async fn test_lookup_by_email_and_id() {
        let (app, _) = app();
        let (_, created) = send(&app, post_json(&eli_json())).await;

        let (status, body) = send(&app, get("/users/TEST@mail.com")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, created);

        let id = created["id"].as_str().unwrap();
        let (status, body) = send(&app, get(&format!("/users/id/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, created);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (app, _) = app();

        let (status, body) = send(&app, get("/users/nobody@mail.com")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "user not found");

        let (status, _) = send(&app, get("/users/id/not-an-id")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_banner_and_health() {
        let (app, _) = app();

        let response = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"Welcome to the user registry API");

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed_or_generated() {
        let (app, _) = app();

        let request = Request::builder()
            .uri("/health")
            .header(REQUEST_ID_HEADER, "req-123")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-123");

        let response = app.oneshot(get("/health")).await.unwrap();
        let generated = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert_eq!(generated.len(), 36);
    }

    #[tokio::test]
    async fn test_empty_request_id_is_replaced() {
        let (app, _) = app();
        let request = Request::builder()
            .uri("/health")
            .header(REQUEST_ID_HEADER, "")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let generated = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert_eq!(generated.len(), 36);
        assert!(uuid::Uuid::parse_str(generated).is_ok());
    }

    #[tokio::test]
    async fn test_cors_mirrors_origin() {
        let (app, _) = app();
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "https://client.example")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://client.example"
        );
    }
}
