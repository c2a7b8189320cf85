//! User endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;

use super::state::AppState;
use super::types::{ApiError, Json, Path};
use crate::domain::{DomainError, NewUser, RequestContext, User, UserId};

/// Body of `POST /users` and `PUT /users/{id}`; an `id` field is ignored
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
}

impl UserPayload {
    fn into_draft(self) -> Result<NewUser, ApiError> {
        NewUser::new(self.name, self.email)
            .map_err(|e| ApiError::from(DomainError::from(e)))
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn parse_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse::<UserId>()
        .map_err(|e| ApiError::from(DomainError::from(e)))
}

pub async fn create_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<UserPayload>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    info!(request_id = %ctx.request_id(), "API: create user");

    let draft = payload.into_draft()?;
    let user = state.user_service.create(&ctx, draft).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    info!(request_id = %ctx.request_id(), id = %id, "API: get user");

    let id = parse_id(&id)?;
    let user = state.user_service.get(&ctx, id).await?;

    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<User>, ApiError> {
    info!(request_id = %ctx.request_id(), id = %id, "API: update user");

    let id = parse_id(&id)?;
    let user = User::new(id, payload.into_draft()?);
    let updated = state.user_service.update(&ctx, &user).await?;

    Ok(Json(updated))
}

pub async fn delete_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!(request_id = %ctx.request_id(), id = %id, "API: delete user");

    let id = parse_id(&id)?;
    state.user_service.delete(&ctx, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_users(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<User>>, ApiError> {
    info!(request_id = %ctx.request_id(), "API: list users");

    let users = state.user_service.list(&ctx).await?;

    Ok(Json(users))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::{state_with, MockPlanServiceTrait, MockUserServiceTrait};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(users: MockUserServiceTrait) -> Router {
        routes().with_state(state_with(users, MockPlanServiceTrait::new()))
    }

    fn user(id: i64, name: &str, email: &str) -> User {
        User::new(UserId::new(id).unwrap(), NewUser::new(name, email).unwrap())
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_user_returns_created() {
        let mut users = MockUserServiceTrait::new();
        users
            .expect_create()
            .withf(|_, draft| draft.name() == "John Doe" && draft.email() == "john@example.com")
            .times(1)
            .returning(|_, draft| Ok(User::new(UserId::new(1).unwrap(), draft)));

        let response = app(users)
            .oneshot(json_request(
                "POST",
                "/users",
                r#"{"name":"John Doe","email":"john@example.com"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({ "id": 1, "name": "John Doe", "email": "john@example.com" })
        );
    }

    #[tokio::test]
    async fn test_create_user_invalid_json() {
        let response = app(MockUserServiceTrait::new())
            .oneshot(json_request("POST", "/users", "invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
        assert_eq!(body["code"], "invalid_request");
    }

    #[tokio::test]
    async fn test_create_user_validation_fails_before_service() {
        for body in [
            r#"{"name":"John Doe"}"#,
            r#"{"name":"","email":"john@example.com"}"#,
            r#"{"name":"John Doe","email":"not-an-email"}"#,
        ] {
            let response = app(MockUserServiceTrait::new())
                .oneshot(json_request("POST", "/users", body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        }

        let long_name = "a".repeat(101);
        let response = app(MockUserServiceTrait::new())
            .oneshot(json_request(
                "POST",
                "/users",
                &json!({ "name": long_name, "email": "a@example.com" }).to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email_is_conflict() {
        let mut users = MockUserServiceTrait::new();
        users.expect_create().returning(|_, draft| {
            Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                draft.email()
            )))
        });

        let response = app(users)
            .oneshot(json_request(
                "POST",
                "/users",
                r#"{"name":"John Doe","email":"john@example.com"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["code"], "conflict");
    }

    #[tokio::test]
    async fn test_get_user() {
        let mut users = MockUserServiceTrait::new();
        users
            .expect_get()
            .withf(|_, id| id.value() == 1)
            .returning(|_, _| Ok(user(1, "John Doe", "john@example.com")));

        let response = app(users)
            .oneshot(empty_request("GET", "/users/1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["email"], "john@example.com");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut users = MockUserServiceTrait::new();
        users
            .expect_get()
            .returning(|_, id| Err(DomainError::not_found(format!("User '{}' not found", id))));

        let response = app(users)
            .oneshot(empty_request("GET", "/users/99"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "User '99' not found", "code": "not_found" })
        );
    }

    #[tokio::test]
    async fn test_invalid_ids_are_rejected() {
        for uri in ["/users/abc", "/users/0", "/users/-4"] {
            let response = app(MockUserServiceTrait::new())
                .oneshot(empty_request("GET", uri))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);
            assert_eq!(body_json(response).await["code"], "invalid_id");
        }

        let response = app(MockUserServiceTrait::new())
            .oneshot(empty_request("DELETE", "/users/abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_undecodable_id_uses_error_body() {
        for (method, uri) in [("GET", "/users/%FF"), ("DELETE", "/users/%FF")] {
            let response = app(MockUserServiceTrait::new())
                .oneshot(empty_request(method, uri))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{} {}", method, uri);
            let body = body_json(response).await;
            assert!(body["error"].is_string());
            assert_eq!(body["code"], "invalid_id");
        }
    }

    #[tokio::test]
    async fn test_update_user_uses_path_id() {
        let mut users = MockUserServiceTrait::new();
        users
            .expect_update()
            .withf(|_, u| u.id().value() == 5 && u.name() == "Jane")
            .times(1)
            .returning(|_, u| Ok(u.clone()));

        let response = app(users)
            .oneshot(json_request(
                "PUT",
                "/users/5",
                r#"{"id":77,"name":"Jane","email":"jane@example.com"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["id"], 5);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let mut users = MockUserServiceTrait::new();
        users
            .expect_update()
            .returning(|_, u| Err(DomainError::not_found(format!("User '{}' not found", u.id()))));

        let response = app(users)
            .oneshot(json_request(
                "PUT",
                "/users/5",
                r#"{"name":"Jane","email":"jane@example.com"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_user_returns_no_content() {
        let mut users = MockUserServiceTrait::new();
        users
            .expect_delete()
            .withf(|_, id| id.value() == 3)
            .times(1)
            .returning(|_, _| Ok(()));

        let response = app(users)
            .oneshot(empty_request("DELETE", "/users/3"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_list_users() {
        let mut users = MockUserServiceTrait::new();
        users.expect_list().returning(|_| {
            Ok(vec![
                user(1, "A", "a@example.com"),
                user(2, "B", "b@example.com"),
            ])
        });

        let response = app(users)
            .oneshot(empty_request("GET", "/users"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[1]["name"], "B");
    }

    #[tokio::test]
    async fn test_list_users_empty_is_array() {
        let mut users = MockUserServiceTrait::new();
        users.expect_list().returning(|_| Ok(vec![]));

        let response = app(users)
            .oneshot(empty_request("GET", "/users"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error() {
        let mut users = MockUserServiceTrait::new();
        users
            .expect_list()
            .returning(|_| Err(DomainError::storage("Failed to list users: pool timed out")));

        let response = app(users)
            .oneshot(empty_request("GET", "/users"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to list users: pool timed out", "code": "internal_error" })
        );
    }
}
