//! User account endpoints

use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ValidatedJson};
use crate::domain::{PasswordChanged, UserId, UserView};
use crate::infrastructure::user::{CreateUserRequest, RotatePasswordRequest, UpdateProfileRequest};

/// Body for POST /users
#[derive(Deserialize, Validate)]
pub struct CreateUserBody {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 32))]
    pub password: String,
    #[validate(length(min = 6, max = 32))]
    pub password_confirm: String,
}

/// Body for PUT /users/{id}
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserBody {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

/// Body for PATCH /users/{id}/change-password
#[derive(Deserialize, Validate)]
pub struct ChangePasswordBody {
    #[validate(length(min = 6, max = 32))]
    pub old_password: String,
    #[validate(length(min = 6, max = 32))]
    pub password: String,
    #[validate(length(min = 6, max = 32))]
    pub password_confirm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdResponse {
    pub id: UserId,
}

/// Create the users router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{user_id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{user_id}/change-password", patch(change_password))
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, ApiError> {
    debug!("Listing users");

    let users = state.directory_service.list_users().await?;

    Ok(Json(users))
}

/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    debug!(user_id = %user_id, "Getting user");

    let user = state.directory_service.get_user(&user_id).await?;

    Ok(Json(user))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateUserBody>,
) -> Result<Json<UserView>, ApiError> {
    debug!(email = %body.email, "Creating user");

    let request = CreateUserRequest {
        name: body.name,
        email: body.email,
        password: body.password,
        password_confirm: body.password_confirm,
    };

    let user = state.credential_service.create_user(request).await?;

    Ok(Json(user))
}

/// PUT /users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateUserBody>,
) -> Result<Json<UserIdResponse>, ApiError> {
    debug!(user_id = %user_id, "Updating user");

    let request = UpdateProfileRequest {
        name: body.name,
        email: body.email,
    };

    let id = state
        .credential_service
        .update_profile(&user_id, request)
        .await?;

    Ok(Json(UserIdResponse { id }))
}

/// PATCH /users/{user_id}/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(body): ValidatedJson<ChangePasswordBody>,
) -> Result<Json<PasswordChanged>, ApiError> {
    debug!(user_id = %user_id, "Changing user password");

    let request = RotatePasswordRequest {
        old_password: body.old_password,
        new_password: body.password,
        new_password_confirm: body.password_confirm,
    };

    let changed = state
        .credential_service
        .rotate_password(&user_id, request)
        .await?;

    Ok(Json(changed))
}

/// DELETE /users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserIdResponse>, ApiError> {
    debug!(user_id = %user_id, "Deleting user");

    let id = state.directory_service.delete_user(&user_id).await?;

    Ok(Json(UserIdResponse { id }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::HashingConfig;
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository};

    fn app() -> Router {
        let hasher = Argon2Hasher::with_config(&HashingConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        let state = AppState::new(Arc::new(InMemoryUserRepository::new()), Arc::new(hasher));

        Router::new().nest("/users", create_users_router()).with_state(state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    async fn create_ann(app: &Router) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/users",
            Some(json!({
                "name": "Ann",
                "email": "ANN@EX.COM",
                "password": "secret1",
                "password_confirm": "secret1"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let app = app();
        let id = create_ann(&app).await;

        let (status, body) = send(&app, Method::GET, &format!("/users/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": id, "name": "Ann", "email": "ann@ex.com" }));
    }

    #[tokio::test]
    async fn test_list_users_hides_hash() {
        let app = app();
        create_ann(&app).await;

        let (status, body) = send(&app, Method::GET, "/users", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert!(!body.to_string().contains("argon2"));
        assert!(!body.to_string().contains("password"));
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflict() {
        let app = app();
        create_ann(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({
                "name": "Bob",
                "email": "ann@ex.com",
                "password": "secret2",
                "password_confirm": "other22"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "EMAIL_ALREADY_TAKEN");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_shape() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({
                "name": "Ann",
                "email": "not-an-email",
                "password": "secret1",
                "password_confirm": "secret1"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["param"], "email");

        let (status, _) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({
                "name": "Ann",
                "email": "ann@ex.com",
                "password": "short",
                "password_confirm": "short"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_missing_field_is_bad_request() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({
                "name": "Ann",
                "email": "ann@ex.com",
                "password": "secret1"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (_, users) = send(&app, Method::GET, "/users", None).await;
        assert_eq!(users, json!([]));
    }

    #[tokio::test]
    async fn test_update_user() {
        let app = app();
        let id = create_ann(&app).await;

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/users/{}", id),
            Some(json!({ "name": "Annie", "email": "annie@ex.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": id }));

        let (_, body) = send(&app, Method::GET, &format!("/users/{}", id), None).await;
        assert_eq!(body["email"], "annie@ex.com");
    }

    #[tokio::test]
    async fn test_change_password_flow() {
        let app = app();
        let id = create_ann(&app).await;
        let uri = format!("/users/{}/change-password", id);

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "old_password": "wrong12", "password": "newpass1", "password_confirm": "newpass1" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["message"], "Invalid Old Password");

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "old_password": "secret1", "password": "newpass1", "password_confirm": "different" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["message"], "Invalid Confirm Password");

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "old_password": "secret1", "password": "newpass1", "password_confirm": "newpass1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": id, "message": "Password Success Change" }));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let app = app();
        let id = create_ann(&app).await;

        let (status, body) = send(&app, Method::DELETE, &format!("/users/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": id }));

        let (status, body) = send(&app, Method::GET, &format!("/users/{}", id), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "Unknown user");

        let (status, _) = send(&app, Method::DELETE, &format!("/users/{}", id), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_malformed_json_body() {
        let app = app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/users")
            .header("content-type", "application/json")
            .body(Body::from("{\"name\":"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
