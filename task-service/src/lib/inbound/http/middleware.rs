use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Span;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extension type to store the authenticated identity in request extensions
///
/// Inserted only by [`authenticate`]; handlers must take the caller's id from
/// here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that validates session tokens and adds the caller to request extensions
///
/// Every rejection yields the same 401 body, whether the header is missing,
/// uses another scheme, or carries an expired, forged or malformed token.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&req).ok_or_else(|| {
        tracing::debug!("Missing or malformed Authorization header");
        unauthorized()
    })?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!("Session token rejected: {}", e);
        unauthorized()
    })?;

    let user_id = UserId(claims.user_id);
    Span::current().record("user_id", tracing::field::display(user_id));

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();

    (!token.is_empty()).then_some(token)
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Invalid or missing session token".to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use auth::Authenticator;
    use auth::HashingCost;
    use axum::body::Body;
    use axum::http::Request;
    use axum::http::StatusCode;
    use axum::middleware;
    use axum::routing::get;
    use axum::Extension;
    use axum::Router;
    use chrono::Duration;
    use http_body_util::BodyExt;
    use jsonwebtoken::encode;
    use jsonwebtoken::EncodingKey;
    use jsonwebtoken::Header;
    use serde_json::json;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::task::errors::TaskError;
    use crate::domain::task::models::CreateTaskCommand;
    use crate::domain::task::models::Task;
    use crate::domain::task::models::TaskId;
    use crate::domain::task::models::UpdateTaskCommand;
    use crate::domain::task::ports::TaskServicePort;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::LoginCommand;
    use crate::domain::user::models::RegisterCommand;
    use crate::domain::user::ports::AuthServicePort;

    const SECRET: &[u8] = b"gate_test_secret_at_least_32_bytes!";

    // The gate never reaches the services; these only satisfy AppState.
    struct UnusedAuthService;

    #[async_trait]
    impl AuthServicePort for UnusedAuthService {
        async fn register(&self, _: RegisterCommand) -> Result<UserId, UserError> {
            unreachable!()
        }
        async fn login(&self, _: LoginCommand) -> Result<UserId, UserError> {
            unreachable!()
        }
    }

    struct UnusedTaskService;

    #[async_trait]
    impl TaskServicePort for UnusedTaskService {
        async fn create_task(&self, _: UserId, _: CreateTaskCommand) -> Result<TaskId, TaskError> {
            unreachable!()
        }
        async fn update_task(
            &self,
            _: UserId,
            _: TaskId,
            _: UpdateTaskCommand,
        ) -> Result<(), TaskError> {
            unreachable!()
        }
        async fn delete_task(&self, _: UserId, _: TaskId) -> Result<(), TaskError> {
            unreachable!()
        }
        async fn get_task(&self, _: UserId, _: TaskId) -> Result<Task, TaskError> {
            unreachable!()
        }
        async fn list_tasks(&self, _: UserId) -> Result<Vec<Task>, TaskError> {
            unreachable!()
        }
    }

    fn test_state() -> AppState {
        let authenticator = Authenticator::new(
            SECRET,
            Duration::hours(1),
            HashingCost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        )
        .unwrap();

        AppState {
            auth_service: Arc::new(UnusedAuthService),
            task_service: Arc::new(UnusedTaskService),
            authenticator: Arc::new(authenticator),
        }
    }

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.user_id.to_string()
    }

    fn gated_router(state: AppState) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
            .with_state(state)
    }

    async fn send(router: Router, authorization: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }

        let response = router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler_with_identity() {
        let state = test_state();
        let token = state.authenticator.issue_token(42).unwrap();

        let authorization = format!("Bearer {token}");

        let (status, body) = send(gated_router(state), Some(authorization.as_str())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"42");
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let (status, body) = send(gated_router(test_state()), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status_code"], 401);
    }

    #[tokio::test]
    async fn test_wrong_scheme_rejected() {
        let state = test_state();
        let token = state.authenticator.issue_token(42).unwrap();

        for value in [
            format!("Basic {token}"),
            format!("bearer {token}"),
            token.clone(),
            "Bearer ".to_string(),
            "Bearer    ".to_string(),
        ] {
            let (status, _) = send(gated_router(state.clone()), Some(value.as_str())).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "accepted {value:?}");
        }
    }

    #[tokio::test]
    async fn test_rejections_are_indistinguishable() {
        let state = test_state();
        let expired = Authenticator::new(
            SECRET,
            Duration::hours(-1),
            HashingCost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        )
        .unwrap()
        .issue_token(42)
        .unwrap();
        let forged = encode(
            &Header::default(),
            &json!({ "user_id": 42, "exp": 4_102_444_800_i64 }),
            &EncodingKey::from_secret(b"another_secret_at_least_32_bytes!!"),
        )
        .unwrap();

        let (_, missing_body) = send(gated_router(state.clone()), None).await;
        for value in [
            format!("Bearer {expired}"),
            format!("Bearer {forged}"),
            "Bearer not.a.token".to_string(),
        ] {
            let (status, body) = send(gated_router(state.clone()), Some(value.as_str())).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, missing_body);
        }
    }
}
