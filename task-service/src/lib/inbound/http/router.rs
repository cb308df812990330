use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::request_id::MakeRequestUuid;
use tower_http::request_id::PropagateRequestIdLayer;
use tower_http::request_id::SetRequestIdLayer;
use tower_http::timeout::RequestBodyTimeoutLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_task;
use super::handlers::delete_task;
use super::handlers::get_task;
use super::handlers::list_tasks;
use super::handlers::login;
use super::handlers::ping;
use super::handlers::register;
use super::handlers::update_task;
use super::middleware::authenticate as auth_middleware;
use crate::domain::task::ports::TaskServicePort;
use crate::domain::user::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub task_service: Arc<dyn TaskServicePort>,
    pub authenticator: Arc<Authenticator>,
}

/// Per-request time limits applied by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Whole request, from routing to the response head
    pub request: Duration,
    /// Reading the request body
    pub read_body: Duration,
}

pub fn create_router(state: AppState, timeouts: HttpTimeouts) -> Router {
    let public_routes = Router::new()
        .route("/ping", get(ping))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    let protected_routes = Router::new()
        .route("/task", post(create_task).get(list_tasks))
        .route(
            "/task/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();

            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
                user_id = tracing::field::Empty,
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                let status = response.status();
                let latency_ms = latency.as_millis();

                if status.is_server_error() {
                    tracing::error!(status = status.as_u16(), latency_ms, "Request completed");
                } else if status.is_client_error() {
                    tracing::warn!(status = status.as_u16(), latency_ms, "Request completed");
                } else {
                    tracing::info!(status = status.as_u16(), latency_ms, "Request completed");
                }
            },
        );

    // Outermost layer last: the request id exists before the trace span opens.
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(RequestBodyTimeoutLayer::new(timeouts.read_body))
        .layer(TimeoutLayer::new(timeouts.request))
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use auth::HashingCost;
    use axum::http::header;
    use axum::http::Method;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::json;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::task::service::TaskService;
    use crate::domain::user::service::AuthService;
    use crate::outbound::repositories::InMemoryTaskRepository;
    use crate::outbound::repositories::InMemoryUserRepository;

    fn test_router() -> Router {
        let authenticator = Arc::new(
            Authenticator::new(
                b"router_test_secret_at_least_32_bytes",
                chrono::Duration::hours(1),
                HashingCost {
                    memory_kib: 1024,
                    iterations: 1,
                    parallelism: 1,
                },
            )
            .unwrap(),
        );

        let state = AppState {
            auth_service: Arc::new(AuthService::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::clone(&authenticator),
            )),
            task_service: Arc::new(TaskService::new(Arc::new(InMemoryTaskRepository::new()))),
            authenticator,
        };

        create_router(
            state,
            HttpTimeouts {
                request: Duration::from_secs(5),
                read_body: Duration::from_secs(5),
            },
        )
    }

    async fn call(
        router: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn register(router: &Router, username: &str) -> String {
        let (status, body) = call(
            router,
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": username, "password": "password1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_ping() {
        let router = test_router();

        let (status, body) = call(&router, Method::GET, "/ping", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "pong");
    }

    #[tokio::test]
    async fn test_request_id_generated_and_echoed() {
        let router = test_router();

        let generated = router
            .clone()
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(generated.headers().contains_key("x-request-id"));

        let echoed = router
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header("x-request-id", "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(echoed.headers()["x-request-id"], "req-123");
    }

    #[tokio::test]
    async fn test_task_routes_require_token() {
        let router = test_router();

        for (method, uri) in [
            (Method::GET, "/task"),
            (Method::POST, "/task"),
            (Method::GET, "/task/1"),
            (Method::PUT, "/task/1"),
            (Method::DELETE, "/task/1"),
        ] {
            let (status, _) = call(&router, method, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let router = test_router();
        let token = register(&router, "alice").await;

        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/task")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"title\": "))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_task_id_is_bad_request() {
        let router = test_router();
        let token = register(&router, "alice").await;

        for uri in ["/task/abc", "/task/0", "/task/-1"] {
            let (status, body) =
                call(&router, Method::GET, uri, Some(token.as_str()), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["status_code"], 400);
        }
    }

    #[tokio::test]
    async fn test_update_requires_every_field() {
        let router = test_router();
        let token = register(&router, "alice").await;

        let (_, created) = call(
            &router,
            Method::POST,
            "/task",
            Some(token.as_str()),
            Some(json!({ "title": "buy milk" })),
        )
        .await;
        let uri = format!("/task/{}", created["data"]["id"]);

        for body in [
            json!({ "description": "2l", "completed": true }),
            json!({ "title": "buy milk", "completed": true }),
            json!({ "title": "buy milk", "description": "2l" }),
            json!({ "title": "  ", "description": "2l", "completed": true }),
        ] {
            let (status, _) =
                call(&router, Method::PUT, &uri, Some(token.as_str()), Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }
}
