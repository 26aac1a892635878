use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod health;
pub mod tasks;

pub use health::health;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", task_collection())
        .route("/tasks/", task_collection())
        .route("/tasks/{id}", task_item())
        .route("/tasks/{id}/", task_item())
        .fallback(endpoint_not_found)
        .layer(middleware::from_fn(preflight))
}

/// Full application: routes, CORS for the single allowed origin, request
/// tracing, and the injected state.
pub fn app(state: AppState, allowed_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    routes()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn task_collection() -> MethodRouter<AppState> {
    get(tasks::routes::list)
        .post(tasks::routes::create)
        .fallback(collection_method_not_allowed)
}

fn task_item() -> MethodRouter<AppState> {
    axum::routing::put(tasks::routes::update)
        .delete(tasks::routes::delete)
        .fallback(item_method_not_allowed)
}

async fn preflight(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(req).await
}

async fn collection_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method not allowed")
}

async fn item_method_not_allowed(uri: Uri) -> ApiError {
    let id = uri
        .path()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    match tasks::routes::parse_task_id(id, &uri) {
        Ok(_) => ApiError::MethodNotAllowed("Method not allowed for task operations"),
        Err(e) => e,
    }
}

async fn endpoint_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound { path: uri.path().to_string() }
}
