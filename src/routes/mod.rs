//! Route definitions for the store API.

pub mod auth;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod upload;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::services::upload::UPLOADS_URL_PREFIX;
use crate::AppState;

/// CORS policy allowing the configured frontend origin (`*` allows any).
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if frontend_url == "*" {
        return cors.allow_origin(Any);
    }
    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!(error = %e, frontend_url, "Invalid FRONTEND_URL, allowing any origin");
            cors.allow_origin(Any)
        }
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/me", get(auth::me));

    let user_routes = Router::new()
        .route("/users", get(users::list))
        .route("/users/me", get(users::me).put(users::update_me))
        .route("/users/me/password", put(users::change_password))
        .route(
            "/users/{id}",
            get(users::get_by_id)
                .put(users::update)
                .delete(users::delete),
        );

    let category_routes = Router::new()
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            get(categories::get_by_id)
                .put(categories::update)
                .delete(categories::delete),
        );

    let product_routes = Router::new()
        .route("/products", get(products::list).post(products::create))
        .route("/products/all", get(products::list_all))
        .route("/products/suggest-product", get(products::suggest))
        .route(
            "/products/{id}",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::delete),
        );

    let order_routes = Router::new()
        .route("/orders", get(orders::list).post(orders::create))
        .route(
            "/orders/{id}",
            get(orders::get_by_id)
                .put(orders::update)
                .delete(orders::delete),
        );

    let upload_routes = Router::new().route("/upload/image", post(upload::image));

    let api = Router::new()
        .merge(auth_routes)
        .merge(user_routes)
        .merge(category_routes)
        .merge(product_routes)
        .merge(order_routes)
        .merge(upload_routes);

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api", api)
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(&state.config.upload_dir))
        .layer(
            // CorsLayer needs a `Default` response body, so it must wrap the
            // router directly rather than the limit/compression bodies.
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(RequestBodyLimitLayer::new(body_limit))
                .layer(cors_layer(&state.config.frontend_url)),
        )
        .with_state(state)
}
