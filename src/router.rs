use crate::handlers::{
    classification::{get_payment_buckets, get_payment_calendar},
    health::health_check,
    payments::{
        create_payment_series, delete_payment, get_payment, get_payments, update_payment,
        update_payment_status,
    },
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // User CRUD routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Scheduled payment routes
        .route("/api/v1/payments", post(create_payment_series))
        .route("/api/v1/payments", get(get_payments))
        // Derived views; static segments take priority over :payment_id
        .route("/api/v1/payments/buckets", get(get_payment_buckets))
        .route("/api/v1/payments/calendar", get(get_payment_calendar))
        .route("/api/v1/payments/:payment_id", get(get_payment))
        .route("/api/v1/payments/:payment_id", put(update_payment))
        .route("/api/v1/payments/:payment_id", delete(delete_payment))
        .route(
            "/api/v1/payments/:payment_id/status",
            put(update_payment_status),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
