use common::{
    CalendarEvent, EventColor, FrequencyKind, PaymentBuckets, PaymentState, PaymentView,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{OpenApi, ToSchema};
use validator::ValidationErrors;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Field-keyed validation details, present only for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, Vec<String>>>,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
            success: false,
        }
    }

    /// Builds the inline, per-field error payload for a rejected template.
    pub fn validation(errors: &ValidationErrors) -> Self {
        let details: BTreeMap<String, Vec<String>> = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                (
                    field.to_string(),
                    field_errors.iter().map(|e| e.code.to_string()).collect(),
                )
            })
            .collect();

        Self {
            error: "Payment template failed validation".to_string(),
            code: "VALIDATION_ERROR".to_string(),
            details: Some(details),
            success: false,
        }
    }
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::payments::create_payment_series,
        crate::handlers::payments::get_payments,
        crate::handlers::payments::get_payment,
        crate::handlers::payments::update_payment,
        crate::handlers::payments::update_payment_status,
        crate::handlers::payments::delete_payment,
        crate::handlers::classification::get_payment_buckets,
        crate::handlers::classification::get_payment_calendar,
    ),
    components(
        schemas(
            ApiResponse<PaymentView>,
            ApiResponse<Vec<PaymentView>>,
            ApiResponse<PaymentBuckets>,
            ApiResponse<Vec<CalendarEvent>>,
            ApiResponse<String>,
            ApiResponse<crate::handlers::payments::PaymentSeriesCreated>,
            ApiResponse<crate::handlers::users::UserResponse>,
            ApiResponse<Vec<crate::handlers::users::UserResponse>>,
            ErrorResponse,
            HealthResponse,
            PaymentView,
            PaymentBuckets,
            CalendarEvent,
            EventColor,
            PaymentState,
            FrequencyKind,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::payments::CreatePaymentSeriesRequest,
            crate::handlers::payments::UpdatePaymentRequest,
            crate::handlers::payments::UpdatePaymentStatusRequest,
            crate::handlers::payments::PaymentSeriesCreated,
            crate::handlers::payments::PaymentQuery,
            crate::handlers::classification::ClassificationQuery,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User management endpoints"),
        (name = "payments", description = "Scheduled payment endpoints"),
        (name = "classification", description = "Derived payment views: buckets and calendar"),
    ),
    info(
        title = "payplan API",
        description = "Scheduled-payment tracking API - recurring payment expansion, classification and calendar views",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
