use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use common::{FrequencyKind, PaymentState, PaymentView};
use futures::future::join_all;
use model::entities::scheduled_payment;
use model::entities::user;
use rust_decimal::Decimal;
use schedule::{PaymentTemplate, ScheduleError, convert, generate_occurrences, validate_template};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Request body for creating a scheduled payment series. This is the payment
/// template; the server expands it into one row per occurrence.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatePaymentSeriesRequest {
    /// Title of the payment
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Amount of each occurrence
    pub amount: Decimal,
    /// Date of the first occurrence
    pub start_date: NaiveDate,
    /// Frequency: Once, Daily, Weekly, Monthly or Yearly
    pub frequency: String, // Will be parsed to FrequencyKind
    /// Optional date of the last occurrence (must be after start_date)
    pub end_date: Option<NaiveDate>,
    /// The user this payment belongs to
    pub owner_id: i32,
}

/// Request body for editing a single payment occurrence
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdatePaymentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    /// The occurrence's own date
    pub due_date: Option<NaiveDate>,
    /// Not required to be in the future; editing keeps past start dates
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub frequency: Option<String>, // Will be parsed to FrequencyKind
}

/// Request body for changing a payment's canonical status
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdatePaymentStatusRequest {
    /// New canonical status: Pending, Paid or Overdue
    pub status: String,
}

/// Result of expanding and submitting a payment template. Occurrence
/// creation calls run concurrently and are not atomic: `created` lists what
/// was persisted even when `failed` is non-zero.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentSeriesCreated {
    /// Identifier shared by every occurrence of this submission
    pub series_id: String,
    /// Number of occurrences the template expanded into
    pub requested: usize,
    /// Occurrences that were persisted
    pub created: Vec<PaymentView>,
    /// Number of occurrences that failed to persist (not rolled back)
    pub failed: usize,
}

/// Query parameters for listing payments
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct PaymentQuery {
    /// Page number (default: 1)
    pub page: Option<u64>,
    /// Page size (default: 50)
    pub limit: Option<u64>,
    /// Filter by owner
    pub owner_id: Option<i32>,
    /// Filter by recurrence series
    pub series_id: Option<String>,
    /// Filter by canonical status
    pub status: Option<String>,
}

/// Query parameters for deleting a payment
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct DeletePaymentQuery {
    /// When true, delete every occurrence sharing the payment's series id
    pub series: Option<bool>,
}

// Helper function to parse a frequency string to FrequencyKind
fn parse_frequency(frequency_str: &str) -> Result<FrequencyKind, String> {
    FrequencyKind::parse(frequency_str)
        .ok_or_else(|| format!("Invalid frequency: {}", frequency_str))
}

/// Create a scheduled payment series from a template
///
/// The template is validated, expanded into occurrences and every occurrence
/// is submitted as an independent insert; all inserts run concurrently and
/// the handler waits for each to succeed or fail. A partial failure leaves
/// the persisted occurrences in place and reports both counts.
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "payments",
    request_body = CreatePaymentSeriesRequest,
    responses(
        (status = 201, description = "All occurrences created successfully", body = ApiResponse<PaymentSeriesCreated>),
        (status = 207, description = "Some occurrences failed to persist; created ones are not rolled back", body = ApiResponse<PaymentSeriesCreated>),
        (status = 400, description = "Invalid template", body = ErrorResponse),
        (status = 404, description = "Owner not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_payment_series(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentSeriesRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentSeriesCreated>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering create_payment_series function");
    debug!("Creating payment series: {}", request.title);

    // Parse the frequency
    let frequency = match parse_frequency(&request.frequency) {
        Ok(f) => f,
        Err(e) => {
            warn!("Invalid frequency: {}", e);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(e, "INVALID_FREQUENCY")),
            ));
        }
    };

    let template = PaymentTemplate {
        title: request.title,
        description: request.description,
        amount: request.amount,
        start_date: request.start_date,
        frequency,
        end_date: request.end_date,
        owner_id: request.owner_id,
    };

    // Expand the template; an invalid template generates nothing.
    let drafts = match generate_occurrences(&template) {
        Ok(drafts) => drafts,
        Err(ScheduleError::Validation(errors)) => {
            warn!("Payment template failed validation: {}", errors);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::validation(&errors)),
            ));
        }
        Err(e) => {
            error!("Failed to expand payment template: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to expand payment template", "DATE_ERROR")),
            ));
        }
    };

    // The owner must exist before fanning out inserts.
    match user::Entity::find_by_id(template.owner_id).one(&state.db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!("Owner with ID {} not found", template.owner_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    format!("User with id {} does not exist", template.owner_id),
                    "OWNER_NOT_FOUND",
                )),
            ));
        }
        Err(e) => {
            error!("Database error while checking owner existence: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to check owner existence", "DATABASE_ERROR")),
            ));
        }
    }

    let series_id = Uuid::new_v4().to_string();
    let requested = drafts.len();
    debug!(
        "Submitting {} occurrences for series {}",
        requested, series_id
    );

    // One independent creation call per occurrence, all issued concurrently.
    // There is no atomicity across the batch.
    let inserts = drafts.into_iter().map(|draft| {
        let new_payment = scheduled_payment::ActiveModel {
            series_id: Set(series_id.clone()),
            title: Set(draft.title),
            description: Set(draft.description),
            amount: Set(draft.amount),
            due_date: Set(draft.due_date),
            start_date: Set(draft.start_date),
            end_date: Set(draft.end_date),
            frequency: Set(convert::frequency(draft.frequency)),
            status: Set(scheduled_payment::PaymentStatus::Pending),
            owner_id: Set(draft.owner_id),
            ..Default::default()
        };
        new_payment.insert(&state.db)
    });

    let results = join_all(inserts).await;

    let mut created = Vec::new();
    let mut failed = 0usize;
    for result in results {
        match result {
            Ok(payment) => created.push(convert::payment_view(&payment)),
            Err(e) => {
                error!("Failed to create occurrence in series {}: {}", series_id, e);
                failed += 1;
            }
        }
    }

    if created.is_empty() {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(
                "Failed to create any payment occurrence",
                "DATABASE_ERROR",
            )),
        ));
    }

    let (status_code, message) = if failed == 0 {
        info!(
            "Successfully created {} occurrences for series {}",
            created.len(),
            series_id
        );
        (
            StatusCode::CREATED,
            format!("Created {} payment occurrences", created.len()),
        )
    } else {
        warn!(
            "Partial creation for series {}: {} of {} persisted, {} failed",
            series_id,
            created.len(),
            requested,
            failed
        );
        (
            StatusCode::MULTI_STATUS,
            format!(
                "Created {} of {} payment occurrences; {} failed and were not rolled back",
                created.len(),
                requested,
                failed
            ),
        )
    };

    let response = ApiResponse {
        data: PaymentSeriesCreated {
            series_id,
            requested,
            created,
            failed,
        },
        message,
        success: failed == 0,
    };
    Ok((status_code, Json(response)))
}

/// Get all scheduled payments
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "payments",
    params(PaymentQuery),
    responses(
        (status = 200, description = "Payments retrieved successfully", body = ApiResponse<Vec<PaymentView>>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_payments(
    Query(query): Query<PaymentQuery>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<PaymentView>>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_payments function");

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);

    debug!("Fetching payments - page: {}, limit: {}", page, limit);

    let mut query_builder = scheduled_payment::Entity::find();

    // Apply filters
    if let Some(owner_id) = query.owner_id {
        query_builder = query_builder.filter(scheduled_payment::Column::OwnerId.eq(owner_id));
    }

    if let Some(series_id) = query.series_id {
        query_builder = query_builder.filter(scheduled_payment::Column::SeriesId.eq(series_id));
    }

    if let Some(status_str) = query.status {
        let Some(status) = PaymentState::parse(&status_str) else {
            warn!("Invalid status filter: {}", status_str);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    format!("Invalid status: {}", status_str),
                    "INVALID_STATUS",
                )),
            ));
        };
        query_builder =
            query_builder.filter(scheduled_payment::Column::Status.eq(convert::payment_status(status)));
    }

    match query_builder
        .order_by_asc(scheduled_payment::Column::DueDate)
        .order_by_asc(scheduled_payment::Column::Id)
        .paginate(&state.db, limit)
        .fetch_page(page - 1)
        .await
    {
        Ok(payments) => {
            info!("Successfully retrieved {} payments", payments.len());
            let response_data: Vec<PaymentView> =
                payments.iter().map(convert::payment_view).collect();

            let response = ApiResponse {
                data: response_data,
                message: "Payments retrieved successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to retrieve payments: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to retrieve payments", "DATABASE_ERROR")),
            ))
        }
    }
}

/// Get a specific scheduled payment by ID
#[utoipa::path(
    get,
    path = "/api/v1/payments/{payment_id}",
    tag = "payments",
    params(
        ("payment_id" = i32, Path, description = "Payment ID"),
    ),
    responses(
        (status = 200, description = "Payment retrieved successfully", body = ApiResponse<PaymentView>),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_payment(
    Path(payment_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentView>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_payment function");
    debug!("Fetching payment with ID: {}", payment_id);

    match scheduled_payment::Entity::find_by_id(payment_id)
        .one(&state.db)
        .await
    {
        Ok(Some(payment)) => {
            info!("Successfully retrieved payment: {}", payment.title);
            let response = ApiResponse {
                data: convert::payment_view(&payment),
                message: "Payment retrieved successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Ok(None) => {
            warn!("Payment with ID {} not found", payment_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    format!("Payment with id {} does not exist", payment_id),
                    "PAYMENT_NOT_FOUND",
                )),
            ))
        }
        Err(e) => {
            error!("Database error while fetching payment: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to retrieve payment", "DATABASE_ERROR")),
            ))
        }
    }
}

/// Edit a single payment occurrence
#[utoipa::path(
    put,
    path = "/api/v1/payments/{payment_id}",
    tag = "payments",
    request_body = UpdatePaymentRequest,
    params(
        ("payment_id" = i32, Path, description = "Payment ID"),
    ),
    responses(
        (status = 200, description = "Payment updated successfully", body = ApiResponse<PaymentView>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_payment(
    Path(payment_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentView>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_payment function");
    debug!("Updating payment with ID: {}", payment_id);

    // First, fetch the existing payment
    let existing_payment = match scheduled_payment::Entity::find_by_id(payment_id)
        .one(&state.db)
        .await
    {
        Ok(Some(payment)) => payment,
        Ok(None) => {
            warn!("Payment with ID {} not found", payment_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    format!("Payment with id {} does not exist", payment_id),
                    "PAYMENT_NOT_FOUND",
                )),
            ));
        }
        Err(e) => {
            error!("Database error while fetching payment: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to retrieve payment", "DATABASE_ERROR")),
            ));
        }
    };

    // Parse frequency if provided
    let frequency = if let Some(frequency_str) = &request.frequency {
        match parse_frequency(frequency_str) {
            Ok(f) => Some(f),
            Err(e) => {
                warn!("Invalid frequency: {}", e);
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(e, "INVALID_FREQUENCY")),
                ));
            }
        }
    } else {
        None
    };

    // Re-validate the template the edited payment would describe. The start
    // date may be in the past; the other constraints still hold.
    let edited_template = PaymentTemplate {
        title: request
            .title
            .clone()
            .unwrap_or_else(|| existing_payment.title.clone()),
        description: request
            .description
            .clone()
            .or_else(|| existing_payment.description.clone()),
        amount: request.amount.unwrap_or(existing_payment.amount),
        start_date: request.start_date.unwrap_or(existing_payment.start_date),
        frequency: frequency.unwrap_or_else(|| convert::frequency_kind(&existing_payment.frequency)),
        end_date: request.end_date.or(existing_payment.end_date),
        owner_id: existing_payment.owner_id,
    };
    if let Err(errors) = validate_template(&edited_template) {
        warn!("Edited payment failed validation: {}", errors);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation(&errors)),
        ));
    }

    // Create the update model
    let mut update_model: scheduled_payment::ActiveModel = existing_payment.into();

    if let Some(title) = request.title {
        update_model.title = Set(title);
    }
    if let Some(description) = request.description {
        update_model.description = Set(Some(description));
    }
    if let Some(amount) = request.amount {
        update_model.amount = Set(amount);
    }
    if let Some(due_date) = request.due_date {
        update_model.due_date = Set(due_date);
    }
    if let Some(start_date) = request.start_date {
        update_model.start_date = Set(start_date);
    }
    if let Some(end_date) = request.end_date {
        update_model.end_date = Set(Some(end_date));
    }
    if let Some(f) = frequency {
        update_model.frequency = Set(convert::frequency(f));
    }

    match update_model.update(&state.db).await {
        Ok(updated_payment) => {
            info!("Successfully updated payment with ID: {}", updated_payment.id);
            let response = ApiResponse {
                data: convert::payment_view(&updated_payment),
                message: "Payment updated successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to update payment: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to update payment", "DATABASE_ERROR")),
            ))
        }
    }
}

/// Change a payment's canonical status
#[utoipa::path(
    put,
    path = "/api/v1/payments/{payment_id}/status",
    tag = "payments",
    request_body = UpdatePaymentStatusRequest,
    params(
        ("payment_id" = i32, Path, description = "Payment ID"),
    ),
    responses(
        (status = 200, description = "Payment status updated successfully", body = ApiResponse<PaymentView>),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_payment_status(
    Path(payment_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdatePaymentStatusRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentView>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_payment_status function");
    debug!(
        "Updating status of payment {} to '{}'",
        payment_id, request.status
    );

    let Some(status) = PaymentState::parse(&request.status) else {
        warn!("Invalid status: {}", request.status);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                format!("Invalid status: {}", request.status),
                "INVALID_STATUS",
            )),
        ));
    };

    let existing_payment = match scheduled_payment::Entity::find_by_id(payment_id)
        .one(&state.db)
        .await
    {
        Ok(Some(payment)) => payment,
        Ok(None) => {
            warn!("Payment with ID {} not found", payment_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    format!("Payment with id {} does not exist", payment_id),
                    "PAYMENT_NOT_FOUND",
                )),
            ));
        }
        Err(e) => {
            error!("Database error while fetching payment: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to retrieve payment", "DATABASE_ERROR")),
            ));
        }
    };

    let mut update_model: scheduled_payment::ActiveModel = existing_payment.into();
    update_model.status = Set(convert::payment_status(status));

    match update_model.update(&state.db).await {
        Ok(updated_payment) => {
            info!(
                "Payment {} status changed to {:?}",
                updated_payment.id, updated_payment.status
            );
            let response = ApiResponse {
                data: convert::payment_view(&updated_payment),
                message: "Payment status updated successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to update payment status: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Failed to update payment status",
                    "DATABASE_ERROR",
                )),
            ))
        }
    }
}

/// Delete a payment occurrence, or its whole series
#[utoipa::path(
    delete,
    path = "/api/v1/payments/{payment_id}",
    tag = "payments",
    params(
        ("payment_id" = i32, Path, description = "Payment ID"),
        DeletePaymentQuery,
    ),
    responses(
        (status = 200, description = "Payment deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_payment(
    Path(payment_id): Path<i32>,
    Query(query): Query<DeletePaymentQuery>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<String>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering delete_payment function");
    let delete_series = query.series.unwrap_or(false);
    debug!(
        "Deleting payment with ID: {} (series: {})",
        payment_id, delete_series
    );

    // First, check if the payment exists
    let payment = match scheduled_payment::Entity::find_by_id(payment_id)
        .one(&state.db)
        .await
    {
        Ok(Some(payment)) => payment,
        Ok(None) => {
            warn!("Payment with ID {} not found", payment_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    format!("Payment with id {} does not exist", payment_id),
                    "PAYMENT_NOT_FOUND",
                )),
            ));
        }
        Err(e) => {
            error!("Database error while checking payment existence: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Failed to check payment existence",
                    "DATABASE_ERROR",
                )),
            ));
        }
    };

    let result = if delete_series {
        scheduled_payment::Entity::delete_many()
            .filter(scheduled_payment::Column::SeriesId.eq(payment.series_id.clone()))
            .exec(&state.db)
            .await
    } else {
        scheduled_payment::Entity::delete_by_id(payment_id)
            .exec(&state.db)
            .await
    };

    match result {
        Ok(deleted) => {
            info!(
                "Deleted {} payment(s) for request on ID {}",
                deleted.rows_affected, payment_id
            );
            let data = if delete_series {
                format!(
                    "Deleted {} occurrences of series {}",
                    deleted.rows_affected, payment.series_id
                )
            } else {
                format!("Payment with id {} deleted successfully", payment_id)
            };
            let response = ApiResponse {
                data,
                message: "Payment deleted successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to delete payment: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to delete payment", "DATABASE_ERROR")),
            ))
        }
    }
}
