use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use common::{CalendarEvent, PaymentBuckets, PaymentView};
use model::entities::scheduled_payment;
use schedule::{calendar_events, classify, convert};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, error, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use serde::Deserialize;

/// Query parameters for the derived payment views
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ClassificationQuery {
    /// The "today" used for all relative-date checks (YYYY-MM-DD).
    /// Defaults to the current date.
    pub reference_date: Option<NaiveDate>,
    /// Restrict the views to one owner's payments
    pub owner_id: Option<i32>,
}

/// Fetches the payment list the views are derived from. Classification is
/// recomputed from this list on every request; membership is never cached.
async fn fetch_payment_views(
    state: &AppState,
    owner_id: Option<i32>,
) -> Result<Vec<PaymentView>, sea_orm::DbErr> {
    let mut query_builder = scheduled_payment::Entity::find();

    if let Some(owner_id) = owner_id {
        query_builder = query_builder.filter(scheduled_payment::Column::OwnerId.eq(owner_id));
    }

    let payments = query_builder
        .order_by_asc(scheduled_payment::Column::DueDate)
        .order_by_asc(scheduled_payment::Column::Id)
        .all(&state.db)
        .await?;

    Ok(payments.iter().map(convert::payment_view).collect())
}

fn resolve_reference_date(query: &ClassificationQuery) -> NaiveDate {
    query
        .reference_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive())
}

/// Get the all/upcoming/overdue payment buckets
#[utoipa::path(
    get,
    path = "/api/v1/payments/buckets",
    tag = "classification",
    params(ClassificationQuery),
    responses(
        (status = 200, description = "Payment buckets computed successfully", body = ApiResponse<PaymentBuckets>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_payment_buckets(
    Query(query): Query<ClassificationQuery>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentBuckets>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_payment_buckets function");

    let reference_date = resolve_reference_date(&query);
    debug!("Computing payment buckets for reference date {}", reference_date);

    let views = match fetch_payment_views(&state, query.owner_id).await {
        Ok(views) => views,
        Err(e) => {
            error!("Failed to retrieve payments for classification: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to retrieve payments", "DATABASE_ERROR")),
            ));
        }
    };

    let buckets = classify(&views, reference_date);
    info!(
        "Computed buckets: {} payments, {} upcoming, {} overdue",
        buckets.all.len(),
        buckets.upcoming.len(),
        buckets.overdue.len()
    );

    let response = ApiResponse {
        data: buckets,
        message: "Payment buckets computed successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::OK, Json(response)))
}

/// Get the calendar events derived from the payment list
#[utoipa::path(
    get,
    path = "/api/v1/payments/calendar",
    tag = "classification",
    params(ClassificationQuery),
    responses(
        (status = 200, description = "Calendar events computed successfully", body = ApiResponse<Vec<CalendarEvent>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_payment_calendar(
    Query(query): Query<ClassificationQuery>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<CalendarEvent>>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering get_payment_calendar function");

    let reference_date = resolve_reference_date(&query);
    debug!("Computing calendar events for reference date {}", reference_date);

    let views = match fetch_payment_views(&state, query.owner_id).await {
        Ok(views) => views,
        Err(e) => {
            error!("Failed to retrieve payments for calendar: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to retrieve payments", "DATABASE_ERROR")),
            ));
        }
    };

    let events = calendar_events(&views, reference_date);
    info!("Computed {} calendar events", events.len());

    let response = ApiResponse {
        data: events,
        message: "Calendar events computed successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::OK, Json(response)))
}
