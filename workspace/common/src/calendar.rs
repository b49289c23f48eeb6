use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display color of a calendar event, derived from classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    /// Paid payments.
    Green,
    /// Pending payments with a due date that is not past.
    Amber,
    /// Payments marked Overdue, or unpaid past their due date.
    Red,
    /// Payments that cannot be placed on the calendar (no parsable date).
    Gray,
}

/// One entry of the calendar view. Derived per request from the payment list
/// and the reference date; never stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: i32,
    pub title: String,
    /// None when the payment's due date was unparseable; the event is still
    /// emitted so the anomaly stays visible.
    pub date: Option<NaiveDate>,
    pub color: EventColor,
    /// Set whenever the payment computes as overdue, regardless of bucket.
    pub overdue: bool,
    /// Set whenever the payment is not active (i.e. not Paid).
    pub inactive: bool,
    /// Title, formatted amount and status, assembled for hover display.
    pub tooltip: String,
}
