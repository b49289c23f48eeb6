use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Canonical status of a payment. The closed set every backend variant is
/// normalized into; there is no fourth value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentState {
    Pending,
    Paid,
    Overdue,
}

impl PaymentState {
    /// Parses a canonical status name, case-insensitively.
    pub fn parse(s: &str) -> Option<PaymentState> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Some(PaymentState::Pending),
            "paid" => Some(PaymentState::Paid),
            "overdue" => Some(PaymentState::Overdue),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentState::Pending => write!(f, "Pending"),
            PaymentState::Paid => write!(f, "Paid"),
            PaymentState::Overdue => write!(f, "Overdue"),
        }
    }
}

/// How often a payment template repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FrequencyKind {
    Once,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl FrequencyKind {
    /// Parses a frequency name, case-insensitively.
    pub fn parse(s: &str) -> Option<FrequencyKind> {
        match s.to_ascii_lowercase().as_str() {
            "once" => Some(FrequencyKind::Once),
            "daily" => Some(FrequencyKind::Daily),
            "weekly" => Some(FrequencyKind::Weekly),
            "monthly" => Some(FrequencyKind::Monthly),
            "yearly" => Some(FrequencyKind::Yearly),
            _ => None,
        }
    }
}

impl std::fmt::Display for FrequencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrequencyKind::Once => write!(f, "Once"),
            FrequencyKind::Daily => write!(f, "Daily"),
            FrequencyKind::Weekly => write!(f, "Weekly"),
            FrequencyKind::Monthly => write!(f, "Monthly"),
            FrequencyKind::Yearly => write!(f, "Yearly"),
        }
    }
}

/// The canonical outward representation of one payment occurrence.
///
/// `due_date` is None only for normalized legacy records whose date could not
/// be parsed; such payments are still listed but never classified as overdue
/// or upcoming. `active` is derived from `status` on every conversion and is
/// never an independent source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    /// Backend-assigned identifier. Zero for records not yet persisted.
    pub id: i32,
    /// Recurrence series identifier, shared by sibling occurrences.
    pub series_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub amount: Decimal,
    /// The occurrence's own date. None when the source date was unparseable.
    pub due_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub frequency: FrequencyKind,
    pub status: PaymentState,
    /// True iff `status == Paid`.
    pub active: bool,
    pub owner_id: Option<i32>,
}

/// Derived, non-stored partition of a payment list. Recomputed from the
/// reference date on every request; membership is never cached.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBuckets {
    /// Every input payment, order preserved.
    pub all: Vec<PaymentView>,
    /// Pending payments due within the next 30 days, bounds inclusive.
    pub upcoming: Vec<PaymentView>,
    /// Payments marked Overdue plus unpaid payments past their due date.
    pub overdue: Vec<PaymentView>,
}
