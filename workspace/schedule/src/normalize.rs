use chrono::{NaiveDate, NaiveDateTime};
use common::{FrequencyKind, PaymentState, PaymentView};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use tracing::warn;

/// A payment record as the legacy backend emitted it: field names in
/// camelCase or PascalCase depending on the endpoint, status as a free-form
/// Spanish string under `status` or `estado`, an `activo` boolean sometimes
/// standing in for status, amounts as string or number, dates as strings in
/// more than one format.
///
/// This shape exists only at the ingestion boundary. Everything past
/// [`normalize`] works on [`PaymentView`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPaymentRecord {
    #[serde(default, alias = "Id", alias = "paymentId", alias = "PaymentId")]
    pub id: Option<i32>,
    #[serde(default, alias = "Title")]
    pub title: Option<String>,
    #[serde(default, alias = "Description")]
    pub description: Option<String>,
    #[serde(
        default,
        alias = "Amount",
        deserialize_with = "deserialize_lenient_amount"
    )]
    pub amount: Option<Decimal>,
    #[serde(default, alias = "dueDate", alias = "DueDate")]
    pub due_date: Option<String>,
    #[serde(default, alias = "startDate", alias = "StartDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate", alias = "EndDate")]
    pub end_date: Option<String>,
    #[serde(default, alias = "Frequency")]
    pub frequency: Option<String>,
    #[serde(default, alias = "Status", alias = "estado", alias = "Estado")]
    pub status: Option<String>,
    #[serde(default, alias = "Active", alias = "activo", alias = "Activo")]
    pub active: Option<bool>,
    #[serde(default, alias = "ownerId", alias = "OwnerId")]
    pub owner_id: Option<i32>,
}

/// Legacy amounts arrive as JSON numbers or as strings. Anything else, or a
/// string that is not a decimal, reads as absent.
fn deserialize_lenient_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => Decimal::from_str(&n.to_string()).ok(),
        Some(serde_json::Value::String(s)) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    })
}

/// A tolerated irregularity found while normalizing a raw record. The record
/// is always kept; anomalies surface through logs and import reports, never
/// by dropping the payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationAnomaly {
    /// The status string matched no row of the mapping table.
    UnknownStatus { raw: String },
    /// A date field was present but could not be parsed.
    UnparseableDate { field: &'static str, raw: String },
}

impl std::fmt::Display for NormalizationAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizationAnomaly::UnknownStatus { raw } => {
                write!(f, "unrecognized status '{}'", raw)
            }
            NormalizationAnomaly::UnparseableDate { field, raw } => {
                write!(f, "unparseable {} '{}'", field, raw)
            }
        }
    }
}

/// Maps one raw backend record onto the canonical payment shape.
///
/// Status mapping, case-insensitive:
/// - `pagado`, `completado`, `activo` -> Paid
/// - `vencido`, `cancelado` -> Overdue
/// - any other string -> fall back to the boolean flag (true -> Paid,
///   otherwise Pending) and report the string as an anomaly
/// - no status string -> the boolean flag decides; absent entirely -> Pending
///
/// The outward `active` flag is derived from the final status and never taken
/// from the record, so the two can never disagree.
pub fn normalize(raw: &RawPaymentRecord) -> (PaymentView, Vec<NormalizationAnomaly>) {
    let mut anomalies = Vec::new();

    let status = match raw.status.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => match s.to_lowercase().as_str() {
            "pagado" | "completado" | "activo" => PaymentState::Paid,
            "vencido" | "cancelado" => PaymentState::Overdue,
            _ => {
                anomalies.push(NormalizationAnomaly::UnknownStatus { raw: s.to_string() });
                status_from_flag(raw.active)
            }
        },
        _ => status_from_flag(raw.active),
    };

    let due_date = parse_date(&raw.due_date, "dueDate", &mut anomalies);
    let start_date = parse_date(&raw.start_date, "startDate", &mut anomalies);
    let end_date = parse_date(&raw.end_date, "endDate", &mut anomalies);

    let frequency = raw
        .frequency
        .as_deref()
        .and_then(FrequencyKind::parse)
        .unwrap_or(FrequencyKind::Once);

    for anomaly in &anomalies {
        warn!("Normalization anomaly in record {:?}: {}", raw.id, anomaly);
    }

    let view = PaymentView {
        id: raw.id.unwrap_or(0),
        series_id: None,
        title: raw.title.clone().unwrap_or_default(),
        description: raw.description.clone(),
        amount: raw.amount.unwrap_or(Decimal::ZERO),
        due_date,
        start_date,
        end_date,
        frequency,
        status,
        active: status == PaymentState::Paid,
        owner_id: raw.owner_id,
    };

    (view, anomalies)
}

fn status_from_flag(flag: Option<bool>) -> PaymentState {
    if flag == Some(true) {
        PaymentState::Paid
    } else {
        PaymentState::Pending
    }
}

/// Accepts the date spellings seen in legacy dumps: ISO dates, ISO datetimes
/// and day-first slashed dates. A present-but-unparseable value is an
/// anomaly; an absent value is not.
fn parse_date(
    value: &Option<String>,
    field: &'static str,
    anomalies: &mut Vec<NormalizationAnomaly>,
) -> Option<NaiveDate> {
    let raw = value.as_deref()?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(datetime.date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return Some(date);
    }

    anomalies.push(NormalizationAnomaly::UnparseableDate {
        field,
        raw: raw.to_string(),
    });
    None
}
