use chrono::{Days, Months, NaiveDate};
use common::FrequencyKind;
use rust_decimal::Decimal;
use tracing::debug;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{Result, ScheduleError};

/// Upper bound on a single payment amount.
const MAX_AMOUNT: i64 = 999_999_999;

/// Generation cutoff for templates without an end date, counted from the
/// start date. The synthesized bound only limits generation; it is never
/// persisted as the template's end date.
const DEFAULT_HORIZON_MONTHS: u32 = 3;

/// A recurring-payment definition as submitted by the user. One template
/// expands into one or more dated occurrences.
#[derive(Debug, Clone, Validate)]
pub struct PaymentTemplate {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
    /// Not required to be in the future; editing keeps past start dates.
    pub start_date: NaiveDate,
    pub frequency: FrequencyKind,
    /// Must be strictly after `start_date` when present.
    pub end_date: Option<NaiveDate>,
    pub owner_id: i32,
}

fn validate_amount(amount: &Decimal) -> std::result::Result<(), ValidationError> {
    if *amount <= Decimal::ZERO || *amount > Decimal::from(MAX_AMOUNT) {
        return Err(ValidationError::new("amount_out_of_range"));
    }
    Ok(())
}

/// Checks all template constraints, including the cross-field date rule.
/// On failure the returned map is keyed by field name so callers can surface
/// errors inline next to the offending input.
pub fn validate_template(
    template: &PaymentTemplate,
) -> std::result::Result<(), ValidationErrors> {
    let mut errors = match template.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    if let Some(end_date) = template.end_date {
        if end_date <= template.start_date {
            errors.add(
                "end_date",
                ValidationError::new("end_date_not_after_start_date"),
            );
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// One generated occurrence, ready to be submitted as an independent
/// creation call.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceDraft {
    pub title: String,
    pub description: Option<String>,
    pub amount: Decimal,
    /// This occurrence's own date.
    pub due_date: NaiveDate,
    pub start_date: NaiveDate,
    /// None for one-off payments, the template's end date otherwise.
    pub end_date: Option<NaiveDate>,
    pub frequency: FrequencyKind,
    pub owner_id: i32,
}

/// Expands a template into its dated occurrences.
///
/// Validation runs first; an invalid template generates nothing and returns
/// the field-keyed error map. A template without an end date is expanded up
/// to three months past its start date. A one-off template emits exactly one
/// occurrence regardless of its end date.
///
/// Monthly and yearly steps use chrono's calendar arithmetic: a day-of-month
/// past the end of the target month clips to that month's last day
/// (Jan 31 -> Feb 28), and a clipped cursor stays clipped on later steps
/// (Feb 28 -> Mar 28). No month is ever skipped or emitted twice.
pub fn generate_occurrences(template: &PaymentTemplate) -> Result<Vec<OccurrenceDraft>> {
    validate_template(template)?;

    let working_end = match template.end_date {
        Some(end_date) => end_date,
        None => template
            .start_date
            .checked_add_months(Months::new(DEFAULT_HORIZON_MONTHS))
            .ok_or_else(|| {
                ScheduleError::Date(format!(
                    "generation horizon overflows past {}",
                    template.start_date
                ))
            })?,
    };

    // The emitted end date field is null for one-off payments.
    let emitted_end = match template.frequency {
        FrequencyKind::Once => None,
        _ => template.end_date,
    };

    let mut occurrences = Vec::new();
    let mut cursor = template.start_date;

    while cursor <= working_end {
        occurrences.push(OccurrenceDraft {
            title: template.title.clone(),
            description: template.description.clone(),
            amount: template.amount,
            due_date: cursor,
            start_date: template.start_date,
            end_date: emitted_end,
            frequency: template.frequency,
            owner_id: template.owner_id,
        });

        if template.frequency == FrequencyKind::Once {
            break;
        }

        cursor = advance(cursor, template.frequency)?;
    }

    debug!(
        "Expanded template '{}' ({}) into {} occurrences",
        template.title,
        template.frequency,
        occurrences.len()
    );

    Ok(occurrences)
}

/// Advances the cursor by one period of the given frequency.
fn advance(cursor: NaiveDate, frequency: FrequencyKind) -> Result<NaiveDate> {
    let next = match frequency {
        // One-off templates never advance; the generation loop stops first.
        FrequencyKind::Once => None,
        FrequencyKind::Daily => cursor.succ_opt(),
        FrequencyKind::Weekly => cursor.checked_add_days(Days::new(7)),
        FrequencyKind::Monthly => cursor.checked_add_months(Months::new(1)),
        FrequencyKind::Yearly => cursor.checked_add_months(Months::new(12)),
    };

    next.ok_or_else(|| {
        ScheduleError::Date(format!("cannot advance {} past {}", frequency, cursor))
    })
}
