use chrono::{Days, NaiveDate};
use common::{
    CalendarEvent, EventColor, PaymentBuckets, PaymentState, PaymentView, format_amount,
};
use tracing::trace;

/// Length of the upcoming window, counted in days past the reference date.
/// Both ends of the window are inclusive.
const UPCOMING_WINDOW_DAYS: u64 = 30;

/// True when the payment should be treated as overdue on `reference_date`.
///
/// A payment explicitly marked Overdue always is, whatever its date says; a
/// Paid payment never is; a Pending payment is overdue once its due date is
/// in the past. Payments without a parsable due date are never overdue.
pub fn is_overdue(payment: &PaymentView, reference_date: NaiveDate) -> bool {
    match payment.status {
        PaymentState::Overdue => true,
        PaymentState::Paid => false,
        PaymentState::Pending => payment.due_date.is_some_and(|due| due < reference_date),
    }
}

/// True when the payment is pending and due within the upcoming window,
/// the reference date and day 30 both included.
pub fn is_upcoming(payment: &PaymentView, reference_date: NaiveDate) -> bool {
    if payment.status != PaymentState::Pending {
        return false;
    }
    let Some(due) = payment.due_date else {
        return false;
    };
    let Some(window_end) = reference_date.checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
    else {
        return false;
    };
    reference_date <= due && due <= window_end
}

/// Partitions payments into the derived views.
///
/// `all` keeps every input payment in its original order; nothing is ever
/// dropped from it. The overdue bucket unions the explicit status with the
/// computed check, so a record the backend already marked Overdue appears
/// even when the date arithmetic would not flag it.
///
/// All date comparisons work on calendar dates; callers pass the reference
/// date with the time of day already stripped.
pub fn classify(payments: &[PaymentView], reference_date: NaiveDate) -> PaymentBuckets {
    let all = payments.to_vec();
    let upcoming: Vec<PaymentView> = payments
        .iter()
        .filter(|p| is_upcoming(p, reference_date))
        .cloned()
        .collect();
    let overdue: Vec<PaymentView> = payments
        .iter()
        .filter(|p| p.status == PaymentState::Overdue || is_overdue(p, reference_date))
        .cloned()
        .collect();

    trace!(
        "Classified {} payments: {} upcoming, {} overdue (reference {})",
        all.len(),
        upcoming.len(),
        overdue.len(),
        reference_date
    );

    PaymentBuckets {
        all,
        upcoming,
        overdue,
    }
}

/// Display color of one payment: green when paid, red when overdue (marked
/// or computed), amber for a pending payment with a date, gray for a payment
/// that cannot be placed in time.
pub fn event_color(payment: &PaymentView, reference_date: NaiveDate) -> EventColor {
    match payment.status {
        PaymentState::Paid => EventColor::Green,
        PaymentState::Overdue => EventColor::Red,
        PaymentState::Pending if is_overdue(payment, reference_date) => EventColor::Red,
        PaymentState::Pending if payment.due_date.is_some() => EventColor::Amber,
        PaymentState::Pending => EventColor::Gray,
    }
}

/// Derives the calendar view: one event per payment, dateless payments
/// included so anomalies stay visible. The overdue flag follows the computed
/// check regardless of bucket membership; the inactive flag mirrors the
/// derived `active` field.
pub fn calendar_events(
    payments: &[PaymentView],
    reference_date: NaiveDate,
) -> Vec<CalendarEvent> {
    payments
        .iter()
        .map(|payment| {
            let overdue = is_overdue(payment, reference_date);
            CalendarEvent {
                id: payment.id,
                title: payment.title.clone(),
                date: payment.due_date,
                color: event_color(payment, reference_date),
                overdue,
                inactive: !payment.active,
                tooltip: format!(
                    "{} - {} ({})",
                    payment.title,
                    format_amount(payment.amount),
                    payment.status
                ),
            }
        })
        .collect()
}
