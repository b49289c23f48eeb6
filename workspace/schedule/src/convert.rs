//! Conversions between the stored entity shapes and the transport shapes.
//! The outward `active` flag is derived here and nowhere else.

use common::{FrequencyKind, PaymentState, PaymentView};
use model::entities::scheduled_payment::{self, Frequency, PaymentStatus};

/// Converts the stored status into the transport enumeration.
pub fn payment_state(status: &PaymentStatus) -> PaymentState {
    match status {
        PaymentStatus::Pending => PaymentState::Pending,
        PaymentStatus::Paid => PaymentState::Paid,
        PaymentStatus::Overdue => PaymentState::Overdue,
    }
}

/// Converts a canonical transport status into the stored enumeration.
pub fn payment_status(state: PaymentState) -> PaymentStatus {
    match state {
        PaymentState::Pending => PaymentStatus::Pending,
        PaymentState::Paid => PaymentStatus::Paid,
        PaymentState::Overdue => PaymentStatus::Overdue,
    }
}

pub fn frequency_kind(frequency: &Frequency) -> FrequencyKind {
    match frequency {
        Frequency::Once => FrequencyKind::Once,
        Frequency::Daily => FrequencyKind::Daily,
        Frequency::Weekly => FrequencyKind::Weekly,
        Frequency::Monthly => FrequencyKind::Monthly,
        Frequency::Yearly => FrequencyKind::Yearly,
    }
}

pub fn frequency(kind: FrequencyKind) -> Frequency {
    match kind {
        FrequencyKind::Once => Frequency::Once,
        FrequencyKind::Daily => Frequency::Daily,
        FrequencyKind::Weekly => Frequency::Weekly,
        FrequencyKind::Monthly => Frequency::Monthly,
        FrequencyKind::Yearly => Frequency::Yearly,
    }
}

/// Builds the canonical outward view of a stored occurrence.
pub fn payment_view(model: &scheduled_payment::Model) -> PaymentView {
    let status = payment_state(&model.status);
    PaymentView {
        id: model.id,
        series_id: Some(model.series_id.clone()),
        title: model.title.clone(),
        description: model.description.clone(),
        amount: model.amount,
        due_date: Some(model.due_date),
        start_date: Some(model.start_date),
        end_date: model.end_date,
        frequency: frequency_kind(&model.frequency),
        status,
        active: status == PaymentState::Paid,
        owner_id: Some(model.owner_id),
    }
}
