//! Common transport-layer types for the payment tracking service.
//! These structs are the canonical outward shapes of the API: camelCase on
//! the wire, one closed status enumeration, `active` always derived from
//! status. Nothing in here touches the database.

mod calendar;
mod money;
mod payment;

pub use calendar::{CalendarEvent, EventColor};
pub use money::format_amount;
pub use payment::{FrequencyKind, PaymentBuckets, PaymentState, PaymentView};
