//! The scheduled-payment engine: expands payment templates into dated
//! occurrences, normalizes heterogeneous legacy records into the canonical
//! payment shape, and partitions payment lists into the derived
//! all/upcoming/overdue views.
//!
//! The engine is synchronous and side-effect free apart from tracing; it
//! never talks to the database or the network. Callers fetch, hand lists in,
//! and persist what comes out.

pub mod classify;
pub mod convert;
pub mod error;
pub mod normalize;
pub mod occurrence;

pub use classify::{calendar_events, classify, event_color, is_overdue, is_upcoming};
pub use error::{Result, ScheduleError};
pub use normalize::{NormalizationAnomaly, RawPaymentRecord, normalize};
pub use occurrence::{
    OccurrenceDraft, PaymentTemplate, generate_occurrences, validate_template,
};
