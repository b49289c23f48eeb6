use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::user;

/// Canonical status of a payment occurrence. Every backend variant
/// (legacy strings, boolean flags) is normalized into these three values
/// before it reaches this entity.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "Pending")]
    Pending, // The payment is expected but not yet paid.
    #[sea_orm(string_value = "Paid")]
    Paid, // The payment has been settled.
    #[sea_orm(string_value = "Overdue")]
    Overdue, // Marked overdue explicitly, independent of date arithmetic.
}

/// Enum for occurrence frequencies.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Frequency {
    #[sea_orm(string_value = "Once")]
    Once,
    #[sea_orm(string_value = "Daily")]
    Daily,
    #[sea_orm(string_value = "Weekly")]
    Weekly,
    #[sea_orm(string_value = "Monthly")]
    Monthly,
    #[sea_orm(string_value = "Yearly")]
    Yearly,
}

/// A single, concrete dated occurrence of a scheduled payment.
/// One row is created per occurrence when a payment template is expanded;
/// all rows from the same expansion share a `series_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scheduled_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Shared by every occurrence generated from one template submission.
    /// Whole-series deletion filters on this column.
    pub series_id: String,

    pub title: String,
    pub description: Option<String>,

    /// The value of this occurrence. Always positive.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,

    /// The date this occurrence is due. Distinct from the template's start date.
    pub due_date: NaiveDate,

    /// The date of the template's first occurrence.
    pub start_date: NaiveDate,

    /// The date of the template's last occurrence. Null when the template is
    /// open-ended, and always null for one-off payments.
    pub end_date: Option<NaiveDate>,

    /// The frequency of the template this occurrence came from.
    pub frequency: Frequency,

    /// The current canonical status of this occurrence.
    pub status: PaymentStatus,

    /// The user this payment belongs to.
    pub owner_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each occurrence belongs to one owner.
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::OwnerId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
