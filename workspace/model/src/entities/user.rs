use sea_orm::entity::prelude::*;

/// Represents a user of the system: the owner of scheduled payments.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    // Other fields like password_hash, email, etc., would go here.
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // A user can own multiple scheduled payments.
    #[sea_orm(has_many = "super::scheduled_payment::Entity")]
    ScheduledPayment,
}

impl Related<super::scheduled_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduledPayment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
