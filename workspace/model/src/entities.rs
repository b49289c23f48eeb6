//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the scheduled-payment tracking
//! application here: users and the payment occurrences they own.

pub mod scheduled_payment;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::scheduled_payment::Entity as ScheduledPayment;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, QueryFilter, Set,
    };

    use super::*;
    use super::prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Try to apply migrations first
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        // Setup database
        let db = setup_db().await?;

        // Create a user
        let owner = user::ActiveModel {
            username: Set("user1".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create two occurrences of the same series
        let series_id = "a1b2c3".to_string();
        for (month, status) in [
            (1, scheduled_payment::PaymentStatus::Paid),
            (2, scheduled_payment::PaymentStatus::Pending),
        ] {
            scheduled_payment::ActiveModel {
                series_id: Set(series_id.clone()),
                title: Set("Rent".to_string()),
                description: Set(None),
                amount: Set(Decimal::new(10_000, 2)),
                due_date: Set(NaiveDate::from_ymd_opt(2025, month, 1).unwrap()),
                start_date: Set(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
                end_date: Set(NaiveDate::from_ymd_opt(2025, 2, 1)),
                frequency: Set(scheduled_payment::Frequency::Monthly),
                status: Set(status),
                owner_id: Set(owner.id),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }

        let stored = ScheduledPayment::find()
            .filter(scheduled_payment::Column::SeriesId.eq(series_id.clone()))
            .all(&db)
            .await?;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].status, scheduled_payment::PaymentStatus::Paid);
        assert_eq!(stored[1].frequency, scheduled_payment::Frequency::Monthly);

        // Deleting the owner cascades to the payments
        User::delete_by_id(owner.id).exec(&db).await?;
        let remaining = ScheduledPayment::find()
            .filter(scheduled_payment::Column::SeriesId.eq(series_id))
            .all(&db)
            .await?;
        assert!(remaining.is_empty());

        Ok(())
    }
}
