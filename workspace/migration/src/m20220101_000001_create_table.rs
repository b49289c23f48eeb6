use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create scheduled_payments table
        manager
            .create_table(
                Table::create()
                    .table(ScheduledPayments::Table)
                    .if_not_exists()
                    .col(pk_auto(ScheduledPayments::Id))
                    .col(string(ScheduledPayments::SeriesId))
                    .col(string(ScheduledPayments::Title))
                    .col(string_null(ScheduledPayments::Description))
                    .col(decimal(ScheduledPayments::Amount).decimal_len(16, 4))
                    .col(date(ScheduledPayments::DueDate))
                    .col(date(ScheduledPayments::StartDate))
                    .col(date_null(ScheduledPayments::EndDate))
                    .col(string(ScheduledPayments::Frequency))
                    .col(string(ScheduledPayments::Status))
                    .col(integer(ScheduledPayments::OwnerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scheduled_payment_owner")
                            .from(ScheduledPayments::Table, ScheduledPayments::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Series deletion and per-series listings filter on this column.
        manager
            .create_index(
                Index::create()
                    .name("idx_scheduled_payments_series_id")
                    .table(ScheduledPayments::Table)
                    .col(ScheduledPayments::SeriesId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scheduled_payments_due_date")
                    .table(ScheduledPayments::Table)
                    .col(ScheduledPayments::DueDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScheduledPayments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
}

#[derive(DeriveIden)]
enum ScheduledPayments {
    Table,
    Id,
    SeriesId,
    Title,
    Description,
    Amount,
    DueDate,
    StartDate,
    EndDate,
    Frequency,
    Status,
    OwnerId,
}
