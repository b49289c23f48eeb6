use anyhow::{Context, Result, bail};
use model::entities::{scheduled_payment, user};
use schedule::{RawPaymentRecord, convert, normalize};
use sea_orm::{ActiveModelTrait, Database, EntityTrait, Set};
use std::fs::File;
use std::io::BufReader;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Ingests a legacy backend dump. Every record passes through
/// `schedule::normalize` here; nothing past this boundary ever sees the raw
/// heterogeneous shape.
pub async fn import_legacy(json_path: &str, database_url: &str, owner_id: i32) -> Result<()> {
    info!("Importing legacy payment records from {}", json_path);

    let file = File::open(json_path)
        .with_context(|| format!("Cannot open legacy dump at {}", json_path))?;
    let records: Vec<RawPaymentRecord> = serde_json::from_reader(BufReader::new(file))
        .context("Legacy dump is not a JSON array of payment records")?;
    info!("Read {} legacy records", records.len());

    let db = Database::connect(database_url).await?;

    // Legacy dumps carry no usable user table, so records without an owner
    // of their own are assigned to the one given on the command line.
    let Some(fallback_owner) = user::Entity::find_by_id(owner_id).one(&db).await? else {
        bail!("user {} does not exist; create it before importing", owner_id);
    };

    let mut imported = 0usize;
    let mut skipped = 0usize;
    let mut anomaly_count = 0usize;

    for (index, raw) in records.iter().enumerate() {
        let (view, anomalies) = normalize(raw);
        anomaly_count += anomalies.len();

        // A stored occurrence requires a due date. Records whose date failed
        // to parse stay out of the database but are counted in the report.
        let Some(due_date) = view.due_date else {
            warn!(
                "Skipping record {} ('{}'): no parsable due date",
                index, view.title
            );
            skipped += 1;
            continue;
        };

        let title = if view.title.is_empty() {
            format!("Imported payment {}", index + 1)
        } else {
            view.title.clone()
        };

        let new_payment = scheduled_payment::ActiveModel {
            series_id: Set(Uuid::new_v4().to_string()),
            title: Set(title),
            description: Set(view.description.clone()),
            amount: Set(view.amount),
            due_date: Set(due_date),
            start_date: Set(view.start_date.unwrap_or(due_date)),
            end_date: Set(view.end_date),
            frequency: Set(convert::frequency(view.frequency)),
            status: Set(convert::payment_status(view.status)),
            owner_id: Set(view.owner_id.unwrap_or(fallback_owner.id)),
            ..Default::default()
        };

        let inserted = new_payment.insert(&db).await?;
        imported += 1;
        debug!(
            "Imported legacy record {} -> payment ID {} due {}",
            index, inserted.id, inserted.due_date
        );
    }

    info!(
        "Import finished: {} records stored, {} skipped, {} anomalies tolerated",
        imported, skipped, anomaly_count
    );
    Ok(())
}
