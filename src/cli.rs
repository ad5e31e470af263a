use sqlx::SqlitePool;
use std::collections::HashMap;
use std::fs;

use crate::routes::export::ExportDocument;
use crate::validation::{summarize, DestinationInput, TouristInput, VisitInput};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub tourists: usize,
    pub destinations: usize,
    pub visits: usize,
}

/// Load an export document from disk into the store.
pub async fn import_data(pool: &SqlitePool, file_path: &str) -> Result<ImportSummary, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file_path)?;
    let document: ExportDocument = serde_json::from_str(&content)?;
    import_document(pool, &document).await
}

/// Insert every record of `document` in one transaction.
///
/// Records get fresh ids; visits are remapped onto them. Each record passes
/// the same checks as a form or API submission. A record that fails them, or
/// a visit pointing at an id the document does not contain, aborts the whole
/// import.
pub async fn import_document(
    pool: &SqlitePool,
    document: &ExportDocument,
) -> Result<ImportSummary, Box<dyn std::error::Error>> {
    let mut tx = pool.begin().await?;
    let mut tourist_ids: HashMap<i64, i64> = HashMap::new();
    let mut destination_ids: HashMap<i64, i64> = HashMap::new();

    for tourist in &document.tourists {
        let valid = TouristInput::from(tourist)
            .validate()
            .map_err(|errors| format!("Tourist {}: {}", tourist.id, summarize(&errors)))?;
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO tourists (name, nationality, age, created_at) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&valid.name)
        .bind(&valid.nationality)
        .bind(valid.age)
        .bind(tourist.created_at)
        .fetch_one(&mut *tx)
        .await?;
        tourist_ids.insert(tourist.id, id);
    }

    for destination in &document.destinations {
        let valid = DestinationInput::from(destination)
            .validate()
            .map_err(|errors| format!("Destination {}: {}", destination.id, summarize(&errors)))?;
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO destinations (name, city, country, price) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&valid.name)
        .bind(&valid.city)
        .bind(&valid.country)
        .bind(valid.price)
        .fetch_one(&mut *tx)
        .await?;
        destination_ids.insert(destination.id, id);
    }

    for visit in &document.visits {
        let valid = VisitInput::from(visit)
            .validate()
            .map_err(|errors| format!("Visit {}: {}", visit.id, summarize(&errors)))?;
        let Some(&tourist_id) = tourist_ids.get(&visit.tourist_id) else {
            return Err(format!(
                "Visit {} references unknown tourist {}",
                visit.id, visit.tourist_id
            )
            .into());
        };
        let Some(&destination_id) = destination_ids.get(&visit.destination_id) else {
            return Err(format!(
                "Visit {} references unknown destination {}",
                visit.id, visit.destination_id
            )
            .into());
        };

        sqlx::query(
            "INSERT INTO visits (tourist_id, destination_id, visit_date, rating) VALUES (?, ?, ?, ?)",
        )
        .bind(tourist_id)
        .bind(destination_id)
        .bind(visit.visit_date)
        .bind(valid.rating)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let summary = ImportSummary {
        tourists: document.tourists.len(),
        destinations: document.destinations.len(),
        visits: document.visits.len(),
    };
    tracing::info!(
        tourists = summary.tourists,
        destinations = summary.destinations,
        visits = summary.visits,
        "import complete"
    );
    Ok(summary)
}
