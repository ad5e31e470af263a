use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Destination, Tourist, Visit};
use crate::store::Snapshot;
use crate::AppState;

/// Every record in the store. Read back by `cli::import_data`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportDocument {
    pub exported_at: NaiveDateTime,
    pub tourists: Vec<Tourist>,
    pub destinations: Vec<Destination>,
    pub visits: Vec<Visit>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/export", get(export_data))
}

async fn export_data(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let snapshot = Snapshot::load(&state.db).await?;

    let document = ExportDocument {
        exported_at: Utc::now().naive_utc(),
        tourists: snapshot.tourists,
        destinations: snapshot.destinations,
        visits: snapshot.visits,
    };

    let filename = format!("tourism-export-{}.json", Utc::now().format("%Y-%m-%d"));
    let content_disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        [(header::CONTENT_DISPOSITION, content_disposition)],
        Json(document),
    ))
}
