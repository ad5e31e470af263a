use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::analytics::{self, Dashboard, Totals};
use crate::error::AppError;
use crate::flash::{Flash, Flashes};
use crate::models::{Destination, Tourist};
use crate::presentation::PieChart;
use crate::store::Snapshot;
use crate::AppState;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    totals: Totals,
    return_rate: f64,
    tourists: Vec<Tourist>,
    destinations: Vec<Destination>,
    flashes: Vec<Flash>,
    static_hash: &'static str,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    dashboard: Dashboard,
    nationality_chart: String,
    static_hash: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/dashboard", get(dashboard))
}

async fn index(
    State(state): State<AppState>,
    flashes: Flashes,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = Snapshot::load(&state.db).await?;
    let totals = analytics::totals(&snapshot);
    let return_rate = analytics::return_rate(&snapshot);

    let template = IndexTemplate {
        totals,
        return_rate,
        tourists: snapshot.tourists,
        destinations: snapshot.destinations,
        flashes: flashes.messages().to_vec(),
        static_hash: crate::STATIC_HASH,
    };
    let html = template.render()?;
    flashes.clear().await?;
    Ok(Html(html))
}

async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let snapshot = Snapshot::load(&state.db).await?;
    let dashboard = Dashboard::build(&snapshot);

    let chart = PieChart::from_pairs(
        "Tourists by Nationality",
        dashboard
            .nationality_distribution
            .iter()
            .map(|n| (n.nationality.clone(), n.count)),
    );
    tracing::debug!(
        visits = dashboard.totals.visits,
        charted = chart.total(),
        "dashboard built"
    );

    let template = DashboardTemplate {
        nationality_chart: chart.to_json()?,
        dashboard,
        static_hash: crate::STATIC_HASH,
    };
    Ok(Html(template.render()?))
}
