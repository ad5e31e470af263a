use axum::{
    extract::State,
    response::Redirect,
    routing::post,
    Form, Router,
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::flash::{push_flash, Flash};
use crate::validation::{DestinationInput, TouristInput, VisitInput};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add_tourist", post(add_tourist))
        .route("/add_destination", post(add_destination))
        .route("/record_visit", post(record_visit))
}

/// Flash the outcome of a form post. Errors the client can fix become a
/// notice; anything else is returned to the caller.
async fn flash_outcome<T>(
    session: &Session,
    outcome: Result<T, AppError>,
    success: &str,
) -> Result<(), AppError> {
    let flash = match outcome {
        Ok(_) => Flash::success(success),
        Err(e) => match e.client_message() {
            Some(message) => Flash::danger(message),
            None => return Err(e),
        },
    };
    push_flash(session, flash).await?;
    Ok(())
}

async fn add_tourist(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<TouristInput>,
) -> Result<Redirect, AppError> {
    let outcome = super::create_tourist(&state.db, input).await;
    flash_outcome(&session, outcome, "Tourist added successfully!").await?;
    Ok(Redirect::to("/"))
}

async fn add_destination(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<DestinationInput>,
) -> Result<Redirect, AppError> {
    let outcome = super::create_destination(&state.db, input).await;
    flash_outcome(&session, outcome, "Destination added successfully!").await?;
    Ok(Redirect::to("/"))
}

async fn record_visit(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<VisitInput>,
) -> Result<Redirect, AppError> {
    let outcome = super::create_visit(&state.db, input).await;
    flash_outcome(&session, outcome, "Visit recorded successfully!").await?;
    Ok(Redirect::to("/"))
}
