//! Order submission route.

use axum::extract::State;
use axum::response::Response;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::extract::LenientJson;
use crate::models::OrderSubmission;
use crate::response::Ack;
use crate::services::create_order;
use crate::state::AppState;

/// Create an order. Every valid submission inserts a new row.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    body: std::result::Result<LenientJson<OrderSubmission>, AppError>,
) -> Response {
    let format = state.format();
    match create(&state, body).await {
        Ok(ack) => format.success(ack),
        Err(err) => err.render(format),
    }
}

async fn create(
    state: &AppState,
    body: std::result::Result<LenientJson<OrderSubmission>, AppError>,
) -> Result<Ack> {
    let LenientJson(submission) = body?;
    let order = submission.validate()?;
    let id = create_order(state.store(), &order).await?;
    Ok(Ack::Order { id })
}
