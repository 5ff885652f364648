//! Customer submission route.

use axum::extract::State;
use axum::response::Response;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::extract::JsonOrForm;
use crate::models::CustomerSubmission;
use crate::response::Ack;
use crate::state::AppState;

/// Upsert a customer keyed by `phone_id`.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    body: std::result::Result<JsonOrForm<CustomerSubmission>, AppError>,
) -> Response {
    let format = state.format();
    match upsert(&state, body).await {
        Ok(ack) => format.success(ack),
        Err(err) => err.render(format),
    }
}

async fn upsert(
    state: &AppState,
    body: std::result::Result<JsonOrForm<CustomerSubmission>, AppError>,
) -> Result<Ack> {
    let JsonOrForm(submission) = body?;
    let reconciler = state.reconciler();
    let valid = submission.validate(reconciler.empty_key())?;

    let outcome = reconciler
        .reconcile(state.store(), valid.phone_id.as_ref(), &valid.fields)
        .await?;

    Ok(Ack::Customer {
        id: outcome.id,
        updated: outcome.was_updated,
    })
}
