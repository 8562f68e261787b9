use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Html;
use axum::Json;
use futures::future::try_join_all;
use serde::Serialize;
use shared::{Mode, ScoreEntry, ScoreSubmission, ServiceError};
use tracing::{error, warn};

use super::page;
use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
}

/// Landing page. Every render counts as one visit.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ServiceError> {
    let visits = state.counter.increment().await?;

    let boards = try_join_all(state.known_modes.iter().map(|mode| {
        let leaderboard = &state.leaderboard;
        async move {
            match leaderboard.get_top(mode).await {
                Ok(entries) => Ok((mode.clone(), entries)),
                // One unreadable board must not take the whole page down.
                Err(ServiceError::CorruptValue(reason)) => {
                    warn!(
                        mode = %mode,
                        reason = %reason,
                        "Rendering unreadable leaderboard as empty"
                    );
                    Ok((mode.clone(), Vec::new()))
                }
                Err(e) => Err(e),
            }
        }
    }))
    .await?;

    Ok(Html(page::render_index(visits, &boards)))
}

pub async fn submit_score(
    State(state): State<AppState>,
    payload: Result<Json<ScoreSubmission>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ServiceError> {
    let Json(submission) = payload.map_err(|rejection| {
        shared::record_counter("clicker.scores.rejected", 1);
        warn!(reason = %rejection.body_text(), "Rejected malformed score submission");
        ServiceError::InvalidInput(rejection.body_text())
    })?;

    let (mode, entry) = submission.validate().map_err(|e| {
        shared::record_counter("clicker.scores.rejected", 1);
        warn!(error = %e, "Rejected invalid score submission");
        e
    })?;

    // Runs detached: a client hanging up must not abandon the update.
    let leaderboard = state.leaderboard.clone();
    tokio::spawn(async move { leaderboard.submit(&mode, entry).await })
        .await
        .map_err(|e| {
            error!(error = %e, "Score submission task failed");
            ServiceError::Internal(format!("Score submission task failed: {}", e))
        })??;

    Ok(Json(SubmitResponse {
        message: "Score saved successfully",
    }))
}

pub async fn top_scores(
    State(state): State<AppState>,
    Path(mode): Path<String>,
) -> Result<Json<Vec<ScoreEntry>>, ServiceError> {
    let mode = Mode::new(mode)?;
    Ok(Json(state.leaderboard.get_top(&mode).await?))
}

pub async fn health_check(State(state): State<AppState>) -> Result<&'static str, ServiceError> {
    state.store.ping().await?;
    Ok("OK")
}
