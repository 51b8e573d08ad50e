use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::round::{
        AdvanceResponse, RoundActionRequest, RoundSnapshot, SubmitAnswerRequest,
        SubmitAnswerResponse,
    },
    error::AppError,
    services::round_service,
    state::SharedState,
};

/// Routes driving the round in progress.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/round", get(round_snapshot))
        .route("/round/answer", post(submit_answer))
        .route("/round/force-end", post(force_end))
        .route("/round/advance", post(advance))
}

/// Fetch the state of the round in progress.
#[utoipa::path(
    get,
    path = "/round",
    tag = "round",
    responses(
        (status = 200, description = "Current round state", body = RoundSnapshot),
        (status = 409, description = "No round in progress")
    )
)]
pub async fn round_snapshot(
    State(state): State<SharedState>,
) -> Result<Json<RoundSnapshot>, AppError> {
    let snapshot = round_service::round_snapshot(&state).await?;
    Ok(Json(snapshot))
}

/// Submit a guess for the current round.
#[utoipa::path(
    post,
    path = "/round/answer",
    tag = "round",
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Guess recorded", body = SubmitAnswerResponse),
        (status = 409, description = "Submission refused (wrong phase, duplicate, or own track)")
    )
)]
pub async fn submit_answer(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SubmitAnswerRequest>>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    let response = round_service::submit_answer(&state, payload).await?;
    Ok(Json(response))
}

/// Host-only: close the answer window early.
#[utoipa::path(
    post,
    path = "/round/force-end",
    tag = "round",
    request_body = RoundActionRequest,
    responses(
        (status = 200, description = "Answer window closed", body = RoundSnapshot),
        (status = 401, description = "Caller is not the host"),
        (status = 409, description = "Not currently answering")
    )
)]
pub async fn force_end(
    State(state): State<SharedState>,
    Json(payload): Json<RoundActionRequest>,
) -> Result<Json<RoundSnapshot>, AppError> {
    let snapshot = round_service::force_end(&state, payload.player_id).await?;
    Ok(Json(snapshot))
}

/// Move past the reveal to the next round or the final standings.
#[utoipa::path(
    post,
    path = "/round/advance",
    tag = "round",
    request_body = RoundActionRequest,
    responses(
        (status = 200, description = "Advanced", body = AdvanceResponse),
        (status = 409, description = "Not currently revealing")
    )
)]
pub async fn advance(
    State(state): State<SharedState>,
    Json(payload): Json<RoundActionRequest>,
) -> Result<Json<AdvanceResponse>, AppError> {
    let response = round_service::advance(&state, payload.player_id).await?;
    Ok(Json(response))
}
