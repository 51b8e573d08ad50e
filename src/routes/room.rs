use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::room::{
        ContributeRequest, CreateRoomRequest, CreateRoomResponse, JoinRoomRequest,
        JoinRoomResponse, RoomActionRequest, RoomSummary,
    },
    error::AppError,
    services::room_service,
    state::SharedState,
};

/// Routes handling the room lifecycle from lobby to replay.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/join", post(join_room))
        .route("/rooms/current", get(current_room))
        .route("/rooms/collect", post(open_submission))
        .route("/rooms/tracks", post(contribute))
        .route("/rooms/restart", post(restart))
}

/// Open a new room with the caller as host.
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "room",
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Room created", body = CreateRoomResponse),
        (status = 409, description = "Another room is still in progress")
    )
)]
pub async fn create_room(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateRoomRequest>>,
) -> Result<Json<CreateRoomResponse>, AppError> {
    let response = room_service::create_room(&state, payload).await?;
    Ok(Json(response))
}

/// Join the live room by its six-character code.
#[utoipa::path(
    post,
    path = "/rooms/join",
    tag = "room",
    request_body = JoinRoomRequest,
    responses(
        (status = 200, description = "Joined the room", body = JoinRoomResponse),
        (status = 404, description = "No room with that code"),
        (status = 409, description = "The game has already started")
    )
)]
pub async fn join_room(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<JoinRoomRequest>>,
) -> Result<Json<JoinRoomResponse>, AppError> {
    let response = room_service::join_room(&state, payload).await?;
    Ok(Json(response))
}

/// Fetch the public view of the live room.
#[utoipa::path(
    get,
    path = "/rooms/current",
    tag = "room",
    responses(
        (status = 200, description = "Current room state", body = RoomSummary),
        (status = 404, description = "No active room")
    )
)]
pub async fn current_room(
    State(state): State<SharedState>,
) -> Result<Json<RoomSummary>, AppError> {
    let summary = room_service::current_room(&state).await?;
    Ok(Json(summary))
}

/// Host-only: open song submission for all players.
#[utoipa::path(
    post,
    path = "/rooms/collect",
    tag = "room",
    request_body = RoomActionRequest,
    responses(
        (status = 200, description = "Song submission opened", body = RoomSummary),
        (status = 401, description = "Caller is not the host")
    )
)]
pub async fn open_submission(
    State(state): State<SharedState>,
    Json(payload): Json<RoomActionRequest>,
) -> Result<Json<RoomSummary>, AppError> {
    let summary = room_service::open_submission(&state, payload.player_id).await?;
    Ok(Json(summary))
}

/// Lock in a player's track contribution.
#[utoipa::path(
    post,
    path = "/rooms/tracks",
    tag = "room",
    request_body = ContributeRequest,
    responses(
        (status = 200, description = "Tracks locked in", body = RoomSummary),
        (status = 400, description = "Contribution outside the allowed bounds"),
        (status = 409, description = "Submission is not open or already locked")
    )
)]
pub async fn contribute(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<ContributeRequest>>,
) -> Result<Json<RoomSummary>, AppError> {
    let summary = room_service::contribute(&state, payload).await?;
    Ok(Json(summary))
}

/// Host-only: reset a finished room back to the lobby.
#[utoipa::path(
    post,
    path = "/rooms/restart",
    tag = "room",
    request_body = RoomActionRequest,
    responses(
        (status = 200, description = "Room reset for another game", body = RoomSummary),
        (status = 409, description = "The game is not finished yet")
    )
)]
pub async fn restart(
    State(state): State<SharedState>,
    Json(payload): Json<RoomActionRequest>,
) -> Result<Json<RoomSummary>, AppError> {
    let summary = room_service::restart(&state, payload.player_id).await?;
    Ok(Json(summary))
}
