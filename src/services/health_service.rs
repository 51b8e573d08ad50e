use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload reporting whether a room is live.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let room_active = state.read_room(|room| room.is_some()).await;
    HealthResponse::ok(room_active)
}
