use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        room::{PlayerSummary, RoomSummary},
        round::{RoundSnapshot, ScoreEntry},
        sse::{
            AnswerRecordedEvent, GameFinishedEvent, PhaseChangedEvent, PlayerJoinedEvent,
            PlayerReadyEvent, RoomSessionEvent, ServerEvent,
        },
    },
    state::SharedState,
};

const EVENT_ROOM_SESSION: &str = "room.session";
const EVENT_PLAYER_JOINED: &str = "player.joined";
const EVENT_PLAYER_READY: &str = "player.ready";
const EVENT_PHASE_CHANGED: &str = "phase_changed";
const EVENT_ANSWER_RECORDED: &str = "answer.recorded";
const EVENT_GAME_FINISHED: &str = "game.finished";

/// Broadcast the full room view after a lifecycle change.
pub fn broadcast_room_session(state: &SharedState, summary: &RoomSummary) {
    let payload = RoomSessionEvent(summary.clone());
    send_public_event(state, EVENT_ROOM_SESSION, &payload);
}

/// Broadcast that a new player entered the lobby.
pub fn broadcast_player_joined(state: &SharedState, player: PlayerSummary) {
    let payload = PlayerJoinedEvent { player };
    send_public_event(state, EVENT_PLAYER_JOINED, &payload);
}

/// Broadcast that a player locked in their contribution.
pub fn broadcast_player_ready(state: &SharedState, player_id: Uuid, track_count: usize) {
    let payload = PlayerReadyEvent {
        player_id,
        track_count,
    };
    send_public_event(state, EVENT_PLAYER_READY, &payload);
}

/// Broadcast a round phase change with the matching snapshot.
pub fn broadcast_phase_changed(state: &SharedState, snapshot: RoundSnapshot) {
    let payload = PhaseChangedEvent(snapshot);
    send_public_event(state, EVENT_PHASE_CHANGED, &payload);
    send_host_event(state, EVENT_PHASE_CHANGED, &payload);
}

/// Broadcast that a guess was recorded, without revealing its verdict.
pub fn broadcast_answer_recorded(state: &SharedState, player_id: Uuid) {
    let payload = AnswerRecordedEvent { player_id };
    send_public_event(state, EVENT_ANSWER_RECORDED, &payload);
    send_host_event(state, EVENT_ANSWER_RECORDED, &payload);
}

/// Broadcast the final standings once the last reveal has been advanced past.
pub fn broadcast_game_finished(state: &SharedState, scoreboard: Vec<ScoreEntry>) {
    let payload = GameFinishedEvent { scoreboard };
    send_public_event(state, EVENT_GAME_FINISHED, &payload);
    send_host_event(state, EVENT_GAME_FINISHED, &payload);
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}

fn send_host_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.host_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize host SSE payload"),
    }
}
