use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{
    room::{PlayerSummary, RoomSummary},
    round::{RoundSnapshot, ScoreEntry},
};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Bare event with a preformatted data field.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the SSE stream (`public` or `host`).
    pub stream: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Optional host token returned when the stream is privileged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a player joins the room.
pub struct PlayerJoinedEvent {
    pub player: PlayerSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a player locks in their track contribution.
pub struct PlayerReadyEvent {
    pub player_id: Uuid,
    pub track_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
/// Broadcast whenever the round phase changes.
pub struct PhaseChangedEvent(pub RoundSnapshot);

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a guess was recorded. Only names who answered; the verdict
/// stays hidden until the reveal.
pub struct AnswerRecordedEvent {
    pub player_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
/// Broadcast after every room lifecycle change.
pub struct RoomSessionEvent(pub RoomSummary);

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast once the last round's reveal has been advanced past.
pub struct GameFinishedEvent {
    pub scoreboard: Vec<ScoreEntry>,
}
