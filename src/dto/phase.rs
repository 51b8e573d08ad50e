use serde::Serialize;
use utoipa::ToSchema;

use crate::state::{room::RoomStatus, round::RoundPhase};

/// Publicly visible room status exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleRoomStatus {
    /// Players are gathering in the lobby.
    Lobby,
    /// Players are contributing their tracks.
    AddingSongs,
    /// The round loop is running.
    Playing,
    /// Final results are on display.
    Finished,
}

impl From<RoomStatus> for VisibleRoomStatus {
    fn from(value: RoomStatus) -> Self {
        match value {
            RoomStatus::Lobby => VisibleRoomStatus::Lobby,
            RoomStatus::AddingSongs => VisibleRoomStatus::AddingSongs,
            RoomStatus::Playing => VisibleRoomStatus::Playing,
            RoomStatus::Finished => VisibleRoomStatus::Finished,
        }
    }
}

/// Publicly visible phase of the round in progress.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleRoundPhase {
    /// Pre-clip countdown.
    Countdown,
    /// The clip is playing.
    PlayingClip,
    /// The answer window is open.
    Answering,
    /// Track and guesses revealed.
    Reveal,
}

impl From<RoundPhase> for VisibleRoundPhase {
    fn from(value: RoundPhase) -> Self {
        match value {
            RoundPhase::Countdown => VisibleRoundPhase::Countdown,
            RoundPhase::PlayingClip => VisibleRoundPhase::PlayingClip,
            RoundPhase::Answering => VisibleRoundPhase::Answering,
            RoundPhase::Reveal => VisibleRoundPhase::Reveal,
        }
    }
}
