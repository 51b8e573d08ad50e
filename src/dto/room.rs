use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        format_system_time,
        phase::VisibleRoomStatus,
        round::RoundSnapshot,
        validation::{validate_answer_time, validate_clip_duration, validate_room_code},
    },
    state::room::{Player, RoomSession, Track},
};

/// Optional settings overrides supplied at room creation. Anything left out
/// falls back to the server's configured defaults.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct SettingsInput {
    /// Clip playback length in seconds.
    #[validate(custom(function = validate_clip_duration))]
    pub clip_duration_secs: Option<u8>,
    /// Answer window length in seconds.
    #[validate(custom(function = validate_answer_time))]
    pub answer_time_secs: Option<u8>,
    /// Upper bound on the number of rounds.
    #[validate(range(min = 1, max = 50))]
    pub num_rounds: Option<usize>,
    /// Enables tolerant title matching.
    pub flexible_mode: Option<bool>,
    /// Whether guesses must also name the artist (display-only).
    pub artist_required: Option<bool>,
}

/// Payload to open a new room.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateRoomRequest {
    /// Display name of the creating player, who becomes the host.
    #[validate(length(min = 1, max = 24))]
    pub nickname: String,
    /// Optional overrides of the default game settings.
    #[validate(nested)]
    pub settings: Option<SettingsInput>,
}

/// Payload to join an existing room by code.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct JoinRoomRequest {
    /// The six-character room code shown in the host's lobby.
    #[validate(custom(function = validate_room_code))]
    pub code: String,
    /// Display name of the joining player.
    #[validate(length(min = 1, max = 24))]
    pub nickname: String,
}

/// One song in a player's contribution.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct TrackInput {
    /// Stable identifier from the upstream catalogue.
    #[validate(length(min = 1, max = 128))]
    pub id: String,
    /// The title players will be guessing.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Display-only artist name.
    #[validate(length(min = 1, max = 200))]
    pub artist: String,
    /// URL of the playable audio preview.
    #[validate(url)]
    pub preview_url: String,
    /// Album artwork URL, may be empty.
    pub album_art: String,
    /// Preview length in seconds, when the catalogue reports one.
    pub preview_seconds: Option<u32>,
}

impl TrackInput {
    /// Bind the submitted track to its contributing player.
    pub fn into_track(self, owner_id: Uuid) -> Track {
        Track {
            id: self.id,
            title: self.title,
            artist: self.artist,
            preview_url: self.preview_url,
            album_art: self.album_art,
            owner_id,
            preview_seconds: self.preview_seconds,
        }
    }
}

/// Payload for a player locking in their track contribution.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ContributeRequest {
    /// The contributing player.
    pub player_id: Uuid,
    /// The tracks to add to the shared pool.
    #[validate(nested)]
    pub tracks: Vec<TrackInput>,
}

/// Payload for host-attributed room lifecycle requests.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RoomActionRequest {
    /// The acting player; must be the host.
    pub player_id: Uuid,
}

/// One participant as seen from outside the room.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Player identifier.
    pub id: Uuid,
    /// Display name.
    pub nickname: String,
    /// Whether this player drives the room lifecycle.
    pub is_host: bool,
    /// Whether the player has locked in their contribution.
    pub ready: bool,
    /// Number of tracks the player contributed.
    pub track_count: usize,
    /// Current score (zero until the game starts).
    pub score: f64,
}

/// Effective settings echoed back to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SettingsSummary {
    /// Clip playback length in seconds.
    pub clip_duration_secs: u8,
    /// Answer window length in seconds.
    pub answer_time_secs: u8,
    /// Upper bound on the number of rounds.
    pub num_rounds: usize,
    /// Whether tolerant title matching is enabled.
    pub flexible_mode: bool,
    /// Whether artist names are shown as required (display-only).
    pub artist_required: bool,
}

/// Full public view of a room, returned by the REST surface and pushed over
/// the event stream after every lifecycle change.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomSummary {
    /// Six-character join code.
    pub code: String,
    /// Lifecycle status.
    pub status: VisibleRoomStatus,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last mutation.
    pub updated_at: String,
    /// Effective game settings.
    pub settings: SettingsSummary,
    /// Participants in join order.
    pub players: Vec<PlayerSummary>,
    /// Live round state while the game is playing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<RoundSnapshot>,
}

impl RoomSummary {
    /// Project the session into its public view.
    pub fn describe(room: &RoomSession, now: Instant) -> Self {
        let players = room
            .players
            .values()
            .map(|player| summarize_player(room, player))
            .collect();

        Self {
            code: room.code.clone(),
            status: room.status.into(),
            created_at: format_system_time(room.created_at),
            updated_at: format_system_time(room.updated_at),
            settings: SettingsSummary {
                clip_duration_secs: room.settings.clip_duration_secs,
                answer_time_secs: room.settings.answer_time_secs,
                num_rounds: room.settings.num_rounds,
                flexible_mode: room.settings.flexible_mode,
                artist_required: room.settings.artist_required,
            },
            players,
            round: room
                .engine
                .as_ref()
                .map(|engine| RoundSnapshot::capture(engine, now)),
        }
    }
}

fn summarize_player(room: &RoomSession, player: &Player) -> PlayerSummary {
    let score = room
        .engine
        .as_ref()
        .and_then(|engine| engine.scores().get(&player.id).copied())
        .unwrap_or(0.0);

    PlayerSummary {
        id: player.id,
        nickname: player.nickname.clone(),
        is_host: player.is_host,
        ready: player.ready,
        track_count: player.contributed.len(),
        score,
    }
}

/// Response to a successful room creation.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateRoomResponse {
    /// The host's player id, to be presented on subsequent requests.
    pub player_id: Uuid,
    /// The freshly created room.
    pub room: RoomSummary,
}

/// Response to a successful join.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinRoomResponse {
    /// The joining player's id, to be presented on subsequent requests.
    pub player_id: Uuid,
    /// The room as it stands after the join.
    pub room: RoomSummary,
}
