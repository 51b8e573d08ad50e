use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::phase::VisibleRoundPhase,
    state::{
        room::Track,
        round::{Answer, RoundEngine, RoundPhase},
    },
};

/// Payload for a guess submission.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitAnswerRequest {
    /// The guessing player.
    pub player_id: Uuid,
    /// The guess as typed; matching is tolerant per the room settings.
    #[validate(length(min = 1, max = 200))]
    pub text: String,
}

/// Verdict returned to the submitting player.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitAnswerResponse {
    /// Whether the guess matched the title.
    pub correct: bool,
    /// Whether the speed bonus applied.
    pub speed_bonus: bool,
    /// Points added to the player's score.
    pub awarded: f64,
}

/// Payload for player-attributed round requests (force-end, advance, ...).
#[derive(Debug, Deserialize, ToSchema)]
pub struct RoundActionRequest {
    /// The acting player.
    pub player_id: Uuid,
}

/// Track metadata revealed once the answer window has closed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrackSummary {
    /// Catalogue identifier.
    pub id: String,
    /// The title that was being guessed.
    pub title: String,
    /// Artist name.
    pub artist: String,
    /// Playable preview URL.
    pub preview_url: String,
    /// Album artwork URL.
    pub album_art: String,
    /// The player who contributed this track.
    pub owner_id: Uuid,
    /// Preview length in seconds, when known.
    pub preview_seconds: Option<u32>,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            preview_url: track.preview_url.clone(),
            album_art: track.album_art.clone(),
            owner_id: track.owner_id,
            preview_seconds: track.preview_seconds,
        }
    }
}

/// What a client needs to play the current clip. Deliberately omits the
/// title and artwork so the answer is not leaked before the reveal.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClipSummary {
    /// Playable preview URL.
    pub preview_url: String,
    /// Offset into the preview where playback starts, in milliseconds.
    pub clip_start_ms: u64,
    /// Clip playback length in seconds.
    pub clip_duration_secs: u8,
}

/// A recorded guess, exposed on the reveal screen.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnswerSummary {
    /// Who guessed.
    pub player_id: Uuid,
    /// The guess as typed.
    pub text: String,
    /// Whether it matched.
    pub is_correct: bool,
    /// Inert artist verdict, always false in the current ruleset.
    pub artist_correct: bool,
    /// Whole seconds into the answer window when the guess arrived.
    pub response_time_secs: u64,
}

impl From<&Answer> for AnswerSummary {
    fn from(answer: &Answer) -> Self {
        Self {
            player_id: answer.player_id,
            text: answer.raw_text.clone(),
            is_correct: answer.is_correct,
            artist_correct: answer.artist_correct,
            response_time_secs: answer.response_time.as_secs(),
        }
    }
}

/// One line of the final standings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScoreEntry {
    /// The scored player.
    pub player_id: Uuid,
    /// Display name at the time the game finished.
    pub nickname: String,
    /// Accumulated points.
    pub score: f64,
}

/// Read-only projection of the live round, rebuilt after every transition.
///
/// Track metadata and recorded answers only appear during the reveal; while
/// the clip plays or the window is open, clients get the clip pointer and the
/// list of players who already locked in a guess.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoundSnapshot {
    /// 1-based round number.
    pub round_index: usize,
    /// Total rounds in this game.
    pub total_rounds: usize,
    /// Current phase.
    pub phase: VisibleRoundPhase,
    /// Whole seconds left in the current phase (zero when untimed).
    pub remaining_seconds: u64,
    /// Present while the clip plays and the window is open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipSummary>,
    /// Present during the reveal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<TrackSummary>,
    /// Present during the reveal: every recorded guess.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<AnswerSummary>>,
    /// Players who have already locked in a guess this round.
    pub answered: Vec<Uuid>,
}

impl RoundSnapshot {
    /// Capture the engine's current state for rendering.
    pub fn capture<R: Rng>(engine: &RoundEngine<R>, now: Instant) -> Self {
        let phase = engine.phase();
        let track = engine.active_track();

        let clip = match phase {
            RoundPhase::PlayingClip | RoundPhase::Answering => Some(ClipSummary {
                preview_url: track.preview_url.clone(),
                clip_start_ms: engine
                    .clip_start()
                    .map(|offset| offset.as_millis() as u64)
                    .unwrap_or(0),
                clip_duration_secs: engine.settings().clip_duration_secs,
            }),
            _ => None,
        };

        let (revealed_track, answers) = match phase {
            RoundPhase::Reveal => (
                Some(TrackSummary::from(track)),
                Some(engine.answers().iter().map(AnswerSummary::from).collect()),
            ),
            _ => (None, None),
        };

        Self {
            round_index: engine.round_index(),
            total_rounds: engine.total_rounds(),
            phase: phase.into(),
            remaining_seconds: engine.remaining_seconds(now),
            clip,
            track: revealed_track,
            answers,
            answered: engine.answers().iter().map(|a| a.player_id).collect(),
        }
    }
}

/// Response to an advance request: either the next round's snapshot or the
/// final standings.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdvanceResponse {
    /// True when the pool is exhausted and the game is over.
    pub finished: bool,
    /// Snapshot of the freshly started round, when one started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<RoundSnapshot>,
    /// Final standings, when the game finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoreboard: Option<Vec<ScoreEntry>>,
}
