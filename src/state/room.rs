//! Room/session data model: players, contributed tracks, and game settings.

use std::time::{Duration, SystemTime};

use indexmap::IndexMap;
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::state::round::RoundEngine;

/// Number of characters in a room code.
pub const ROOM_CODE_LENGTH: usize = 6;

/// Clip lengths (seconds) a room can be created with.
pub const CLIP_DURATION_CHOICES: [u8; 3] = [3, 4, 5];

/// Answer windows (seconds) a room can be created with.
pub const ANSWER_TIME_CHOICES: [u8; 3] = [8, 10, 12];

/// High-level status of a room, from lobby to final results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    /// Players are gathering; the host has not opened song submission yet.
    Lobby,
    /// Every player contributes their tracks to the pool.
    AddingSongs,
    /// The round engine is live and consuming the pool.
    Playing,
    /// All rounds are done; the final scoreboard is displayed.
    Finished,
}

/// Immutable settings chosen at room creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    /// Clip playback length in seconds (3, 4, or 5).
    pub clip_duration_secs: u8,
    /// Answer window length in seconds (8, 10, or 12).
    pub answer_time_secs: u8,
    /// Upper bound on the number of rounds; the pool is truncated to this.
    pub num_rounds: usize,
    /// Enables substring and small-edit-distance matching, not just exact.
    pub flexible_mode: bool,
    /// Shown to players but inert: no scoring logic branches on it.
    pub artist_required: bool,
}

impl GameSettings {
    /// Clip playback length as a [`Duration`].
    pub fn clip_duration(&self) -> Duration {
        Duration::from_secs(self.clip_duration_secs.into())
    }

    /// Answer window length as a [`Duration`].
    pub fn answer_time(&self) -> Duration {
        Duration::from_secs(self.answer_time_secs.into())
    }
}

/// A song contributed by a player. Immutable once it enters the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Stable identifier from the upstream catalogue.
    pub id: String,
    /// The title players must guess.
    pub title: String,
    /// Display-only artist name.
    pub artist: String,
    /// URL of the playable audio preview.
    pub preview_url: String,
    /// Album artwork URL shown at reveal.
    pub album_art: String,
    /// The contributing player; excluded from scoring on this track.
    pub owner_id: Uuid,
    /// Preview length in seconds when the catalogue reports one; feeds the
    /// clip-offset window.
    pub preview_seconds: Option<u32>,
}

/// A participant in the room, tracked in join order.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique identifier handed out at create/join time.
    pub id: Uuid,
    /// Display name chosen by the player.
    pub nickname: String,
    /// Whether this player created the room and drives its lifecycle.
    pub is_host: bool,
    /// Set once the player has locked in their track contribution.
    pub ready: bool,
    /// Tracks this player added to the game.
    pub contributed: Vec<Track>,
}

/// Aggregated state for a live room. Exactly one room is live per process;
/// the engine slot is populated while the status is [`RoomStatus::Playing`].
#[derive(Debug)]
pub struct RoomSession {
    /// Six-character join code displayed in the lobby.
    pub code: String,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the session was mutated.
    pub updated_at: SystemTime,
    /// Lifecycle status of the room.
    pub status: RoomStatus,
    /// Settings fixed for the lifetime of the game.
    pub settings: GameSettings,
    /// Participants keyed by id, preserving join order for stable tie-breaks.
    pub players: IndexMap<Uuid, Player>,
    /// Live round engine, present while playing.
    pub engine: Option<RoundEngine<StdRng>>,
}

impl RoomSession {
    /// Build a fresh room in the lobby with its host as the first player.
    /// Returns the session together with the host's player id.
    pub fn new(settings: GameSettings, host_nickname: String, rng: &mut impl Rng) -> (Self, Uuid) {
        let timestamp = SystemTime::now();
        let host_id = Uuid::new_v4();

        let mut players = IndexMap::new();
        players.insert(
            host_id,
            Player {
                id: host_id,
                nickname: host_nickname,
                is_host: true,
                ready: false,
                contributed: Vec::new(),
            },
        );

        let session = Self {
            code: generate_room_code(rng),
            created_at: timestamp,
            updated_at: timestamp,
            status: RoomStatus::Lobby,
            settings,
            players,
            engine: None,
        };

        (session, host_id)
    }

    /// Append a new non-host player, returning their freshly allocated id.
    pub fn add_player(&mut self, nickname: String) -> Uuid {
        let id = Uuid::new_v4();
        self.players.insert(
            id,
            Player {
                id,
                nickname,
                is_host: false,
                ready: false,
                contributed: Vec::new(),
            },
        );
        self.touch();
        id
    }

    /// Whether every player has locked in their contribution.
    pub fn all_ready(&self) -> bool {
        self.players.values().all(|p| p.ready)
    }

    /// Flatten all contributions in join order, shuffle them, and truncate to
    /// the configured round cap. Consumed once when the game starts.
    pub fn assemble_pool(&self, rng: &mut impl Rng) -> Vec<Track> {
        let mut pool: Vec<Track> = self
            .players
            .values()
            .flat_map(|p| p.contributed.iter().cloned())
            .collect();

        if pool.len() > 1 {
            pool.shuffle(rng);
        }
        if self.settings.num_rounds > 0 {
            pool.truncate(self.settings.num_rounds);
        }
        pool
    }

    /// Reset the room back to the lobby so the same group can play again.
    /// Contributions, ready flags, and the engine are discarded.
    pub fn reset_for_replay(&mut self) {
        self.status = RoomStatus::Lobby;
        self.engine = None;
        for player in self.players.values_mut() {
            player.ready = false;
            player.contributed.clear();
        }
        self.touch();
    }

    /// Bump the updated-at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = SystemTime::now();
    }

    /// Fresh RNG used for pool shuffling and clip offsets.
    pub fn game_rng() -> StdRng {
        StdRng::from_os_rng()
    }
}

/// Allocate a pseudo-random uppercase alphanumeric room code.
fn generate_room_code(rng: &mut impl Rng) -> String {
    rng.sample_iter(Alphanumeric)
        .take(ROOM_CODE_LENGTH)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn settings() -> GameSettings {
        GameSettings {
            clip_duration_secs: 3,
            answer_time_secs: 10,
            num_rounds: 10,
            flexible_mode: true,
            artist_required: false,
        }
    }

    fn track(id: &str, owner: Uuid) -> Track {
        Track {
            id: id.into(),
            title: format!("title {id}"),
            artist: "artist".into(),
            preview_url: "https://example.com/preview.mp3".into(),
            album_art: String::new(),
            owner_id: owner,
            preview_seconds: Some(30),
        }
    }

    #[test]
    fn room_code_has_expected_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let code = generate_room_code(&mut rng);
        assert_eq!(code.len(), ROOM_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!code.chars().any(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn host_is_first_player_and_join_order_is_kept() {
        let mut rng = StdRng::seed_from_u64(1);
        let (mut room, host_id) = RoomSession::new(settings(), "ana".into(), &mut rng);
        let second = room.add_player("benji".into());
        let third = room.add_player("coco".into());

        let order: Vec<Uuid> = room.players.keys().copied().collect();
        assert_eq!(order, vec![host_id, second, third]);
        assert!(room.players[&host_id].is_host);
        assert!(!room.players[&second].is_host);
    }

    #[test]
    fn pool_assembly_shuffles_and_caps_to_num_rounds() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut caps = settings();
        caps.num_rounds = 4;
        let (mut room, host_id) = RoomSession::new(caps, "ana".into(), &mut rng);
        let other = room.add_player("benji".into());

        for i in 0..5 {
            let t = track(&format!("h{i}"), host_id);
            room.players.get_mut(&host_id).unwrap().contributed.push(t);
            let t = track(&format!("o{i}"), other);
            room.players.get_mut(&other).unwrap().contributed.push(t);
        }

        let pool = room.assemble_pool(&mut rng);
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn replay_reset_clears_contributions_and_engine() {
        let mut rng = StdRng::seed_from_u64(3);
        let (mut room, host_id) = RoomSession::new(settings(), "ana".into(), &mut rng);
        room.players.get_mut(&host_id).unwrap().ready = true;
        room.players
            .get_mut(&host_id)
            .unwrap()
            .contributed
            .push(track("a", host_id));
        room.status = RoomStatus::Finished;

        room.reset_for_replay();

        assert_eq!(room.status, RoomStatus::Lobby);
        assert!(room.engine.is_none());
        assert!(!room.players[&host_id].ready);
        assert!(room.players[&host_id].contributed.is_empty());
    }
}
