use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::room::{
        ContributeRequest, CreateRoomRequest, CreateRoomResponse, JoinRoomRequest,
        JoinRoomResponse, RoomSummary, SettingsInput,
    },
    error::ServiceError,
    services::{round_service, sse_events},
    state::{
        SharedState,
        room::{GameSettings, RoomSession, RoomStatus},
        round::RoundEngine,
    },
};

/// Open a new room with the caller as host. Refused while another room is
/// still in progress; a finished room is replaced.
pub async fn create_room(
    state: &SharedState,
    request: CreateRoomRequest,
) -> Result<CreateRoomResponse, ServiceError> {
    let settings = resolve_settings(state.config().default_settings(), request.settings);

    let response = state
        .with_room_slot_mut(|slot| {
            if let Some(existing) = slot.as_ref() {
                if existing.status != RoomStatus::Finished {
                    return Err(ServiceError::InvalidState(format!(
                        "room {} is still in progress",
                        existing.code
                    )));
                }
            }

            let mut rng = RoomSession::game_rng();
            let (room, host_id) = RoomSession::new(settings, request.nickname, &mut rng);
            info!(code = %room.code, "room created");

            let summary = RoomSummary::describe(&room, Instant::now());
            slot.replace(room);
            Ok(CreateRoomResponse {
                player_id: host_id,
                room: summary,
            })
        })
        .await?;

    sse_events::broadcast_room_session(state, &response.room);
    Ok(response)
}

/// Join the live room by code. Only possible while it sits in the lobby.
pub async fn join_room(
    state: &SharedState,
    request: JoinRoomRequest,
) -> Result<JoinRoomResponse, ServiceError> {
    let response = state
        .with_room_mut(|room| {
            if room.code != request.code {
                return Err(ServiceError::NotFound(format!(
                    "no room with code {}",
                    request.code
                )));
            }
            if room.status != RoomStatus::Lobby {
                return Err(ServiceError::InvalidState(
                    "the game has already started".into(),
                ));
            }

            let player_id = room.add_player(request.nickname);
            info!(code = %room.code, %player_id, "player joined");

            Ok(JoinRoomResponse {
                player_id,
                room: RoomSummary::describe(room, Instant::now()),
            })
        })
        .await?;

    if let Some(player) = response
        .room
        .players
        .iter()
        .find(|p| p.id == response.player_id)
    {
        sse_events::broadcast_player_joined(state, player.clone());
    }
    sse_events::broadcast_room_session(state, &response.room);
    Ok(response)
}

/// Public view of the live room.
pub async fn current_room(state: &SharedState) -> Result<RoomSummary, ServiceError> {
    state
        .with_room(|room| Ok(RoomSummary::describe(room, Instant::now())))
        .await
}

/// Host-only: move the room from the lobby into song collection.
pub async fn open_submission(
    state: &SharedState,
    player_id: Uuid,
) -> Result<RoomSummary, ServiceError> {
    let summary = state
        .with_room_mut(|room| {
            require_host(room, player_id)?;
            if room.status != RoomStatus::Lobby {
                return Err(ServiceError::InvalidState(
                    "song submission can only be opened from the lobby".into(),
                ));
            }
            if room.players.len() < 2 {
                return Err(ServiceError::InvalidState(
                    "at least two players are needed to start".into(),
                ));
            }

            room.status = RoomStatus::AddingSongs;
            room.touch();
            info!(code = %room.code, "song submission opened");
            Ok(RoomSummary::describe(room, Instant::now()))
        })
        .await?;

    sse_events::broadcast_room_session(state, &summary);
    Ok(summary)
}

/// Lock in a player's track contribution. Once the last player locks in, the
/// pool is assembled and the first round starts immediately.
pub async fn contribute(
    state: &SharedState,
    request: ContributeRequest,
) -> Result<RoomSummary, ServiceError> {
    let limits = state.config().track_limits();
    let player_id = request.player_id;

    let (summary, started) = state
        .with_room_mut(|room| {
            if room.status != RoomStatus::AddingSongs {
                return Err(ServiceError::InvalidState(
                    "track submission is not open".into(),
                ));
            }

            let count = request.tracks.len();
            if count < limits.min_per_player || count > limits.max_per_player {
                return Err(ServiceError::InvalidInput(format!(
                    "each player must contribute between {} and {} tracks",
                    limits.min_per_player, limits.max_per_player
                )));
            }
            check_track_ids(room, &request)?;

            let player = room
                .players
                .get_mut(&request.player_id)
                .ok_or_else(|| ServiceError::NotFound("unknown player".into()))?;
            if player.ready {
                return Err(ServiceError::InvalidState(
                    "this player has already locked in their tracks".into(),
                ));
            }

            player.contributed = request
                .tracks
                .into_iter()
                .map(|track| track.into_track(request.player_id))
                .collect();
            player.ready = true;
            room.touch();
            info!(code = %room.code, player_id = %request.player_id, count, "tracks locked in");

            let started = room.all_ready();
            if started {
                start_game(state, room)?;
            }
            Ok((RoomSummary::describe(room, Instant::now()), started))
        })
        .await?;

    sse_events::broadcast_player_ready(state, player_id, contributed_count(&summary, player_id));
    if started {
        if let Some(round) = summary.round.clone() {
            sse_events::broadcast_phase_changed(state, round);
        }
    }
    sse_events::broadcast_room_session(state, &summary);
    Ok(summary)
}

/// Host-only: reset a finished room back to the lobby for another game.
pub async fn restart(state: &SharedState, player_id: Uuid) -> Result<RoomSummary, ServiceError> {
    let summary = state
        .with_room_mut(|room| {
            require_host(room, player_id)?;
            if room.status != RoomStatus::Finished {
                return Err(ServiceError::InvalidState(
                    "only a finished game can be restarted".into(),
                ));
            }

            room.reset_for_replay();
            info!(code = %room.code, "room reset for replay");
            Ok(RoomSummary::describe(room, Instant::now()))
        })
        .await?;

    sse_events::broadcast_room_session(state, &summary);
    Ok(summary)
}

/// Check that the acting player exists and is the host.
pub(crate) fn require_host(room: &RoomSession, player_id: Uuid) -> Result<(), ServiceError> {
    let player = room
        .players
        .get(&player_id)
        .ok_or_else(|| ServiceError::NotFound("unknown player".into()))?;
    if !player.is_host {
        return Err(ServiceError::Unauthorized(
            "only the host can perform this action".into(),
        ));
    }
    Ok(())
}

/// Merge creation-time overrides over the configured defaults.
fn resolve_settings(defaults: GameSettings, overrides: Option<SettingsInput>) -> GameSettings {
    let Some(input) = overrides else {
        return defaults;
    };
    GameSettings {
        clip_duration_secs: input.clip_duration_secs.unwrap_or(defaults.clip_duration_secs),
        answer_time_secs: input.answer_time_secs.unwrap_or(defaults.answer_time_secs),
        num_rounds: input.num_rounds.unwrap_or(defaults.num_rounds),
        flexible_mode: input.flexible_mode.unwrap_or(defaults.flexible_mode),
        artist_required: input.artist_required.unwrap_or(defaults.artist_required),
    }
}

/// Reject duplicated track ids, both inside the submission and against
/// tracks other players already contributed.
fn check_track_ids(room: &RoomSession, request: &ContributeRequest) -> Result<(), ServiceError> {
    let mut seen = std::collections::HashSet::new();
    for track in &request.tracks {
        if !seen.insert(track.id.as_str()) {
            return Err(ServiceError::InvalidInput(format!(
                "track {} appears more than once in the submission",
                track.id
            )));
        }
    }

    let already_present = room
        .players
        .values()
        .flat_map(|p| p.contributed.iter())
        .any(|existing| seen.contains(existing.id.as_str()));
    if already_present {
        return Err(ServiceError::InvalidInput(
            "one of the submitted tracks is already in the pool".into(),
        ));
    }
    Ok(())
}

/// Assemble the pool, spin up the round engine, and arm the countdown timer.
fn start_game(state: &SharedState, room: &mut RoomSession) -> Result<(), ServiceError> {
    let mut rng = RoomSession::game_rng();
    let pool = room.assemble_pool(&mut rng);
    if pool.is_empty() {
        return Err(ServiceError::InvalidState(
            "cannot start a game with an empty track pool".into(),
        ));
    }

    let now = Instant::now();
    let players: Vec<Uuid> = room.players.keys().copied().collect();
    let engine = RoundEngine::start(room.settings, pool, players, rng, now);
    info!(code = %room.code, rounds = engine.total_rounds(), "game started");

    let generation = engine.generation();
    let epoch = engine.epoch();
    let deadline = engine.deadline();
    room.engine = Some(engine);
    room.status = RoomStatus::Playing;
    room.touch();

    if let Some(deadline) = deadline {
        round_service::arm_phase_timer(state.clone(), generation, epoch, deadline);
    }
    Ok(())
}

fn contributed_count(summary: &RoomSummary, player_id: Uuid) -> usize {
    summary
        .players
        .iter()
        .find(|p| p.id == player_id)
        .map(|p| p.track_count)
        .unwrap_or(0)
}
