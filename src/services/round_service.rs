use rand::rngs::StdRng;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dto::round::{
        AdvanceResponse, RoundSnapshot, ScoreEntry, SubmitAnswerRequest, SubmitAnswerResponse,
    },
    error::ServiceError,
    services::{room_service, sse_events},
    state::{
        SharedState,
        room::{RoomSession, RoomStatus},
        round::{AdvanceOutcome, RoundEngine},
    },
};

/// Snapshot of the round in progress.
pub async fn round_snapshot(state: &SharedState) -> Result<RoundSnapshot, ServiceError> {
    state
        .with_room(|room| {
            let engine = require_engine(room)?;
            Ok(RoundSnapshot::capture(engine, Instant::now()))
        })
        .await
}

/// Record a guess for the current round and report its verdict.
pub async fn submit_answer(
    state: &SharedState,
    request: SubmitAnswerRequest,
) -> Result<SubmitAnswerResponse, ServiceError> {
    let outcome = state
        .with_room_mut(|room| {
            if room.status == RoomStatus::Finished {
                return Err(ServiceError::GameFinished);
            }
            if !room.players.contains_key(&request.player_id) {
                return Err(ServiceError::NotFound("unknown player".into()));
            }
            let engine = room
                .engine
                .as_mut()
                .ok_or_else(|| ServiceError::InvalidState("no round in progress".into()))?;

            let outcome = engine.submit_answer(request.player_id, &request.text, Instant::now())?;
            room.touch();
            Ok(outcome)
        })
        .await?;

    debug!(player_id = %request.player_id, correct = outcome.correct, "answer recorded");
    sse_events::broadcast_answer_recorded(state, request.player_id);
    Ok(SubmitAnswerResponse {
        correct: outcome.correct,
        speed_bonus: outcome.speed_bonus,
        awarded: outcome.awarded,
    })
}

/// Host-only: close the answer window early and reveal immediately.
pub async fn force_end(state: &SharedState, player_id: Uuid) -> Result<RoundSnapshot, ServiceError> {
    let snapshot = state
        .with_room_mut(|room| {
            if room.status == RoomStatus::Finished {
                return Err(ServiceError::GameFinished);
            }
            room_service::require_host(room, player_id)?;
            let engine = room
                .engine
                .as_mut()
                .ok_or_else(|| ServiceError::InvalidState("no round in progress".into()))?;

            let now = Instant::now();
            engine.force_end_answering(now)?;
            info!(round = engine.round_index(), "answer window force-ended");
            let snapshot = RoundSnapshot::capture(engine, now);
            room.touch();
            Ok(snapshot)
        })
        .await?;

    sse_events::broadcast_phase_changed(state, snapshot.clone());
    Ok(snapshot)
}

/// Leave the reveal: start the next round, or finish the game when the pool
/// is exhausted.
pub async fn advance(state: &SharedState, player_id: Uuid) -> Result<AdvanceResponse, ServiceError> {
    let response = state
        .with_room_mut(|room| {
            if room.status == RoomStatus::Finished {
                return Err(ServiceError::GameFinished);
            }
            if !room.players.contains_key(&player_id) {
                return Err(ServiceError::NotFound("unknown player".into()));
            }
            let engine = room
                .engine
                .as_mut()
                .ok_or_else(|| ServiceError::InvalidState("no round in progress".into()))?;

            let now = Instant::now();
            match engine.advance_round(now)? {
                AdvanceOutcome::NextRound { round_index } => {
                    info!(round = round_index, "next round started");
                    let generation = engine.generation();
                    let epoch = engine.epoch();
                    let deadline = engine.deadline();
                    let snapshot = RoundSnapshot::capture(engine, now);
                    room.touch();
                    if let Some(deadline) = deadline {
                        arm_phase_timer(state.clone(), generation, epoch, deadline);
                    }
                    Ok(AdvanceResponse {
                        finished: false,
                        round: Some(snapshot),
                        scoreboard: None,
                    })
                }
                AdvanceOutcome::Finished { scoreboard } => {
                    let scoreboard = name_scoreboard(room, scoreboard);
                    room.status = RoomStatus::Finished;
                    room.touch();
                    info!(code = %room.code, "game finished");
                    Ok(AdvanceResponse {
                        finished: true,
                        round: None,
                        scoreboard: Some(scoreboard),
                    })
                }
            }
        })
        .await?;

    if let Some(round) = response.round.clone() {
        sse_events::broadcast_phase_changed(state, round);
    }
    if let Some(scoreboard) = response.scoreboard.clone() {
        sse_events::broadcast_game_finished(state, scoreboard);
    }
    Ok(response)
}

/// Spawn a sleeper that fires the phase deadline carrying the engine
/// generation and epoch it was armed for. A replaced engine or a superseded
/// epoch makes the expiry a no-op.
pub fn arm_phase_timer(state: SharedState, generation: Uuid, epoch: u64, deadline: Instant) {
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        handle_phase_deadline(state, generation, epoch).await;
    });
}

/// Apply an expired phase deadline: advance the engine, re-arm the next
/// timer, and broadcast the resulting snapshot.
async fn handle_phase_deadline(state: SharedState, generation: Uuid, epoch: u64) {
    let snapshot = {
        let mut guard = state.room().write().await;
        let Some(room) = guard.as_mut() else {
            return;
        };
        let Some(engine) = room.engine.as_mut() else {
            return;
        };

        let now = Instant::now();
        let Some(change) = engine.handle_deadline(generation, epoch, now) else {
            debug!(%generation, epoch, "stale phase timer expired; ignoring");
            return;
        };

        debug!(?change, round = engine.round_index(), "phase deadline fired");
        let next = engine
            .deadline()
            .map(|deadline| (engine.generation(), engine.epoch(), deadline));
        let snapshot = RoundSnapshot::capture(engine, now);
        room.touch();

        if let Some((generation, epoch, deadline)) = next {
            arm_phase_timer(state.clone(), generation, epoch, deadline);
        }
        snapshot
    };

    sse_events::broadcast_phase_changed(&state, snapshot);
}

fn require_engine(room: &RoomSession) -> Result<&RoundEngine<StdRng>, ServiceError> {
    room.engine
        .as_ref()
        .ok_or_else(|| ServiceError::InvalidState("no round in progress".into()))
}

fn name_scoreboard(room: &RoomSession, standings: Vec<(Uuid, f64)>) -> Vec<ScoreEntry> {
    standings
        .into_iter()
        .map(|(id, score)| ScoreEntry {
            player_id: id,
            nickname: room
                .players
                .get(&id)
                .map(|p| p.nickname.clone())
                .unwrap_or_default(),
            score,
        })
        .collect()
}
