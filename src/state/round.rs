//! Round lifecycle engine: COUNTDOWN → PLAYING_CLIP → ANSWERING → REVEAL.
//!
//! Timing follows an explicit phase-deadline model: every timed phase stores
//! one absolute deadline plus a timer epoch. The service layer arms a single
//! sleeper per timed phase tagged with the engine generation and the epoch it
//! observed; a deadline whose generation or epoch no longer matches (the
//! engine was replaced, or the phase superseded) is a silent no-op, which
//! also makes double-fired expiries idempotent.

use std::time::Duration;

use indexmap::IndexMap;
use rand::Rng;
use thiserror::Error;
use tokio::time::Instant;
use uuid::Uuid;

use crate::state::matcher;
use crate::state::room::{GameSettings, Track};

/// Fixed pre-clip countdown, in seconds.
pub const COUNTDOWN_SECS: u64 = 3;

/// Points granted for a correct answer.
const BASE_POINTS: f64 = 1.0;
/// Extra points for a correct answer in the first half of the answer window.
const SPEED_BONUS: f64 = 0.5;
/// Clip-offset window used when a track's preview length is unknown.
const FALLBACK_CLIP_WINDOW_SECS: f64 = 20.0;

/// Phases a single round moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Three-second warm-up before the clip starts.
    Countdown,
    /// The audio excerpt is playing; input is not open yet.
    PlayingClip,
    /// Players race to type the title before the window closes.
    Answering,
    /// The track and everyone's guesses are shown.
    Reveal,
}

/// A recorded guess. Append-only; at most one per non-owner player per round.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Who guessed.
    pub player_id: Uuid,
    /// The guess exactly as typed.
    pub raw_text: String,
    /// Verdict from the matcher at submission time.
    pub is_correct: bool,
    /// Carried for the reveal screen but never scored (artist matching is
    /// inert in the observed ruleset).
    pub artist_correct: bool,
    /// Time elapsed inside the answer window before this guess arrived.
    pub response_time: Duration,
}

/// Typed rejection returned when a submission is refused. None of these tear
/// the engine down; the caller reports them and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The player already has an answer recorded this round.
    #[error("player already submitted an answer this round")]
    AlreadySubmitted,
    /// The track owner cannot score on their own track.
    #[error("the track owner cannot answer their own track")]
    NotEligible,
    /// Submissions are only accepted while answering.
    #[error("answers are only accepted during the answering phase")]
    WrongPhase,
}

/// Rejection for phase-gated operations invoked from the wrong phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation invalid in phase {phase:?}")]
pub struct PhaseMismatch {
    /// The phase the engine was actually in.
    pub phase: RoundPhase,
}

/// Result of an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmitOutcome {
    /// Whether the guess matched the title.
    pub correct: bool,
    /// Whether the guess landed in the first half of the window.
    pub speed_bonus: bool,
    /// Points added to the player's score (0 for incorrect guesses).
    pub awarded: f64,
}

/// Self-driven transition that happened because a phase deadline passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseChange {
    /// Countdown finished; the clip started at a freshly picked offset.
    ClipStarted,
    /// Clip finished; the answer window opened.
    AnsweringStarted,
    /// Answer window closed; answers are frozen.
    Revealed,
}

/// What happened when the caller advanced past a reveal.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// A new round began its countdown.
    NextRound {
        /// The 1-based index of the round that just started.
        round_index: usize,
    },
    /// The pool is exhausted. Final scores in descending order; ties keep
    /// player join order (stable).
    Finished {
        /// Final `(player, score)` standings.
        scoreboard: Vec<(Uuid, f64)>,
    },
}

/// Drives one round at a time through its phases and applies the scoring
/// rule. Owns the round state exclusively; collaborators read snapshots and
/// issue the four requests (deadline expiry, submit, force end, advance).
#[derive(Debug)]
pub struct RoundEngine<R: Rng> {
    settings: GameSettings,
    track_pool: Vec<Track>,
    round_index: usize,
    phase: RoundPhase,
    answers: Vec<Answer>,
    scores: IndexMap<Uuid, f64>,
    deadline: Option<Instant>,
    generation: Uuid,
    epoch: u64,
    clip_start: Option<Duration>,
    rng: R,
}

impl<R: Rng> RoundEngine<R> {
    /// Start round 1 in its countdown. `track_pool` must be non-empty (the
    /// room layer validates contributions before assembling it); `players`
    /// seeds the score table in join order.
    pub fn start(
        settings: GameSettings,
        track_pool: Vec<Track>,
        players: impl IntoIterator<Item = Uuid>,
        rng: R,
        now: Instant,
    ) -> Self {
        let scores = players.into_iter().map(|id| (id, 0.0)).collect();
        let mut engine = Self {
            settings,
            track_pool,
            round_index: 1,
            phase: RoundPhase::Countdown,
            answers: Vec::new(),
            scores,
            deadline: None,
            generation: Uuid::new_v4(),
            epoch: 0,
            clip_start: None,
            rng,
        };
        engine.enter(
            RoundPhase::Countdown,
            Some(Duration::from_secs(COUNTDOWN_SECS)),
            now,
        );
        engine
    }

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// 1-based index of the round in progress.
    pub fn round_index(&self) -> usize {
        self.round_index
    }

    /// Total number of rounds the pool provides.
    pub fn total_rounds(&self) -> usize {
        self.track_pool.len()
    }

    /// Identity of this engine instance. Epochs restart at zero for every new
    /// engine, so a deadline expiry must also present the generation it was
    /// armed against; a sleeper outliving its engine is then ignored even
    /// when a later engine reaches the same epoch value.
    pub fn generation(&self) -> Uuid {
        self.generation
    }

    /// Timer epoch of the current phase. A deadline expiry must present this
    /// value to be honoured.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Absolute deadline of the current phase, if it is a timed one.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The track being guessed this round.
    pub fn active_track(&self) -> &Track {
        &self.track_pool[self.round_index - 1]
    }

    /// Offset into the preview where the clip starts, once picked.
    pub fn clip_start(&self) -> Option<Duration> {
        self.clip_start
    }

    /// Answers recorded so far this round, in arrival order.
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Accumulated scores in player join order.
    pub fn scores(&self) -> &IndexMap<Uuid, f64> {
        &self.scores
    }

    /// Settings the engine was started with.
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Whole seconds left in the current phase, zero for untimed phases.
    pub fn remaining_seconds(&self, now: Instant) -> u64 {
        self.deadline
            .map(|d| d.saturating_duration_since(now).as_secs_f64().ceil() as u64)
            .unwrap_or(0)
    }

    /// React to a phase deadline passing. Returns the transition taken, or
    /// `None` when the expiry is stale (armed against a replaced engine, or
    /// its epoch was superseded) or the current phase is untimed. Calling
    /// twice for the same expiry is safe: the first call bumps the epoch,
    /// the second is ignored.
    pub fn handle_deadline(
        &mut self,
        generation: Uuid,
        epoch: u64,
        now: Instant,
    ) -> Option<PhaseChange> {
        if generation != self.generation || epoch != self.epoch {
            return None;
        }

        match self.phase {
            RoundPhase::Countdown => {
                self.clip_start = Some(self.pick_clip_start());
                let window = self.settings.clip_duration();
                self.enter(RoundPhase::PlayingClip, Some(window), now);
                Some(PhaseChange::ClipStarted)
            }
            RoundPhase::PlayingClip => {
                // Any answers left over from a previous window are stale.
                self.answers.clear();
                let window = self.settings.answer_time();
                self.enter(RoundPhase::Answering, Some(window), now);
                Some(PhaseChange::AnsweringStarted)
            }
            RoundPhase::Answering => {
                self.enter(RoundPhase::Reveal, None, now);
                Some(PhaseChange::Revealed)
            }
            RoundPhase::Reveal => None,
        }
    }

    /// Host-forced early end of the answer window.
    pub fn force_end_answering(&mut self, now: Instant) -> Result<(), PhaseMismatch> {
        if self.phase != RoundPhase::Answering {
            return Err(PhaseMismatch { phase: self.phase });
        }
        self.enter(RoundPhase::Reveal, None, now);
        Ok(())
    }

    /// Record a guess and apply the scoring rule.
    ///
    /// Correct guesses earn [`BASE_POINTS`], plus [`SPEED_BONUS`] iff the
    /// remaining window time at submission strictly exceeds half the answer
    /// window. Incorrect guesses are recorded for the reveal screen but do
    /// not touch the score.
    pub fn submit_answer(
        &mut self,
        player_id: Uuid,
        text: &str,
        now: Instant,
    ) -> Result<SubmitOutcome, SubmitError> {
        if self.answers.iter().any(|a| a.player_id == player_id) {
            return Err(SubmitError::AlreadySubmitted);
        }
        if self.active_track().owner_id == player_id {
            return Err(SubmitError::NotEligible);
        }
        if self.phase != RoundPhase::Answering {
            return Err(SubmitError::WrongPhase);
        }
        let deadline = self.deadline.ok_or(SubmitError::WrongPhase)?;

        let window = self.settings.answer_time();
        let remaining = deadline.saturating_duration_since(now);
        let correct = matcher::validate(
            text,
            &self.active_track().title,
            self.settings.flexible_mode,
        );
        let speed_bonus = correct && remaining > window / 2;
        let awarded = match (correct, speed_bonus) {
            (true, true) => BASE_POINTS + SPEED_BONUS,
            (true, false) => BASE_POINTS,
            (false, _) => 0.0,
        };

        if correct {
            *self.scores.entry(player_id).or_insert(0.0) += awarded;
        }

        self.answers.push(Answer {
            player_id,
            raw_text: text.to_string(),
            is_correct: correct,
            artist_correct: false,
            response_time: window.saturating_sub(remaining),
        });

        Ok(SubmitOutcome {
            correct,
            speed_bonus,
            awarded,
        })
    }

    /// Leave the reveal: start the next round's countdown while tracks
    /// remain, otherwise return the terminal scoreboard.
    pub fn advance_round(&mut self, now: Instant) -> Result<AdvanceOutcome, PhaseMismatch> {
        if self.phase != RoundPhase::Reveal {
            return Err(PhaseMismatch { phase: self.phase });
        }

        if self.round_index < self.track_pool.len() {
            self.round_index += 1;
            self.answers.clear();
            self.clip_start = None;
            self.enter(
                RoundPhase::Countdown,
                Some(Duration::from_secs(COUNTDOWN_SECS)),
                now,
            );
            Ok(AdvanceOutcome::NextRound {
                round_index: self.round_index,
            })
        } else {
            Ok(AdvanceOutcome::Finished {
                scoreboard: self.final_scores(),
            })
        }
    }

    /// Final standings: descending score, ties stable in join order.
    pub fn final_scores(&self) -> Vec<(Uuid, f64)> {
        let mut standings: Vec<(Uuid, f64)> =
            self.scores.iter().map(|(id, score)| (*id, *score)).collect();
        standings.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        standings
    }

    /// Move to `phase`, superseding any live deadline by bumping the epoch.
    fn enter(&mut self, phase: RoundPhase, window: Option<Duration>, now: Instant) {
        self.phase = phase;
        self.epoch += 1;
        self.deadline = window.map(|w| now + w);
    }

    /// Uniform pseudo-random start offset into the track's preview:
    /// `[0, preview − clip)` when the preview length is known and long
    /// enough, zero when a known preview is no longer than the clip, and
    /// `[0, 20s)` when the length is unknown.
    fn pick_clip_start(&mut self) -> Duration {
        let clip_secs = self.settings.clip_duration().as_secs_f64();
        let window = match self.active_track().preview_seconds {
            Some(preview) if f64::from(preview) > clip_secs => f64::from(preview) - clip_secs,
            Some(_) => return Duration::ZERO,
            None => FALLBACK_CLIP_WINDOW_SECS,
        };
        Duration::from_secs_f64(self.rng.random_range(0.0..window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
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

    fn track(title: &str, owner: Uuid) -> Track {
        Track {
            id: title.to_lowercase().replace(' ', "-"),
            title: title.into(),
            artist: "artist".into(),
            preview_url: "https://example.com/preview.mp3".into(),
            album_art: String::new(),
            owner_id: owner,
            preview_seconds: Some(30),
        }
    }

    struct Fixture {
        engine: RoundEngine<StdRng>,
        owner: Uuid,
        guesser: Uuid,
        other: Uuid,
        now: Instant,
    }

    fn fixture_with_titles(titles: &[&str]) -> Fixture {
        let owner = Uuid::new_v4();
        let guesser = Uuid::new_v4();
        let other = Uuid::new_v4();
        let pool = titles.iter().map(|t| track(t, owner)).collect();
        let now = Instant::now();
        let engine = RoundEngine::start(
            settings(),
            pool,
            [owner, guesser, other],
            StdRng::seed_from_u64(42),
            now,
        );
        Fixture {
            engine,
            owner,
            guesser,
            other,
            now,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_titles(&["Imagine", "Creep", "La Flaca"])
    }

    /// Drive the engine into the answering phase by expiring the countdown
    /// and clip deadlines. Returns the instant the window opened at.
    fn open_answer_window(f: &mut Fixture) -> Instant {
        let generation = f.engine.generation();
        let change = f.engine.handle_deadline(generation, f.engine.epoch(), f.now);
        assert_eq!(change, Some(PhaseChange::ClipStarted));
        let change = f.engine.handle_deadline(generation, f.engine.epoch(), f.now);
        assert_eq!(change, Some(PhaseChange::AnsweringStarted));
        assert_eq!(f.engine.phase(), RoundPhase::Answering);
        f.now
    }

    #[test]
    fn starts_in_countdown_with_a_deadline() {
        let f = fixture();
        assert_eq!(f.engine.phase(), RoundPhase::Countdown);
        assert_eq!(f.engine.round_index(), 1);
        let deadline = f.engine.deadline().expect("countdown is timed");
        assert_eq!(deadline, f.now + Duration::from_secs(COUNTDOWN_SECS));
    }

    #[test]
    fn deadlines_walk_through_all_phases() {
        let mut f = fixture();
        open_answer_window(&mut f);
        let change = f
            .engine
            .handle_deadline(f.engine.generation(), f.engine.epoch(), f.now);
        assert_eq!(change, Some(PhaseChange::Revealed));
        assert_eq!(f.engine.phase(), RoundPhase::Reveal);
        assert!(f.engine.deadline().is_none());
    }

    #[test]
    fn stale_epoch_expiry_is_a_silent_noop() {
        let mut f = fixture();
        let generation = f.engine.generation();
        let stale = f.engine.epoch();
        f.engine.handle_deadline(generation, stale, f.now);
        // Countdown already fired; the same epoch must not fire again.
        assert_eq!(f.engine.handle_deadline(generation, stale, f.now), None);
        assert_eq!(f.engine.phase(), RoundPhase::PlayingClip);
    }

    #[test]
    fn deadline_armed_against_a_replaced_engine_is_ignored() {
        // A sleeper can outlive the engine it was armed for; after a restart
        // the replacement may reach the very same epoch value.
        let old = fixture();
        let stale_generation = old.engine.generation();
        drop(old);

        let mut f = fixture();
        let epoch = f.engine.epoch();
        assert_eq!(f.engine.handle_deadline(stale_generation, epoch, f.now), None);
        assert_eq!(f.engine.phase(), RoundPhase::Countdown);

        // The same epoch presented with the right generation still fires.
        let change = f.engine.handle_deadline(f.engine.generation(), epoch, f.now);
        assert_eq!(change, Some(PhaseChange::ClipStarted));
    }

    #[test]
    fn clip_offset_respects_preview_window() {
        let mut f = fixture();
        f.engine
            .handle_deadline(f.engine.generation(), f.engine.epoch(), f.now);
        let offset = f.engine.clip_start().expect("clip offset picked");
        // preview 30s, clip 3s: offset must fall in [0, 27).
        assert!(offset < Duration::from_secs(27));
    }

    #[test]
    fn clip_offset_falls_back_to_twenty_seconds() {
        let owner = Uuid::new_v4();
        let mut no_preview = track("Imagine", owner);
        no_preview.preview_seconds = None;
        let now = Instant::now();
        let mut engine = RoundEngine::start(
            settings(),
            vec![no_preview],
            [owner],
            StdRng::seed_from_u64(9),
            now,
        );
        engine.handle_deadline(engine.generation(), engine.epoch(), now);
        assert!(engine.clip_start().unwrap() < Duration::from_secs(20));
    }

    #[test]
    fn short_known_preview_starts_the_clip_at_zero() {
        let owner = Uuid::new_v4();
        // preview 2s, clip 3s: no room for an offset window.
        let mut short = track("Imagine", owner);
        short.preview_seconds = Some(2);
        let now = Instant::now();
        let mut engine = RoundEngine::start(
            settings(),
            vec![short],
            [owner],
            StdRng::seed_from_u64(11),
            now,
        );
        engine.handle_deadline(engine.generation(), engine.epoch(), now);
        assert_eq!(engine.clip_start(), Some(Duration::ZERO));
    }

    #[test]
    fn submit_before_answering_is_wrong_phase() {
        let mut f = fixture();
        let err = f
            .engine
            .submit_answer(f.guesser, "imagine", f.now)
            .unwrap_err();
        assert_eq!(err, SubmitError::WrongPhase);
        assert!(f.engine.answers().is_empty());
    }

    #[test]
    fn owner_cannot_answer_their_own_track() {
        let mut f = fixture();
        let opened = open_answer_window(&mut f);
        let err = f
            .engine
            .submit_answer(f.owner, "Imagine", opened)
            .unwrap_err();
        assert_eq!(err, SubmitError::NotEligible);
        assert!(f.engine.answers().is_empty());
        assert_eq!(f.engine.scores()[&f.owner], 0.0);
    }

    #[test]
    fn instant_correct_answer_earns_speed_bonus() {
        let mut f = fixture();
        let opened = open_answer_window(&mut f);
        // Full window remaining: 10s > 5s, bonus applies.
        let outcome = f.engine.submit_answer(f.guesser, "imagine", opened).unwrap();
        assert!(outcome.correct);
        assert!(outcome.speed_bonus);
        assert_eq!(outcome.awarded, 1.5);
        assert_eq!(f.engine.scores()[&f.guesser], 1.5);
    }

    #[test]
    fn late_correct_answer_earns_base_points_only() {
        let mut f = fixture();
        let opened = open_answer_window(&mut f);
        let late = opened + Duration::from_secs(9);
        let outcome = f.engine.submit_answer(f.guesser, "imagine", late).unwrap();
        assert!(outcome.correct);
        assert!(!outcome.speed_bonus);
        assert_eq!(f.engine.scores()[&f.guesser], 1.0);
        assert_eq!(
            f.engine.answers()[0].response_time,
            Duration::from_secs(9)
        );
    }

    #[test]
    fn bonus_requires_strictly_more_than_half_the_window() {
        let mut f = fixture();
        let opened = open_answer_window(&mut f);
        // Exactly half the window left (5s of 10s): no bonus.
        let halfway = opened + Duration::from_secs(5);
        let outcome = f
            .engine
            .submit_answer(f.guesser, "imagine", halfway)
            .unwrap();
        assert!(outcome.correct);
        assert!(!outcome.speed_bonus);
    }

    #[test]
    fn incorrect_answer_is_recorded_but_not_scored() {
        let mut f = fixture();
        let opened = open_answer_window(&mut f);
        let outcome = f
            .engine
            .submit_answer(f.guesser, "wonderwall", opened)
            .unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.awarded, 0.0);
        assert_eq!(f.engine.scores()[&f.guesser], 0.0);
        assert_eq!(f.engine.answers().len(), 1);
        assert!(!f.engine.answers()[0].is_correct);
    }

    #[test]
    fn duplicate_submission_is_rejected_and_leaves_state_alone() {
        let mut f = fixture();
        let opened = open_answer_window(&mut f);
        f.engine.submit_answer(f.guesser, "imagine", opened).unwrap();
        let before = f.engine.answers().to_vec();

        let err = f
            .engine
            .submit_answer(f.guesser, "something else", opened)
            .unwrap_err();
        assert_eq!(err, SubmitError::AlreadySubmitted);
        assert_eq!(f.engine.answers(), before.as_slice());
        assert_eq!(f.engine.scores()[&f.guesser], 1.5);
    }

    #[test]
    fn correct_answer_does_not_shorten_the_window() {
        let mut f = fixture();
        let opened = open_answer_window(&mut f);
        let deadline_before = f.engine.deadline();
        f.engine.submit_answer(f.guesser, "imagine", opened).unwrap();
        assert_eq!(f.engine.phase(), RoundPhase::Answering);
        assert_eq!(f.engine.deadline(), deadline_before);
        // The other player can still answer.
        f.engine.submit_answer(f.other, "imagine", opened).unwrap();
    }

    #[test]
    fn force_end_freezes_answers_and_cancels_the_deadline() {
        let mut f = fixture();
        let opened = open_answer_window(&mut f);
        let generation = f.engine.generation();
        let stale = f.engine.epoch();
        f.engine.force_end_answering(opened).unwrap();
        assert_eq!(f.engine.phase(), RoundPhase::Reveal);
        // The answer timer from before the force-end must not fire.
        assert_eq!(f.engine.handle_deadline(generation, stale, opened), None);

        let err = f.engine.force_end_answering(opened).unwrap_err();
        assert_eq!(err.phase, RoundPhase::Reveal);
    }

    #[test]
    fn advancing_walks_rounds_then_finishes() {
        let mut f = fixture();
        for expected in [2, 3] {
            open_answer_window(&mut f);
            f.engine
                .handle_deadline(f.engine.generation(), f.engine.epoch(), f.now);
            match f.engine.advance_round(f.now).unwrap() {
                AdvanceOutcome::NextRound { round_index } => {
                    assert_eq!(round_index, expected);
                    assert_eq!(f.engine.phase(), RoundPhase::Countdown);
                    assert!(f.engine.answers().is_empty());
                }
                other => panic!("expected next round, got {other:?}"),
            }
        }

        open_answer_window(&mut f);
        f.engine
            .handle_deadline(f.engine.generation(), f.engine.epoch(), f.now);
        match f.engine.advance_round(f.now).unwrap() {
            AdvanceOutcome::Finished { scoreboard } => {
                assert_eq!(scoreboard.len(), 3);
            }
            other => panic!("expected finished, got {other:?}"),
        }
    }

    #[test]
    fn advance_outside_reveal_is_rejected() {
        let mut f = fixture();
        let err = f.engine.advance_round(f.now).unwrap_err();
        assert_eq!(err.phase, RoundPhase::Countdown);
    }

    #[test]
    fn final_scores_sort_descending_with_stable_ties() {
        let mut f = fixture();
        let opened = open_answer_window(&mut f);
        // `other` answers late for 1.0; `guesser` stays at 0 like `owner`.
        f.engine
            .submit_answer(f.other, "imagine", opened + Duration::from_secs(8))
            .unwrap();
        f.engine.force_end_answering(opened).unwrap();

        let standings = f.engine.final_scores();
        assert_eq!(standings[0], (f.other, 1.0));
        // owner joined before guesser; the 0.0 tie keeps that order.
        assert_eq!(standings[1].0, f.owner);
        assert_eq!(standings[2].0, f.guesser);
    }

    #[test]
    fn remaining_seconds_tracks_the_deadline() {
        let mut f = fixture();
        assert_eq!(f.engine.remaining_seconds(f.now), COUNTDOWN_SECS);
        let opened = open_answer_window(&mut f);
        assert_eq!(f.engine.remaining_seconds(opened), 10);
        assert_eq!(
            f.engine.remaining_seconds(opened + Duration::from_secs(4)),
            6
        );
        f.engine.force_end_answering(opened).unwrap();
        assert_eq!(f.engine.remaining_seconds(opened), 0);
    }
}
