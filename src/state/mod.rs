//! Shared application state and the game-domain model underneath it.

pub mod matcher;
pub mod room;
pub mod round;
mod sse;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::{config::AppConfig, error::ServiceError, state::room::RoomSession};

pub use self::sse::SseHub;

/// Cheaply cloneable handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state: the single live room plus SSE fan-out hubs.
pub struct AppState {
    config: AppConfig,
    sse: sse::SseState,
    room: RwLock<Option<RoomSession>>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            config,
            sse: sse::SseState::new(16, 16),
            room: RwLock::new(None),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Slot holding the live room session, if any.
    pub fn room(&self) -> &RwLock<Option<RoomSession>> {
        &self.room
    }

    /// Read the room slot, passing whatever is there (possibly nothing).
    pub async fn read_room<F, T>(&self, f: F) -> T
    where
        F: FnOnce(Option<&RoomSession>) -> T,
    {
        let guard = self.room.read().await;
        f(guard.as_ref())
    }

    /// Run a closure against the live room, or fail when none exists.
    pub async fn with_room<F, T>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&RoomSession) -> Result<T, ServiceError>,
    {
        let guard = self.room.read().await;
        let room = guard
            .as_ref()
            .ok_or_else(|| ServiceError::NotFound("no active room".into()))?;
        f(room)
    }

    /// Run a mutating closure against the live room, or fail when none exists.
    pub async fn with_room_mut<F, T>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut RoomSession) -> Result<T, ServiceError>,
    {
        let mut guard = self.room.write().await;
        let room = guard
            .as_mut()
            .ok_or_else(|| ServiceError::NotFound("no active room".into()))?;
        f(room)
    }

    /// Run a closure against the room slot itself (for install/teardown).
    pub async fn with_room_slot_mut<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Option<RoomSession>) -> T,
    {
        let mut guard = self.room.write().await;
        f(&mut guard)
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        self.sse.public()
    }

    /// Broadcast hub used for the host SSE stream.
    pub fn host_sse(&self) -> &SseHub {
        self.sse.host().hub()
    }

    /// Token guard that ensures a single host SSE subscriber at a time.
    pub fn host_token(&self) -> &Mutex<Option<String>> {
        self.sse.host().token()
    }
}
