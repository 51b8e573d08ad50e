use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status (always "ok" while the process is serving).
    pub status: String,
    /// Whether a room session is currently live.
    pub room_active: bool,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(room_active: bool) -> Self {
        Self {
            status: "ok".to_string(),
            room_active,
        }
    }
}
