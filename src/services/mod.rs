/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Room lifecycle: creation, joining, track collection, replay.
pub mod room_service;
/// Round gameplay: snapshots, guesses, phase timers.
pub mod round_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
