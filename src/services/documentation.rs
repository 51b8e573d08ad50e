use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Beat Reto Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::sse::host_stream,
        crate::routes::room::create_room,
        crate::routes::room::join_room,
        crate::routes::room::current_room,
        crate::routes::room::open_submission,
        crate::routes::room::contribute,
        crate::routes::room::restart,
        crate::routes::round::round_snapshot,
        crate::routes::round::submit_answer,
        crate::routes::round::force_end,
        crate::routes::round::advance,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::phase::VisibleRoomStatus,
            crate::dto::phase::VisibleRoundPhase,
            crate::dto::room::SettingsInput,
            crate::dto::room::CreateRoomRequest,
            crate::dto::room::JoinRoomRequest,
            crate::dto::room::TrackInput,
            crate::dto::room::ContributeRequest,
            crate::dto::room::RoomActionRequest,
            crate::dto::room::PlayerSummary,
            crate::dto::room::SettingsSummary,
            crate::dto::room::RoomSummary,
            crate::dto::room::CreateRoomResponse,
            crate::dto::room::JoinRoomResponse,
            crate::dto::round::SubmitAnswerRequest,
            crate::dto::round::SubmitAnswerResponse,
            crate::dto::round::RoundActionRequest,
            crate::dto::round::TrackSummary,
            crate::dto::round::ClipSummary,
            crate::dto::round::AnswerSummary,
            crate::dto::round::ScoreEntry,
            crate::dto::round::RoundSnapshot,
            crate::dto::round::AdvanceResponse,
            crate::dto::sse::Handshake,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "room", description = "Room lifecycle operations"),
        (name = "round", description = "Round gameplay operations"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
