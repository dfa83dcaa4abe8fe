//! HTTP adapter for the game endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatMessageDto, ChatRequest, ChatResponse, ChatRole, ErrorBody, ErrorEnvelope,
    GenerateReportRequest, GenerateReportResponse, GetReportResponse, ReportFormatQuery,
    StartSessionRequest, StartSessionResponse,
};
pub use handlers::GameHandlers;
pub use routes::game_routes;
