// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Car, ChatSession, Message, MessageRole, Recommendation, User};
pub use requests::{
    ChatRequest, CreateCarRequest, LoginRequest, Pagination, ParseQueryRequest, RegisterRequest,
    UpdateCarRequest, UpdateUserRequest,
};
pub use responses::{
    ChatResponse, ErrorResponse, HealthResponse, ParseQueryResponse, SessionSummary, SuccessResponse, TokenResponse,
    UserPublic,
};
