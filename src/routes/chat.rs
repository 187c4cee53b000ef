use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use super::{storage_error, validation_failed, AppState, AuthenticatedUser};
use crate::core::InventoryError;
use crate::models::{ChatRequest, ErrorResponse, SessionSummary};
use crate::services::ChatError;

/// Configure chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat/send", web::post().to(send_message))
        .route("/chat/sessions", web::get().to(list_sessions))
        .route("/chat/sessions/{id}/messages", web::get().to(session_messages))
        .route(
            "/chat/sessions/{id}/recommendations",
            web::get().to(session_recommendations),
        );
}

/// Send a message to the advisor
///
/// POST /api/v1/chat/send
///
/// ```json
/// { "message": "хочу дизельный внедорожник до 3 млн", "session_id": 12 }
/// ```
async fn send_message(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<ChatRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    tracing::info!("Chat message from user {} (session {:?})", user.0.id, req.session_id);

    match state.chat.process_chat_request(user.0.id, &req).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => chat_error(e),
    }
}

async fn list_sessions(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    match state.chat.user_sessions(user.0.id).await {
        Ok(sessions) => HttpResponse::Ok().json(
            sessions
                .into_iter()
                .map(SessionSummary::from)
                .collect::<Vec<_>>(),
        ),
        Err(e) => chat_error(e),
    }
}

async fn session_messages(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> impl Responder {
    match state.chat.session_messages(user.0.id, path.into_inner()).await {
        Ok(messages) => HttpResponse::Ok().json(messages),
        Err(e) => chat_error(e),
    }
}

async fn session_recommendations(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> impl Responder {
    match state
        .chat
        .session_recommendations(user.0.id, path.into_inner())
        .await
    {
        Ok(recommendations) => HttpResponse::Ok().json(recommendations),
        Err(e) => chat_error(e),
    }
}

fn chat_error(err: ChatError) -> HttpResponse {
    match err {
        ChatError::InvalidSession => HttpResponse::BadRequest().json(ErrorResponse::new(
            "Chat failed",
            err.to_string(),
            400,
        )),
        ChatError::SessionNotFound => HttpResponse::NotFound().json(ErrorResponse::new(
            "Not found",
            err.to_string(),
            404,
        )),
        ChatError::Inventory(InventoryError::Unavailable(ref reason)) => {
            tracing::error!("Car inventory unavailable: {}", reason);
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                "Recommendation failed",
                err.to_string(),
                503,
            ))
        }
        ChatError::Inventory(InventoryError::QueryFailed(ref reason)) => {
            tracing::error!("Car inventory query failed: {}", reason);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Recommendation failed",
                err.to_string(),
                500,
            ))
        }
        ChatError::Storage(e) => storage_error("Chat failed", e),
    }
}
