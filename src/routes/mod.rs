// Route exports
pub mod auth;
pub mod cars;
pub mod chat;
pub mod users;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::{translate, RecommendationEngine};
use crate::models::{ErrorResponse, HealthResponse, ParseQueryRequest, ParseQueryResponse};
use crate::services::{AuthService, CarCache, ChatService, PostgresClient, PostgresError};

pub use auth::AuthenticatedUser;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    /// `None` when Redis is not configured
    pub cache: Option<Arc<CarCache>>,
    pub auth: Arc<AuthService>,
    pub engine: RecommendationEngine,
    pub chat: ChatService,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .route("/recommend/parse", web::post().to(parse_query))
            .configure(auth::configure)
            .configure(users::configure)
            .configure(cars::configure)
            .configure(chat::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Show what the extractor reads from a query
///
/// POST /api/v1/recommend/parse
///
/// ```json
/// { "query": "ищу седан до 2 млн" }
/// ```
async fn parse_query(
    state: web::Data<AppState>,
    req: web::Json<ParseQueryRequest>,
) -> impl Responder {
    let parameters = state.engine.extract_parameters(&req.query);
    let (filter, _) = translate(&parameters, state.engine.limit());

    tracing::debug!("Parsed query {:?} into {:?}", req.query, parameters);

    HttpResponse::Ok().json(ParseQueryResponse {
        query: req.into_inner().query,
        parameters,
        filter,
    })
}

/// 400 with the validator's field errors
pub(crate) fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(
        "Validation failed",
        errors.to_string(),
        400,
    ))
}

/// Map a storage failure onto 400/404/503/500
pub(crate) fn storage_error(context: &str, err: PostgresError) -> HttpResponse {
    match err {
        PostgresError::Conflict(what) => HttpResponse::BadRequest()
            .json(ErrorResponse::new(context, format!("{} already registered", what), 400)),
        PostgresError::NotFound(what) => {
            HttpResponse::NotFound().json(ErrorResponse::new(context, what, 404))
        }
        err if err.is_unavailable() => {
            tracing::error!("{}: database unavailable: {}", context, err);
            HttpResponse::ServiceUnavailable()
                .json(ErrorResponse::new(context, err.to_string(), 503))
        }
        err => {
            tracing::error!("{}: {}", context, err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new(context, err.to_string(), 500))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_status_codes() {
        let conflict = storage_error("Register", PostgresError::Conflict("email".to_string()));
        assert_eq!(conflict.status(), 400);

        let missing = storage_error("Get car", PostgresError::NotFound("car 1".to_string()));
        assert_eq!(missing.status(), 404);

        let down = storage_error("Get car", PostgresError::SqlxError(sqlx::Error::PoolTimedOut));
        assert_eq!(down.status(), 503);

        let broken = storage_error("Get car", PostgresError::SqlxError(sqlx::Error::RowNotFound));
        assert_eq!(broken.status(), 500);
    }
}
