use std::sync::Arc;
use thiserror::Error;

use crate::core::{InventoryError, RecommendationEngine};
use crate::models::{
    ChatRequest, ChatResponse, ChatSession, Message, MessageRole, Pagination, Recommendation,
};
use crate::services::postgres::{PostgresClient, PostgresError};

/// Stored recommendation reasons are cut to this many characters
const REASON_MAX_CHARS: usize = 200;

/// Errors in the chat flow
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid session ID")]
    InvalidSession,

    #[error("Session not found")]
    SessionNotFound,

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] PostgresError),
}

/// Chat sessions, message history and bot replies
#[derive(Clone)]
pub struct ChatService {
    postgres: Arc<PostgresClient>,
    engine: RecommendationEngine,
    max_history: i64,
}

impl ChatService {
    pub fn new(postgres: Arc<PostgresClient>, engine: RecommendationEngine, max_history: i64) -> Self {
        Self {
            postgres,
            engine,
            max_history: max_history.max(1),
        }
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    /// Handle one user message.
    ///
    /// Continues the given session if it belongs to the user, otherwise
    /// starts a new one. Both the user's message and the bot reply are
    /// stored, and each suggested car is recorded against the session.
    pub async fn process_chat_request(
        &self,
        user_id: i64,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ChatError> {
        let session = match request.session_id {
            Some(session_id) => self
                .postgres
                .get_session(session_id)
                .await?
                .filter(|s| s.user_id == user_id)
                .ok_or(ChatError::InvalidSession)?,
            None => {
                let title = session_title(chrono::Utc::now());
                self.postgres.create_session(user_id, Some(&title)).await?
            }
        };

        self.postgres
            .add_message(session.id, Some(user_id), &request.message, MessageRole::User)
            .await?;

        let result = self.engine.process_query(&request.message).await?;

        self.postgres
            .add_message(session.id, None, &result.response, MessageRole::Assistant)
            .await?;

        let reason: String = request.message.chars().take(REASON_MAX_CHARS).collect();
        for car in &result.cars {
            self.postgres
                .add_recommendation(session.id, car.id, Some(&reason))
                .await?;
        }

        self.postgres.touch_session(session.id).await?;

        tracing::info!(
            "Chat session {}: replied with {} recommendations",
            session.id,
            result.cars.len()
        );

        Ok(ChatResponse {
            response: result.response,
            session_id: session.id,
            car_recommendations: result.cars,
        })
    }

    pub async fn user_sessions(&self, user_id: i64) -> Result<Vec<ChatSession>, ChatError> {
        Ok(self
            .postgres
            .list_user_sessions(user_id, Pagination::default())
            .await?)
    }

    /// Message history of a session owned by the user, capped at `max_history`
    pub async fn session_messages(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> Result<Vec<Message>, ChatError> {
        self.owned_session(user_id, session_id).await?;
        let page = Pagination { skip: 0, limit: self.max_history };
        Ok(self.postgres.session_messages(session_id, page).await?)
    }

    pub async fn session_recommendations(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> Result<Vec<Recommendation>, ChatError> {
        self.owned_session(user_id, session_id).await?;
        Ok(self.postgres.session_recommendations(session_id).await?)
    }

    async fn owned_session(&self, user_id: i64, session_id: i64) -> Result<ChatSession, ChatError> {
        self.postgres
            .get_session(session_id)
            .await?
            .filter(|s| s.user_id == user_id)
            .ok_or(ChatError::SessionNotFound)
    }
}

fn session_title(now: chrono::DateTime<chrono::Utc>) -> String {
    now.format("Chat %Y-%m-%d %H:%M").to_string()
}
