use actix_web::dev::Payload;
use actix_web::http::{header, StatusCode};
use actix_web::{error, web, FromRequest, HttpRequest, HttpResponse, Responder};
use std::future::Future;
use std::pin::Pin;
use validator::Validate;

use super::{storage_error, validation_failed, AppState};
use crate::models::{ErrorResponse, LoginRequest, RegisterRequest, TokenResponse, User, UserPublic};
use crate::services::auth::MAX_PASSWORD_BYTES;

/// Configure registration and login routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/register", web::post().to(register))
        .route("/auth/login", web::post().to(login));
}

/// Register a new user
///
/// POST /api/v1/auth/register
async fn register(state: web::Data<AppState>, req: web::Json<RegisterRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }
    if req.password.len() > MAX_PASSWORD_BYTES {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Invalid password",
            format!("Password cannot be longer than {} bytes", MAX_PASSWORD_BYTES),
            400,
        ));
    }

    match state.postgres.get_user_by_username(&req.username).await {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "Registration failed",
                "Username already registered",
                400,
            ))
        }
        Ok(None) => {}
        Err(e) => return storage_error("Registration failed", e),
    }
    match state.postgres.get_user_by_email(&req.email).await {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "Registration failed",
                "Email already registered",
                400,
            ))
        }
        Ok(None) => {}
        Err(e) => return storage_error("Registration failed", e),
    }

    let auth = state.auth.clone();
    let password = req.password.clone();
    let hashed = match web::block(move || auth.hash_password(&password)).await {
        Ok(Ok(hashed)) => hashed,
        Ok(Err(e)) => {
            tracing::error!("Password hashing failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Registration failed", e.to_string(), 500));
        }
        Err(e) => {
            tracing::error!("Password hashing task failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Registration failed", e.to_string(), 500));
        }
    };

    match state.postgres.create_user(&req.username, &req.email, &hashed).await {
        Ok(user) => {
            tracing::info!("Registered user {} ({})", user.id, user.username);
            HttpResponse::Created().json(UserPublic::from(user))
        }
        Err(e) => storage_error("Registration failed", e),
    }
}

/// Log in with username or email
///
/// POST /api/v1/auth/login
///
/// ```json
/// { "username": "driver", "password": "..." }
/// ```
async fn login(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    let req = req.into_inner();

    let lookup = match (req.username.as_deref(), req.email.as_deref()) {
        (Some(username), _) => state.postgres.get_user_by_username(username).await,
        (None, Some(email)) => state.postgres.get_user_by_email(email).await,
        (None, None) => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "Login failed",
                "Username or email is required",
                400,
            ))
        }
    };

    let user = match lookup {
        Ok(Some(user)) => user,
        Ok(None) => return invalid_credentials(),
        Err(e) => return storage_error("Login failed", e),
    };

    let auth = state.auth.clone();
    let hashed = user.hashed_password.clone();
    let password = req.password;
    let verified = web::block(move || auth.verify_password(&password, &hashed))
        .await
        .unwrap_or(false);
    if !verified {
        return invalid_credentials();
    }
    if !user.is_active {
        return HttpResponse::BadRequest().json(ErrorResponse::new("Login failed", "Inactive user", 400));
    }

    match state.auth.create_access_token(&user.username, user.id) {
        Ok(access_token) => {
            tracing::info!("User {} logged in", user.id);
            HttpResponse::Ok().json(TokenResponse {
                access_token,
                token_type: "bearer".to_string(),
                expires_in: state.auth.token_ttl_secs(),
                user: UserPublic::from(user),
            })
        }
        Err(e) => {
            tracing::error!("Failed to issue token for user {}: {}", user.id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Login failed", e.to_string(), 500))
        }
    }
}

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
        .json(ErrorResponse::new(
            "Login failed",
            "Incorrect username or password",
            401,
        ))
}

/// Rejection for requests without a usable bearer token
#[derive(Debug)]
pub struct Unauthorized {
    message: &'static str,
}

impl std::fmt::Display for Unauthorized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unauthorized: {}", self.message)
    }
}

impl error::ResponseError for Unauthorized {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Unauthorized()
            .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
            .json(ErrorResponse::new("Unauthorized", self.message, 401))
    }
}

fn unauthorized(message: &'static str) -> actix_web::Error {
    Unauthorized { message }.into()
}

/// The active user behind the request's bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req).map(str::to_string);

        Box::pin(async move {
            let state = state
                .ok_or_else(|| error::ErrorInternalServerError("Application state missing"))?;
            let token = token.ok_or_else(|| unauthorized("Not authenticated"))?;
            let claims = state
                .auth
                .verify_token(&token)
                .map_err(|_| unauthorized("Could not validate credentials"))?;

            match state.postgres.get_user_by_id(claims.uid).await {
                Ok(Some(user)) if user.is_active && user.username == claims.sub => {
                    Ok(AuthenticatedUser(user))
                }
                Ok(_) => Err(unauthorized("Could not validate credentials")),
                Err(e) => {
                    tracing::error!("Failed to load user {} for token: {}", claims.uid, e);
                    Err(error::ErrorServiceUnavailable("User lookup failed"))
                }
            }
        })
    }
}

/// Token from an `Authorization: Bearer <token>` header
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
