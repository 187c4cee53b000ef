use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use super::{storage_error, validation_failed, AppState, AuthenticatedUser};
use crate::models::{ErrorResponse, SuccessResponse, UpdateUserRequest, UserPublic};

/// Configure profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users/profile")
            .route(web::get().to(get_profile))
            .route(web::put().to(update_profile))
            .route(web::delete().to(delete_profile)),
    );
}

async fn get_profile(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(UserPublic::from(user.0))
}

async fn update_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateUserRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    match state.postgres.update_user(user.0.id, &req).await {
        Ok(Some(updated)) => HttpResponse::Ok().json(UserPublic::from(updated)),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new(
            "Update failed",
            "User not found",
            404,
        )),
        Err(e) => storage_error("Update failed", e),
    }
}

async fn delete_profile(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    match state.postgres.delete_user(user.0.id).await {
        Ok(true) => {
            tracing::info!("Deleted user {}", user.0.id);
            HttpResponse::Ok().json(SuccessResponse {
                success: true,
                message: "User deleted".to_string(),
            })
        }
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse::new(
            "Delete failed",
            "User not found",
            404,
        )),
        Err(e) => storage_error("Delete failed", e),
    }
}
