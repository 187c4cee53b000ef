use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use validator::Validate;

use super::{storage_error, validation_failed, AppState, AuthenticatedUser};
use crate::models::{CreateCarRequest, ErrorResponse, Pagination, SuccessResponse, UpdateCarRequest};

/// Configure car catalogue routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/cars/popular", web::get().to(popular_cars))
        .route("/cars/search/{query}", web::get().to(search_cars))
        .service(
            web::resource("/cars")
                .route(web::get().to(list_cars))
                .route(web::post().to(create_car)),
        )
        .service(
            web::resource("/cars/{id}")
                .route(web::get().to(get_car))
                .route(web::put().to(update_car))
                .route(web::delete().to(delete_car)),
        );
}

#[derive(Debug, Deserialize)]
struct PopularQuery {
    #[serde(default = "default_popular_limit")]
    limit: i64,
}

fn default_popular_limit() -> i64 {
    10
}

async fn list_cars(state: web::Data<AppState>, page: web::Query<Pagination>) -> impl Responder {
    match state.postgres.list_cars(page.into_inner()).await {
        Ok(cars) => HttpResponse::Ok().json(cars),
        Err(e) => storage_error("Failed to list cars", e),
    }
}

async fn popular_cars(state: web::Data<AppState>, query: web::Query<PopularQuery>) -> impl Responder {
    let limit = query.limit.clamp(1, 100);

    if let Some(cache) = &state.cache {
        match cache.popular(limit).await {
            Ok(Some(cars)) => return HttpResponse::Ok().json(cars),
            Ok(None) => {}
            Err(e) => tracing::warn!("Popular cars cache read failed: {}", e),
        }
    }

    match state.postgres.popular_cars(limit).await {
        Ok(cars) => {
            if let Some(cache) = &state.cache {
                if let Err(e) = cache.store_popular(limit, &cars).await {
                    tracing::warn!("Failed to cache popular cars: {}", e);
                }
            }
            HttpResponse::Ok().json(cars)
        }
        Err(e) => storage_error("Failed to load popular cars", e),
    }
}

async fn search_cars(
    state: web::Data<AppState>,
    path: web::Path<String>,
    page: web::Query<Pagination>,
) -> impl Responder {
    let text = path.into_inner();
    match state.postgres.search_cars(&text, page.into_inner()).await {
        Ok(cars) => {
            tracing::debug!("Search {:?} returned {} cars", text, cars.len());
            HttpResponse::Ok().json(cars)
        }
        Err(e) => storage_error("Search failed", e),
    }
}

async fn get_car(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let car_id = path.into_inner();

    if let Some(cache) = &state.cache {
        match cache.car(car_id).await {
            Ok(Some(car)) => return HttpResponse::Ok().json(car),
            Ok(None) => {}
            Err(e) => tracing::warn!("Car cache read failed for {}: {}", car_id, e),
        }
    }

    match state.postgres.get_car(car_id).await {
        Ok(Some(car)) => {
            if let Some(cache) = &state.cache {
                if let Err(e) = cache.store_car(&car).await {
                    tracing::warn!("Failed to cache car {}: {}", car_id, e);
                }
            }
            HttpResponse::Ok().json(car)
        }
        Ok(None) => car_not_found(),
        Err(e) => storage_error("Failed to load car", e),
    }
}

async fn create_car(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateCarRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    match state.postgres.create_car(&req).await {
        Ok(car) => {
            tracing::info!("User {} added car {} ({} {})", user.0.id, car.id, car.make, car.model);
            invalidate(&state, None).await;
            HttpResponse::Created().json(car)
        }
        Err(e) => storage_error("Failed to create car", e),
    }
}

async fn update_car(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: web::Json<UpdateCarRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }
    let car_id = path.into_inner();

    match state.postgres.update_car(car_id, &req).await {
        Ok(Some(car)) => {
            tracing::info!("User {} updated car {}", user.0.id, car_id);
            invalidate(&state, Some(car_id)).await;
            HttpResponse::Ok().json(car)
        }
        Ok(None) => car_not_found(),
        Err(e) => storage_error("Failed to update car", e),
    }
}

async fn delete_car(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> impl Responder {
    let car_id = path.into_inner();

    match state.postgres.delete_car(car_id).await {
        Ok(true) => {
            tracing::info!("User {} deleted car {}", user.0.id, car_id);
            invalidate(&state, Some(car_id)).await;
            HttpResponse::Ok().json(SuccessResponse {
                success: true,
                message: "Car deleted".to_string(),
            })
        }
        Ok(false) => car_not_found(),
        Err(e) => storage_error("Failed to delete car", e),
    }
}

/// Drop cached entries touched by a catalogue write
async fn invalidate(state: &AppState, car_id: Option<i64>) {
    let Some(cache) = &state.cache else {
        return;
    };

    if let Err(e) = cache.invalidate_car(car_id).await {
        tracing::warn!("Failed to invalidate cached cars: {}", e);
    }
}

fn car_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Not found", "Car not found", 404))
}
