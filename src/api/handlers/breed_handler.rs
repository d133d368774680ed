//! Breed handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::Breed;
use crate::errors::AppResult;
use crate::schemas::BreedRequest;
use crate::types::NoContent;

pub fn breed_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_breeds).post(create_breed))
        .route("/specie/:specie_id", get(list_breeds_by_specie))
        .route("/:id", get(get_breed).put(update_breed).delete(delete_breed))
}

/// List all breeds
#[utoipa::path(
    get,
    path = "/breeds",
    tag = "Breeds",
    responses((status = 200, description = "All breeds with their specie", body = [Breed]))
)]
pub async fn list_breeds(State(state): State<AppState>) -> AppResult<Json<Vec<Breed>>> {
    Ok(Json(state.services.breeds().list().await?))
}

/// List the breeds of one specie
#[utoipa::path(
    get,
    path = "/breeds/specie/{specie_id}",
    tag = "Breeds",
    params(("specie_id" = Uuid, Path, description = "Specie id")),
    responses(
        (status = 200, description = "Breeds of the specie", body = [Breed]),
        (status = 404, description = "Specie not found")
    )
)]
pub async fn list_breeds_by_specie(
    State(state): State<AppState>,
    Path(specie_id): Path<Uuid>,
) -> AppResult<Json<Vec<Breed>>> {
    Ok(Json(state.services.breeds().list_by_specie(specie_id).await?))
}

/// Get a breed by id
#[utoipa::path(
    get,
    path = "/breeds/{id}",
    tag = "Breeds",
    params(("id" = Uuid, Path, description = "Breed id")),
    responses(
        (status = 200, description = "Breed found", body = Breed),
        (status = 404, description = "Breed not found")
    )
)]
pub async fn get_breed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Breed>> {
    Ok(Json(state.services.breeds().get(id).await?))
}

/// Create a breed under an existing specie
#[utoipa::path(
    post,
    path = "/breeds",
    tag = "Breeds",
    request_body = BreedRequest,
    responses(
        (status = 201, description = "Breed created", body = Breed),
        (status = 404, description = "Specie not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_breed(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BreedRequest>,
) -> AppResult<(StatusCode, Json<Breed>)> {
    let breed = state.services.breeds().create(payload).await?;
    Ok((StatusCode::CREATED, Json(breed)))
}

/// Update a breed
#[utoipa::path(
    put,
    path = "/breeds/{id}",
    tag = "Breeds",
    params(("id" = Uuid, Path, description = "Breed id")),
    request_body = BreedRequest,
    responses(
        (status = 200, description = "Breed updated", body = Breed),
        (status = 404, description = "Breed or specie not found")
    )
)]
pub async fn update_breed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<BreedRequest>,
) -> AppResult<Json<Breed>> {
    Ok(Json(state.services.breeds().update(id, payload).await?))
}

/// Delete a breed
#[utoipa::path(
    delete,
    path = "/breeds/{id}",
    tag = "Breeds",
    params(("id" = Uuid, Path, description = "Breed id")),
    responses(
        (status = 204, description = "Breed deleted"),
        (status = 404, description = "Breed not found")
    )
)]
pub async fn delete_breed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.breeds().delete(id).await?;
    Ok(NoContent)
}
