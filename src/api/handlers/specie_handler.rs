//! Species handlers.

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
use crate::domain::Specie;
use crate::errors::AppResult;
use crate::schemas::SpecieRequest;
use crate::types::NoContent;

pub fn specie_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_species).post(create_specie))
        .route(
            "/:id",
            get(get_specie).put(update_specie).delete(delete_specie),
        )
}

/// List all species
#[utoipa::path(
    get,
    path = "/species",
    tag = "Species",
    responses((status = 200, description = "All species", body = [Specie]))
)]
pub async fn list_species(State(state): State<AppState>) -> AppResult<Json<Vec<Specie>>> {
    Ok(Json(state.services.species().list().await?))
}

/// Get a specie by id
#[utoipa::path(
    get,
    path = "/species/{id}",
    tag = "Species",
    params(("id" = Uuid, Path, description = "Specie id")),
    responses(
        (status = 200, description = "Specie found", body = Specie),
        (status = 404, description = "Specie not found")
    )
)]
pub async fn get_specie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Specie>> {
    Ok(Json(state.services.species().get(id).await?))
}

/// Create a specie
#[utoipa::path(
    post,
    path = "/species",
    tag = "Species",
    request_body = SpecieRequest,
    responses(
        (status = 201, description = "Specie created", body = Specie),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_specie(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SpecieRequest>,
) -> AppResult<(StatusCode, Json<Specie>)> {
    let specie = state.services.species().create(payload).await?;
    Ok((StatusCode::CREATED, Json(specie)))
}

/// Rename a specie
#[utoipa::path(
    put,
    path = "/species/{id}",
    tag = "Species",
    params(("id" = Uuid, Path, description = "Specie id")),
    request_body = SpecieRequest,
    responses(
        (status = 200, description = "Specie updated", body = Specie),
        (status = 404, description = "Specie not found")
    )
)]
pub async fn update_specie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SpecieRequest>,
) -> AppResult<Json<Specie>> {
    Ok(Json(state.services.species().update(id, payload).await?))
}

/// Delete a specie with its breeds and pets
#[utoipa::path(
    delete,
    path = "/species/{id}",
    tag = "Species",
    params(("id" = Uuid, Path, description = "Specie id")),
    responses(
        (status = 204, description = "Specie deleted"),
        (status = 404, description = "Specie not found")
    )
)]
pub async fn delete_specie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.species().delete(id).await?;
    Ok(NoContent)
}
