//! Pet handlers. Creation and image attachment take multipart bodies.

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use axum_extra::extract::Query;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::{PetMultipart, ValidatedJson};
use crate::api::AppState;
use crate::config::MAX_UPLOAD_BODY_BYTES;
use crate::domain::{Gender, PetColor, PetResponse, PetSize};
use crate::errors::AppResult;
use crate::schemas::{PetQuery, UpdatePetRequest};
use crate::types::NoContent;

/// Multipart pet form, for documentation
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct PetFormSchema {
    #[schema(example = "Rex")]
    name: String,
    specie_id: Uuid,
    breed_id: Option<Uuid>,
    color: PetColor,
    size: PetSize,
    #[schema(minimum = 0)]
    age: i32,
    gender: Gender,
    /// Image files (png, jpeg, jfif), up to 5 MiB each
    #[schema(value_type = Vec<String>, format = Binary)]
    images: Vec<Vec<u8>>,
}

/// Image files only, for documentation
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct PetImagesSchema {
    #[schema(value_type = Vec<String>, format = Binary)]
    images: Vec<Vec<u8>>,
}

pub fn pet_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pets).post(create_pet))
        .route("/:id", get(get_pet).put(update_pet).delete(delete_pet))
        .route("/:id/images", post(attach_images))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
}

/// List pets matching the query filters
#[utoipa::path(
    get,
    path = "/pets",
    tag = "Pets",
    params(PetQuery),
    responses((status = 200, description = "Matching pets", body = [PetResponse]))
)]
pub async fn list_pets(
    State(state): State<AppState>,
    Query(query): Query<PetQuery>,
) -> AppResult<Json<Vec<PetResponse>>> {
    Ok(Json(state.services.pets().list(query.into()).await?))
}

/// Get a pet by id
#[utoipa::path(
    get,
    path = "/pets/{id}",
    tag = "Pets",
    params(("id" = Uuid, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Pet found", body = PetResponse),
        (status = 404, description = "Pet not found")
    )
)]
pub async fn get_pet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PetResponse>> {
    Ok(Json(state.services.pets().get(id).await?))
}

/// Create a pet with its images
#[utoipa::path(
    post,
    path = "/pets",
    tag = "Pets",
    request_body(content = PetFormSchema, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Pet created", body = PetResponse),
        (status = 400, description = "Breed does not belong to the specie"),
        (status = 404, description = "Specie or breed not found"),
        (status = 422, description = "Invalid field or file")
    )
)]
pub async fn create_pet(
    State(state): State<AppState>,
    PetMultipart { form, images }: PetMultipart,
) -> AppResult<(StatusCode, Json<PetResponse>)> {
    let pet = state.services.pets().create(form, images).await?;
    Ok((StatusCode::CREATED, Json(pet)))
}

/// Update a pet
#[utoipa::path(
    put,
    path = "/pets/{id}",
    tag = "Pets",
    params(("id" = Uuid, Path, description = "Pet id")),
    request_body = UpdatePetRequest,
    responses(
        (status = 200, description = "Pet updated", body = PetResponse),
        (status = 400, description = "Breed does not belong to the specie"),
        (status = 404, description = "Pet, specie or breed not found")
    )
)]
pub async fn update_pet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdatePetRequest>,
) -> AppResult<Json<PetResponse>> {
    Ok(Json(state.services.pets().update(id, payload).await?))
}

/// Delete a pet and its images
#[utoipa::path(
    delete,
    path = "/pets/{id}",
    tag = "Pets",
    params(("id" = Uuid, Path, description = "Pet id")),
    responses(
        (status = 204, description = "Pet deleted"),
        (status = 404, description = "Pet not found")
    )
)]
pub async fn delete_pet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.pets().delete(id).await?;
    Ok(NoContent)
}

/// Add images to a pet
#[utoipa::path(
    post,
    path = "/pets/{id}/images",
    tag = "Pets",
    params(("id" = Uuid, Path, description = "Pet id")),
    request_body(content = PetImagesSchema, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Images attached", body = PetResponse),
        (status = 404, description = "Pet not found"),
        (status = 422, description = "Invalid file")
    )
)]
pub async fn attach_images(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    PetMultipart { images, .. }: PetMultipart,
) -> AppResult<Json<PetResponse>> {
    Ok(Json(state.services.pets().attach_images(id, images).await?))
}
