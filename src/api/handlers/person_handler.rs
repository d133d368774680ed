//! Person handlers. A person is reachable by the user linked to it or an admin.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Person;
use crate::errors::{AppError, AppResult};
use crate::schemas::UpdatePersonRequest;
use crate::types::NoContent;

pub fn person_routes() -> Router<AppState> {
    Router::new().route(
        "/:id",
        get(get_person).put(update_person).delete(delete_person),
    )
}

async fn ensure_person_access(
    state: &AppState,
    current_user: &CurrentUser,
    person_id: Uuid,
) -> AppResult<()> {
    if current_user.is_admin() {
        return Ok(());
    }
    let user = state.services.users().get_user(current_user.id).await?;
    if user.person_id == Some(person_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Get a person by id
#[utoipa::path(
    get,
    path = "/persons/{id}",
    tag = "Persons",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Person id")),
    responses(
        (status = 200, description = "Person found", body = Person),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "Person not found")
    )
)]
pub async fn get_person(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Person>> {
    ensure_person_access(&state, &current_user, id).await?;
    let person = state.services.persons().get_person(id).await?;
    Ok(Json(person))
}

/// Update a person
#[utoipa::path(
    put,
    path = "/persons/{id}",
    tag = "Persons",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Person id")),
    request_body = UpdatePersonRequest,
    responses(
        (status = 200, description = "Person updated", body = Person),
        (status = 404, description = "Person not found"),
        (status = 409, description = "CPF already used"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_person(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdatePersonRequest>,
) -> AppResult<Json<Person>> {
    ensure_person_access(&state, &current_user, id).await?;
    let person = state.services.persons().update_person(id, payload).await?;
    Ok(Json(person))
}

/// Delete a person
#[utoipa::path(
    delete,
    path = "/persons/{id}",
    tag = "Persons",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Person id")),
    responses(
        (status = 204, description = "Person deleted"),
        (status = 404, description = "Person not found")
    )
)]
pub async fn delete_person(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    ensure_person_access(&state, &current_user, id).await?;
    state.services.persons().delete_person(id).await?;
    Ok(NoContent)
}
