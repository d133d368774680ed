use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::InputSchema;

/// Create or update a breed
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BreedRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Poodle")]
    pub name: String,

    pub specie_id: Uuid,
}

impl InputSchema for BreedRequest {}
