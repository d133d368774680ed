use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::InputSchema;

/// Create or rename a specie
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SpecieRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Dog")]
    pub name: String,
}

impl InputSchema for SpecieRequest {}
