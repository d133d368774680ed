//! Specie and breed domain entities.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Animal species (dog, cat, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Specie {
    pub id: Uuid,
    #[schema(example = "Dog")]
    pub name: String,
}

/// Breed, always owned by exactly one specie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Breed {
    pub id: Uuid,
    #[schema(example = "Poodle")]
    pub name: String,
    pub specie_id: Uuid,
    /// Owning specie, when loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specie: Option<Specie>,
}

impl Breed {
    /// Whether this breed is owned by `specie_id`
    pub fn belongs_to(&self, specie_id: Uuid) -> bool {
        self.specie_id == specie_id
    }
}
