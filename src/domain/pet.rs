//! Pet domain entity, images and list filters.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::person::Gender;
use super::specie::{Breed, Specie};

/// Coat color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PetColor {
    Black,
    White,
    Brown,
    Gray,
    Golden,
    Orange,
    Spotted,
    Mixed,
}

impl PetColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetColor::Black => "BLACK",
            PetColor::White => "WHITE",
            PetColor::Brown => "BROWN",
            PetColor::Gray => "GRAY",
            PetColor::Golden => "GOLDEN",
            PetColor::Orange => "ORANGE",
            PetColor::Spotted => "SPOTTED",
            PetColor::Mixed => "MIXED",
        }
    }
}

impl FromStr for PetColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BLACK" => Ok(PetColor::Black),
            "WHITE" => Ok(PetColor::White),
            "BROWN" => Ok(PetColor::Brown),
            "GRAY" => Ok(PetColor::Gray),
            "GOLDEN" => Ok(PetColor::Golden),
            "ORANGE" => Ok(PetColor::Orange),
            "SPOTTED" => Ok(PetColor::Spotted),
            "MIXED" => Ok(PetColor::Mixed),
            other => Err(format!("Unknown color: {}", other)),
        }
    }
}

/// Adult size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PetSize {
    Small,
    Medium,
    Large,
}

impl PetSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetSize::Small => "SMALL",
            PetSize::Medium => "MEDIUM",
            PetSize::Large => "LARGE",
        }
    }
}

impl FromStr for PetSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SMALL" => Ok(PetSize::Small),
            "MEDIUM" => Ok(PetSize::Medium),
            "LARGE" => Ok(PetSize::Large),
            other => Err(format!("Unknown size: {}", other)),
        }
    }
}

/// Stored image of a pet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetImage {
    pub id: Uuid,
    pub pet_id: Uuid,
    /// Derived file name inside the upload directory
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

/// Pet domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: Uuid,
    pub name: String,
    pub specie_id: Uuid,
    pub specie: Option<Specie>,
    pub breed_id: Option<Uuid>,
    pub breed: Option<Breed>,
    pub color: PetColor,
    pub size: PetSize,
    pub age: i32,
    pub gender: Gender,
    pub images: Vec<PetImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to insert a pet. The id is chosen by the caller so that image
/// file names can be derived before the row exists.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub id: Uuid,
    pub name: String,
    pub specie_id: Uuid,
    pub breed_id: Option<Uuid>,
    pub color: PetColor,
    pub size: PetSize,
    pub age: i32,
    pub gender: Gender,
}

/// Partial pet update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct PetChanges {
    pub name: Option<String>,
    pub specie_id: Option<Uuid>,
    pub breed_id: Option<Uuid>,
    pub color: Option<PetColor>,
    pub size: Option<PetSize>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
}

/// Multi-field pet filter. Empty fields are ignored rather than matching
/// nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetFilter {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub species: Vec<Uuid>,
    pub breeds: Vec<Uuid>,
    pub sizes: Vec<PetSize>,
    pub colors: Vec<PetColor>,
    pub genders: Vec<Gender>,
}

impl PetFilter {
    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.name.as_deref().map_or(true, |n| n.trim().is_empty())
            && self.species.is_empty()
            && self.breeds.is_empty()
            && self.sizes.is_empty()
            && self.colors.is_empty()
            && self.genders.is_empty()
    }
}

/// Public image link
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PetImageResponse {
    pub id: Uuid,
    #[schema(example = "http://localhost:3100/uploads/3f1c...9a.png")]
    pub image_url: String,
}

/// Pet response with computed image URLs
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PetResponse {
    pub id: Uuid,
    #[schema(example = "Rex")]
    pub name: String,
    pub specie: Option<Specie>,
    pub specie_id: Uuid,
    pub breed: Option<Breed>,
    pub breed_id: Option<Uuid>,
    pub color: PetColor,
    pub size: PetSize,
    pub age: i32,
    pub gender: Gender,
    pub images: Vec<PetImageResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PetResponse {
    /// Build a response, turning stored file names into public URLs
    pub fn from_pet(pet: Pet, url_for: impl Fn(&str) -> String) -> Self {
        let images = pet
            .images
            .iter()
            .map(|image| PetImageResponse {
                id: image.id,
                image_url: url_for(&image.file_name),
            })
            .collect();

        Self {
            id: pet.id,
            name: pet.name,
            specie: pet.specie,
            specie_id: pet.specie_id,
            breed: pet.breed,
            breed_id: pet.breed_id,
            color: pet.color,
            size: pet.size,
            age: pet.age,
            gender: pet.gender,
            images,
            created_at: pet.created_at,
            updated_at: pet.updated_at,
        }
    }
}
