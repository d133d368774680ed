//! Pet payloads: multipart creation form, JSON update and list query.

use std::str::FromStr;

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{InputSchema, ValidationReport};
use crate::domain::{Gender, NewPet, PetChanges, PetColor, PetFilter, PetSize};
use crate::errors::{AppError, AppResult};

/// Text fields of the multipart pet form, as received
#[derive(Debug, Clone, Default, Validate)]
pub struct PetForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub specie_id: String,
    pub breed_id: Option<String>,
    pub color: String,
    pub size: String,
    pub age: String,
    pub gender: String,
}

fn parse_field<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

impl PetForm {
    /// Set a text field by its form name; unknown names are ignored
    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = value,
            "specie_id" => self.specie_id = value,
            "breed_id" if value.trim().is_empty() => self.breed_id = None,
            "breed_id" => self.breed_id = Some(value),
            "color" => self.color = value,
            "size" => self.size = value,
            "age" => self.age = value,
            "gender" => self.gender = value,
            _ => {}
        }
    }

    /// Convert into insertable data for a pet with a pre-allocated id
    pub fn into_new_pet(self, id: Uuid) -> AppResult<NewPet> {
        self.check()?;
        let invalid = |field: &str| AppError::validation(field, format!("Invalid {}", field));

        Ok(NewPet {
            id,
            name: self.name,
            specie_id: parse_field(&self.specie_id).ok_or_else(|| invalid("specie_id"))?,
            breed_id: match self.breed_id.as_deref() {
                Some(raw) => Some(parse_field(raw).ok_or_else(|| invalid("breed_id"))?),
                None => None,
            },
            color: parse_field(&self.color).ok_or_else(|| invalid("color"))?,
            size: parse_field(&self.size).ok_or_else(|| invalid("size"))?,
            age: parse_field(&self.age).ok_or_else(|| invalid("age"))?,
            gender: parse_field(&self.gender).ok_or_else(|| invalid("gender"))?,
        })
    }
}

impl InputSchema for PetForm {
    fn refine(&self, report: &mut ValidationReport) {
        if self.specie_id.trim().is_empty() {
            report.push("specie_id", "Specie is required");
        } else if parse_field::<Uuid>(&self.specie_id).is_none() {
            report.push("specie_id", "Specie must be a valid id");
        }
        if let Some(breed_id) = &self.breed_id {
            if parse_field::<Uuid>(breed_id).is_none() {
                report.push("breed_id", "Breed must be a valid id");
            }
        }
        if parse_field::<PetColor>(&self.color).is_none() {
            report.push("color", "Invalid color");
        }
        if parse_field::<PetSize>(&self.size).is_none() {
            report.push("size", "Invalid size");
        }
        match parse_field::<i32>(&self.age) {
            None => report.push("age", "Age must be a number"),
            Some(age) if age < 0 => report.push("age", "Age must not be negative"),
            Some(_) => {}
        }
        if parse_field::<Gender>(&self.gender).is_none() {
            report.push("gender", "Gender must be either 'M' or 'F'");
        }
    }
}

/// Partial pet update
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePetRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    pub specie_id: Option<Uuid>,
    pub breed_id: Option<Uuid>,
    pub color: Option<PetColor>,
    pub size: Option<PetSize>,
    #[validate(range(min = 0, message = "Age must not be negative"))]
    pub age: Option<i32>,
    pub gender: Option<Gender>,
}

impl InputSchema for UpdatePetRequest {}

impl From<UpdatePetRequest> for PetChanges {
    fn from(request: UpdatePetRequest) -> Self {
        Self {
            name: request.name,
            specie_id: request.specie_id,
            breed_id: request.breed_id,
            color: request.color,
            size: request.size,
            age: request.age,
            gender: request.gender,
        }
    }
}

/// Pet list query. Repeat a key to match several values, e.g.
/// `?sizes=SMALL&sizes=MEDIUM`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PetQuery {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    #[serde(default)]
    pub species: Vec<Uuid>,
    #[serde(default)]
    pub breeds: Vec<Uuid>,
    #[serde(default)]
    pub sizes: Vec<PetSize>,
    #[serde(default)]
    pub colors: Vec<PetColor>,
    #[serde(default)]
    pub genders: Vec<Gender>,
}

impl From<PetQuery> for PetFilter {
    fn from(query: PetQuery) -> Self {
        Self {
            name: query.name.filter(|n| !n.trim().is_empty()),
            species: query.species,
            breeds: query.breeds,
            sizes: query.sizes,
            colors: query.colors,
            genders: query.genders,
        }
    }
}
