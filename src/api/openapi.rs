//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, breed_handler, person_handler, pet_handler, specie_handler, user_handler,
};
use crate::domain::{
    Breed, Gender, Person, PetColor, PetImageResponse, PetResponse, PetSize, Role, Specie,
    UserResponse, UserStatus,
};
use crate::schemas::{
    BreedRequest, ChangePasswordRequest, FieldError, LoginRequest, PersonInput, RegisterRequest,
    SpecieRequest, UpdatePersonRequest, UpdatePetRequest, ValidationReport,
};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Pet Adoption API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pet Adoption API",
        version = "0.1.0",
        description = "Accounts, people, species, breeds and pets for an adoption service",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3100", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        user_handler::get_current_user,
        user_handler::get_user,
        user_handler::delete_user,
        user_handler::change_password,
        person_handler::get_person,
        person_handler::update_person,
        person_handler::delete_person,
        specie_handler::list_species,
        specie_handler::get_specie,
        specie_handler::create_specie,
        specie_handler::update_specie,
        specie_handler::delete_specie,
        breed_handler::list_breeds,
        breed_handler::list_breeds_by_specie,
        breed_handler::get_breed,
        breed_handler::create_breed,
        breed_handler::update_breed,
        breed_handler::delete_breed,
        pet_handler::list_pets,
        pet_handler::get_pet,
        pet_handler::create_pet,
        pet_handler::update_pet,
        pet_handler::delete_pet,
        pet_handler::attach_images,
    ),
    components(
        schemas(
            // Domain types
            UserStatus,
            UserResponse,
            Person,
            Gender,
            Role,
            Specie,
            Breed,
            PetColor,
            PetSize,
            PetImageResponse,
            PetResponse,
            // Request bodies
            RegisterRequest,
            PersonInput,
            LoginRequest,
            ChangePasswordRequest,
            UpdatePersonRequest,
            SpecieRequest,
            BreedRequest,
            UpdatePetRequest,
            pet_handler::PetFormSchema,
            pet_handler::PetImagesSchema,
            // Responses
            TokenResponse,
            MessageResponse,
            user_handler::MeResponse,
            ValidationReport,
            FieldError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "Account operations"),
        (name = "Persons", description = "Personal profiles"),
        (name = "Species", description = "Species catalog"),
        (name = "Breeds", description = "Breeds, each owned by one specie"),
        (name = "Pets", description = "Pets and their images")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
