//! Pet service - pets, their specie/breed references and image uploads.
//!
//! A pet's breed, when set, must belong to the pet's specie. Image files are
//! written first, then the pet row and image rows go in one transaction. If
//! either step fails, the files written for the request are removed again.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::parallel;
use crate::config::{IMAGE_FIELD_NAME, IMAGE_WRITE_CONCURRENCY};
use crate::domain::upload::validate_all;
use crate::domain::{ImageUpload, NewPet, Pet, PetChanges, PetFilter, PetResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{FileStorage, UnitOfWork};
use crate::schemas::{InputSchema, PetForm, UpdatePetRequest};
use crate::with_transaction;

#[async_trait]
pub trait PetService: Send + Sync {
    async fn get(&self, id: Uuid) -> AppResult<PetResponse>;

    /// Pets matching every non-empty criterion of `filter`
    async fn list(&self, filter: PetFilter) -> AppResult<Vec<PetResponse>>;

    /// Create a pet from a multipart form and its images, all or nothing
    async fn create(&self, form: PetForm, uploads: Vec<ImageUpload>) -> AppResult<PetResponse>;

    async fn update(&self, id: Uuid, request: UpdatePetRequest) -> AppResult<PetResponse>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Add images to an existing pet
    async fn attach_images(&self, id: Uuid, uploads: Vec<ImageUpload>) -> AppResult<PetResponse>;
}

pub struct PetManager<U: UnitOfWork> {
    uow: Arc<U>,
    storage: Arc<dyn FileStorage>,
}

impl<U: UnitOfWork> PetManager<U> {
    pub fn new(uow: Arc<U>, storage: Arc<dyn FileStorage>) -> Self {
        Self { uow, storage }
    }

    fn respond(&self, pet: Pet) -> PetResponse {
        PetResponse::from_pet(pet, |file_name| self.storage.public_url(file_name))
    }

    async fn find(&self, id: Uuid) -> AppResult<Pet> {
        self.uow
            .pets()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Pet", id)
    }

    /// Check that the supplied specie and breed exist
    async fn ensure_references(
        &self,
        specie_id: Option<Uuid>,
        breed_id: Option<Uuid>,
    ) -> AppResult<()> {
        let species = self.uow.species();
        let breeds = self.uow.breeds();

        let specie_check = async {
            if let Some(id) = specie_id {
                species.find_by_id(id).await?.ok_or_not_found("Species", id)?;
            }
            Ok::<_, AppError>(())
        };
        let breed_check = async {
            if let Some(id) = breed_id {
                breeds.find_by_id(id).await?.ok_or_not_found("Breed", id)?;
            }
            Ok::<_, AppError>(())
        };

        parallel::join2(specie_check, breed_check).await?;
        Ok(())
    }

    async fn ensure_breed_in_specie(&self, breed_id: Uuid, specie_id: Uuid) -> AppResult<()> {
        if self
            .uow
            .breeds()
            .belongs_to_species(breed_id, specie_id)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::bad_request(format!(
                "Breed with ID {} does not belong to Species with ID {}.",
                breed_id, specie_id
            )))
        }
    }

    /// Write files and image rows for `pet_id`, inserting `new_pet` first
    /// when given. `known` lists file names the pet already references; those
    /// get no new row and are never cleaned up.
    async fn persist(
        &self,
        pet_id: Uuid,
        new_pet: Option<NewPet>,
        uploads: Vec<ImageUpload>,
        known: HashSet<String>,
    ) -> AppResult<Pet> {
        let mut seen = HashSet::new();
        let files: Vec<(String, ImageUpload)> = uploads
            .into_iter()
            .map(|upload| (upload.stored_name(pet_id), upload))
            .filter(|(name, _)| seen.insert(name.clone()))
            .collect();
        let written: Vec<String> = files
            .iter()
            .map(|(name, _)| name.clone())
            .filter(|name| !known.contains(name))
            .collect();

        let result = match self.write_files(&files).await {
            Ok(()) => self.record(pet_id, new_pet, written.clone()).await,
            Err(e) => Err(e),
        };

        if result.is_err() {
            for name in &written {
                if let Err(e) = self.storage.remove(name).await {
                    tracing::warn!(pet_id = %pet_id, file = %name, "Orphan upload left behind: {}", e);
                }
            }
        }
        result
    }

    async fn write_files(&self, files: &[(String, ImageUpload)]) -> AppResult<()> {
        let writes: Pin<Box<dyn Future<Output = AppResult<Vec<()>>> + Send + '_>> =
            Box::pin(parallel::join_all_limited(
                files
                    .iter()
                    .map(|(name, upload)| self.storage.save(name, &upload.bytes)),
                IMAGE_WRITE_CONCURRENCY,
            ));
        writes.await.map(|_| ())
    }

    /// Pet row (when new) and one image row per file name, in one transaction
    async fn record(
        &self,
        pet_id: Uuid,
        new_pet: Option<NewPet>,
        file_names: Vec<String>,
    ) -> AppResult<Pet> {
        with_transaction!(self.uow, |tx| {
            if let Some(new_pet) = new_pet {
                tx.pets().create(new_pet).await?;
            }
            for name in file_names {
                tx.pets().save_image(pet_id, name).await?;
            }

            let pet = tx
                .pets()
                .find_by_id(pet_id)
                .await?
                .ok_or_not_found("Pet", pet_id)?;
            Ok::<_, AppError>(pet)
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> PetService for PetManager<U> {
    async fn get(&self, id: Uuid) -> AppResult<PetResponse> {
        let pet = self.find(id).await?;
        Ok(self.respond(pet))
    }

    async fn list(&self, filter: PetFilter) -> AppResult<Vec<PetResponse>> {
        let pets = self.uow.pets().list(&filter).await?;
        Ok(pets.into_iter().map(|pet| self.respond(pet)).collect())
    }

    async fn create(&self, form: PetForm, uploads: Vec<ImageUpload>) -> AppResult<PetResponse> {
        // Allocated up front so stored file names are known before the row exists
        let pet_id = Uuid::new_v4();
        let new_pet = form.into_new_pet(pet_id)?;
        validate_all(&uploads)?;

        self.ensure_references(Some(new_pet.specie_id), new_pet.breed_id)
            .await?;
        if let Some(breed_id) = new_pet.breed_id {
            self.ensure_breed_in_specie(breed_id, new_pet.specie_id)
                .await?;
        }

        let image_count = uploads.len();
        let pet = self
            .persist(pet_id, Some(new_pet), uploads, HashSet::new())
            .await?;
        tracing::info!(pet_id = %pet.id, images = image_count, "Pet created");
        Ok(self.respond(pet))
    }

    async fn update(&self, id: Uuid, request: UpdatePetRequest) -> AppResult<PetResponse> {
        request.check()?;
        let changes = PetChanges::from(request);
        let current = self.find(id).await?;

        self.ensure_references(changes.specie_id, changes.breed_id)
            .await?;

        let target_specie = changes.specie_id.unwrap_or(current.specie_id);
        if let Some(breed_id) = changes.breed_id.or(current.breed_id) {
            self.ensure_breed_in_specie(breed_id, target_specie).await?;
        }

        let pet = self.uow.pets().update(id, changes).await?;
        Ok(self.respond(pet))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let pet = self.find(id).await?;
        self.uow.pets().delete(id).await?;

        for image in &pet.images {
            if let Err(e) = self.storage.remove(&image.file_name).await {
                tracing::warn!(pet_id = %id, file = %image.file_name, "Image file not removed: {}", e);
            }
        }
        tracing::info!(pet_id = %id, "Pet deleted");
        Ok(())
    }

    async fn attach_images(&self, id: Uuid, uploads: Vec<ImageUpload>) -> AppResult<PetResponse> {
        if uploads.is_empty() {
            return Err(AppError::validation(
                IMAGE_FIELD_NAME,
                "At least one image is required",
            ));
        }
        validate_all(&uploads)?;

        let current = self.find(id).await?;
        let known = current
            .images
            .into_iter()
            .map(|image| image.file_name)
            .collect();

        let pet = self.persist(id, None, uploads, known).await?;
        Ok(self.respond(pet))
    }
}
