//! Pet repository with images and multi-field filtering.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::entities::breed::Entity as BreedEntity;
use super::entities::pet::{self, ActiveModel, Entity as PetEntity};
use super::entities::pet_image::{self, Entity as PetImageEntity};
use super::entities::specie::{self, Entity as SpecieEntity};
use super::entities::breed;
use super::executor::Executor;
use crate::domain::{Breed, NewPet, Pet, PetChanges, PetFilter, PetImage, Specie};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Pet repository. Reads return pets with specie, breed and images attached.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PetRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pet>>;

    /// Pets matching every non-empty criterion of `filter`
    async fn list(&self, filter: &PetFilter) -> AppResult<Vec<Pet>>;

    /// Insert a pet under its pre-allocated id
    async fn create(&self, pet: NewPet) -> AppResult<Pet>;

    async fn update(&self, id: Uuid, changes: PetChanges) -> AppResult<Pet>;

    /// Delete a pet; its image rows go with it
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Record a stored image file for a pet
    async fn save_image(&self, pet_id: Uuid, file_name: String) -> AppResult<PetImage>;
}

/// SeaORM implementation of PetRepository
pub struct PetStore<E: Executor> {
    db: E,
}

impl<E: Executor> PetStore<E> {
    pub fn new(db: E) -> Self {
        Self { db }
    }

    /// Attach specie, breed and images with one query per relation
    async fn hydrate(&self, models: Vec<pet::Model>) -> AppResult<Vec<Pet>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let pet_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let specie_ids: Vec<Uuid> = models.iter().map(|m| m.specie_id).collect();
        let breed_ids: Vec<Uuid> = models.iter().filter_map(|m| m.breed_id).collect();

        let species: HashMap<Uuid, Specie> = SpecieEntity::find()
            .filter(specie::Column::Id.is_in(specie_ids))
            .all(self.db.conn())
            .await?
            .into_iter()
            .map(|m| (m.id, Specie::from(m)))
            .collect();

        let breeds: HashMap<Uuid, Breed> = if breed_ids.is_empty() {
            HashMap::new()
        } else {
            BreedEntity::find()
                .filter(breed::Column::Id.is_in(breed_ids))
                .all(self.db.conn())
                .await?
                .into_iter()
                .map(|m| (m.id, Breed::from(m)))
                .collect()
        };

        let mut images: HashMap<Uuid, Vec<PetImage>> = HashMap::new();
        for image in PetImageEntity::find()
            .filter(pet_image::Column::PetId.is_in(pet_ids))
            .order_by_asc(pet_image::Column::CreatedAt)
            .all(self.db.conn())
            .await?
        {
            images
                .entry(image.pet_id)
                .or_default()
                .push(PetImage::from(image));
        }

        models
            .into_iter()
            .map(|model| {
                let mut pet = Pet::try_from(model)?;
                pet.specie = species.get(&pet.specie_id).cloned();
                pet.breed = pet.breed_id.and_then(|id| breeds.get(&id).cloned());
                pet.images = images.remove(&pet.id).unwrap_or_default();
                Ok(pet)
            })
            .collect()
    }

    async fn find_one(&self, id: Uuid) -> AppResult<Pet> {
        let model = PetEntity::find_by_id(id)
            .one(self.db.conn())
            .await?
            .ok_or_not_found("Pet", id)?;

        self.hydrate(vec![model])
            .await?
            .pop()
            .ok_or_not_found("Pet", id)
    }
}

/// `%needle%`, lower-cased, with LIKE wildcards in the needle escaped by `\`
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Pets query; an empty filter adds no WHERE clause at all
fn select(filter: &PetFilter) -> Select<PetEntity> {
    let query = PetEntity::find();
    if filter.is_empty() {
        query
    } else {
        query.filter(filter_condition(filter))
    }
}

/// Translate a filter into a WHERE condition, skipping empty criteria
fn filter_condition(filter: &PetFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(name) = filter.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        condition = condition.add(
            Expr::expr(Func::lower(Expr::col(pet::Column::Name)))
                .like(LikeExpr::new(contains_pattern(name)).escape('\\')),
        );
    }
    if !filter.species.is_empty() {
        condition = condition.add(pet::Column::SpecieId.is_in(filter.species.clone()));
    }
    if !filter.breeds.is_empty() {
        condition = condition.add(pet::Column::BreedId.is_in(filter.breeds.clone()));
    }
    if !filter.sizes.is_empty() {
        condition = condition.add(pet::Column::Size.is_in(filter.sizes.iter().map(|s| s.as_str())));
    }
    if !filter.colors.is_empty() {
        condition =
            condition.add(pet::Column::Color.is_in(filter.colors.iter().map(|c| c.as_str())));
    }
    if !filter.genders.is_empty() {
        condition =
            condition.add(pet::Column::Gender.is_in(filter.genders.iter().map(|g| g.as_str())));
    }

    condition
}

#[async_trait]
impl<E: Executor> PetRepository for PetStore<E> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pet>> {
        match PetEntity::find_by_id(id).one(self.db.conn()).await? {
            Some(model) => Ok(self.hydrate(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self, filter: &PetFilter) -> AppResult<Vec<Pet>> {
        let models = select(filter)
            .order_by_asc(pet::Column::CreatedAt)
            .all(self.db.conn())
            .await?;

        self.hydrate(models).await
    }

    async fn create(&self, pet: NewPet) -> AppResult<Pet> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(pet.id),
            name: Set(pet.name),
            specie_id: Set(pet.specie_id),
            breed_id: Set(pet.breed_id),
            color: Set(pet.color.as_str().to_string()),
            size: Set(pet.size.as_str().to_string()),
            age: Set(pet.age),
            gender: Set(pet.gender.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self.db.conn()).await.map_err(AppError::from)?;
        self.find_one(model.id).await
    }

    async fn update(&self, id: Uuid, changes: PetChanges) -> AppResult<Pet> {
        let pet = PetEntity::find_by_id(id)
            .one(self.db.conn())
            .await?
            .ok_or_not_found("Pet", id)?;

        let mut active: ActiveModel = pet.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(specie_id) = changes.specie_id {
            active.specie_id = Set(specie_id);
        }
        if let Some(breed_id) = changes.breed_id {
            active.breed_id = Set(Some(breed_id));
        }
        if let Some(color) = changes.color {
            active.color = Set(color.as_str().to_string());
        }
        if let Some(size) = changes.size {
            active.size = Set(size.as_str().to_string());
        }
        if let Some(age) = changes.age {
            active.age = Set(age);
        }
        if let Some(gender) = changes.gender {
            active.gender = Set(gender.as_str().to_string());
        }
        active.updated_at = Set(chrono::Utc::now());

        active.update(self.db.conn()).await.map_err(AppError::from)?;
        self.find_one(id).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = PetEntity::delete_by_id(id)
            .exec(self.db.conn())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Pet", id));
        }

        Ok(())
    }

    async fn save_image(&self, pet_id: Uuid, file_name: String) -> AppResult<PetImage> {
        let model = pet_image::ActiveModel {
            id: Set(Uuid::new_v4()),
            pet_id: Set(pet_id),
            file_name: Set(file_name),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(self.db.conn())
        .await
        .map_err(AppError::from)?;

        Ok(PetImage::from(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PetSize;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(filter: &PetFilter) -> String {
        select(filter).build(DbBackend::Postgres).to_string()
    }

    fn named(name: &str) -> PetFilter {
        PetFilter {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_filter_has_no_where_clause() {
        assert!(!sql(&PetFilter::default()).contains("WHERE"));
    }

    #[test]
    fn test_filter_builds_case_insensitive_name_and_in_sets() {
        let filter = PetFilter {
            name: Some("Rex".to_string()),
            sizes: vec![PetSize::Small, PetSize::Large],
            ..Default::default()
        };
        let sql = sql(&filter);
        assert!(sql.contains("LOWER("), "{}", sql);
        assert!(sql.contains("LIKE '%rex%'"), "{}", sql);
        assert!(sql.contains("IN ('SMALL', 'LARGE')"), "{}", sql);
    }

    #[test]
    fn test_like_wildcards_in_name_are_literal() {
        assert_eq!(contains_pattern("_"), r"%\_%");
        assert_eq!(contains_pattern("50%"), r"%50\%%");
        assert_eq!(contains_pattern(r"A\b"), r"%a\\b%");

        let sql = sql(&named("_"));
        assert!(sql.contains("ESCAPE"), "{}", sql);
        assert!(!sql.contains("LIKE '%_%'"), "{}", sql);
    }
}
