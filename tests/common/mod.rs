//! In-memory doubles for integration tests.
//!
//! `MemoryUnitOfWork` keeps every table in one `Tables` value. A transaction
//! works on a copy and swaps it in only when the body succeeds, so a failed
//! unit leaves no trace.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use pet_adoption_api::config::{Config, SEED_ROLES};
use pet_adoption_api::domain::{
    Breed, NewPerson, NewPet, NewUser, Person, PersonChanges, Pet, PetChanges, PetFilter,
    PetImage, Role, Specie, User,
};
use pet_adoption_api::errors::{AppError, AppResult};
use pet_adoption_api::infra::repositories::{
    BreedRepository, PersonRepository, PetRepository, RoleRepository, SpecieRepository,
    UserRepository,
};
use pet_adoption_api::infra::{FileStorage, TransactionScope, TxFuture, UnitOfWork};
use pet_adoption_api::services::Services;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

#[derive(Clone, Default)]
pub struct Tables {
    pub users: HashMap<Uuid, User>,
    pub persons: HashMap<Uuid, Person>,
    pub roles: HashMap<Uuid, Role>,
    pub user_roles: Vec<(Uuid, Uuid)>,
    pub species: HashMap<Uuid, Specie>,
    pub breeds: HashMap<Uuid, Breed>,
    pub pets: HashMap<Uuid, Pet>,
    pub images: Vec<PetImage>,
}

impl Tables {
    fn user(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).cloned().map(|mut user| {
            user.person = user.person_id.and_then(|pid| self.persons.get(&pid).cloned());
            user
        })
    }

    fn breed(&self, id: Uuid) -> Option<Breed> {
        self.breeds.get(&id).cloned().map(|mut breed| {
            breed.specie = self.species.get(&breed.specie_id).cloned();
            breed
        })
    }

    fn pet(&self, id: Uuid) -> Option<Pet> {
        self.pets.get(&id).cloned().map(|mut pet| {
            pet.specie = self.species.get(&pet.specie_id).cloned();
            pet.breed = pet.breed_id.and_then(|b| self.breeds.get(&b).cloned());
            pet.images = self
                .images
                .iter()
                .filter(|image| image.pet_id == id)
                .cloned()
                .collect();
            pet
        })
    }
}

fn missing(entity: &str, id: Uuid) -> AppError {
    AppError::not_found(entity, id)
}

/// One-shot misbehaviour of a named repository call, e.g. `"users.create"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The call fails as a driver error would
    Fail,
    /// A lookup misses rows that exist, as a concurrent request would
    StaleRead,
}

type Faults = Arc<Mutex<HashMap<&'static str, Fault>>>;

/// Repositories over one table set, either committed or staged
#[derive(Clone)]
pub struct MemoryRepos {
    tables: Arc<Mutex<Tables>>,
    faults: Faults,
}

impl MemoryRepos {
    fn with<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut tables = self.tables.lock().unwrap();
        f(&mut tables)
    }

    fn take_fault(&self, op: &'static str) -> Option<Fault> {
        self.faults.lock().unwrap().remove(op)
    }

    fn fail_point(&self, op: &'static str) -> AppResult<()> {
        match self.take_fault(op) {
            Some(Fault::Fail) => Err(AppError::internal(format!("injected failure at {}", op))),
            _ => Ok(()),
        }
    }

    fn stale(&self, op: &'static str) -> bool {
        self.take_fault(op) == Some(Fault::StaleRead)
    }
}

#[async_trait]
impl UserRepository for MemoryRepos {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.with(|t| t.user(id)))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        if self.stale("users.find_by_email") {
            return Ok(None);
        }
        Ok(self.with(|t| {
            let id = t.users.values().find(|u| u.email == email).map(|u| u.id);
            id.and_then(|id| t.user(id))
        }))
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        self.fail_point("users.create")?;
        self.with(|t| {
            if t.users.values().any(|u| u.email == user.email) {
                return Err(AppError::conflict(format!("Email {} already exists.", user.email)));
            }
            let now = Utc::now();
            let created = User {
                id: Uuid::new_v4(),
                email: user.email,
                password_hash: user.password_hash,
                status: user.status,
                person_id: user.person_id,
                person: None,
                created_at: now,
                updated_at: now,
            };
            t.users.insert(created.id, created.clone());
            Ok(created)
        })
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<User> {
        self.with(|t| {
            let user = t.users.get_mut(&id).ok_or_else(|| missing("User", id))?;
            user.password_hash = password_hash;
            user.updated_at = Utc::now();
            Ok::<(), AppError>(())
        })?;
        self.with(|t| t.user(id)).ok_or_else(|| missing("User", id))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.with(|t| {
            t.users.remove(&id).ok_or_else(|| missing("User", id))?;
            t.user_roles.retain(|(user_id, _)| *user_id != id);
            Ok(())
        })
    }
}

#[async_trait]
impl PersonRepository for MemoryRepos {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Person>> {
        Ok(self.with(|t| t.persons.get(&id).cloned()))
    }

    async fn find_by_cpf(&self, cpf: &str) -> AppResult<Option<Person>> {
        if self.stale("persons.find_by_cpf") {
            return Ok(None);
        }
        Ok(self.with(|t| t.persons.values().find(|p| p.cpf == cpf).cloned()))
    }

    async fn create(&self, person: NewPerson) -> AppResult<Person> {
        self.fail_point("persons.create")?;
        self.with(|t| {
            if t.persons.values().any(|p| p.cpf == person.cpf) {
                return Err(AppError::conflict(format!("CPF {} already exists.", person.cpf)));
            }
            let now = Utc::now();
            let created = Person {
                id: Uuid::new_v4(),
                first_name: person.first_name,
                last_name: person.last_name,
                gender: person.gender,
                birthdate: person.birthdate,
                cpf: person.cpf,
                profile_picture: person.profile_picture,
                about: person.about,
                created_at: now,
                updated_at: now,
            };
            t.persons.insert(created.id, created.clone());
            Ok(created)
        })
    }

    async fn update(&self, id: Uuid, changes: PersonChanges) -> AppResult<Person> {
        self.with(|t| {
            let person = t.persons.get_mut(&id).ok_or_else(|| missing("Person", id))?;
            if let Some(v) = changes.first_name {
                person.first_name = v;
            }
            if let Some(v) = changes.last_name {
                person.last_name = v;
            }
            if let Some(v) = changes.gender {
                person.gender = v;
            }
            if let Some(v) = changes.birthdate {
                person.birthdate = v;
            }
            if let Some(v) = changes.cpf {
                person.cpf = v;
            }
            if changes.profile_picture.is_some() {
                person.profile_picture = changes.profile_picture;
            }
            if changes.about.is_some() {
                person.about = changes.about;
            }
            person.updated_at = Utc::now();
            Ok(person.clone())
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.with(|t| {
            t.persons.remove(&id).ok_or_else(|| missing("Person", id))?;
            for user in t.users.values_mut().filter(|u| u.person_id == Some(id)) {
                user.person_id = None;
            }
            Ok(())
        })
    }
}

#[async_trait]
impl RoleRepository for MemoryRepos {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        Ok(self.with(|t| t.roles.get(&id).cloned()))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self.with(|t| t.roles.values().find(|r| r.name == name).cloned()))
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Role>> {
        Ok(self.with(|t| {
            t.user_roles
                .iter()
                .filter(|(u, _)| *u == user_id)
                .filter_map(|(_, r)| t.roles.get(r).cloned())
                .collect()
        }))
    }

    async fn create(&self, name: &str) -> AppResult<Role> {
        let role = Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.with(|t| t.roles.insert(role.id, role.clone()));
        Ok(role)
    }

    async fn assign_to_user(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()> {
        self.fail_point("roles.assign_to_user")?;
        self.with(|t| t.user_roles.push((user_id, role_id)));
        Ok(())
    }
}

#[async_trait]
impl SpecieRepository for MemoryRepos {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Specie>> {
        Ok(self.with(|t| t.species.get(&id).cloned()))
    }

    async fn list(&self) -> AppResult<Vec<Specie>> {
        Ok(self.with(|t| t.species.values().cloned().collect()))
    }

    async fn create(&self, name: String) -> AppResult<Specie> {
        let specie = Specie {
            id: Uuid::new_v4(),
            name,
        };
        self.with(|t| t.species.insert(specie.id, specie.clone()));
        Ok(specie)
    }

    async fn update(&self, id: Uuid, name: String) -> AppResult<Specie> {
        self.with(|t| {
            let specie = t.species.get_mut(&id).ok_or_else(|| missing("Species", id))?;
            specie.name = name;
            Ok(specie.clone())
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.with(|t| {
            t.species.remove(&id).ok_or_else(|| missing("Species", id))?;
            t.breeds.retain(|_, b| b.specie_id != id);
            let gone: Vec<Uuid> = t
                .pets
                .values()
                .filter(|p| p.specie_id == id)
                .map(|p| p.id)
                .collect();
            t.pets.retain(|_, p| p.specie_id != id);
            t.images.retain(|i| !gone.contains(&i.pet_id));
            Ok(())
        })
    }
}

#[async_trait]
impl BreedRepository for MemoryRepos {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Breed>> {
        Ok(self.with(|t| t.breed(id)))
    }

    async fn list(&self) -> AppResult<Vec<Breed>> {
        Ok(self.with(|t| {
            let ids: Vec<Uuid> = t.breeds.keys().copied().collect();
            ids.into_iter().filter_map(|id| t.breed(id)).collect()
        }))
    }

    async fn list_by_specie(&self, specie_id: Uuid) -> AppResult<Vec<Breed>> {
        Ok(self.with(|t| {
            let ids: Vec<Uuid> = t
                .breeds
                .values()
                .filter(|b| b.specie_id == specie_id)
                .map(|b| b.id)
                .collect();
            ids.into_iter().filter_map(|id| t.breed(id)).collect()
        }))
    }

    async fn create(&self, name: String, specie_id: Uuid) -> AppResult<Breed> {
        let breed = Breed {
            id: Uuid::new_v4(),
            name,
            specie_id,
            specie: None,
        };
        self.with(|t| t.breeds.insert(breed.id, breed.clone()));
        Ok(breed)
    }

    async fn update(&self, id: Uuid, name: String, specie_id: Uuid) -> AppResult<Breed> {
        self.with(|t| {
            let breed = t.breeds.get_mut(&id).ok_or_else(|| missing("Breed", id))?;
            breed.name = name;
            breed.specie_id = specie_id;
            Ok(breed.clone())
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.with(|t| {
            t.breeds.remove(&id).ok_or_else(|| missing("Breed", id))?;
            for pet in t.pets.values_mut().filter(|p| p.breed_id == Some(id)) {
                pet.breed_id = None;
            }
            Ok(())
        })
    }

    async fn belongs_to_species(&self, breed_id: Uuid, specie_id: Uuid) -> AppResult<bool> {
        Ok(self.with(|t| {
            t.breeds
                .get(&breed_id)
                .is_some_and(|b| b.specie_id == specie_id)
        }))
    }
}

/// Same predicate the SQL repository builds: name is a literal,
/// case-insensitive substring; set criteria are ignored when empty.
pub fn filter_matches(filter: &PetFilter, pet: &Pet) -> bool {
    let name_ok = match filter.name.as_deref().map(str::trim) {
        Some(needle) if !needle.is_empty() => {
            pet.name.to_lowercase().contains(&needle.to_lowercase())
        }
        _ => true,
    };

    name_ok
        && (filter.species.is_empty() || filter.species.contains(&pet.specie_id))
        && (filter.breeds.is_empty()
            || pet.breed_id.map_or(false, |b| filter.breeds.contains(&b)))
        && (filter.sizes.is_empty() || filter.sizes.contains(&pet.size))
        && (filter.colors.is_empty() || filter.colors.contains(&pet.color))
        && (filter.genders.is_empty() || filter.genders.contains(&pet.gender))
}

#[async_trait]
impl PetRepository for MemoryRepos {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pet>> {
        Ok(self.with(|t| t.pet(id)))
    }

    async fn list(&self, filter: &PetFilter) -> AppResult<Vec<Pet>> {
        Ok(self.with(|t| {
            let ids: Vec<Uuid> = t.pets.keys().copied().collect();
            ids.into_iter()
                .filter_map(|id| t.pet(id))
                .filter(|pet| filter_matches(filter, pet))
                .collect()
        }))
    }

    async fn create(&self, pet: NewPet) -> AppResult<Pet> {
        self.with(|t| {
            let now = Utc::now();
            t.pets.insert(
                pet.id,
                Pet {
                    id: pet.id,
                    name: pet.name,
                    specie_id: pet.specie_id,
                    specie: None,
                    breed_id: pet.breed_id,
                    breed: None,
                    color: pet.color,
                    size: pet.size,
                    age: pet.age,
                    gender: pet.gender,
                    images: vec![],
                    created_at: now,
                    updated_at: now,
                },
            );
            t.pet(pet.id).ok_or_else(|| missing("Pet", pet.id))
        })
    }

    async fn update(&self, id: Uuid, changes: PetChanges) -> AppResult<Pet> {
        self.with(|t| {
            let pet = t.pets.get_mut(&id).ok_or_else(|| missing("Pet", id))?;
            if let Some(v) = changes.name {
                pet.name = v;
            }
            if let Some(v) = changes.specie_id {
                pet.specie_id = v;
            }
            if changes.breed_id.is_some() {
                pet.breed_id = changes.breed_id;
            }
            if let Some(v) = changes.color {
                pet.color = v;
            }
            if let Some(v) = changes.size {
                pet.size = v;
            }
            if let Some(v) = changes.age {
                pet.age = v;
            }
            if let Some(v) = changes.gender {
                pet.gender = v;
            }
            pet.updated_at = Utc::now();
            t.pet(id).ok_or_else(|| missing("Pet", id))
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.with(|t| {
            t.pets.remove(&id).ok_or_else(|| missing("Pet", id))?;
            t.images.retain(|i| i.pet_id != id);
            Ok(())
        })
    }

    async fn save_image(&self, pet_id: Uuid, file_name: String) -> AppResult<PetImage> {
        let image = PetImage {
            id: Uuid::new_v4(),
            pet_id,
            file_name,
            created_at: Utc::now(),
        };
        self.with(|t| t.images.push(image.clone()));
        Ok(image)
    }
}

impl TransactionScope for MemoryRepos {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn persons(&self) -> &dyn PersonRepository {
        self
    }

    fn roles(&self) -> &dyn RoleRepository {
        self
    }

    fn pets(&self) -> &dyn PetRepository {
        self
    }
}

/// Unit of work over in-memory tables with copy-on-begin transactions
#[derive(Clone, Default)]
pub struct MemoryUnitOfWork {
    tables: Arc<Mutex<Tables>>,
    faults: Faults,
}

impl MemoryUnitOfWork {
    /// Tables with the default roles already present
    pub fn seeded() -> Self {
        let uow = Self::default();
        {
            let mut tables = uow.tables.lock().unwrap();
            for name in SEED_ROLES {
                let role = Role {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                };
                tables.roles.insert(role.id, role);
            }
        }
        uow
    }

    /// Arm `fault` for the next call to `op`, inside or outside a transaction
    pub fn inject(&self, op: &'static str, fault: Fault) {
        self.faults.lock().unwrap().insert(op, fault);
    }

    pub fn snapshot(&self) -> Tables {
        self.tables.lock().unwrap().clone()
    }

    fn repos(&self) -> Arc<MemoryRepos> {
        Arc::new(MemoryRepos {
            tables: self.tables.clone(),
            faults: self.faults.clone(),
        })
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.repos()
    }

    fn persons(&self) -> Arc<dyn PersonRepository> {
        self.repos()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.repos()
    }

    fn species(&self) -> Arc<dyn SpecieRepository> {
        self.repos()
    }

    fn breeds(&self) -> Arc<dyn BreedRepository> {
        self.repos()
    }

    fn pets(&self) -> Arc<dyn PetRepository> {
        self.repos()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a dyn TransactionScope) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let staged = MemoryRepos {
            tables: Arc::new(Mutex::new(self.snapshot())),
            faults: self.faults.clone(),
        };

        let value = f(&staged).await?;

        let committed = staged.tables.lock().unwrap().clone();
        *self.tables.lock().unwrap() = committed;
        Ok(value)
    }
}

/// File storage kept in memory; can be told to fail after some writes
#[derive(Default)]
pub struct MemoryStorage {
    pub files: Mutex<HashMap<String, Vec<u8>>>,
    fail_after: Mutex<Option<usize>>,
}

impl MemoryStorage {
    /// Make every save fail once `count` files are stored
    pub fn fail_after(&self, count: usize) {
        *self.fail_after.lock().unwrap() = Some(count);
    }

    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> AppResult<()> {
        let limit = *self.fail_after.lock().unwrap();
        let mut files = self.files.lock().unwrap();
        if limit.is_some_and(|limit| files.len() >= limit) {
            return Err(AppError::internal("disk full"));
        }
        files.insert(file_name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn remove(&self, file_name: &str) -> AppResult<()> {
        self.files.lock().unwrap().remove(file_name);
        Ok(())
    }

    fn public_url(&self, file_name: &str) -> String {
        format!("http://localhost:3100/uploads/{}", file_name)
    }
}

/// Everything a scenario test needs, wired like the real server
pub struct TestApp {
    pub uow: Arc<MemoryUnitOfWork>,
    pub storage: Arc<MemoryStorage>,
    pub services: Arc<Services>,
    pub config: Config,
}

impl TestApp {
    pub fn new() -> Self {
        let uow = Arc::new(MemoryUnitOfWork::seeded());
        let storage = Arc::new(MemoryStorage::default());
        let config = Config::with_secret(TEST_SECRET);
        let services = Arc::new(Services::new(
            uow.clone(),
            storage.clone(),
            config.clone(),
        ));

        Self {
            uow,
            storage,
            services,
            config,
        }
    }
}
