//! End-to-end use cases over the in-memory unit of work.

mod common;

use uuid::Uuid;

use common::{Fault, MemoryUnitOfWork, TestApp};
use pet_adoption_api::commands::seed::seed_roles;
use pet_adoption_api::domain::{Gender, ImageUpload, PetFilter, UserStatus};
use pet_adoption_api::errors::AppError;
use pet_adoption_api::schemas::{
    BreedRequest, ChangePasswordRequest, PersonInput, PetForm, RegisterRequest, SpecieRequest,
    UpdatePetRequest,
};
use pet_adoption_api::services::ServiceContainer;

fn registration(email: &str, cpf: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: "Abcdef1!".to_string(),
        password_confirm: "Abcdef1!".to_string(),
        status: None,
        role_id: None,
        person: PersonInput {
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            gender: Gender::F,
            birthdate: "1990-05-17".to_string(),
            cpf: cpf.to_string(),
            profile_picture: None,
            about: None,
        },
    }
}

fn pet_form(name: &str, specie_id: Uuid, breed_id: Option<Uuid>) -> PetForm {
    let mut form = PetForm::default();
    form.set("name", name.to_string());
    form.set("specie_id", specie_id.to_string());
    if let Some(breed_id) = breed_id {
        form.set("breed_id", breed_id.to_string());
    }
    form.set("color", "GOLDEN".to_string());
    form.set("size", "MEDIUM".to_string());
    form.set("age", "4".to_string());
    form.set("gender", "M".to_string());
    form
}

fn png(name: &str) -> ImageUpload {
    ImageUpload::new(name, "image/png", vec![0x89, 0x50, 0x4e, 0x47])
}

/// Creates Dog with Poodle and Cat with Siamese
async fn catalog(app: &TestApp) -> (Uuid, Uuid, Uuid, Uuid) {
    let species = app.services.species();
    let breeds = app.services.breeds();

    let dog = species
        .create(SpecieRequest {
            name: "Dog".to_string(),
        })
        .await
        .unwrap();
    let cat = species
        .create(SpecieRequest {
            name: "Cat".to_string(),
        })
        .await
        .unwrap();
    let poodle = breeds
        .create(BreedRequest {
            name: "Poodle".to_string(),
            specie_id: dog.id,
        })
        .await
        .unwrap();
    let siamese = breeds
        .create(BreedRequest {
            name: "Siamese".to_string(),
            specie_id: cat.id,
        })
        .await
        .unwrap();

    (dog.id, poodle.id, cat.id, siamese.id)
}

// =============================================================================
// Registration and login
// =============================================================================

#[tokio::test]
async fn test_register_without_role_gets_exactly_user_role() {
    let app = TestApp::new();

    let user = app
        .services
        .auth()
        .register(registration("a@b.com", "529.982.247-25"))
        .await
        .unwrap();

    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.status, UserStatus::Active);
    let person = user.person.expect("person is returned with the user");
    assert_eq!(person.cpf, "52998224725");

    let roles = app.services.users().role_names(user.id).await.unwrap();
    assert_eq!(roles, vec!["USER".to_string()]);
}

#[tokio::test]
async fn test_second_registration_conflicts() {
    let app = TestApp::new();
    let auth = app.services.auth();
    auth.register(registration("a@b.com", "52998224725"))
        .await
        .unwrap();

    let err = auth
        .register(registration("a@b.com", "11144477735"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Email a@b.com already exists."));

    let err = auth
        .register(registration("c@d.com", "529.982.247-25"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "CPF 529.982.247-25 already exists."));

    // Nothing from the rejected attempts was written
    let tables = app.uow.snapshot();
    assert_eq!(tables.users.len(), 1);
    assert_eq!(tables.persons.len(), 1);
}

#[tokio::test]
async fn test_registration_racing_past_the_lookups_still_conflicts() {
    let app = TestApp::new();
    let auth = app.services.auth();
    auth.register(registration("a@b.com", "52998224725"))
        .await
        .unwrap();

    // The lookups miss the first account, as if both requests checked at once
    app.uow.inject("users.find_by_email", Fault::StaleRead);
    let err = auth
        .register(registration("a@b.com", "11144477735"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Email a@b.com already exists."));

    app.uow.inject("persons.find_by_cpf", Fault::StaleRead);
    let err = auth
        .register(registration("c@d.com", "529.982.247-25"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "CPF 52998224725 already exists."));

    let tables = app.uow.snapshot();
    assert_eq!(tables.users.len(), 1);
    assert_eq!(tables.persons.len(), 1);
    assert_eq!(tables.user_roles.len(), 1);
}

async fn assert_registration_leaves_nothing_when(op: &'static str) {
    let app = TestApp::new();
    app.uow.inject(op, Fault::Fail);

    let err = app
        .services
        .auth()
        .register(registration("a@b.com", "52998224725"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INTERNAL_ERROR", "{} should fail the registration", op);

    let tables = app.uow.snapshot();
    assert!(tables.persons.is_empty(), "person left behind after {} failed", op);
    assert!(tables.users.is_empty(), "user left behind after {} failed", op);
    assert!(tables.user_roles.is_empty(), "role link left behind after {} failed", op);

    // The same registration goes through once the store behaves
    app.services
        .auth()
        .register(registration("a@b.com", "52998224725"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_registration_is_atomic_when_user_insert_fails() {
    assert_registration_leaves_nothing_when("users.create").await;
}

#[tokio::test]
async fn test_registration_is_atomic_when_role_assignment_fails() {
    assert_registration_leaves_nothing_when("roles.assign_to_user").await;
}

#[tokio::test]
async fn test_unknown_role_conflicts() {
    let app = TestApp::new();
    let role_id = Uuid::new_v4();
    let mut request = registration("a@b.com", "52998224725");
    request.role_id = Some(role_id);

    let err = app.services.auth().register(request).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Role with ID {} does not exist.", role_id)
    );
    assert!(app.uow.snapshot().users.is_empty());
}

#[tokio::test]
async fn test_invalid_registration_reports_every_rule() {
    let app = TestApp::new();
    let mut request = registration("not-an-email", "12345678900");
    request.password = "abcdefgh".to_string();
    request.password_confirm = "different".to_string();

    let err = app.services.auth().register(request).await.unwrap_err();
    let fields: Vec<String> = err
        .details()
        .unwrap()
        .iter()
        .map(|e| e.field.clone())
        .collect();
    assert!(fields.contains(&"email".to_string()));
    assert!(fields.contains(&"password".to_string()));
    assert!(fields.contains(&"password_confirm".to_string()));
    assert!(fields.contains(&"person.cpf".to_string()));
    assert!(app.uow.snapshot().persons.is_empty());
}

#[tokio::test]
async fn test_login_success_and_uniform_failures() {
    let app = TestApp::new();
    let auth = app.services.auth();
    let user = auth
        .register(registration("a@b.com", "52998224725"))
        .await
        .unwrap();

    let token = auth.login("a@b.com", "Abcdef1!").await.unwrap();
    assert_eq!(token.token_type, "Bearer");
    let claims = auth.verify_token(&token.access_token).unwrap();
    assert_eq!(claims.sub, user.id);
    assert!(claims.has_role("USER"));

    let wrong_password = auth.login("a@b.com", "Wrong-pass1").await.unwrap_err();
    let unknown_email = auth.login("nobody@b.com", "Abcdef1!").await.unwrap_err();
    assert!(matches!(wrong_password, AppError::InvalidCredentials));
    assert!(matches!(unknown_email, AppError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn test_change_password_then_login_with_new_one() {
    let app = TestApp::new();
    let auth = app.services.auth();
    let user = auth
        .register(registration("a@b.com", "52998224725"))
        .await
        .unwrap();

    app.services
        .users()
        .change_password(
            user.id,
            ChangePasswordRequest {
                current_password: "Abcdef1!".to_string(),
                new_password: "Xyz12345!".to_string(),
            },
        )
        .await
        .unwrap();

    assert!(auth.login("a@b.com", "Abcdef1!").await.is_err());
    assert!(auth.login("a@b.com", "Xyz12345!").await.is_ok());
}

// =============================================================================
// Pets, breeds and species
// =============================================================================

#[tokio::test]
async fn test_dog_poodle_pet_with_images() {
    let app = TestApp::new();
    let (dog, poodle, _, _) = catalog(&app).await;

    let pet = app
        .services
        .pets()
        .create(
            pet_form("Rex", dog, Some(poodle)),
            vec![png("front.png"), png("side.png")],
        )
        .await
        .unwrap();

    assert_eq!(pet.specie_id, dog);
    assert_eq!(pet.breed_id, Some(poodle));
    assert_eq!(pet.images.len(), 2);
    for image in &pet.images {
        assert!(image.image_url.starts_with("http://localhost:3100/uploads/"));
        assert!(image.image_url.ends_with(".png"));
    }
    assert_eq!(app.storage.file_names().len(), 2);
}

#[tokio::test]
async fn test_pet_with_breed_of_other_specie_is_rejected() {
    let app = TestApp::new();
    let (dog, _, _, siamese) = catalog(&app).await;

    let err = app
        .services
        .pets()
        .create(pet_form("Rex", dog, Some(siamese)), vec![png("a.png")])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("does not belong")));
    assert!(app.uow.snapshot().pets.is_empty());
    assert!(app.storage.file_names().is_empty());
}

#[tokio::test]
async fn test_pet_with_unknown_breed_is_not_found() {
    let app = TestApp::new();
    let (dog, _, _, _) = catalog(&app).await;

    let err = app
        .services
        .pets()
        .create(pet_form("Rex", dog, Some(Uuid::new_v4())), vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_failed_file_write_rolls_back_everything() {
    let app = TestApp::new();
    let (dog, poodle, _, _) = catalog(&app).await;
    app.storage.fail_after(1);

    let result = app
        .services
        .pets()
        .create(
            pet_form("Rex", dog, Some(poodle)),
            vec![png("one.png"), png("two.png")],
        )
        .await;

    assert!(result.is_err());
    let tables = app.uow.snapshot();
    assert!(tables.pets.is_empty());
    assert!(tables.images.is_empty());
    assert!(app.storage.file_names().is_empty());
}

#[tokio::test]
async fn test_update_without_breed_still_checks_existing_breed() {
    let app = TestApp::new();
    let (dog, poodle, cat, _) = catalog(&app).await;
    let pets = app.services.pets();
    let pet = pets
        .create(pet_form("Rex", dog, Some(poodle)), vec![])
        .await
        .unwrap();

    let err = pets
        .update(
            pet.id,
            UpdatePetRequest {
                specie_id: Some(cat),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let renamed = pets
        .update(
            pet.id,
            UpdatePetRequest {
                name: Some("Max".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Max");
    assert_eq!(renamed.breed_id, Some(poodle));
}

#[tokio::test]
async fn test_attach_images_to_existing_pet() {
    let app = TestApp::new();
    let (dog, _, _, _) = catalog(&app).await;
    let pets = app.services.pets();
    let pet = pets
        .create(pet_form("Rex", dog, None), vec![png("a.png")])
        .await
        .unwrap();

    let updated = pets
        .attach_images(pet.id, vec![png("a.png"), png("b.png")])
        .await
        .unwrap();

    // Re-sending a.png replaces the file without a second image row
    assert_eq!(updated.images.len(), 2);
    assert_eq!(app.storage.file_names().len(), 2);
}

#[tokio::test]
async fn test_list_filters_by_name_and_specie() {
    let app = TestApp::new();
    let (dog, _, cat, _) = catalog(&app).await;
    let pets = app.services.pets();
    pets.create(pet_form("Rex", dog, None), vec![]).await.unwrap();
    pets.create(pet_form("T-REX", cat, None), vec![]).await.unwrap();
    pets.create(pet_form("Bolt", dog, None), vec![]).await.unwrap();

    let all = pets.list(PetFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let rexes = pets
        .list(PetFilter {
            name: Some("rex".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(rexes.len(), 2);

    let dogs_named_rex = pets
        .list(PetFilter {
            name: Some("rex".to_string()),
            species: vec![dog],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(dogs_named_rex.len(), 1);
    assert_eq!(dogs_named_rex[0].name, "Rex");

    // Wildcard characters are matched literally
    for needle in ["_", "%"] {
        let none = pets
            .list(PetFilter {
                name: Some(needle.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty(), "{} matched {} pets", needle, none.len());
    }
}

#[tokio::test]
async fn test_deleting_unknown_records_is_not_found() {
    let app = TestApp::new();
    let id = Uuid::new_v4();

    let results = [
        app.services.species().delete(id).await,
        app.services.breeds().delete(id).await,
        app.services.pets().delete(id).await,
        app.services.users().delete_user(id).await,
        app.services.persons().delete_person(id).await,
    ];
    for result in results {
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}

#[tokio::test]
async fn test_breeds_of_unknown_specie() {
    let app = TestApp::new();
    let err = app
        .services
        .breeds()
        .list_by_specie(Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Species with ID"));
}

#[tokio::test]
async fn test_deleting_pet_removes_its_files() {
    let app = TestApp::new();
    let (dog, _, _, _) = catalog(&app).await;
    let pets = app.services.pets();
    let pet = pets
        .create(pet_form("Rex", dog, None), vec![png("a.png")])
        .await
        .unwrap();

    pets.delete(pet.id).await.unwrap();
    assert!(app.storage.file_names().is_empty());
    assert!(matches!(pets.get(pet.id).await, Err(AppError::NotFound(_))));
}

// =============================================================================
// Seed
// =============================================================================

#[tokio::test]
async fn test_seed_roles_is_idempotent() {
    let uow = MemoryUnitOfWork::default();

    assert_eq!(seed_roles(&uow).await.unwrap(), 3);
    assert_eq!(seed_roles(&uow).await.unwrap(), 0);

    let mut names: Vec<String> = uow.snapshot().roles.into_values().map(|r| r.name).collect();
    names.sort();
    assert_eq!(names, vec!["ADMIN", "MODERATOR", "USER"]);
}
