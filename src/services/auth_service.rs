//! Authentication service - registration, credential checks and tokens.
//!
//! Registration validates the whole request, runs the uniqueness checks
//! concurrently, then writes person, user and role assignment in one
//! transaction.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::parallel;
use crate::config::{Config, ROLE_USER, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::schemas::{InputSchema, RegisterRequest};
use crate::with_transaction;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a user together with its person record
    async fn register(&self, request: RegisterRequest) -> AppResult<User>;

    /// Return the user when email and password match
    async fn verify_credentials(&self, email: &str, password: &str) -> AppResult<User>;

    /// Verify credentials and issue a JWT
    async fn login(&self, email: &str, password: &str) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Hash verified when the email is unknown, so both failure paths do the
/// same argon2 work.
fn dummy_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| {
        Password::new("dummy-password-for-timing")
            .map(Password::into_string)
            .unwrap_or_default()
    })
}

fn generate_token(user: &User, roles: Vec<String>, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        roles,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request.check()?;

        let cpf = request.person.national_id()?.into_string();
        let users = self.uow.users();
        let persons = self.uow.persons();
        let roles = self.uow.roles();

        let role_lookup = async {
            match request.role_id {
                Some(id) => roles.find_by_id(id).await.map(Some),
                None => Ok(None),
            }
        };

        let (existing_user, existing_person, requested_role) = parallel::join3(
            users.find_by_email(&request.email),
            persons.find_by_cpf(&cpf),
            role_lookup,
        )
        .await?;

        if existing_user.is_some() {
            return Err(AppError::conflict(format!(
                "Email {} already exists.",
                request.email
            )));
        }
        if existing_person.is_some() {
            return Err(AppError::conflict(format!(
                "CPF {} already exists.",
                request.person.cpf
            )));
        }
        let requested_role = match (request.role_id, requested_role) {
            (Some(id), Some(None)) => {
                return Err(AppError::conflict(format!(
                    "Role with ID {} does not exist.",
                    id
                )))
            }
            (_, found) => found.flatten(),
        };

        let password_hash = Password::new(&request.password)?.into_string();
        let status = request.status();
        let email = request.email;
        let new_person = request.person.into_new_person()?;

        let user = with_transaction!(self.uow, |tx| {
            let person = tx.persons().create(new_person).await?;
            let user = tx
                .users()
                .create(NewUser {
                    email,
                    password_hash,
                    status,
                    person_id: Some(person.id),
                })
                .await?;

            let role = match requested_role {
                Some(role) => Some(role),
                None => tx.roles().find_by_name(ROLE_USER).await?,
            };
            match role {
                Some(role) => tx.roles().assign_to_user(user.id, role.id).await?,
                None => tracing::warn!(
                    user_id = %user.id,
                    "Default role {} missing; user registered without a role",
                    ROLE_USER
                ),
            }

            Ok::<_, AppError>(user.with_person(person))
        })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self.uow.users().find_by_email(email).await?;

        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => dummy_hash().to_string(),
        };
        let password_valid = Password::from_hash(hash).verify(password);

        match user {
            Some(user) if password_valid => Ok(user),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        let user = self.verify_credentials(email, password).await?;
        let roles = self
            .uow
            .roles()
            .find_by_user(user.id)
            .await?
            .into_iter()
            .map(|role| role.name)
            .collect();

        generate_token(&user, roles, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}
