//! Registration, login and password-change payloads.

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{InputSchema, ValidationReport};
use crate::config::{DATE_FORMAT, MIN_PASSWORD_LENGTH};
use crate::domain::{Gender, NationalId, NewPerson, UserStatus};
use crate::errors::{AppError, AppResult};

/// Strength rules shared by registration and password change. Every missing
/// rule yields its own message.
pub fn password_rule_violations(password: &str) -> Vec<String> {
    let mut violations = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH as usize {
        violations.push(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push("Password must contain at least one number".to_string());
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        violations.push("Password must contain at least one special character".to_string());
    }

    violations
}

/// Person block of a registration
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PersonInput {
    #[validate(length(min = 1, message = "First name is required"))]
    #[schema(example = "Ana")]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    #[schema(example = "Souza")]
    pub last_name: String,

    pub gender: Gender,

    #[schema(example = "1990-05-17")]
    pub birthdate: String,

    #[schema(example = "529.982.247-25")]
    pub cpf: String,

    pub profile_picture: Option<String>,

    pub about: Option<String>,
}

impl PersonInput {
    fn refine_at(&self, prefix: &str, report: &mut ValidationReport) {
        if NaiveDate::parse_from_str(&self.birthdate, DATE_FORMAT).is_err() {
            report.push(
                &format!("{}birthdate", prefix),
                "Birthdate must be a valid date in the format YYYY-MM-DD.",
            );
        }
        if self.cpf.trim().is_empty() {
            report.push(&format!("{}cpf", prefix), "CPF is required");
        } else if let Err(e) = NationalId::parse(&self.cpf) {
            report.push(&format!("{}cpf", prefix), e.to_string());
        }
    }

    /// Normalized national id
    pub fn national_id(&self) -> AppResult<NationalId> {
        NationalId::parse(&self.cpf).map_err(|e| AppError::validation("person.cpf", e.to_string()))
    }

    /// Convert into insertable data; assumes `check` already passed
    pub fn into_new_person(self) -> AppResult<NewPerson> {
        let cpf = self.national_id()?.into_string();
        let birthdate = NaiveDate::parse_from_str(&self.birthdate, DATE_FORMAT).map_err(|_| {
            AppError::validation(
                "person.birthdate",
                "Birthdate must be a valid date in the format YYYY-MM-DD.",
            )
        })?;

        Ok(NewPerson {
            first_name: self.first_name,
            last_name: self.last_name,
            gender: self.gender,
            birthdate,
            cpf,
            profile_picture: self.profile_picture,
            about: self.about,
        })
    }
}

/// Register request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Invalid email address")
    )]
    #[schema(example = "user@example.com")]
    pub email: String,

    #[schema(example = "Abcdef1!")]
    pub password: String,

    #[validate(length(min = 1, message = "Password confirmation is required"))]
    #[schema(example = "Abcdef1!")]
    pub password_confirm: String,

    /// Only ACTIVE is accepted; omitted means ACTIVE
    #[serde(default)]
    pub status: Option<UserStatus>,

    pub role_id: Option<Uuid>,

    #[validate(nested)]
    pub person: PersonInput,
}

impl RegisterRequest {
    pub fn status(&self) -> UserStatus {
        self.status.unwrap_or_default()
    }
}

impl InputSchema for RegisterRequest {
    fn refine(&self, report: &mut ValidationReport) {
        for violation in password_rule_violations(&self.password) {
            report.push("password", violation);
        }
        if !self.password_confirm.is_empty() && self.password != self.password_confirm {
            report.push("password_confirm", "Passwords must match");
        }
        if self.status() != UserStatus::Active {
            report.push("status", "The status must be ACTIVE");
        }
        self.person.refine_at("person.", report);
    }
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "user@example.com")]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "Abcdef1!")]
    pub password: String,
}

impl InputSchema for LoginRequest {}

/// Password change request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    pub new_password: String,
}

impl InputSchema for ChangePasswordRequest {
    fn refine(&self, report: &mut ValidationReport) {
        for violation in password_rule_violations(&self.new_password) {
            report.push("new_password", violation);
        }
    }
}
