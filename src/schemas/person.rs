use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::{InputSchema, ValidationReport};
use crate::config::DATE_FORMAT;
use crate::domain::{Gender, NationalId, PersonChanges};
use crate::errors::{AppError, AppResult};

/// Partial person update
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePersonRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: Option<String>,

    pub gender: Option<Gender>,

    #[schema(example = "1990-05-17")]
    pub birthdate: Option<String>,

    pub cpf: Option<String>,

    pub profile_picture: Option<String>,

    pub about: Option<String>,
}

impl InputSchema for UpdatePersonRequest {
    fn refine(&self, report: &mut ValidationReport) {
        if let Some(birthdate) = &self.birthdate {
            if NaiveDate::parse_from_str(birthdate, DATE_FORMAT).is_err() {
                report.push("birthdate", "Invalid date format, should be YYYY-MM-DD");
            }
        }
        if let Some(cpf) = &self.cpf {
            if let Err(e) = NationalId::parse(cpf) {
                report.push("cpf", e.to_string());
            }
        }
    }
}

impl UpdatePersonRequest {
    pub fn into_changes(self) -> AppResult<PersonChanges> {
        let birthdate = self
            .birthdate
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|_| {
                    AppError::validation("birthdate", "Invalid date format, should be YYYY-MM-DD")
                })
            })
            .transpose()?;
        let cpf = self
            .cpf
            .map(|raw| {
                NationalId::parse(&raw)
                    .map(NationalId::into_string)
                    .map_err(|e| AppError::validation("cpf", e.to_string()))
            })
            .transpose()?;

        Ok(PersonChanges {
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
