//! Input schemas.
//!
//! Request payloads derive `validator::Validate` for per-field rules and may
//! add cross-field rules in `InputSchema::refine`. `check` runs both and
//! reports every failure at once.

mod auth;
mod breed;
mod person;
mod pet;
mod report;
mod specie;

pub use auth::{password_rule_violations, ChangePasswordRequest, LoginRequest, PersonInput, RegisterRequest};
pub use breed::BreedRequest;
pub use person::UpdatePersonRequest;
pub use pet::{PetForm, PetQuery, UpdatePetRequest};
pub use report::{FieldError, ValidationReport};
pub use specie::SpecieRequest;

use validator::Validate;

use crate::errors::AppResult;

/// A validated request body
pub trait InputSchema: Validate {
    /// Rules spanning several fields, or ones `validator` cannot express
    fn refine(&self, _report: &mut ValidationReport) {}

    /// Run field rules then refinements, failing with the full report
    fn check(&self) -> AppResult<()> {
        let mut report = match self.validate() {
            Ok(()) => ValidationReport::default(),
            Err(errors) => ValidationReport::from(&errors),
        };
        self.refine(&mut report);
        report.into_result()
    }
}
