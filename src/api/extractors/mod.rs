//! Custom request extractors.

mod uploads;
mod validated_json;

pub use uploads::PetMultipart;
pub use validated_json::ValidatedJson;
