//! # Searchable Resources
//!
//! Typed records served by the mock REST surface and searched by the
//! engine. Each resource declares the fields free-text search looks at and
//! the structured filters a list screen offers for it.
//!
//! Records travel as camelCase JSON with kebab-case enum values, the same
//! shape a json-server `db.json` holds.

pub mod appointment;
pub mod doctor;
pub mod lab_result;
pub mod medical_task;
pub mod patient;
pub mod presets;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{FilterDescriptor, SearchConfig};
use crate::validation::{Validatable, ValidationErrors, validators};

pub use appointment::{Appointment, AppointmentStatus, AppointmentType};
pub use doctor::{Availability, Certification, Doctor, Education, MedicalSpecialty};
pub use lab_result::{LabCategory, LabResult, LabStatus, ResultValue, TestResult, TestResultStatus};
pub use medical_task::{MedicalTask, TaskStatus, TaskType};
pub use patient::{
    Address, Allergy, AllergySeverity, ConditionStatus, EmergencyContact, Gender, InsuranceInfo,
    MedicalHistory, Medication, Patient,
};

/// A record type that can be listed, searched and edited through the API.
pub trait SearchableResource:
    Serialize + DeserializeOwned + Validatable + Send + Sync + 'static
{
    /// Display name used in error messages, e.g. `"Patient"`
    const RESOURCE_NAME_SINGULAR: &'static str;
    /// Collection name and REST path segment, e.g. `"patients"`
    const RESOURCE_NAME_PLURAL: &'static str;
    /// Prefix of generated ids, e.g. `"P"` for `P-…`
    const ID_PREFIX: &'static str;
    const RESOURCE_DESCRIPTION: &'static str = "";

    /// Dotted paths free-text search matches against.
    fn search_fields() -> Vec<&'static str>;

    /// Structured filters offered for this resource.
    fn filters() -> Vec<FilterDescriptor> {
        Vec::new()
    }

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn set_created_at(&mut self, at: String);
    fn set_updated_at(&mut self, at: String);

    /// Called on create (`previous` is `None`) and update, after timestamps
    /// are stamped and before validation.
    fn before_save(&mut self, _previous: Option<&Self>, _now: &str) {}

    #[must_use]
    fn generate_id() -> String {
        format!("{}-{}", Self::ID_PREFIX, Uuid::new_v4())
    }

    #[must_use]
    fn search_config() -> SearchConfig {
        SearchConfig::new(Self::search_fields())
    }
}

/// Current time as an RFC 3339 UTC timestamp with millisecond precision.
#[must_use]
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
    Stat,
}

/// The patient fields embedded in appointments and lab results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

fn check_optional_datetime(errors: &mut ValidationErrors, field: &str, value: Option<&String>) {
    if let Some(value) = value {
        errors.check(validators::validate_datetime(field, value));
    }
}

fn check_timestamps(errors: &mut ValidationErrors, created_at: &str, updated_at: &str) {
    errors.check(validators::validate_datetime("createdAt", created_at));
    errors.check(validators::validate_datetime("updatedAt", updated_at));
}
