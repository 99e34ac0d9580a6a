use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{SearchableResource, check_optional_datetime, check_timestamps, presets};
use crate::models::FilterDescriptor;
use crate::validation::{Validatable, ValidationErrors, validators};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MedicalSpecialty {
    Cardiology,
    Dermatology,
    Endocrinology,
    Gastroenterology,
    Neurology,
    Oncology,
    Orthopedics,
    Pediatrics,
    Psychiatry,
    Radiology,
    Surgery,
    FamilyMedicine,
    InternalMedicine,
    EmergencyMedicine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub issuing_body: String,
    pub date_issued: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    /// 0 (Sunday) to 6 (Saturday)
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
}

/// A doctor directory entry.
///
/// Appointments embed the same shape, usually trimmed to a summary, so the
/// directory details are optional on the wire. The `doctors` collection
/// requires them through [`Validatable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(default)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub title: String,
    pub specialty: MedicalSpecialty,
    #[serde(default)]
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<Education>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<Certification>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub availability: Vec<Availability>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
}

impl Doctor {
    /// Checks that apply wherever a doctor appears, including the summary
    /// embedded in an appointment.
    pub fn validate_profile(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("firstName", &self.first_name));
        errors.check(validators::validate_required("lastName", &self.last_name));
        errors.check(validators::validate_required("fullName", &self.full_name));
        errors.check(validators::validate_required("title", &self.title));
        if let Some(email) = &self.email {
            errors.check(validators::validate_email("email", email));
        }
        if let Some(phone) = &self.phone {
            errors.check(validators::validate_phone("phone", phone));
        }

        for (i, entry) in self.education.iter().enumerate() {
            errors.check(validators::validate_required(&format!("education.{i}.degree"), &entry.degree));
            errors.check(validators::validate_required(
                &format!("education.{i}.institution"),
                &entry.institution,
            ));
            errors.check(validators::validate_required(&format!("education.{i}.year"), &entry.year));
        }
        for (i, cert) in self.certifications.iter().enumerate() {
            errors.check(validators::validate_required(&format!("certifications.{i}.name"), &cert.name));
            errors.check(validators::validate_required(
                &format!("certifications.{i}.issuingBody"),
                &cert.issuing_body,
            ));
            errors.check(validators::validate_datetime(
                &format!("certifications.{i}.dateIssued"),
                &cert.date_issued,
            ));
            check_optional_datetime(
                &mut errors,
                &format!("certifications.{i}.expirationDate"),
                cert.expiration_date.as_ref(),
            );
        }
        for (i, slot) in self.availability.iter().enumerate() {
            errors.check(validators::validate_range(
                &format!("availability.{i}.dayOfWeek"),
                slot.day_of_week,
                Some(0),
                Some(6),
            ));
        }
        errors.result()
    }

    /// Is the doctor marked available on `day_of_week` (0 is Sunday)?
    #[must_use]
    pub fn is_available_on(&self, day_of_week: u8) -> bool {
        self.availability
            .iter()
            .any(|slot| slot.day_of_week == day_of_week && slot.is_available)
    }
}

impl Validatable for Doctor {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(profile) = self.validate_profile() {
            for error in profile.errors() {
                errors.add(error.clone());
            }
        }
        errors.check(validators::validate_required(
            "email",
            self.email.as_deref().unwrap_or_default(),
        ));
        errors.check(validators::validate_required(
            "phone",
            self.phone.as_deref().unwrap_or_default(),
        ));
        errors.check(validators::validate_required(
            "licenseNumber",
            self.license_number.as_deref().unwrap_or_default(),
        ));
        errors.check(validators::validate_required("department", &self.department));
        check_timestamps(&mut errors, &self.created_at, &self.updated_at);
        errors.result()
    }
}

impl SearchableResource for Doctor {
    const RESOURCE_NAME_SINGULAR: &'static str = "Doctor";
    const RESOURCE_NAME_PLURAL: &'static str = "doctors";
    const ID_PREFIX: &'static str = "D";
    const RESOURCE_DESCRIPTION: &'static str = "Doctor directory with specialties and weekly availability";

    fn search_fields() -> Vec<&'static str> {
        vec![
            "fullName",
            "firstName",
            "lastName",
            "specialty",
            "department",
            "title",
        ]
    }

    fn filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::select("specialty", "Specialty", presets::SPECIALTY),
            FilterDescriptor::select("availability.dayOfWeek", "Available On", presets::DAY_OF_WEEK),
        ]
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn set_created_at(&mut self, at: String) {
        self.created_at = at;
    }

    fn set_updated_at(&mut self, at: String) {
        self.updated_at = at;
    }
}
