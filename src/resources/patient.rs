use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{SearchableResource, check_optional_datetime, check_timestamps, presets};
use crate::filtering::parse_calendar_day;
use crate::models::{FilterDescriptor, FilterKind};
use crate::validation::{Validatable, ValidationError, ValidationErrors, validators};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionStatus {
    Active,
    Resolved,
    Chronic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AllergySeverity {
    Mild,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Validatable for Address {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("street", &self.street));
        errors.check(validators::validate_required("city", &self.city));
        errors.check(validators::validate_required("state", &self.state));
        errors.check(validators::validate_zip_code("zipCode", &self.zip_code));
        errors.check(validators::validate_required("country", &self.country));
        errors.result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Validatable for EmergencyContact {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("name", &self.name));
        errors.check(validators::validate_required("relationship", &self.relationship));
        errors.check(validators::validate_phone("phone", &self.phone));
        if let Some(email) = &self.email {
            errors.check(validators::validate_email("email", email));
        }
        errors.result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    pub id: String,
    pub condition: String,
    pub diagnosis_date: String,
    pub status: ConditionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Allergy {
    pub id: String,
    pub allergen: String,
    pub severity: AllergySeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub prescribed_by: String,
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceInfo {
    pub provider: String,
    pub policy_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_number: Option<String>,
    pub expiration_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub address: Address,
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub medical_history: Vec<MedicalHistory>,
    #[serde(default)]
    pub allergies: Vec<Allergy>,
    #[serde(default)]
    pub medications: Vec<Medication>,
    pub insurance_info: InsuranceInfo,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Validatable for Patient {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("firstName", &self.first_name));
        errors.check(validators::validate_required("lastName", &self.last_name));
        errors.check(validators::validate_required("fullName", &self.full_name));
        errors.check(validators::validate_email("email", &self.email));
        errors.check(validators::validate_phone("phone", &self.phone));
        // Birth dates are often stored as plain calendar days
        if parse_calendar_day(&self.date_of_birth).is_none() {
            errors.add(ValidationError::new("dateOfBirth", "Invalid date format"));
        }
        errors.nest("address", self.address.validate());
        errors.nest("emergencyContact", self.emergency_contact.validate());

        for (i, entry) in self.medical_history.iter().enumerate() {
            errors.check(validators::validate_required(
                &format!("medicalHistory.{i}.condition"),
                &entry.condition,
            ));
        }
        for (i, allergy) in self.allergies.iter().enumerate() {
            errors.check(validators::validate_required(
                &format!("allergies.{i}.allergen"),
                &allergy.allergen,
            ));
        }
        for (i, medication) in self.medications.iter().enumerate() {
            let field = |name: &str| format!("medications.{i}.{name}");
            errors.check(validators::validate_required(&field("name"), &medication.name));
            errors.check(validators::validate_required(&field("dosage"), &medication.dosage));
            errors.check(validators::validate_required(
                &field("frequency"),
                &medication.frequency,
            ));
            errors.check(validators::validate_required(
                &field("prescribedBy"),
                &medication.prescribed_by,
            ));
            check_optional_datetime(&mut errors, &field("endDate"), medication.end_date.as_ref());
        }

        errors.check(validators::validate_required(
            "insuranceInfo.provider",
            &self.insurance_info.provider,
        ));
        errors.check(validators::validate_required(
            "insuranceInfo.policyNumber",
            &self.insurance_info.policy_number,
        ));
        check_timestamps(&mut errors, &self.created_at, &self.updated_at);
        errors.result()
    }
}

impl SearchableResource for Patient {
    const RESOURCE_NAME_SINGULAR: &'static str = "Patient";
    const RESOURCE_NAME_PLURAL: &'static str = "patients";
    const ID_PREFIX: &'static str = "P";
    const RESOURCE_DESCRIPTION: &'static str = "Registered patients with history and insurance";

    fn search_fields() -> Vec<&'static str> {
        vec![
            "fullName",
            "firstName",
            "lastName",
            "email",
            "phone",
            "medicalHistory.condition",
            "allergies",
            "medications",
            "address.city",
            "address.state",
            "insuranceInfo.provider",
        ]
    }

    fn filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::select("gender", "Gender", presets::GENDER),
            FilterDescriptor::select(
                "medicalHistory.condition",
                "Medical Condition",
                presets::MEDICAL_CONDITION,
            ),
            FilterDescriptor::select("address.state", "State", presets::US_STATE),
            FilterDescriptor::new("dateOfBirth", "Date of Birth", FilterKind::Date),
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
