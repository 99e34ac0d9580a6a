use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::doctor::Doctor;
use super::{PatientSummary, Priority, SearchableResource, check_timestamps, presets};
use crate::models::{FilterDescriptor, FilterKind};
use crate::validation::{Validatable, ValidationErrors, validators};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentType {
    RoutineCheckup,
    CheckUp,
    FollowUp,
    Consultation,
    Emergency,
    Surgery,
    Therapy,
    Diagnostic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
    Rescheduled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default)]
    pub id: String,
    pub patient_id: String,
    pub patient: PatientSummary,
    pub doctor_id: String,
    pub doctor: Doctor,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub status: AppointmentStatus,
    pub date_time: String,
    /// Minutes
    pub duration: u32,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub reason: String,
    pub priority: Priority,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Validatable for Appointment {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("patientId", &self.patient_id));
        errors.check(validators::validate_required("doctorId", &self.doctor_id));
        errors.check(validators::validate_datetime("dateTime", &self.date_time));
        errors.check(validators::validate_range(
            "duration",
            self.duration,
            Some(1),
            None,
        ));
        errors.check(validators::validate_required("location", &self.location));
        errors.check(validators::validate_required("reason", &self.reason));

        errors.nest("doctor", self.doctor.validate_profile());
        check_timestamps(&mut errors, &self.created_at, &self.updated_at);
        errors.result()
    }
}

impl SearchableResource for Appointment {
    const RESOURCE_NAME_SINGULAR: &'static str = "Appointment";
    const RESOURCE_NAME_PLURAL: &'static str = "appointments";
    const ID_PREFIX: &'static str = "APT";
    const RESOURCE_DESCRIPTION: &'static str = "Scheduled visits between patients and doctors";

    fn search_fields() -> Vec<&'static str> {
        vec![
            "patient.fullName",
            "doctor.fullName",
            "reason",
            "location",
            "notes",
            "type",
        ]
    }

    fn filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::select("status", "Status", presets::APPOINTMENT_STATUS),
            FilterDescriptor::select("type", "Appointment Type", presets::APPOINTMENT_TYPE),
            FilterDescriptor::select("priority", "Priority", presets::PRIORITY),
            FilterDescriptor::select("doctor.specialty", "Specialty", presets::SPECIALTY),
            FilterDescriptor::new("dateTime", "Date", FilterKind::Date),
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
