use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::{
    PatientSummary, Priority, SearchableResource, check_optional_datetime, check_timestamps,
    presets,
};
use crate::models::{FilterDescriptor, FilterKind};
use crate::validation::{Validatable, ValidationErrors, validators};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LabCategory {
    Hematology,
    Chemistry,
    Microbiology,
    Immunology,
    Pathology,
    Genetics,
    Endocrinology,
    Cardiology,
    Oncology,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LabStatus {
    Ordered,
    Collected,
    InProgress,
    Completed,
    Cancelled,
    Critical,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TestResultStatus {
    Normal,
    Abnormal,
    Critical,
    High,
    Low,
}

/// A measured value, numeric or free text (e.g. `"Negative"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ResultValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub parameter: String,
    pub value: ResultValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub reference_range: String,
    pub status: TestResultStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabResult {
    #[serde(default)]
    pub id: String,
    pub patient_id: String,
    pub patient: PatientSummary,
    pub test_type: String,
    pub test_category: LabCategory,
    pub ordered_by: String,
    pub ordered_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_date: Option<String>,
    pub status: LabStatus,
    pub priority: Priority,
    pub lab_id: String,
    #[serde(default)]
    pub results: Vec<TestResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl LabResult {
    /// Results outside their reference range.
    pub fn flagged_results(&self) -> impl Iterator<Item = &TestResult> {
        self.results
            .iter()
            .filter(|result| result.status != TestResultStatus::Normal)
    }
}

impl Validatable for LabResult {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("patientId", &self.patient_id));
        errors.check(validators::validate_required("testType", &self.test_type));
        errors.check(validators::validate_required("orderedBy", &self.ordered_by));
        errors.check(validators::validate_datetime("orderedDate", &self.ordered_date));
        check_optional_datetime(&mut errors, "collectedDate", self.collected_date.as_ref());
        check_optional_datetime(&mut errors, "resultDate", self.result_date.as_ref());
        errors.check(validators::validate_required("labId", &self.lab_id));

        for (i, result) in self.results.iter().enumerate() {
            errors.check(validators::validate_required(
                &format!("results.{i}.parameter"),
                &result.parameter,
            ));
            errors.check(validators::validate_required(
                &format!("results.{i}.referenceRange"),
                &result.reference_range,
            ));
        }
        check_timestamps(&mut errors, &self.created_at, &self.updated_at);
        errors.result()
    }
}

impl SearchableResource for LabResult {
    const RESOURCE_NAME_SINGULAR: &'static str = "Lab Result";
    const RESOURCE_NAME_PLURAL: &'static str = "labResults";
    const ID_PREFIX: &'static str = "LAB";

    fn search_fields() -> Vec<&'static str> {
        vec![
            "patient.fullName",
            "testType",
            "orderedBy",
            "labId",
            "results.parameter",
            "results.value",
            "notes",
        ]
    }

    fn filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::select("status", "Status", presets::LAB_RESULT_STATUS),
            FilterDescriptor::select("testCategory", "Category", presets::LAB_CATEGORY),
            FilterDescriptor::select("priority", "Priority", presets::PRIORITY),
            FilterDescriptor::new("orderedDate", "Ordered Date", FilterKind::Date),
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
