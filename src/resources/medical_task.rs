use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Priority, SearchableResource, check_optional_datetime, check_timestamps, presets};
use crate::models::{FilterDescriptor, FilterKind};
use crate::validation::{Validatable, ValidationErrors, validators};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    #[default]
    FollowUp,
    CallPatient,
    ReviewResults,
    InsuranceVerification,
    ScheduleAppointment,
    Documentation,
    Referral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalTask {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: TaskType,
    pub priority: Priority,
    pub status: TaskStatus,
    pub assigned_to: String,
    pub assigned_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Validatable for MedicalTask {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            validators::validate_required("title", &self.title)
                .and_then(|()| validators::validate_length("title", &self.title, Some(3), Some(100))),
        );
        if let Some(description) = &self.description {
            errors.check(validators::validate_length(
                "description",
                description,
                None,
                Some(500),
            ));
        }
        errors.check(validators::validate_required("assignedTo", &self.assigned_to));
        errors.check(validators::validate_required("assignedBy", &self.assigned_by));
        check_optional_datetime(&mut errors, "dueDate", self.due_date.as_ref());
        check_optional_datetime(&mut errors, "completedAt", self.completed_at.as_ref());
        if let Some(notes) = &self.notes {
            errors.check(validators::validate_length("notes", notes, None, Some(1000)));
        }
        check_timestamps(&mut errors, &self.created_at, &self.updated_at);
        errors.result()
    }
}

impl SearchableResource for MedicalTask {
    const RESOURCE_NAME_SINGULAR: &'static str = "Medical Task";
    const RESOURCE_NAME_PLURAL: &'static str = "medicalTasks";
    const ID_PREFIX: &'static str = "TASK";
    const RESOURCE_DESCRIPTION: &'static str = "Follow-up work assigned to clinical staff";

    fn search_fields() -> Vec<&'static str> {
        vec![
            "title",
            "description",
            "type",
            "assignedTo",
            "assignedBy",
            "patientId",
            "notes",
        ]
    }

    fn filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::select("status", "Status", presets::TASK_STATUS),
            FilterDescriptor::select("priority", "Priority", presets::PRIORITY),
            FilterDescriptor::select("type", "Task Type", presets::TASK_TYPE),
            FilterDescriptor::new("assignedTo", "Assigned To", FilterKind::Select)
                .with_placeholder("Any assignee"),
            FilterDescriptor::new("dueDate", "Due Date", FilterKind::Date),
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

    /// Completing a task records when it happened unless the caller did.
    fn before_save(&mut self, _previous: Option<&Self>, now: &str) {
        if self.status == TaskStatus::Completed && self.completed_at.is_none() {
            self.completed_at = Some(now.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task() -> MedicalTask {
        serde_json::from_value(json!({
            "title": "Call patient about results",
            "priority": "high",
            "status": "pending",
            "assignedTo": "Dr. Smith",
            "assignedBy": "Nurse Manager",
            "createdAt": "2024-03-01T00:00:00.000Z",
            "updatedAt": "2024-03-01T00:00:00.000Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_type_defaults_to_follow_up() {
        assert_eq!(task().kind, TaskType::FollowUp);
    }

    #[test]
    fn test_completion_is_stamped_once() {
        let mut task = task();
        task.before_save(None, "2024-03-02T00:00:00.000Z");
        assert!(task.completed_at.is_none());

        task.status = TaskStatus::Completed;
        task.before_save(None, "2024-03-03T00:00:00.000Z");
        assert_eq!(task.completed_at.as_deref(), Some("2024-03-03T00:00:00.000Z"));

        task.before_save(None, "2024-03-04T00:00:00.000Z");
        assert_eq!(task.completed_at.as_deref(), Some("2024-03-03T00:00:00.000Z"));
    }

    #[test]
    fn test_title_and_length_limits() {
        let mut task = task();
        assert!(task.validate().is_ok());

        task.title = "ab".to_string();
        task.notes = Some("x".repeat(1001));
        task.due_date = Some("tomorrow".to_string());
        let errors = task.validate().unwrap_err();
        let fields: Vec<_> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "dueDate", "notes"]);
    }

    #[test]
    fn test_empty_title_reports_required_only() {
        let mut task = task();
        task.title = String::new();
        let errors = task.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].message, "This field is required");
    }
}
