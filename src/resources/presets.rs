//! Option lists shared by the list screens, as `(value, label)` pairs.

pub type Options = &'static [(&'static str, &'static str)];

pub const APPOINTMENT_STATUS: Options = &[
    ("scheduled", "Scheduled"),
    ("confirmed", "Confirmed"),
    ("in-progress", "In Progress"),
    ("completed", "Completed"),
    ("cancelled", "Cancelled"),
    ("no-show", "No Show"),
    ("rescheduled", "Rescheduled"),
];

pub const LAB_RESULT_STATUS: Options = &[
    ("ordered", "Ordered"),
    ("collected", "Collected"),
    ("in-progress", "In Progress"),
    ("completed", "Completed"),
    ("cancelled", "Cancelled"),
    ("critical", "Critical"),
    ("pending", "Pending"),
];

pub const TASK_STATUS: Options = &[
    ("pending", "Pending"),
    ("in-progress", "In Progress"),
    ("completed", "Completed"),
    ("cancelled", "Cancelled"),
    ("overdue", "Overdue"),
];

pub const PRIORITY: Options = &[
    ("low", "Low"),
    ("normal", "Normal"),
    ("high", "High"),
    ("urgent", "Urgent"),
    ("stat", "STAT"),
];

pub const GENDER: Options = &[("male", "Male"), ("female", "Female"), ("other", "Other")];

pub const APPOINTMENT_TYPE: Options = &[
    ("consultation", "Consultation"),
    ("follow-up", "Follow-up"),
    ("check-up", "Check-up"),
    ("surgery", "Surgery"),
    ("therapy", "Therapy"),
    ("emergency", "Emergency"),
];

pub const LAB_CATEGORY: Options = &[
    ("hematology", "Hematology"),
    ("chemistry", "Chemistry"),
    ("microbiology", "Microbiology"),
    ("immunology", "Immunology"),
    ("pathology", "Pathology"),
    ("genetics", "Genetics"),
    ("endocrinology", "Endocrinology"),
    ("cardiology", "Cardiology"),
    ("oncology", "Oncology"),
];

pub const SPECIALTY: Options = &[
    ("cardiology", "Cardiology"),
    ("dermatology", "Dermatology"),
    ("endocrinology", "Endocrinology"),
    ("gastroenterology", "Gastroenterology"),
    ("neurology", "Neurology"),
    ("oncology", "Oncology"),
    ("orthopedics", "Orthopedics"),
    ("pediatrics", "Pediatrics"),
    ("psychiatry", "Psychiatry"),
    ("radiology", "Radiology"),
    ("surgery", "Surgery"),
    ("family-medicine", "Family Medicine"),
    ("internal-medicine", "Internal Medicine"),
    ("emergency-medicine", "Emergency Medicine"),
];

pub const TASK_TYPE: Options = &[
    ("follow-up", "Follow-up"),
    ("call-patient", "Call Patient"),
    ("review-results", "Review Results"),
    ("insurance-verification", "Insurance Verification"),
    ("schedule-appointment", "Schedule Appointment"),
    ("documentation", "Documentation"),
    ("referral", "Referral"),
];

// Lowercase values: filters match case-insensitively against free text
pub const MEDICAL_CONDITION: Options = &[
    ("healthy", "Healthy"),
    ("hypertension", "Hypertension"),
    ("diabetes", "Diabetes"),
    ("asthma", "Asthma"),
    ("coronary artery disease", "Coronary Artery Disease"),
    ("arthritis", "Arthritis"),
    ("depression", "Depression"),
];

/// Values match `Availability::day_of_week` (0 is Sunday)
pub const DAY_OF_WEEK: Options = &[
    ("0", "Sunday"),
    ("1", "Monday"),
    ("2", "Tuesday"),
    ("3", "Wednesday"),
    ("4", "Thursday"),
    ("5", "Friday"),
    ("6", "Saturday"),
];

pub const US_STATE: Options = &[
    ("ma", "Massachusetts"),
    ("ny", "New York"),
    ("ca", "California"),
    ("tx", "Texas"),
    ("fl", "Florida"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_values_are_unique() {
        for options in [
            APPOINTMENT_STATUS,
            LAB_RESULT_STATUS,
            TASK_STATUS,
            PRIORITY,
            GENDER,
            APPOINTMENT_TYPE,
            LAB_CATEGORY,
            SPECIALTY,
            TASK_TYPE,
            DAY_OF_WEEK,
        ] {
            let mut values: Vec<_> = options.iter().map(|(value, _)| *value).collect();
            values.sort_unstable();
            values.dedup();
            assert_eq!(values.len(), options.len());
        }
    }
}
