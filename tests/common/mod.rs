#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use medsearch::{MemoryStore, api_router};
use serde_json::{Value, json};
use std::sync::Arc;

pub fn patient(id: &str, first: &str, last: &str, city: &str, state: &str, condition: &str) -> Value {
    json!({
        "id": id,
        "firstName": first,
        "lastName": last,
        "fullName": format!("{first} {last}"),
        "email": format!("{}@example.com", first.to_lowercase()),
        "phone": "+1 (555) 010-2000",
        "dateOfBirth": "1985-03-15",
        "gender": "female",
        "address": {
            "street": "1 Main St",
            "city": city,
            "state": state,
            "zipCode": "02115",
            "country": "USA"
        },
        "emergencyContact": {
            "name": "Alex Doe",
            "relationship": "Sibling",
            "phone": "555-0100"
        },
        "medicalHistory": [
            {"id": format!("MH-{id}"), "condition": condition, "diagnosisDate": "2020-01-01T00:00:00Z", "status": "chronic"}
        ],
        "allergies": [],
        "medications": [],
        "insuranceInfo": {
            "provider": "Blue Cross",
            "policyNumber": "BC-100",
            "expirationDate": "2027-01-01T00:00:00Z"
        },
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    })
}

pub fn patients() -> Vec<Value> {
    vec![
        patient("P-001", "Maria", "Rodriguez", "Boston", "MA", "Hypertension"),
        patient("P-002", "John", "Smith", "Austin", "TX", "Asthma"),
        patient("P-003", "Bo", "Stern", "Denver", "CO", "Diabetes"),
    ]
}

pub fn task(id: &str, title: &str, status: &str, priority: &str, due: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "type": "follow-up",
        "priority": priority,
        "status": status,
        "assignedTo": "Dr. Smith",
        "assignedBy": "Nurse Manager",
        "dueDate": due,
        "createdAt": "2024-03-01T00:00:00.000Z",
        "updatedAt": "2024-03-01T00:00:00.000Z"
    })
}

pub fn tasks() -> Vec<Value> {
    vec![
        task("TASK-1", "Call patient", "pending", "high", "2024-03-15T09:00:00Z"),
        task("TASK-2", "Review bloodwork", "completed", "normal", "2024-03-14T09:00:00Z"),
        task("TASK-3", "Verify insurance", "cancelled", "low", "2024-03-15T23:30:00Z"),
        task("TASK-4", "Schedule follow-up", "overdue", "urgent", "2024-03-10T09:00:00Z"),
    ]
}

pub fn appointment(id: &str, patient_name: &str, status: &str, date_time: &str) -> Value {
    json!({
        "id": id,
        "patientId": "P-001",
        "patient": {"id": "P-001", "firstName": "Maria", "lastName": "Rodriguez", "fullName": patient_name},
        "doctorId": "D-001",
        "doctor": {
            "id": "D-001",
            "firstName": "Alan",
            "lastName": "Smith",
            "fullName": "Dr. Alan Smith",
            "title": "MD",
            "specialty": "cardiology",
            "department": "Cardiology"
        },
        "type": "consultation",
        "status": status,
        "dateTime": date_time,
        "duration": 30,
        "location": "Room 4",
        "reason": "Chest pain",
        "priority": "normal",
        "createdAt": "2024-03-01T00:00:00.000Z",
        "updatedAt": "2024-03-01T00:00:00.000Z"
    })
}

pub fn appointments() -> Vec<Value> {
    vec![
        appointment("APT-1", "Maria Rodriguez", "scheduled", "2024-03-15T22:30:00Z"),
        appointment("APT-2", "John Smith", "completed", "2024-03-16T08:00:00Z"),
        appointment("APT-3", "Bo Stern", "no-show", "2024-03-15T07:15:00Z"),
    ]
}

pub fn doctor(id: &str, first: &str, last: &str, specialty: &str, days: &[u8]) -> Value {
    let availability: Vec<Value> = days
        .iter()
        .map(|day| json!({"dayOfWeek": day, "startTime": "09:00", "endTime": "17:00", "isAvailable": true}))
        .collect();
    json!({
        "id": id,
        "firstName": first,
        "lastName": last,
        "fullName": format!("Dr. {first} {last}"),
        "title": "MD",
        "specialty": specialty,
        "department": "Outpatient",
        "email": format!("{}@hospital.example", first.to_lowercase()),
        "phone": "+1 555-0100",
        "licenseNumber": format!("LIC-{id}"),
        "yearsOfExperience": 10,
        "availability": availability,
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    })
}

pub fn doctors() -> Vec<Value> {
    vec![
        doctor("D-001", "Alan", "Smith", "cardiology", &[1, 3, 5]),
        doctor("D-002", "Rita", "Moreno", "pediatrics", &[2, 4]),
        doctor("D-003", "Omar", "Haddad", "cardiology", &[2]),
    ]
}

pub fn seed() -> Value {
    json!({
        "patients": patients(),
        "doctors": doctors(),
        "appointments": appointments(),
        "labResults": [],
        "medicalTasks": tasks(),
    })
}

pub fn setup_test_app() -> Router {
    let store = MemoryStore::from_seed(seed()).expect("seed is an object");
    Router::new().nest("/api/v1", api_router(Arc::new(store)))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn send_json(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub fn ids(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}
