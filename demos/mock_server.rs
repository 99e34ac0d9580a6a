//! # Mock Dashboard API
//!
//! Serves the dashboard collections (patients, doctors, appointments, lab
//! results and medical tasks) from memory, with search, filtering, sorting
//! and pagination on every list endpoint.
//!
//! ## Run the Example
//!
//! ```bash
//! MEDSEARCH_SEED=db.json cargo run --example mock_server
//! ```
//!
//! `MEDSEARCH_SEED` points at a JSON object whose top-level arrays become
//! collections. Without it the server starts empty. `MEDSEARCH_ADDR`
//! overrides the listen address.
//!
//! Then visit:
//! - **Patients**: <http://localhost:3001/api/v1/patients?q=boston>
//! - **Open tasks**: <http://localhost:3001/api/v1/medicalTasks?filter={"status":["pending","in-progress"]}>

use medsearch::{MemoryStore, api_router};
use serde_json::json;
use std::{env, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

const DEFAULT_ADDR: &str = "127.0.0.1:3001";

async fn load_seed() -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    match env::var("MEDSEARCH_SEED") {
        Ok(path) => {
            let raw = tokio::fs::read_to_string(&path).await?;
            tracing::info!("Loading seed data from {path}");
            Ok(serde_json::from_str(&raw)?)
        }
        Err(_) => Ok(json!({
            "patients": [],
            "doctors": [],
            "appointments": [],
            "labResults": [],
            "medicalTasks": []
        })),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let store = MemoryStore::from_seed(load_seed().await?)?;
    let app = axum::Router::new()
        .nest("/api/v1", api_router(Arc::new(store)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = env::var("MEDSEARCH_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Mock API listening on http://{addr}/api/v1");

    axum::serve(listener, app).await?;
    Ok(())
}
