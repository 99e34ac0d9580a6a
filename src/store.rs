//! # In-Memory Data Source
//!
//! Collections of JSON documents keyed by name, the way a json-server
//! `db.json` lays them out:
//!
//! ```json
//! { "patients": [ { "id": "P-001", ... } ], "medicalTasks": [ ... ] }
//! ```
//!
//! Documents keep their insertion order. Nothing is persisted beyond the
//! process.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A document with this id already exists in the collection
    Duplicate { collection: String, id: String },
    /// No document with this id
    NotFound { collection: String, id: String },
    /// The document is not a JSON object with an id
    InvalidDocument(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { collection, id } => {
                write!(f, "{collection} already contains a document with id '{id}'")
            }
            Self::NotFound { collection, id } => {
                write!(f, "{collection} has no document with id '{id}'")
            }
            Self::InvalidDocument(reason) => write!(f, "invalid document: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Backing storage for the REST handlers.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Every document of `collection`, in insertion order.
    async fn list(&self, collection: &str) -> Vec<Value>;

    async fn get(&self, collection: &str, id: &str) -> Option<Value>;

    /// # Errors
    ///
    /// `Duplicate` when the id is taken, `InvalidDocument` without an id.
    async fn insert(&self, collection: &str, document: Value) -> Result<Value, StoreError>;

    /// Replace the document stored under `id`.
    ///
    /// # Errors
    ///
    /// `NotFound` when no document has that id.
    async fn replace(&self, collection: &str, id: &str, document: Value)
    -> Result<Value, StoreError>;

    /// Remove and return the document stored under `id`.
    ///
    /// # Errors
    ///
    /// `NotFound` when no document has that id.
    async fn remove(&self, collection: &str, id: &str) -> Result<Value, StoreError>;
}

/// String form of a document's `id`; json-server data mixes string and
/// numeric ids.
#[must_use]
pub fn document_id(document: &Value) -> Option<String> {
    match document.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn has_id(document: &Value, id: &str) -> bool {
    document_id(document).is_some_and(|doc_id| doc_id == id)
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a `db.json` style object. Array members become collections;
    /// anything else is skipped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` when `seed` is not a JSON object.
    pub fn from_seed(seed: Value) -> Result<Self, StoreError> {
        let Value::Object(members) = seed else {
            return Err(StoreError::InvalidDocument(
                "seed must be an object of collections".to_string(),
            ));
        };

        let mut collections = HashMap::new();
        for (name, value) in members {
            match value {
                Value::Array(documents) => {
                    tracing::debug!(collection = %name, count = documents.len(), "Seeded collection");
                    collections.insert(name, documents);
                }
                _ => tracing::debug!(collection = %name, "Skipping non-array seed member"),
            }
        }

        Ok(Self {
            collections: RwLock::new(collections),
        })
    }

    /// Current contents as a `db.json` style object.
    pub async fn snapshot(&self) -> Value {
        let collections = self.collections.read().await;
        Value::Object(
            collections
                .iter()
                .map(|(name, documents)| (name.clone(), Value::Array(documents.clone())))
                .collect(),
        )
    }
}

#[async_trait]
impl DataSource for MemoryStore {
    async fn list(&self, collection: &str) -> Vec<Value> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    async fn get(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .read()
            .await
            .get(collection)?
            .iter()
            .find(|document| has_id(document, id))
            .cloned()
    }

    async fn insert(&self, collection: &str, document: Value) -> Result<Value, StoreError> {
        let id = document_id(&document)
            .ok_or_else(|| StoreError::InvalidDocument("missing id".to_string()))?;

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();
        if documents.iter().any(|existing| has_id(existing, &id)) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                id,
            });
        }
        documents.push(document.clone());
        Ok(document)
    }

    async fn replace(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<Value, StoreError> {
        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|existing| has_id(existing, id)))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        *slot = document.clone();
        Ok(document)
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        let mut collections = self.collections.write().await;
        let not_found = || StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        };
        let documents = collections.get_mut(collection).ok_or_else(not_found)?;
        let position = documents
            .iter()
            .position(|existing| has_id(existing, id))
            .ok_or_else(not_found)?;
        Ok(documents.remove(position))
    }
}
