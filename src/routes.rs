//! Generic REST handlers over any [`SearchableResource`].
//!
//! `GET /{plural}` runs the same search, filter and page stages as the
//! in-memory engine against the stored documents and reports the window in
//! a `Content-Range` header.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use hyper::HeaderMap;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::ApiError;
use crate::filtering::{
    FilterState, TextQuery, calculate_content_range, parse_pagination, parse_sorting,
    sort_documents,
};
use crate::models::FilterOptions;
use crate::resources::{
    Appointment, Doctor, LabResult, MedicalTask, Patient, SearchableResource, timestamp,
};
use crate::store::{DataSource, StoreError};
use crate::validation::Validatable;

pub type SharedStore = Arc<dyn DataSource>;

fn decode<R: SearchableResource>(document: Value) -> Result<R, ApiError> {
    serde_json::from_value(document).map_err(|e| {
        ApiError::bad_request(format!("Invalid {} payload: {e}", R::RESOURCE_NAME_SINGULAR))
    })
}

fn encode<R: SearchableResource>(record: &R) -> Result<Value, ApiError> {
    serde_json::to_value(record).map_err(|e| {
        ApiError::internal(
            format!("Failed to store {}", R::RESOURCE_NAME_SINGULAR),
            Some(e.to_string()),
        )
    })
}

fn store_error<R: SearchableResource>(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound { id, .. } => ApiError::not_found(R::RESOURCE_NAME_SINGULAR, Some(id)),
        other => other.into(),
    }
}

/// List, search, filter, sort and page a collection.
pub async fn get_all<R>(
    Query(params): Query<FilterOptions>,
    State(store): State<SharedStore>,
) -> Result<(HeaderMap, Json<Vec<Value>>), ApiError>
where
    R: SearchableResource,
{
    let documents = store.list(R::RESOURCE_NAME_PLURAL).await;

    let fields = R::search_fields();
    let query = params
        .q
        .as_deref()
        .and_then(|q| TextQuery::new(q, false));
    let filters = params
        .filter
        .as_deref()
        .map(FilterState::from_json_str)
        .unwrap_or_default()
        .coerce_with(&R::filters());

    let mut matching: Vec<&Value> = documents
        .iter()
        .filter(|doc| {
            query
                .as_ref()
                .is_none_or(|query| query.matches(*doc, fields.as_slice()))
        })
        .filter(|doc| filters.matches(*doc))
        .collect();

    if let Some(spec) = parse_sorting(&params) {
        sort_documents(&mut matching, &spec);
    }

    let (offset, limit) = parse_pagination(&params);
    let total_count = matching.len() as u64;
    let items = matching
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .cloned()
        .collect();

    let headers = calculate_content_range(offset, limit, total_count, R::RESOURCE_NAME_PLURAL);
    Ok((headers, Json(items)))
}

pub async fn get_one<R>(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    R: SearchableResource,
{
    store
        .get(R::RESOURCE_NAME_PLURAL, &id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(R::RESOURCE_NAME_SINGULAR, Some(id)))
}

/// Create a record. A missing id is generated; timestamps are always
/// stamped by the server.
pub async fn create_one<R>(
    State(store): State<SharedStore>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError>
where
    R: SearchableResource,
{
    let Json(payload) = payload?;
    let mut record: R = decode(payload)?;
    if record.id().is_empty() {
        record.set_id(R::generate_id());
    }

    let now = timestamp();
    record.set_created_at(now.clone());
    record.set_updated_at(now.clone());
    record.before_save(None, &now);
    record.validate()?;

    let stored = store
        .insert(R::RESOURCE_NAME_PLURAL, encode(&record)?)
        .await
        .map_err(store_error::<R>)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Shallow-merge the body into the stored record. The path id always wins
/// over an id in the body.
pub async fn update_one<R>(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError>
where
    R: SearchableResource,
{
    let Json(payload) = payload?;
    let Value::Object(patch) = payload else {
        return Err(ApiError::bad_request("Request body must be a JSON object"));
    };
    let existing = store
        .get(R::RESOURCE_NAME_PLURAL, &id)
        .await
        .ok_or_else(|| ApiError::not_found(R::RESOURCE_NAME_SINGULAR, Some(id.clone())))?;

    let previous: Option<R> = serde_json::from_value(existing.clone()).ok();
    let now = timestamp();

    let mut merged = existing;
    if let Value::Object(fields) = &mut merged {
        fields.extend(patch);
        fields.insert("id".to_string(), Value::String(id.clone()));
        fields
            .entry("createdAt")
            .or_insert_with(|| Value::String(now.clone()));
    }

    let mut record: R = decode(merged)?;
    record.set_updated_at(now.clone());
    record.before_save(previous.as_ref(), &now);
    record.validate()?;

    let stored = store
        .replace(R::RESOURCE_NAME_PLURAL, &id, encode(&record)?)
        .await
        .map_err(store_error::<R>)?;
    Ok(Json(stored))
}

pub async fn delete_one<R>(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    R: SearchableResource,
{
    store
        .remove(R::RESOURCE_NAME_PLURAL, &id)
        .await
        .map_err(store_error::<R>)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET/POST /{plural}` and `GET/PUT/DELETE /{plural}/{id}` for one resource.
pub fn resource_router<R: SearchableResource>() -> Router<SharedStore> {
    let collection = format!("/{}", R::RESOURCE_NAME_PLURAL);
    let item = format!("/{}/{{id}}", R::RESOURCE_NAME_PLURAL);

    Router::new()
        .route(&collection, get(get_all::<R>).post(create_one::<R>))
        .route(
            &item,
            get(get_one::<R>)
                .put(update_one::<R>)
                .delete(delete_one::<R>),
        )
}

/// Routes for every dashboard resource, backed by `store`.
pub fn api_router(store: SharedStore) -> Router {
    Router::new()
        .merge(resource_router::<Patient>())
        .merge(resource_router::<Doctor>())
        .merge(resource_router::<Appointment>())
        .merge(resource_router::<LabResult>())
        .merge(resource_router::<MedicalTask>())
        .with_state(store)
}
