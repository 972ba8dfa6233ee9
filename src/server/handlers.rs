//! HTTP handlers for entity CRUD
//!
//! Handlers are generic over the entity type and answer with the same
//! envelopes the dashboard client expects from the production API.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::client::{ListEnvelope, MutateEnvelope};
use crate::core::error::{EntityError, ImobError, RequestError};
use crate::core::tenant::TENANT_QUERY_PARAM;
use crate::core::{Data, DataService, RealEstateId};

/// State shared by the handlers of one entity type
pub struct EntityState<T> {
    pub service: Arc<dyn DataService<T>>,
}

impl<T> Clone for EntityState<T> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Tenant scoping carried on every request
#[derive(Debug, Deserialize)]
pub struct TenantQuery {
    pub real_estate_id: Option<String>,
}

impl TenantQuery {
    fn require(self) -> Result<RealEstateId, ImobError> {
        self.real_estate_id
            .and_then(RealEstateId::new)
            .ok_or(ImobError::Request(RequestError::MissingTenant))
    }
}

/// `GET /{resource}`
///
/// Query parameters besides the tenant narrow the list.
pub async fn list_entities<T>(
    State(state): State<EntityState<T>>,
    Query(mut params): Query<BTreeMap<String, String>>,
) -> Result<Json<ListEnvelope<T>>, ImobError>
where
    T: Data + Serialize,
{
    let tenant = TenantQuery {
        real_estate_id: params.remove(TENANT_QUERY_PARAM),
    }
    .require()?;
    let items = state.service.list_with(&tenant, &params).await?;
    Ok(Json(ListEnvelope::data(items)))
}

/// `GET /{resource}/{id}`
pub async fn get_entity<T>(
    State(state): State<EntityState<T>>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
) -> Result<Json<MutateEnvelope<T>>, ImobError>
where
    T: Data + Serialize,
{
    let tenant = query.require()?;
    let entity = state
        .service
        .get(&tenant, &id)
        .await?
        .ok_or_else(|| EntityError::NotFound {
            entity_type: T::resource_name_singular().to_string(),
            id,
        })?;

    Ok(Json(MutateEnvelope::ok(entity)))
}

/// `POST /{resource}`
pub async fn create_entity<T>(
    State(state): State<EntityState<T>>,
    Query(query): Query<TenantQuery>,
    Json(entity): Json<T>,
) -> Result<Response, ImobError>
where
    T: Data + Serialize + DeserializeOwned,
{
    let tenant = query.require()?;
    let created = state.service.create(&tenant, entity).await?;
    tracing::debug!(entity = T::resource_name_singular(), id = %created.id(), "entity created");

    let message = format!("{} criado com sucesso", T::resource_name_singular());
    Ok((
        StatusCode::CREATED,
        Json(MutateEnvelope::ok_with_message(created, message)),
    )
        .into_response())
}

/// `PUT /{resource}/{id}`
pub async fn update_entity<T>(
    State(state): State<EntityState<T>>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
    Json(entity): Json<T>,
) -> Result<Json<MutateEnvelope<T>>, ImobError>
where
    T: Data + Serialize + DeserializeOwned,
{
    let tenant = query.require()?;
    let updated = state.service.update(&tenant, &id, entity).await?;
    Ok(Json(MutateEnvelope::ok(updated)))
}

/// `DELETE /{resource}/{id}`
pub async fn delete_entity<T>(
    State(state): State<EntityState<T>>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
) -> Result<Json<MutateEnvelope<serde_json::Value>>, ImobError>
where
    T: Data,
{
    let tenant = query.require()?;
    state.service.delete(&tenant, &id).await?;
    Ok(Json(MutateEnvelope {
        success: true,
        data: None,
        message: Some(format!("{} removido", T::resource_name_singular())),
    }))
}
