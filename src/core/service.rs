//! Service trait for tenant-scoped entity access

use crate::core::filter::StatusFilter;
use crate::core::{Data, RealEstateId};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Service trait for managing data entities
///
/// Implementations provide CRUD operations for a specific entity type,
/// always scoped to one real-estate tenant. The back-office is agnostic to
/// whether the data lives behind the REST API or in memory.
#[async_trait]
pub trait DataService<T: Data>: Send + Sync {
    /// List every entity of the tenant
    async fn list(&self, tenant: &RealEstateId) -> Result<Vec<T>>;

    /// List the tenant's entities narrowed by query parameters
    ///
    /// The default lists everything and keeps the items accepted by
    /// [`matches_params`]. Remote services forward the parameters instead.
    async fn list_with(
        &self,
        tenant: &RealEstateId,
        params: &BTreeMap<String, String>,
    ) -> Result<Vec<T>> {
        let items = self.list(tenant).await?;
        Ok(items
            .into_iter()
            .filter(|item| matches_params(item, params))
            .collect())
    }

    /// Get an entity by ID
    async fn get(&self, tenant: &RealEstateId, id: &Uuid) -> Result<Option<T>>;

    /// Create a new entity
    async fn create(&self, tenant: &RealEstateId, entity: T) -> Result<T>;

    /// Update an existing entity
    async fn update(&self, tenant: &RealEstateId, id: &Uuid, entity: T) -> Result<T>;

    /// Delete an entity
    async fn delete(&self, tenant: &RealEstateId, id: &Uuid) -> Result<()>;
}

/// Whether `item` satisfies every list parameter.
///
/// `status` follows the status filter rules (`all` or empty means any).
/// Other keys naming a field of the entity must equal its text form, or one
/// element for list fields. Keys that are not fields of the entity, such as
/// paging hints, do not constrain.
pub fn matches_params<T: Data>(item: &T, params: &BTreeMap<String, String>) -> bool {
    params.iter().all(|(key, value)| {
        if key == "status" {
            return StatusFilter::parse(value).matches(item.status());
        }
        match item.field_value(key) {
            Some(field) => field.intersects(std::slice::from_ref(value)),
            None => true,
        }
    })
}
