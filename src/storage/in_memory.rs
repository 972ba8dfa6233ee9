//! In-memory implementation of DataService for testing and development

use crate::core::error::EntityError;
use crate::core::{Data, DataService, RealEstateId};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

type Partition<T> = IndexMap<Uuid, T>;

/// In-memory data service partitioned by real-estate tenant
///
/// Entities are listed in insertion order. Uses RwLock for thread-safe access;
/// clones share the same store.
#[derive(Clone)]
pub struct InMemoryDataService<T: Data> {
    entities: Arc<RwLock<HashMap<RealEstateId, Partition<T>>>>,
}

impl<T: Data> InMemoryDataService<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entities: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a store pre-filled with `entities` for one tenant
    pub fn seeded(tenant: &RealEstateId, entities: impl IntoIterator<Item = T>) -> Result<Self> {
        let service = Self::new();
        {
            let mut store = service
                .entities
                .write()
                .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
            let partition = store.entry(tenant.clone()).or_default();
            for entity in entities {
                partition.insert(entity.id(), entity);
            }
        }
        Ok(service)
    }

    /// Number of entities stored for `tenant`
    pub fn count(&self, tenant: &RealEstateId) -> Result<usize> {
        let store = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(store.get(tenant).map_or(0, |partition| partition.len()))
    }
}

impl<T: Data> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Data> DataService<T> for InMemoryDataService<T> {
    async fn list(&self, tenant: &RealEstateId) -> Result<Vec<T>> {
        let store = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(store
            .get(tenant)
            .map(|partition| partition.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, tenant: &RealEstateId, id: &Uuid) -> Result<Option<T>> {
        let store = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(store.get(tenant).and_then(|partition| partition.get(id)).cloned())
    }

    async fn create(&self, tenant: &RealEstateId, entity: T) -> Result<T> {
        let mut store = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let partition = store.entry(tenant.clone()).or_default();
        if partition.contains_key(&entity.id()) {
            return Err(EntityError::AlreadyExists {
                entity_type: T::resource_name_singular().to_string(),
                id: entity.id(),
            }
            .into());
        }

        partition.insert(entity.id(), entity.clone());
        tracing::debug!(tenant = %tenant, entity = T::resource_name_singular(), id = %entity.id(), "created");

        Ok(entity)
    }

    async fn update(&self, tenant: &RealEstateId, id: &Uuid, entity: T) -> Result<T> {
        let mut store = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let slot = store
            .get_mut(tenant)
            .and_then(|partition| partition.get_mut(id))
            .ok_or_else(|| EntityError::NotFound {
                entity_type: T::resource_name_singular().to_string(),
                id: *id,
            })?;

        *slot = entity.clone();

        Ok(entity)
    }

    async fn delete(&self, tenant: &RealEstateId, id: &Uuid) -> Result<()> {
        let mut store = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let removed = store
            .get_mut(tenant)
            .and_then(|partition| partition.shift_remove(id));

        if removed.is_none() {
            return Err(EntityError::NotFound {
                entity_type: T::resource_name_singular().to_string(),
                id: *id,
            }
            .into());
        }

        Ok(())
    }
}
