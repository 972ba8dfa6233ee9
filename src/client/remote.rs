//! DataService backed by the REST API

use super::rest::RestClient;
use crate::core::error::ImobError;
use crate::core::{Data, DataService, RealEstateId};
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use uuid::Uuid;

/// Remote data service for one entity type
///
/// The resource path is the entity's plural resource name.
pub struct RemoteDataService<T> {
    client: RestClient,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for RemoteDataService<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Data> RemoteDataService<T> {
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            _marker: PhantomData,
        }
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }
}

#[async_trait]
impl<T> DataService<T> for RemoteDataService<T>
where
    T: Data + Serialize + DeserializeOwned,
{
    async fn list(&self, tenant: &RealEstateId) -> Result<Vec<T>> {
        self.list_with(tenant, &BTreeMap::new()).await
    }

    /// Parameters are sent as query string entries next to the tenant
    async fn list_with(
        &self,
        tenant: &RealEstateId,
        params: &BTreeMap<String, String>,
    ) -> Result<Vec<T>> {
        self.client
            .list(tenant, T::resource_name(), params)
            .await
            .map_err(|e| ImobError::from(e).into())
    }

    async fn get(&self, tenant: &RealEstateId, id: &Uuid) -> Result<Option<T>> {
        self.client
            .get(tenant, T::resource_name(), id)
            .await
            .map_err(|e| ImobError::from(e).into())
    }

    async fn create(&self, tenant: &RealEstateId, entity: T) -> Result<T> {
        self.client
            .create(tenant, T::resource_name(), &entity)
            .await
            .map_err(|e| ImobError::from(e).into())
    }

    async fn update(&self, tenant: &RealEstateId, id: &Uuid, entity: T) -> Result<T> {
        self.client
            .update(tenant, T::resource_name(), id, &entity)
            .await
            .map_err(|e| ImobError::from(e).into())
    }

    async fn delete(&self, tenant: &RealEstateId, id: &Uuid) -> Result<()> {
        self.client
            .delete(tenant, T::resource_name(), id)
            .await
            .map_err(|e| ImobError::from(e).into())
    }
}
