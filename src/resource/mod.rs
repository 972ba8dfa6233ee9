//! Observable entity collections backed by a data service and the query cache

use crate::cache::{CacheKey, CacheTag, QueryCache};
use crate::core::error::ImobError;
use crate::core::query::ListQuery;
use crate::core::{Data, DataService, RealEstateId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

/// Error kept in the resource state
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceError {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl From<&ImobError> for ResourceError {
    fn from(err: &ImobError) -> Self {
        Self {
            code: err.error_code(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// Snapshot of one entity collection
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    /// Last successfully loaded collection, `None` before the first load
    pub data: Option<Vec<T>>,
    /// First load in flight, nothing to show yet
    pub loading: bool,
    /// Last load or mutation failure
    pub error: Option<ResourceError>,
    /// Refresh in flight while `data` is shown
    pub is_validating: bool,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            is_validating: false,
        }
    }
}

impl<T> ResourceState<T> {
    /// Loaded without error and holding no item
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.data.as_ref().is_some_and(|data| data.is_empty())
    }

    /// Data is safe to feed into the list pipeline
    pub fn is_ready(&self) -> bool {
        self.error.is_none() && !self.loading && self.data.is_some()
    }
}

/// Entity collection of one type for one tenant
///
/// ```rust,ignore
/// let resource = EntityResource::new(service, cache, tenant);
/// let mut updates = resource.subscribe();
/// resource.load().await?;
/// let rows = resource.view(&ListQuery::default().with_search("batel"));
/// ```
pub struct EntityResource<T: Data> {
    service: Arc<dyn DataService<T>>,
    cache: Arc<QueryCache>,
    tenant: RealEstateId,
    params: BTreeMap<String, String>,
    state: watch::Sender<ResourceState<T>>,
}

impl<T: Data> EntityResource<T> {
    pub fn new(
        service: Arc<dyn DataService<T>>,
        cache: Arc<QueryCache>,
        tenant: RealEstateId,
    ) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            service,
            cache,
            tenant,
            params: BTreeMap::new(),
            state,
        }
    }

    /// Query parameter sent with every list request
    ///
    /// Parameters narrow the listed collection and are part of the cache key.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn tenant(&self) -> &RealEstateId {
        &self.tenant
    }

    pub fn key(&self) -> CacheKey {
        CacheKey::new(T::resource_name(), self.tenant.clone()).with_params(&self.params)
    }

    /// Current snapshot
    pub fn state(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.state.subscribe()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    /// Load the collection through the cache
    ///
    /// On failure the previous data is kept and the error is recorded. A
    /// response for a key invalidated while it was in flight, typically by a
    /// mutation, does not replace data already held; the held data is
    /// returned instead.
    pub async fn load(&self) -> Result<Vec<T>, ImobError> {
        self.state.send_modify(|state| {
            if state.data.is_some() {
                state.is_validating = true;
            } else {
                state.loading = true;
            }
        });

        let service = Arc::clone(&self.service);
        let tenant = self.tenant.clone();
        let params = self.params.clone();
        let result = self
            .cache
            .fetch_tracked(&self.key(), || async move {
                service.list_with(&tenant, &params).await
            })
            .await
            .map_err(ImobError::from);

        let mut held = None;
        self.state.send_modify(|state| {
            state.loading = false;
            state.is_validating = false;
            match &result {
                Ok(fetched) if !fetched.current && state.data.is_some() => {
                    tracing::debug!(entity = T::resource_name(), "stale load discarded");
                    held = state.data.clone();
                }
                Ok(fetched) => {
                    state.data = Some(fetched.value.clone());
                    state.error = None;
                }
                Err(e) => {
                    tracing::warn!(entity = T::resource_name(), error = %e, "load failed");
                    state.error = Some(ResourceError::from(e));
                }
            }
        });

        result.map(|fetched| held.unwrap_or(fetched.value))
    }

    /// Drop the cached entry and load again
    pub async fn refresh(&self) -> Result<Vec<T>, ImobError> {
        self.cache.invalidate_key(&self.key());
        self.load().await
    }

    /// Run the list pipeline on the loaded data
    ///
    /// Returns `None` while loading, before the first load or after an error.
    pub fn view(&self, query: &ListQuery) -> Option<Vec<T>> {
        let state = self.state.borrow();
        if !state.is_ready() {
            return None;
        }
        state.data.as_deref().map(|data| query.run(data))
    }

    pub async fn create(&self, entity: T) -> Result<T, ImobError> {
        let created = self
            .mutation(self.service.create(&self.tenant, entity).await)?;

        let item = created.clone();
        self.replace_data(move |data| {
            let mut next = data.to_vec();
            next.push(item);
            next
        });
        Ok(created)
    }

    pub async fn update(&self, id: &Uuid, entity: T) -> Result<T, ImobError> {
        let updated = self
            .mutation(self.service.update(&self.tenant, id, entity).await)?;

        let item = updated.clone();
        let id = *id;
        self.replace_data(move |data| {
            data.iter()
                .map(|existing| {
                    if existing.id() == id {
                        item.clone()
                    } else {
                        existing.clone()
                    }
                })
                .collect()
        });
        Ok(updated)
    }

    pub async fn delete(&self, id: &Uuid) -> Result<(), ImobError> {
        self.mutation(self.service.delete(&self.tenant, id).await)?;

        let id = *id;
        self.replace_data(move |data| {
            data.iter()
                .filter(|existing| existing.id() != id)
                .cloned()
                .collect()
        });
        Ok(())
    }

    fn mutation<R>(&self, result: anyhow::Result<R>) -> Result<R, ImobError> {
        result.map_err(|e| {
            let err = ImobError::from(e);
            tracing::warn!(entity = T::resource_name(), error = %err, "mutation failed");
            self.state
                .send_modify(|state| state.error = Some(ResourceError::from(&err)));
            err
        })
    }

    /// Swap in a new collection and invalidate every cached query of this type
    fn replace_data(&self, next: impl FnOnce(&[T]) -> Vec<T>) {
        self.state.send_modify(|state| {
            let current = state.data.as_deref().unwrap_or(&[]);
            state.data = Some(next(current));
            state.error = None;
        });
        self.cache
            .invalidate_tag(&CacheTag::entity_tenant(T::resource_name(), self.tenant.clone()));
    }
}
