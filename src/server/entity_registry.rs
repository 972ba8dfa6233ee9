//! Entity registry for auto-generating CRUD routes

use super::handlers::{
    EntityState, create_entity, delete_entity, get_entity, list_entities, update_entity,
};
use crate::core::{Data, DataService};
use axum::Router;
use axum::routing::get;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Trait that describes how to build routes for an entity
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "corretor")
    fn entity_type(&self) -> &str;

    /// The plural form and route segment (e.g., "corretores")
    fn plural(&self) -> &str;

    /// Build the CRUD routes for this entity:
    /// - GET/POST /{plural}
    /// - GET/PUT/DELETE /{plural}/{id}
    fn build_routes(&self) -> Router;
}

/// Descriptor serving `T` from a data service
pub struct DataDescriptor<T> {
    service: Arc<dyn DataService<T>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Data> DataDescriptor<T> {
    pub fn new(service: Arc<dyn DataService<T>>) -> Self {
        Self {
            service,
            _marker: PhantomData,
        }
    }
}

impl<T> EntityDescriptor for DataDescriptor<T>
where
    T: Data + Serialize + DeserializeOwned,
{
    fn entity_type(&self) -> &str {
        T::resource_name_singular()
    }

    fn plural(&self) -> &str {
        T::resource_name()
    }

    fn build_routes(&self) -> Router {
        let state = EntityState {
            service: Arc::clone(&self.service),
        };
        let collection = format!("/{}", T::resource_name());
        let item = format!("/{}/{{id}}", T::resource_name());

        Router::new()
            .route(&collection, get(list_entities::<T>).post(create_entity::<T>))
            .route(
                &item,
                get(get_entity::<T>)
                    .put(update_entity::<T>)
                    .delete(delete_entity::<T>),
            )
            .with_state(state)
    }
}

/// Registry for all served entities
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: HashMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
        }
    }

    /// Register an entity descriptor, keyed by its entity type
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Merge the routes of every registered entity
    pub fn build_routes(&self) -> Router {
        let mut router = Router::new();

        for descriptor in self.descriptors.values() {
            router = router.merge(descriptor.build_routes());
        }

        router
    }

    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}
