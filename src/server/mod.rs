//! Development API server
//!
//! Serves registered entity types over the same REST contract the dashboard
//! client consumes:
//! - `GET/POST /{resource}` and `GET/PUT/DELETE /{resource}/{id}`
//! - every request scoped by the `real_estate_id` query parameter
//! - health check routes

pub mod builder;
pub mod entity_registry;
pub mod handlers;

pub use builder::ServerBuilder;
pub use entity_registry::{DataDescriptor, EntityDescriptor, EntityRegistry};
