//! Entity traits defining the core abstraction for all domain records

use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for all entities listed by the back-office.
///
/// All entities have:
/// - id: Unique identifier
/// - type: Entity type name (e.g., "property", "cobranca")
/// - created_at: Creation timestamp
/// - updated_at: Last modification timestamp
/// - status: Current status, one value of a small per-domain enumeration
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in API paths (e.g., "properties", "corretores")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "property", "corretor")
    fn resource_name_singular() -> &'static str;

    // === Core Entity Fields ===

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the entity type name
    fn entity_type(&self) -> &str {
        Self::resource_name_singular()
    }

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;

    /// Get the entity status as its exact wire value
    fn status(&self) -> &str;
}

/// Trait for data entities that are rendered as list rows.
///
/// Data entities extend the base Entity with:
/// - name: A human-readable name or title
/// - search_fields: Fields matched by the free-text search box
/// - field_value: Dynamic field access used by filters and column sorting
pub trait Data: Entity {
    /// Get the display name of this entity
    fn name(&self) -> &str;

    /// Fields that the free-text search is matched against
    fn search_fields() -> &'static [&'static str];

    /// Get the value of a specific field by name
    ///
    /// Returns `None` for unknown fields.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Fields exposed for facet/range filtering and sorting
    fn filter_fields() -> &'static [&'static str];
}
