//! # imob-rs
//!
//! Back-office core for a real-estate brokerage: properties, land parcels,
//! developments, brokers, commission rules and billing records.
//!
//! ## Features
//!
//! - **List Query Pipeline**: stable sort, search, status, facets, numeric
//!   and date ranges applied the same way by every list view
//! - **Immutable Filter State**: every update returns a new `FilterState`
//! - **Pagination**: page slices and filler-row counts for fixed-height tables
//! - **Entity Resources**: observable collections with a deduplicating,
//!   tenant-aware query cache
//! - **REST Client**: typed access to the brokerage API envelopes
//! - **Registration Wizards**: step-guarded forms with Portuguese field names
//!   mapped to API names
//! - **Dev Server**: in-memory API with the same contract for local work
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use imob::prelude::*;
//!
//! let tenant = RealEstateId::new("re-42").unwrap();
//! let service = InMemoryDataService::<Property>::new();
//! let resource = EntityResource::new(Arc::new(service), Arc::new(QueryCache::default()), tenant);
//! resource.load().await?;
//!
//! let filters = FilterState::new()
//!     .with_status("available")
//!     .with_facet("city", ["Curitiba"])
//!     .with_range("price", Some(300_000.0), None);
//! let query = ListQuery::default().with_filters(filters).with_search("batel");
//! let rows = resource.view(&query).unwrap_or_default();
//! let page = paginate_owned(rows, 0, 10);
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod core;
pub mod entities;
pub mod mapping;
pub mod resource;
pub mod server;
pub mod storage;
pub mod wizard;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::{Data, Entity},
        error::{ImobError, ValidationError},
        field::{FieldFormat, FieldValue},
        filter::{FilterAction, FilterState, NumericRange, StatusFilter},
        pagination::{Page, PaginationMeta, empty_rows, paginate, paginate_owned},
        query::{ListQuery, SortBy, SortOrder, SortSpec, stable_sort},
        service::DataService,
        tenant::RealEstateId,
        validation::{FormValidationConfig, filters, validators},
    };

    // === Macros ===
    pub use crate::{impl_data_entity, status_enum};

    // === Entities ===
    pub use crate::entities::{
        ActiveStatus, Cobranca, Comissao, Corretor, DevelopmentStatus, Empreendimento,
        ListingStatus, PaymentStatus, Property, Terreno,
    };

    // === Data access ===
    pub use crate::cache::{CacheKey, CacheTag, QueryCache};
    pub use crate::client::{RemoteDataService, RestClient};
    pub use crate::resource::{EntityResource, ResourceState};
    pub use crate::storage::InMemoryDataService;

    // === Forms ===
    pub use crate::mapping::FieldMapping;
    pub use crate::wizard::Wizard;

    // === Config ===
    pub use crate::config::DashboardConfig;

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
