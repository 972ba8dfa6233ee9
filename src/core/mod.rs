//! Core module containing fundamental traits and types

pub mod entity;
pub mod error;
pub mod field;
pub mod filter;
pub mod pagination;
pub mod query;
pub mod service;
pub mod tenant;
pub mod validation;

pub use entity::{Data, Entity};
pub use error::ImobError;
pub use field::{FieldFormat, FieldValue};
pub use filter::{FilterAction, FilterState, NumericRange, StatusFilter};
pub use pagination::{Page, PaginationMeta};
pub use query::{ListQuery, SortBy, SortOrder, SortSpec};
pub use service::DataService;
pub use tenant::RealEstateId;
