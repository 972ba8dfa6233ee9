//! Validation and filtering system
//!
//! This module provides a declarative approach to normalising and validating
//! form data before it is sent to the API. Registration wizards attach one
//! config per step.

pub mod config;
pub mod filters;
pub mod validators;

pub use config::{FieldRules, FormValidationConfig};
