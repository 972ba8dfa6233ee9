//! Typed error handling for imob-rs
//!
//! This module provides an error hierarchy that lets callers react to
//! specific failures (a missing record, a rejected form step, an API outage)
//! instead of inspecting generic `anyhow::Error` values.
//!
//! # Error Categories
//!
//! - [`EntityError`]: Errors related to entity operations (CRUD)
//! - [`ConfigError`]: Errors related to configuration parsing and validation
//! - [`ValidationError`]: Form, wizard and mapping validation failures
//! - [`RequestError`]: Errors talking to the brokerage REST API
//!
//! The list query pipeline never produces any of these: it is a total
//! function over its inputs.
//!
//! # Example
//!
//! ```rust,ignore
//! match resource.load().await {
//!     Ok(items) => render(items),
//!     Err(ImobError::Request(RequestError::Http { status: 404, .. })) => render_empty(),
//!     Err(e) => show_retry(e.to_string()),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type for imob-rs
#[derive(Debug)]
pub enum ImobError {
    /// Entity-related errors (CRUD operations)
    Entity(EntityError),

    /// Configuration errors
    Config(ConfigError),

    /// Validation errors
    Validation(ValidationError),

    /// HTTP/API errors
    Request(RequestError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ImobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImobError::Entity(e) => write!(f, "{}", e),
            ImobError::Config(e) => write!(f, "{}", e),
            ImobError::Validation(e) => write!(f, "{}", e),
            ImobError::Request(e) => write!(f, "{}", e),
            ImobError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ImobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImobError::Entity(e) => Some(e),
            ImobError::Config(e) => Some(e),
            ImobError::Validation(e) => Some(e),
            ImobError::Request(e) => Some(e),
            ImobError::Internal(_) => None,
        }
    }
}

/// Error body returned by the development API server
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`, mirrors the mutate envelope
    pub success: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ImobError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ImobError::Entity(e) => e.status_code(),
            ImobError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ImobError::Validation(_) => StatusCode::BAD_REQUEST,
            ImobError::Request(e) => e.status_code(),
            ImobError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ImobError::Entity(e) => e.error_code(),
            ImobError::Config(_) => "CONFIG_ERROR",
            ImobError::Validation(_) => "VALIDATION_ERROR",
            ImobError::Request(e) => e.error_code(),
            ImobError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ImobError::Request(RequestError::Transport { .. }) => true,
            ImobError::Request(RequestError::Http { status, .. }) => *status >= 500,
            _ => false,
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ImobError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            ImobError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ImobError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ImobError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ImobError>() {
            Ok(typed) => return typed,
            Err(other) => other,
        };
        let err = match err.downcast::<EntityError>() {
            Ok(typed) => return typed.into(),
            Err(other) => other,
        };
        let err = match err.downcast::<RequestError>() {
            Ok(typed) => return typed.into(),
            Err(other) => other,
        };
        match err.downcast::<ValidationError>() {
            Ok(typed) => typed.into(),
            Err(other) => ImobError::Internal(other.to_string()),
        }
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity operations
#[derive(Debug)]
pub enum EntityError {
    /// Entity was not found
    NotFound { entity_type: String, id: Uuid },

    /// Entity already exists (conflict)
    AlreadyExists { entity_type: String, id: Uuid },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            EntityError::AlreadyExists { entity_type, id } => {
                write!(f, "{} with id '{}' already exists", entity_type, id)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
        }
    }
}

impl From<EntityError> for ImobError {
    fn from(err: EntityError) -> Self {
        ImobError::Entity(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ImobError {
    fn from(err: ConfigError) -> Self {
        ImobError::Config(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to form, wizard and mapping validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Wizard step index out of range
    InvalidStep { step: usize, steps: usize },

    /// A field name appears twice on one side of a mapping table
    MappingConflict {
        entity: String,
        side: &'static str,
        field: String,
    },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    /// Field names involved in this error, for inline rendering
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::FieldError { field, .. } => vec![field.as_str()],
            ValidationError::FieldErrors(errors) => {
                errors.iter().map(|e| e.field.as_str()).collect()
            }
            ValidationError::MappingConflict { field, .. } => vec![field.as_str()],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldError { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidStep { step, steps } => {
                write!(f, "Step {} does not exist (wizard has {} steps)", step, steps)
            }
            ValidationError::MappingConflict {
                entity,
                side,
                field,
            } => {
                write!(
                    f,
                    "Field '{}' is mapped more than once on the {} side of '{}'",
                    field, side, entity
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ImobError {
    fn from(err: ValidationError) -> Self {
        ImobError::Validation(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors raised while talking to the brokerage REST API
#[derive(Debug)]
pub enum RequestError {
    /// The API answered with a non-success HTTP status
    Http { status: u16, message: String },

    /// The request never produced a response (connection, timeout)
    Transport { message: String },

    /// The API answered `success: false`
    Api { message: String },

    /// The response body did not match the expected envelope
    Decode { message: String },

    /// No tenant is selected; every query must be scoped
    MissingTenant,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Http { status, message } => {
                write!(f, "API returned HTTP {}: {}", status, message)
            }
            RequestError::Transport { message } => {
                write!(f, "Request failed: {}", message)
            }
            RequestError::Api { message } => {
                write!(f, "API rejected the request: {}", message)
            }
            RequestError::Decode { message } => {
                write!(f, "Unexpected API response: {}", message)
            }
            RequestError::MissingTenant => {
                write!(f, "Missing required query parameter 'real_estate_id'")
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Http { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RequestError::Transport { .. } => StatusCode::BAD_GATEWAY,
            RequestError::Api { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RequestError::Decode { .. } => StatusCode::BAD_GATEWAY,
            RequestError::MissingTenant => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Http { .. } => "HTTP_ERROR",
            RequestError::Transport { .. } => "TRANSPORT_ERROR",
            RequestError::Api { .. } => "API_ERROR",
            RequestError::Decode { .. } => "DECODE_ERROR",
            RequestError::MissingTenant => "MISSING_TENANT",
        }
    }
}

impl From<RequestError> for ImobError {
    fn from(err: RequestError) -> Self {
        ImobError::Request(err)
    }
}
