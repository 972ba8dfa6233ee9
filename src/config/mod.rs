//! Configuration loading and management

use crate::core::RealEstateId;
use crate::core::error::ConfigError;
use crate::core::pagination::ROWS_PER_PAGE_OPTIONS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// REST API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every resource path is appended to
    pub base_url: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Optional bearer token sent on every request
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_ms: 10_000,
            token: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Selected brokerage account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantConfig {
    pub real_estate_id: Option<String>,
}

/// Query cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Window during which identical requests share one fetch
    pub dedupe_interval_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dedupe_interval_ms: 2_000,
        }
    }
}

impl CacheConfig {
    pub fn dedupe_interval(&self) -> Duration {
        Duration::from_millis(self.dedupe_interval_ms)
    }
}

/// List view defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub rows_per_page: usize,
    pub rows_per_page_options: Vec<usize>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            rows_per_page: 10,
            rows_per_page_options: ROWS_PER_PAGE_OPTIONS.to_vec(),
        }
    }
}

/// Complete configuration of the back-office dashboard
///
/// Every section is optional in YAML; missing values take their defaults.
///
/// ```yaml
/// api:
///   base_url: https://api.imob.com.br/api
///   token: secret
/// tenant:
///   real_estate_id: re-42
/// list:
///   rows_per_page: 25
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub tenant: TenantConfig,
    pub cache: CacheConfig,
    pub list: ListConfig,
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        Self::parse(&content, Some(path.display().to_string()))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, None)
    }

    fn parse(yaml: &str, file: Option<String>) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize fine but cannot work
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                value: self.api.base_url.clone(),
                message: "must not be empty".to_string(),
            });
        }

        if self.api.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_ms".to_string(),
                value: "0".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if !self
            .list
            .rows_per_page_options
            .contains(&self.list.rows_per_page)
        {
            return Err(ConfigError::InvalidValue {
                field: "list.rows_per_page".to_string(),
                value: self.list.rows_per_page.to_string(),
                message: format!(
                    "must be one of {:?}",
                    self.list.rows_per_page_options
                ),
            });
        }

        if let Some(id) = &self.tenant.real_estate_id {
            if RealEstateId::new(id.as_str()).is_none() {
                return Err(ConfigError::InvalidValue {
                    field: "tenant.real_estate_id".to_string(),
                    value: id.clone(),
                    message: "must not be blank".to_string(),
                });
            }
        }

        Ok(())
    }

    /// The configured tenant, if any
    pub fn tenant(&self) -> Option<RealEstateId> {
        self.tenant
            .real_estate_id
            .as_deref()
            .and_then(RealEstateId::new)
    }
}
