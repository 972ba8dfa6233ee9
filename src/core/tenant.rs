//! Tenant scoping
//!
//! Every API query and every cached collection is partitioned by the
//! brokerage account ("real estate") currently selected in the dashboard.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query parameter name carrying the tenant on every API request
pub const TENANT_QUERY_PARAM: &str = "real_estate_id";

/// Identifier of the current real-estate account
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealEstateId(String);

impl RealEstateId {
    /// Create a tenant id, rejecting blank values
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RealEstateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
