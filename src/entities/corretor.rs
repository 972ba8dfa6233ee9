//! Brokers (corretores)

use crate::{impl_data_entity, status_enum};

status_enum!(
    /// Whether a broker or commission rule is in use
    ActiveStatus {
        Active => "active",
        Inactive => "inactive",
    }
);

impl_data_entity!(
    /// A broker working for the real-estate account
    Corretor,
    "corretor",
    "corretores",
    ActiveStatus,
    ["name", "email", "creci"],
    {
        email: String,
        phone: String,
        /// Regional council registration number
        creci: String,
        #[serde(default)]
        specialties: Vec<String>,
        /// Neighborhoods or cities the broker covers
        #[serde(default)]
        regions: Vec<String>,
    }
);
