//! Developments (empreendimentos): buildings or condominiums sold by units

use crate::{impl_data_entity, status_enum};
use chrono::{DateTime, Utc};

status_enum!(
    /// Construction stage of a development
    DevelopmentStatus {
        Launch => "launch",
        UnderConstruction => "under_construction",
        Ready => "ready",
        SoldOut => "sold_out",
    }
);

impl_data_entity!(
    /// A development with many units
    Empreendimento,
    "empreendimento",
    "empreendimentos",
    DevelopmentStatus,
    ["name", "builder", "city"],
    {
        /// Construction company
        builder: String,
        address: String,
        city: String,
        state: String,
        total_units: u32,
        sold_units: u32,
        /// Starting unit price
        price: f64,
        #[serde(default)]
        delivery_date: Option<DateTime<Utc>>,
        #[serde(default)]
        amenities: Vec<String>,
    }
);

impl Empreendimento {
    /// Units still for sale
    pub fn available_units(&self) -> u32 {
        self.total_units.saturating_sub(self.sold_units)
    }

    /// Share of sold units in percent, derived from persisted counts.
    ///
    /// Returns `None` when the development has no units registered yet.
    pub fn sold_percentage(&self) -> Option<f64> {
        if self.total_units == 0 {
            return None;
        }
        let sold = self.sold_units.min(self.total_units) as f64;
        Some(sold * 100.0 / self.total_units as f64)
    }
}
