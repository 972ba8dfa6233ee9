//! Properties (imóveis) listed by the brokerage

use crate::{impl_data_entity, status_enum};
use uuid::Uuid;

status_enum!(
    /// Availability of a property or land parcel
    ListingStatus {
        Available => "available",
        Reserved => "reserved",
        Sold => "sold",
        Inactive => "inactive",
    }
);

impl_data_entity!(
    /// A house, apartment or commercial unit
    Property,
    "property",
    "properties",
    ListingStatus,
    ["name", "address", "neighborhood", "city"],
    {
        /// casa, apartamento, sala comercial, ...
        property_type: String,
        address: String,
        neighborhood: String,
        city: String,
        /// Two-letter state code
        state: String,
        #[serde(default)]
        zip_code: Option<String>,
        price: f64,
        /// Private area in m²
        area: f64,
        bedrooms: u32,
        bathrooms: u32,
        parking_spaces: u32,
        #[serde(default)]
        features: Vec<String>,
        #[serde(default)]
        broker_id: Option<Uuid>,
    }
);

impl Property {
    /// Price per square meter, when the area is known
    pub fn price_per_m2(&self) -> Option<f64> {
        (self.area > 0.0).then(|| self.price / self.area)
    }
}
