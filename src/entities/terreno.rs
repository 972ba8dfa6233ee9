//! Land parcels (terrenos)

use super::property::ListingStatus;
use crate::impl_data_entity;

impl_data_entity!(
    /// A land parcel offered for sale
    Terreno,
    "terreno",
    "terrenos",
    ListingStatus,
    ["name", "address", "city"],
    {
        address: String,
        city: String,
        state: String,
        /// Total area in m²
        area: f64,
        price: f64,
        /// Municipal zoning code (ZR-1, ZC, ...)
        #[serde(default)]
        zoning: Option<String>,
        #[serde(default)]
        topography: Option<String>,
        #[serde(default)]
        features: Vec<String>,
    }
);
