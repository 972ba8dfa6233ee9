//! Commission rules (comissões)

use super::corretor::ActiveStatus;
use crate::impl_data_entity;

impl_data_entity!(
    /// How the commission of a sale is split between participants
    Comissao,
    "comissao",
    "comissoes",
    ActiveStatus,
    ["name", "description"],
    {
        #[serde(default)]
        description: String,
        /// Total commission over the sale price, in percent
        percentual_total: f64,
        /// Property type the rule applies to, any when absent
        #[serde(default)]
        property_type: Option<String>,
        /// Broker names sharing the commission
        #[serde(default)]
        participants: Vec<String>,
    }
);

impl Comissao {
    /// Commission due on a sale of `price`
    pub fn amount_for(&self, price: f64) -> f64 {
        price * self.percentual_total / 100.0
    }
}
