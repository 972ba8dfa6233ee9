//! Domain entities of the brokerage back-office

#[macro_use]
pub mod macros;

pub mod cobranca;
pub mod comissao;
pub mod corretor;
pub mod empreendimento;
pub mod property;
pub mod terreno;

pub use cobranca::{COBRANCA_DATE_FIELD, Cobranca, PaymentStatus};
pub use comissao::Comissao;
pub use corretor::{ActiveStatus, Corretor};
pub use empreendimento::{DevelopmentStatus, Empreendimento};
pub use property::{ListingStatus, Property};
pub use terreno::Terreno;
