//! Billing records (cobranças) and receivables

use crate::{impl_data_entity, status_enum};
use chrono::{DateTime, Utc};

/// Timestamp the billing list filters its date range on
pub const COBRANCA_DATE_FIELD: &str = "due_date";

status_enum!(
    /// Payment state of a billing record
    PaymentStatus {
        Pending => "Pendente",
        Paid => "Pago",
        Overdue => "Atrasado",
        Cancelled => "Cancelado",
    }
);

impl_data_entity!(
    /// An amount receivable from a client
    Cobranca,
    "cobranca",
    "cobrancas",
    PaymentStatus,
    ["name", "description", "payer"],
    {
        description: String,
        amount: f64,
        due_date: DateTime<Utc>,
        /// Name of the paying client
        payer: String,
        /// pix, boleto, cartão, transferência
        #[serde(default)]
        payment_method: Option<String>,
        #[serde(default)]
        paid_at: Option<DateTime<Utc>>,
    }
);

impl Cobranca {
    /// Pending and already past its due date at `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            PaymentStatus::Overdue => true,
            PaymentStatus::Pending => self.due_date < now,
            PaymentStatus::Paid | PaymentStatus::Cancelled => false,
        }
    }

    /// Record a payment
    pub fn mark_paid(&mut self, at: DateTime<Utc>) {
        self.status = PaymentStatus::Paid;
        self.paid_at = Some(at);
        self.touch();
    }
}
