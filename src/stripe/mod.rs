mod client;
mod types;

pub use client::StripeClient;
pub use types::{
    BalanceTransaction, Charge, Identified, Invoice, InvoiceItem, Page, Period, Price,
    Subscription, SubscriptionItem,
};

use crate::error::Result;

/// Largest page Stripe list endpoints will return
pub const MAX_PAGE_SIZE: u32 = 100;

/// Filter and cursor for one list call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub created_gte: i64,
    pub created_lte: i64,
    pub limit: u32,
    /// Id of the last record of the previous page
    pub starting_after: Option<String>,
}

impl ListQuery {
    pub fn created_between(gte: i64, lte: i64) -> Self {
        Self {
            created_gte: gte,
            created_lte: lte,
            limit: MAX_PAGE_SIZE,
            starting_after: None,
        }
    }

    /// Query-string pairs in Stripe's bracket notation
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("created[gte]", self.created_gte.to_string()),
            ("created[lte]", self.created_lte.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(cursor) = &self.starting_after {
            params.push(("starting_after", cursor.clone()));
        }
        params
    }

    /// Params for the invoice item list, limited to items not yet on an invoice
    pub fn pending_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.params();
        params.push(("pending", "true".to_string()));
        params
    }
}

/// The slice of the Stripe API the collectors need.
///
/// Implementations are shared across the threads that enrich one page of
/// charges, hence `Sync`.
pub trait PaymentsApi: Sync {
    fn list_charges(&self, query: &ListQuery) -> Result<Page<Charge>>;

    /// Invoice items not yet attached to an invoice
    fn list_pending_invoice_items(&self, query: &ListQuery) -> Result<Page<InvoiceItem>>;

    fn retrieve_invoice(&self, id: &str) -> Result<Invoice>;

    fn retrieve_subscription(&self, id: &str) -> Result<Subscription>;

    fn retrieve_balance_transaction(&self, id: &str) -> Result<BalanceTransaction>;
}
