//! Paginated collection of the records that make up a report.
//!
//! Both collectors walk a Stripe list endpoint page by page with a
//! `starting_after` cursor. Charges are enriched through invoice,
//! subscription and balance-transaction lookups; pending invoice items are
//! filtered in place.

mod cache;
mod charges;
mod pending;

#[cfg(test)]
pub(crate) mod fake;

pub use cache::LookupCache;
pub use charges::collect_charges;
pub use pending::collect_pending_items;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::Result;
use crate::stripe::{Identified, ListQuery, Page};

/// A charge attributed to the report's product
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRecord {
    pub charge_id: String,
    pub customer_id: Option<String>,
    pub product_id: String,
    pub invoice_date: NaiveDate,
    pub amount: Decimal,
    pub processing_fee: Decimal,
}

/// An invoice item waiting for the next invoicing cycle
#[derive(Debug, Clone, PartialEq)]
pub struct PendingItemRecord {
    pub invoice_item_id: String,
    pub customer_id: Option<String>,
    pub product_id: String,
    pub pending_invoice_date: NaiveDate,
    pub amount: Decimal,
    /// Always zero: nothing has been charged yet
    pub processing_fee: Decimal,
}

/// Drive a list endpoint to exhaustion, one page at a time.
///
/// `on_page` finishes with a page before the next one is requested, so the
/// cursor always comes from a fully processed page.
fn for_each_page<T, L, P>(label: &str, first: ListQuery, mut list: L, mut on_page: P) -> Result<()>
where
    T: Identified,
    L: FnMut(&ListQuery) -> Result<Page<T>>,
    P: FnMut(Vec<T>) -> Result<()>,
{
    let mut query = first;
    let mut batch = 1;

    loop {
        info!("Fetching {label} batch #{batch}...");
        let page = list(&query)?;
        info!("Fetched {} {label}s.", page.data.len());

        let has_more = page.has_more;
        let cursor = page.data.last().map(|record| record.id().to_string());
        on_page(page.data)?;

        match (has_more, cursor) {
            (true, Some(cursor)) => query.starting_after = Some(cursor),
            (true, None) => {
                warn!("Stripe reported more {label}s after an empty page; stopping");
                break;
            }
            (false, _) => break,
        }
        batch += 1;
    }

    Ok(())
}
