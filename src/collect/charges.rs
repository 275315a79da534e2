use std::thread;
use tracing::{debug, info, warn};

use super::{for_each_page, ChargeRecord, LookupCache};
use crate::error::Result;
use crate::money::from_minor_units;
use crate::stripe::{BalanceTransaction, Charge, Invoice, ListQuery, PaymentsApi, Subscription};
use crate::window::{date_from_timestamp, DateWindow};

/// Lookups made while enriching charges, scoped to one collection run
#[derive(Default)]
struct Caches {
    invoices: LookupCache<Invoice>,
    subscriptions: LookupCache<Subscription>,
    balance_transactions: LookupCache<BalanceTransaction>,
}

/// Collect every charge in `window` whose subscription includes `product_id`.
///
/// Charges within a page are enriched concurrently; the next page is only
/// requested once all of them have finished. The first failed lookup aborts
/// the run.
pub fn collect_charges(
    api: &dyn PaymentsApi,
    product_id: &str,
    window: &DateWindow,
) -> Result<Vec<ChargeRecord>> {
    let caches = Caches::default();
    let mut records = Vec::new();

    info!("Starting to fetch charges for product ID: {product_id}...");

    for_each_page(
        "charge",
        ListQuery::created_between(window.start_timestamp(), window.end_timestamp()),
        |query| api.list_charges(query),
        |charges| {
            records.extend(enrich_page(api, product_id, &caches, &charges)?);
            Ok(())
        },
    )?;

    info!(
        invoices = caches.invoices.fetches(),
        subscriptions = caches.subscriptions.fetches(),
        balance_transactions = caches.balance_transactions.fetches(),
        "Finished fetching and processing charges. Total records: {}",
        records.len()
    );

    Ok(records)
}

/// Scatter one page of charges across scoped threads and gather the results
/// in page order. Every thread is joined before any error is returned.
fn enrich_page(
    api: &dyn PaymentsApi,
    product_id: &str,
    caches: &Caches,
    charges: &[Charge],
) -> Result<Vec<ChargeRecord>> {
    let outcomes: Vec<Result<Option<ChargeRecord>>> = thread::scope(|scope| {
        let handles: Vec<_> = charges
            .iter()
            .map(|charge| scope.spawn(move || build_record(api, product_id, caches, charge)))
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });

    outcomes.into_iter().filter_map(Result::transpose).collect()
}

/// Follow charge -> invoice -> subscription -> balance transaction.
/// `Ok(None)` means the charge does not belong in the report.
fn build_record(
    api: &dyn PaymentsApi,
    product_id: &str,
    caches: &Caches,
    charge: &Charge,
) -> Result<Option<ChargeRecord>> {
    let Some(invoice_id) = charge.invoice.as_deref() else {
        debug!("Charge {} has no associated invoice.", charge.id);
        return Ok(None);
    };

    let invoice = caches
        .invoices
        .get_or_fetch(invoice_id, |id| api.retrieve_invoice(id))?;

    let Some(subscription_id) = invoice.subscription.as_deref() else {
        debug!("Invoice {invoice_id} has no associated subscription.");
        return Ok(None);
    };

    let subscription = caches
        .subscriptions
        .get_or_fetch(subscription_id, |id| api.retrieve_subscription(id))?;

    if !subscription.includes_product(product_id) {
        debug!(
            "Charge {} belongs to subscription {subscription_id}, which has no item for {product_id}.",
            charge.id
        );
        return Ok(None);
    }

    let Some(balance_transaction_id) = charge.balance_transaction.as_deref() else {
        debug!("Charge {} has no balance transaction.", charge.id);
        return Ok(None);
    };

    let Some(invoice_date) = date_from_timestamp(charge.created) else {
        warn!(
            "Charge {} has an invalid 'created' timestamp ({}). Skipping.",
            charge.id, charge.created
        );
        return Ok(None);
    };

    let balance_transaction = caches
        .balance_transactions
        .get_or_fetch(balance_transaction_id, |id| {
            api.retrieve_balance_transaction(id)
        })?;

    Ok(Some(ChargeRecord {
        charge_id: charge.id.clone(),
        customer_id: charge.customer.clone(),
        product_id: product_id.to_string(),
        invoice_date,
        amount: from_minor_units(charge.amount),
        processing_fee: from_minor_units(balance_transaction.fee),
    }))
}
