use tracing::{debug, info, warn};

use super::{for_each_page, PendingItemRecord};
use crate::error::Result;
use crate::money::from_minor_units;
use crate::stripe::{InvoiceItem, ListQuery, PaymentsApi};
use crate::window::{date_from_timestamp, DateWindow};

/// Collect pending invoice items for `product_id` whose billing period lies
/// entirely inside `window`.
pub fn collect_pending_items(
    api: &dyn PaymentsApi,
    product_id: &str,
    window: &DateWindow,
) -> Result<Vec<PendingItemRecord>> {
    let mut records = Vec::new();

    info!("Starting to fetch pending invoice items for product ID: {product_id}...");

    for_each_page(
        "pending invoice item",
        ListQuery::created_between(window.start_timestamp(), window.end_timestamp()),
        |query| api.list_pending_invoice_items(query),
        |items| {
            records.extend(
                items
                    .iter()
                    .filter_map(|item| build_record(item, product_id, window)),
            );
            Ok(())
        },
    )?;

    info!(
        "Finished fetching and processing invoice items. Total records: {}",
        records.len()
    );

    Ok(records)
}

fn build_record(
    item: &InvoiceItem,
    product_id: &str,
    window: &DateWindow,
) -> Option<PendingItemRecord> {
    if item.product() != Some(product_id) {
        debug!(
            "Pending invoice item {} does not match product {product_id}.",
            item.id
        );
        return None;
    }

    if !window.contains_period(item.period.start, item.period.end) {
        debug!(
            "Invoice item {} is outside the specified date range.",
            item.id
        );
        return None;
    }

    let Some(pending_invoice_date) = item.date.and_then(date_from_timestamp) else {
        warn!(
            "Invoice item {} has an invalid 'date' timestamp. Skipping.",
            item.id
        );
        return None;
    };

    Some(PendingItemRecord {
        invoice_item_id: item.id.clone(),
        customer_id: item.customer.clone(),
        product_id: product_id.to_string(),
        pending_invoice_date,
        amount: from_minor_units(item.amount),
        processing_fee: rust_decimal::Decimal::ZERO,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::fake::{invoice_item, FakeApi};
    use rust_decimal::Decimal;

    const PRODUCT: &str = "prod_target";

    #[test]
    fn includes_only_matching_items_inside_window() {
        let window = DateWindow::parse("03-2024").unwrap();
        let (start, end) = (window.start_timestamp(), window.end_timestamp());
        let date = Some(start + 7200);

        let api = FakeApi::default()
            .with_invoice_item(invoice_item("ii_ok", Some(PRODUCT), 10_000, date, (start, end)))
            .with_invoice_item(invoice_item("ii_other", Some("prod_other"), 10_000, date, (start, end)))
            .with_invoice_item(invoice_item("ii_no_price", None, 10_000, date, (start, end)))
            .with_invoice_item(invoice_item("ii_early", Some(PRODUCT), 10_000, date, (start - 1, end)))
            .with_invoice_item(invoice_item("ii_late", Some(PRODUCT), 10_000, date, (start, end + 1)))
            .with_invoice_item(invoice_item("ii_mid", Some(PRODUCT), 450, date, (start + 10, end - 10)));

        let records = collect_pending_items(&api, PRODUCT, &window).unwrap();

        let ids: Vec<_> = records.iter().map(|r| r.invoice_item_id.as_str()).collect();
        assert_eq!(ids, vec!["ii_ok", "ii_mid"]);

        let first = &records[0];
        assert_eq!(first.customer_id.as_deref(), Some("cus_ii_ok"));
        assert_eq!(first.product_id, PRODUCT);
        assert_eq!(first.pending_invoice_date, window.start_date());
        assert_eq!(first.amount, Decimal::new(100, 0));
        assert_eq!(first.processing_fee, Decimal::ZERO);
        assert_eq!(records[1].amount, Decimal::new(450, 2));
    }

    #[test]
    fn skips_items_without_usable_date() {
        let window = DateWindow::parse("03-2024").unwrap();
        let period = (window.start_timestamp(), window.end_timestamp());

        let api = FakeApi::default()
            .with_invoice_item(invoice_item("ii_no_date", Some(PRODUCT), 100, None, period))
            .with_invoice_item(invoice_item("ii_bad_date", Some(PRODUCT), 100, Some(i64::MAX), period))
            .with_invoice_item(invoice_item("ii_ok", Some(PRODUCT), 100, Some(period.0), period));

        let records = collect_pending_items(&api, PRODUCT, &window).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].invoice_item_id, "ii_ok");
    }

    #[test]
    fn pages_through_all_items() {
        let window = DateWindow::parse("03-2024").unwrap();
        let period = (window.start_timestamp(), window.end_timestamp());

        let mut api = FakeApi::default();
        for n in 1..=205 {
            api = api.with_invoice_item(invoice_item(
                &format!("ii_{n}"),
                Some(PRODUCT),
                100,
                Some(period.0),
                period,
            ));
        }

        let records = collect_pending_items(&api, PRODUCT, &window).unwrap();

        let calls = api.list_calls();
        assert_eq!(records.len(), 205);
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].starting_after.as_deref(), Some("ii_100"));
        assert_eq!(calls[2].starting_after.as_deref(), Some("ii_200"));
    }
}
