//! In-memory `PaymentsApi` that records every call it receives.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{ReportError, Result};
use crate::stripe::{
    BalanceTransaction, Charge, Identified, Invoice, InvoiceItem, ListQuery, Page, PaymentsApi,
    Period, Price, Subscription, SubscriptionItem,
};

#[derive(Default)]
pub struct FakeApi {
    pub charges: Vec<Charge>,
    pub invoice_items: Vec<InvoiceItem>,
    pub invoices: HashMap<String, Invoice>,
    pub subscriptions: HashMap<String, Subscription>,
    pub balance_transactions: HashMap<String, BalanceTransaction>,
    /// Serve smaller pages than requested when set
    pub page_size: Option<u32>,
    pub list_calls: Mutex<Vec<ListQuery>>,
    pub retrievals: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_charge(mut self, charge: Charge) -> Self {
        self.charges.push(charge);
        self
    }

    pub fn with_invoice(mut self, id: &str, subscription: Option<&str>) -> Self {
        self.invoices.insert(
            id.to_string(),
            Invoice {
                id: id.to_string(),
                subscription: subscription.map(str::to_string),
            },
        );
        self
    }

    pub fn with_subscription(mut self, id: &str, products: &[&str]) -> Self {
        let data = products
            .iter()
            .enumerate()
            .map(|(n, product)| SubscriptionItem {
                id: format!("si_{id}_{n}"),
                price: Price {
                    id: format!("price_{product}"),
                    product: product.to_string(),
                },
            })
            .collect();
        self.subscriptions.insert(
            id.to_string(),
            Subscription {
                id: id.to_string(),
                items: Page {
                    data,
                    has_more: false,
                },
            },
        );
        self
    }

    pub fn with_balance_transaction(mut self, id: &str, fee: i64) -> Self {
        self.balance_transactions.insert(
            id.to_string(),
            BalanceTransaction {
                id: id.to_string(),
                fee,
            },
        );
        self
    }

    pub fn with_invoice_item(mut self, item: InvoiceItem) -> Self {
        self.invoice_items.push(item);
        self
    }

    pub fn list_calls(&self) -> Vec<ListQuery> {
        self.list_calls.lock().unwrap().clone()
    }

    /// How many times `key` ("invoice:in_1", "subscription:sub_1", ...) was fetched
    pub fn retrieval_count(&self, key: &str) -> usize {
        self.retrievals
            .lock()
            .unwrap()
            .iter()
            .filter(|k| *k == key)
            .count()
    }

    fn page<T: Identified + Clone>(&self, records: &[T], query: &ListQuery) -> Page<T> {
        self.list_calls.lock().unwrap().push(query.clone());

        let start = match &query.starting_after {
            Some(cursor) => records
                .iter()
                .position(|r| r.id() == cursor)
                .map_or(records.len(), |i| i + 1),
            None => 0,
        };
        let limit = self.page_size.unwrap_or(query.limit).min(query.limit) as usize;
        let end = (start + limit).min(records.len());

        Page {
            data: records[start..end].to_vec(),
            has_more: end < records.len(),
        }
    }

    fn lookup<T: Clone>(&self, kind: &str, map: &HashMap<String, T>, id: &str) -> Result<T> {
        self.retrievals.lock().unwrap().push(format!("{kind}:{id}"));
        map.get(id).cloned().ok_or_else(|| ReportError::Api {
            status: 404,
            message: format!("No such {kind}: '{id}'"),
        })
    }
}

impl PaymentsApi for FakeApi {
    fn list_charges(&self, query: &ListQuery) -> Result<Page<Charge>> {
        Ok(self.page(&self.charges, query))
    }

    fn list_pending_invoice_items(&self, query: &ListQuery) -> Result<Page<InvoiceItem>> {
        Ok(self.page(&self.invoice_items, query))
    }

    fn retrieve_invoice(&self, id: &str) -> Result<Invoice> {
        self.lookup("invoice", &self.invoices, id)
    }

    fn retrieve_subscription(&self, id: &str) -> Result<Subscription> {
        self.lookup("subscription", &self.subscriptions, id)
    }

    fn retrieve_balance_transaction(&self, id: &str) -> Result<BalanceTransaction> {
        self.lookup("balance_transaction", &self.balance_transactions, id)
    }
}

pub fn charge(
    id: &str,
    amount: i64,
    created: i64,
    invoice: Option<&str>,
    balance_transaction: Option<&str>,
) -> Charge {
    Charge {
        id: id.to_string(),
        amount,
        created,
        customer: Some(format!("cus_{id}")),
        invoice: invoice.map(str::to_string),
        balance_transaction: balance_transaction.map(str::to_string),
    }
}

pub fn invoice_item(
    id: &str,
    product: Option<&str>,
    amount: i64,
    date: Option<i64>,
    period: (i64, i64),
) -> InvoiceItem {
    InvoiceItem {
        id: id.to_string(),
        amount,
        customer: Some(format!("cus_{id}")),
        date,
        price: product.map(|product| Price {
            id: format!("price_{product}"),
            product: product.to_string(),
        }),
        period: Period {
            start: period.0,
            end: period.1,
        },
    }
}
