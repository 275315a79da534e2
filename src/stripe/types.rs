use serde::Deserialize;

/// One page of a Stripe list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

/// Resources that can be used as a pagination cursor
pub trait Identified {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Deserialize)]
pub struct Charge {
    pub id: String,
    /// Minor units
    pub amount: i64,
    pub created: i64,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub invoice: Option<String>,
    #[serde(default)]
    pub balance_transaction: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub subscription: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub items: Page<SubscriptionItem>,
}

impl Subscription {
    /// True when any line item is priced against `product_id`
    pub fn includes_product(&self, product_id: &str) -> bool {
        self.items
            .data
            .iter()
            .any(|item| item.price.product == product_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionItem {
    pub id: String,
    pub price: Price,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    pub id: String,
    pub product: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceTransaction {
    pub id: String,
    /// Minor units
    pub fee: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceItem {
    pub id: String,
    /// Minor units
    pub amount: i64,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub price: Option<Price>,
    pub period: Period,
}

impl InvoiceItem {
    pub fn product(&self) -> Option<&str> {
        self.price.as_ref().map(|p| p.product.as_str())
    }
}

/// Billing period in epoch seconds
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Period {
    pub start: i64,
    pub end: i64,
}

impl Identified for Charge {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for InvoiceItem {
    fn id(&self) -> &str {
        &self.id
    }
}
