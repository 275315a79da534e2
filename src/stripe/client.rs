use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::trace;
use ureq::Agent;

use super::{
    BalanceTransaction, Charge, Invoice, InvoiceItem, ListQuery, Page, PaymentsApi, Subscription,
};
use crate::config::StripeSettings;
use crate::error::{ReportError, Result};

/// Blocking Stripe REST client authenticated with a secret key
pub struct StripeClient {
    agent: Agent,
    api_key: String,
    base_url: String,
    api_version: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl StripeClient {
    pub fn new(api_key: impl Into<String>, settings: &StripeSettings) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_key: api_key.into(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_version: settings.api_version.clone(),
        }
    }

    fn get<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        trace!(%url, ?params, "GET");

        let mut request = self
            .agent
            .get(&url)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Stripe-Version", &self.api_version);
        for (key, value) in params {
            request = request.query(*key, value);
        }

        let mut response = request.call()?;
        let status = response.status();
        let body = response.body_mut().read_to_string()?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|source| ReportError::Decode { resource, source })
    }
}

fn api_error(status: u16, body: &str) -> ReportError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) => match (error.kind, error.message) {
            (Some(kind), Some(message)) => format!("{message} ({kind})"),
            (None, Some(message)) => message,
            (Some(kind), None) => kind,
            (None, None) => body.to_string(),
        },
        Err(_) => body.to_string(),
    };
    ReportError::Api { status, message }
}

impl PaymentsApi for StripeClient {
    fn list_charges(&self, query: &ListQuery) -> Result<Page<Charge>> {
        self.get("charge list", "charges", &query.params())
    }

    fn list_pending_invoice_items(&self, query: &ListQuery) -> Result<Page<InvoiceItem>> {
        self.get("invoice item list", "invoiceitems", &query.pending_params())
    }

    fn retrieve_invoice(&self, id: &str) -> Result<Invoice> {
        self.get("invoice", &format!("invoices/{id}"), &[])
    }

    fn retrieve_subscription(&self, id: &str) -> Result<Subscription> {
        self.get("subscription", &format!("subscriptions/{id}"), &[])
    }

    fn retrieve_balance_transaction(&self, id: &str) -> Result<BalanceTransaction> {
        self.get(
            "balance transaction",
            &format!("balance_transactions/{id}"),
            &[],
        )
    }
}
