use serde::{Deserialize, Serialize};

use crate::money::FeeSchedule;

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub stripe: StripeSettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub fees: FeeSchedule,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StripeSettings {
    /// Secret key; prompted for when absent everywhere else
    pub api_key: Option<String>,
    /// Product to report on; prompted for when absent everywhere else
    pub product_id: Option<String>,
    pub base_url: String,
    /// Pinned so `charge.invoice` and `invoice.subscription` keep their shape
    pub api_version: String,
    pub timeout_secs: u64,
}

impl Default for StripeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            product_id: None,
            base_url: "https://api.stripe.com/v1".to_string(),
            api_version: "2024-06-20".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ReportSettings {
    pub currency_symbol: String,
    /// Add a Product column to both tables
    pub show_product: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            show_product: false,
        }
    }
}
