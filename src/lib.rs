pub mod collect;
pub mod config;
pub mod error;
pub mod money;
pub mod report;
pub mod stripe;
pub mod window;

pub use collect::{collect_charges, collect_pending_items, ChargeRecord, PendingItemRecord};
pub use config::{Config, ReportSettings, StripeSettings};
pub use error::{ReportError, Result};
pub use money::FeeSchedule;
pub use report::{FeeColumn, Report, ReportEntry, ReportOptions};
pub use stripe::{PaymentsApi, StripeClient};
pub use window::DateWindow;
