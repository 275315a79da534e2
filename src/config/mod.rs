mod settings;

pub use settings::{Config, ReportSettings, StripeSettings};

use crate::error::{ReportError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG-style, falling back to ~/.payout/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "payout") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
        ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".payout"))
}

/// Load config.toml, falling back to defaults when it does not exist
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ReportError::ConfigParse { path, source: e })
}

/// Create the config directory and write the template config.toml
pub fn init_config(config_dir: &Path) -> Result<PathBuf> {
    if config_dir.exists() {
        return Err(ReportError::AlreadyInitialized(config_dir.to_path_buf()));
    }

    fs::create_dir_all(config_dir)?;
    let path = config_dir.join("config.toml");
    fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[stripe]
# api_key = "sk_live_..."      # optional, else STRIPE_API_KEY or a prompt
# product_id = "prod_..."      # optional, else PAYOUT_PRODUCT_ID or a prompt
base_url = "https://api.stripe.com/v1"
api_version = "2024-06-20"
timeout_secs = 30

[report]
currency_symbol = "$"
show_product = false           # add a Product column to both tables

[fees]
# Used to estimate fees on pending invoice items
percentage = 0.029             # 2.9%
fixed = 0.30                   # per transaction
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::FeeSchedule;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    #[test]
    fn template_parses_to_defaults() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.stripe.api_key, None);
        assert_eq!(config.stripe.base_url, "https://api.stripe.com/v1");
        assert_eq!(config.stripe.timeout_secs, 30);
        assert_eq!(config.report.currency_symbol, "$");
        assert!(!config.report.show_product);
        assert_eq!(config.fees, FeeSchedule::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(temp_dir.path()).unwrap();
        assert_eq!(config.stripe.api_version, "2024-06-20");
        assert_eq!(config.report.currency_symbol, "$");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("config.toml"),
            "[stripe]\nproduct_id = \"prod_123\"\n\n[fees]\npercentage = 0.035\nfixed = 0.25\n",
        )
        .unwrap();

        let config = load_config(temp_dir.path()).unwrap();
        assert_eq!(config.stripe.product_id.as_deref(), Some("prod_123"));
        assert_eq!(config.stripe.timeout_secs, 30);
        assert_eq!(config.fees.percentage, Decimal::new(35, 3));
        assert_eq!(config.fees.fixed, Decimal::new(25, 2));
    }

    #[test]
    fn invalid_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.toml"), "[stripe\n").unwrap();

        let err = load_config(temp_dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::ConfigParse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn init_refuses_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let cfg_dir = temp_dir.path().join("payout");

        let path = init_config(&cfg_dir).unwrap();
        assert!(path.exists());

        let err = init_config(&cfg_dir).unwrap_err();
        assert!(matches!(err, ReportError::AlreadyInitialized(_)));
    }
}
