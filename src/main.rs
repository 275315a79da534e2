use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payout::config::{config_dir, init_config, load_config};
use payout::{
    collect_charges, collect_pending_items, Config, DateWindow, FeeColumn, Report, ReportError,
    ReportOptions, Result, StripeClient,
};

#[derive(Parser)]
#[command(name = "payout")]
#[command(
    version,
    about = "Monthly revenue and fee report for a single Stripe product",
    long_about = None
)]
struct Cli {
    /// Path to config directory (default: ~/.payout or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Fetch a month of charges and pending invoice items and print the report
    Report {
        /// Month to report on (prompted for when omitted)
        #[arg(short, long, value_name = "MM-YYYY")]
        month: Option<String>,

        /// Stripe product ID to report on
        #[arg(short, long, env = "PAYOUT_PRODUCT_ID")]
        product: Option<String>,

        /// Stripe secret key
        #[arg(long, env = "STRIPE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Add a Product column to both tables
        #[arg(long)]
        show_product: bool,

        /// Which tables to produce
        #[arg(long, value_enum, default_value_t = Section::All)]
        section: Section,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Section {
    All,
    Pending,
    Charges,
}

impl Section {
    fn pending(self) -> bool {
        self != Section::Charges
    }

    fn charges(self) -> bool {
        self != Section::Pending
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Report {
            month,
            product,
            api_key,
            show_product,
            section,
        } => cmd_report(&cfg_dir, month, product, api_key, show_product, section),
    }
}

/// Progress goes to stderr so stdout carries only the tables
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("payout={level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    let path = init_config(cfg_dir)?;

    println!("Initialized payout config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Set your product and key:  $EDITOR {}", path.display());
    println!("  2. Run a report:              payout report --month MM-YYYY");

    Ok(())
}

fn cmd_report(
    cfg_dir: &Path,
    month: Option<String>,
    product: Option<String>,
    api_key: Option<String>,
    show_product: bool,
    section: Section,
) -> Result<()> {
    // A month given on the command line is checked before anything is prompted for
    let window = month.as_deref().map(DateWindow::parse).transpose()?;

    let config = load_config(cfg_dir)?;

    let api_key = match api_key.or_else(|| config.stripe.api_key.clone()) {
        Some(key) => key,
        None => rpassword::prompt_password("Enter your Stripe API key: ")?,
    };
    let api_key = require(api_key, "Stripe API key")?;

    let product_id = match product.or_else(|| config.stripe.product_id.clone()) {
        Some(product) => product,
        None => prompt("Enter the product ID: ")?,
    };
    let product_id = require(product_id, "product ID")?;

    let window = match window {
        Some(window) => window,
        None => DateWindow::parse(&prompt("Enter the month and year to process (MM-YYYY): ")?)?,
    };

    let month_label = window.month_label();
    info!("Retrieving payment data for product ID: {product_id} for {month_label}.");
    info!(
        "Date range: {} to {}",
        window.start_date_formatted(),
        window.end_date_formatted()
    );

    let client = StripeClient::new(api_key, &config.stripe);

    // Collect everything before printing so a failed lookup leaves no partial report
    let charges = if section.charges() {
        Some(collect_charges(&client, &product_id, &window)?)
    } else {
        None
    };
    let pending = if section.pending() {
        Some(collect_pending_items(&client, &product_id, &window)?)
    } else {
        None
    };

    let show_product = show_product || config.report.show_product;

    if let Some(records) = pending {
        let options = report_options(
            &config,
            FeeColumn::Estimated(config.fees),
            show_product,
        );
        println!("\nPending Invoice Items for {month_label}:");
        println!("{}", Report::build(&records, options).render());
    }

    if let Some(records) = charges {
        let options = report_options(&config, FeeColumn::Actual, show_product);
        println!("\nCharges for {month_label}:");
        println!("{}", Report::build(&records, options).render());
    }

    Ok(())
}

fn report_options(config: &Config, fee_column: FeeColumn, show_product: bool) -> ReportOptions {
    ReportOptions {
        fee_column,
        show_product,
        currency_symbol: config.report.currency_symbol.clone(),
    }
}

/// Print a prompt and read one line from stdin
fn prompt(question: &str) -> Result<String> {
    print!("{question}");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

fn require(value: String, what: &'static str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ReportError::MissingInput(what));
    }
    Ok(value.to_string())
}
