use chrono::NaiveDate;
use rust_decimal::Decimal;
use tabled::builder::Builder;
use tabled::settings::{object::Columns, Alignment, Style};

use crate::collect::{ChargeRecord, PendingItemRecord};
use crate::money::{format_money, FeeSchedule};

/// The shape shared by every record the reporter can render
pub trait ReportEntry {
    fn customer_id(&self) -> Option<&str>;
    fn product_id(&self) -> &str;
    fn date(&self) -> NaiveDate;
    fn amount(&self) -> Decimal;
    fn fee(&self) -> Decimal;
}

impl ReportEntry for ChargeRecord {
    fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    fn product_id(&self) -> &str {
        &self.product_id
    }

    fn date(&self) -> NaiveDate {
        self.invoice_date
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn fee(&self) -> Decimal {
        self.processing_fee
    }
}

impl ReportEntry for PendingItemRecord {
    fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    fn product_id(&self) -> &str {
        &self.product_id
    }

    fn date(&self) -> NaiveDate {
        self.pending_invoice_date
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn fee(&self) -> Decimal {
        self.processing_fee
    }
}

/// Where the Fee column comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeColumn {
    /// The fee recorded on the entry
    Actual,
    /// A flat-rate estimate, for items that have not been charged yet
    Estimated(FeeSchedule),
}

impl FeeColumn {
    fn header(&self) -> &'static str {
        match self {
            FeeColumn::Actual => "Fees",
            FeeColumn::Estimated(_) => "Estimated Fees",
        }
    }

    fn fee_for(&self, entry: &impl ReportEntry) -> Decimal {
        match self {
            FeeColumn::Actual => entry.fee(),
            FeeColumn::Estimated(schedule) => schedule.estimate(entry.amount()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub fee_column: FeeColumn,
    pub show_product: bool,
    pub currency_symbol: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub customer: String,
    pub product: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub fee: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub amount: Decimal,
    pub fee: Decimal,
    pub net: Decimal,
}

/// A computed report: one line per entry plus column totals
#[derive(Debug)]
pub struct Report {
    lines: Vec<ReportLine>,
    totals: Totals,
    options: ReportOptions,
}

impl Report {
    pub fn build<E: ReportEntry>(entries: &[E], options: ReportOptions) -> Self {
        let mut totals = Totals::default();

        let lines: Vec<ReportLine> = entries
            .iter()
            .map(|entry| {
                let amount = entry.amount();
                let fee = options.fee_column.fee_for(entry);
                let net = amount - fee;

                totals.amount += amount;
                totals.fee += fee;
                totals.net += net;

                ReportLine {
                    customer: entry.customer_id().unwrap_or("-").to_string(),
                    product: entry.product_id().to_string(),
                    date: entry.date(),
                    amount,
                    fee,
                    net,
                }
            })
            .collect();

        Self {
            lines,
            totals,
            options,
        }
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Render as a table with a trailing "Total" row
    pub fn render(&self) -> String {
        let symbol = self.options.currency_symbol.as_str();
        let money = |value: Decimal| format_money(value, symbol);

        let mut header = vec!["Customer".to_string()];
        if self.options.show_product {
            header.push("Product".to_string());
        }
        header.extend([
            "Invoice Date".to_string(),
            "Amount".to_string(),
            self.options.fee_column.header().to_string(),
            "Net".to_string(),
        ]);
        let first_money_column = header.len() - 3;

        let mut builder = Builder::default();
        builder.push_record(header);

        for line in &self.lines {
            let mut row = vec![line.customer.clone()];
            if self.options.show_product {
                row.push(line.product.clone());
            }
            row.extend([
                format_long_date(line.date),
                money(line.amount),
                money(line.fee),
                money(line.net),
            ]);
            builder.push_record(row);
        }

        let mut totals_row = vec!["Total".to_string()];
        if self.options.show_product {
            totals_row.push(String::new());
        }
        totals_row.extend([
            String::new(),
            money(self.totals.amount),
            money(self.totals.fee),
            money(self.totals.net),
        ]);
        builder.push_record(totals_row);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .modify(Columns::new(first_money_column..), Alignment::right());
        table.to_string()
    }
}

/// "March 3, 2024"
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
