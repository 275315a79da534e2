use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::{ReportError, Result};

/// The calendar month a report covers, in local time.
///
/// `start` is midnight on the first day of the month and `end` is 23:59:59 on
/// its last day. Both bounds are inclusive and are used as `created[gte]` /
/// `created[lte]` filters against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Local>,
    end: DateTime<Local>,
}

impl DateWindow {
    /// Parse a month selector like "03-2024" (or "3-2024").
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ReportError::MissingInput("month"));
        }

        let invalid = || ReportError::InvalidMonth(input.to_string());

        let (month_str, year_str) = input.split_once('-').ok_or_else(invalid)?;
        if month_str.is_empty() || month_str.len() > 2 || year_str.len() != 4 {
            return Err(invalid());
        }

        let month: u32 = month_str.parse().map_err(|_| invalid())?;
        let year: i32 = year_str.parse().map_err(|_| invalid())?;
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;

        Self::for_month(first).ok_or_else(invalid)
    }

    /// Build the window for the month containing `first` (expected to be day 1).
    fn for_month(first: NaiveDate) -> Option<Self> {
        // Roll to the first of the following month, then step back a day
        let next_month = first.checked_add_months(chrono::Months::new(1))?;
        let last = next_month.pred_opt()?;

        let start = resolve_local(first.and_time(NaiveTime::MIN), Edge::Start)?;
        let end = resolve_local(
            last.and_time(NaiveTime::from_hms_opt(23, 59, 59)?),
            Edge::End,
        )?;

        Some(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Local> {
        self.start
    }

    pub fn end(&self) -> DateTime<Local> {
        self.end
    }

    pub fn start_timestamp(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_timestamp(&self) -> i64 {
        self.end.timestamp()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    pub fn start_date_formatted(&self) -> String {
        self.start_date().format("%Y-%m-%d").to_string()
    }

    pub fn end_date_formatted(&self) -> String {
        self.end_date().format("%Y-%m-%d").to_string()
    }

    /// Human-readable month, e.g. "March 2024"
    pub fn month_label(&self) -> String {
        self.start.format("%B %Y").to_string()
    }

    /// True when the period `[start, end]` (epoch seconds) lies entirely
    /// inside the window.
    pub fn contains_period(&self, start: i64, end: i64) -> bool {
        start >= self.start_timestamp() && end <= self.end_timestamp()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

/// Map a local wall-clock time to an instant without leaving its date.
fn resolve_local(naive: NaiveDateTime, edge: Edge) -> Option<DateTime<Local>> {
    resolve_with(naive, edge, |t| Local.from_local_datetime(&t))
}

/// Ambiguous readings resolve toward the inside of the window. A reading in
/// a DST gap moves forward an hour for the start bound and back an hour for
/// the end bound, so 23:59:59 never spills into the next day.
fn resolve_with<T, F>(naive: NaiveDateTime, edge: Edge, lookup: F) -> Option<T>
where
    F: Fn(NaiveDateTime) -> LocalResult<T>,
{
    match (lookup(naive), edge) {
        (LocalResult::Single(t), _) => Some(t),
        (LocalResult::Ambiguous(earliest, _), Edge::Start) => Some(earliest),
        (LocalResult::Ambiguous(_, latest), Edge::End) => Some(latest),
        (LocalResult::None, Edge::Start) => lookup(naive + Duration::hours(1)).earliest(),
        (LocalResult::None, Edge::End) => lookup(naive - Duration::hours(1)).latest(),
    }
}

/// Convert epoch seconds to the calendar date in the local time zone (not UTC).
pub fn date_from_timestamp(secs: i64) -> Option<NaiveDate> {
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|t| t.date_naive())
}
