use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Utc};

/// Offset hh.ru publishes timestamps in (Moscow time).
pub const SOURCE_OFFSET_SECS: i32 = 3 * 3600;

/// Source of "today" for anything that depends on the calendar.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock date in the server's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// The day before `today`, as `YYYY-MM-DD`.
pub fn cutoff_date(today: NaiveDate) -> String {
    (today - Duration::days(1)).format("%Y-%m-%d").to_string()
}

/// Parses `2023-05-10T14:30:00+0300` and renders it as `10/05/2023, 14:30`
/// in the source offset. Returns `None` when the timestamp is unparseable.
pub fn format_published_at(raw: &str) -> Option<String> {
    let parsed = DateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S%z").ok()?;
    let offset = FixedOffset::east_opt(SOURCE_OFFSET_SECS)?;
    Some(
        parsed
            .with_timezone(&offset)
            .format("%d/%m/%Y, %H:%M")
            .to_string(),
    )
}
