use chrono::{DateTime, Datelike, Local, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// True when `at` falls in the same local calendar month and year as `reference`.
pub fn same_local_month(at: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
    let at = at.with_timezone(&Local);
    let reference = reference.with_timezone(&Local);
    at.month() == reference.month() && at.year() == reference.year()
}

/// Local calendar date as `YYYY-MM-DD`.
pub fn local_date_label(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d").to_string()
}
