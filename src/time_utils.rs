// SPDX-License-Identifier: MIT

//! Shared helpers for date parsing and formatting.

use chrono::NaiveDate;

/// Format a calendar date as day text, e.g. "Mon Jan 01 2024".
pub fn format_day_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
