//! Presentation helpers for the list screen.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

use crate::types::{TodoId, TodoItem};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Wall-clock layouts a date-time input field or a naive ISO timestamp use.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Format a due date for display in the local time zone.
pub fn format_due_date(raw: &str) -> String {
    format_due_date_in(raw, &Local)
}

/// Format a due date for display in `tz`.
///
/// Timestamps with an offset are converted into `tz`. Naive timestamps are
/// already wall-clock and are shown unchanged. Anything unparseable is
/// returned verbatim.
pub fn format_due_date_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(tz).format(DISPLAY_FORMAT).to_string();
    }
    for layout in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return dt.format(DISPLAY_FORMAT).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// One rendered line of the list. Edit and delete actions address `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRow {
    /// 1-based position in the current snapshot.
    pub position: usize,
    pub id: TodoId,
    pub task: String,
    pub due: String,
    pub completed: bool,
}

impl fmt::Display for TodoRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.completed { "[x]" } else { "[ ]" };
        write!(f, "{:>3}. {mark} {} (Due: {})", self.position, self.task, self.due)
    }
}

pub fn render_rows(items: &[TodoItem]) -> Vec<TodoRow> {
    render_rows_in(items, &Local)
}

pub fn render_rows_in<Tz>(items: &[TodoItem], tz: &Tz) -> Vec<TodoRow>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    items
        .iter()
        .enumerate()
        .map(|(i, item)| TodoRow {
            position: i + 1,
            id: item.id.clone(),
            task: item.task.clone(),
            due: format_due_date_in(&item.due_date, tz),
            completed: item.completed,
        })
        .collect()
}
