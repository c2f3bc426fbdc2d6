//! Display helpers for dates and failure messages.

use board_sync::Outcome;
use chrono::NaiveDate;

/// Today's date in the browser's local time zone
pub fn today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    from_js_parts(now.get_full_year(), now.get_month(), now.get_date())
}

/// JS dates count months from zero
fn from_js_parts(year: u32, month0: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month0 + 1, day)
}

/// Header line, e.g. "Friday, 16 October 2026"
pub fn header_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%A, %-d %B %Y").to_string()).unwrap_or_default()
}

/// Card due date, e.g. "Due 3 Nov"
pub fn due_label(due: Option<NaiveDate>) -> String {
    match due {
        Some(d) => format!("Due {}", d.format("%-d %b")),
        None => "No due date".to_string(),
    }
}

/// Value for an `<input type="date">`
pub fn date_input_value(due: Option<NaiveDate>) -> String {
    due.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Banner text for a mutation that did not go through
pub fn outcome_message(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Resynchronized { cause } => Some(format!("Change not saved ({cause}). The board was reloaded.")),
        Outcome::Unreconciled { cause, refresh } => Some(format!(
            "Change not saved ({cause}) and the board could not be reloaded ({refresh})."
        )),
        _ => None,
    }
}
