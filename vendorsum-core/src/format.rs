//! Formatting helpers shared by the CLIs and log messages.

use crate::types::Value;
use std::time::Duration;

/// Format a duration in minutes with two decimals (e.g., "1.25 minutes").
pub fn format_minutes(elapsed: Duration) -> String {
    format!("{:.2} minutes", elapsed.as_secs_f64() / 60.0)
}

/// Format a dollar amount with thousands separators (e.g., "$1,234.50").
pub fn format_dollars(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Format a ratio as a percentage, or an em dash if undefined.
pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}%", value)
    } else {
        "—".to_string()
    }
}

/// Format an identifier cell as it was stored (e.g., "100", "A").
pub fn format_identifier(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}
