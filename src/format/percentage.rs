//! Percentage formatting.

use super::{AsAmount, CONSULT};

/// Formats a rate with up to two decimals, dropping trailing zeros.
///
/// `10.0` renders `"10%"`, `10.5` renders `"10.5%"`, `12.345` renders
/// `"12.35%"`. Negative or unusable input renders `"Consulte"`.
pub fn format_percentage<T: AsAmount + ?Sized>(value: &T) -> String {
    match value.as_amount() {
        Some(rate) if rate >= 0.0 => {
            let fixed = format!("{:.2}", rate);
            let trimmed = if let Some(whole) = fixed.strip_suffix(".00") {
                whole
            } else if let Some(one_decimal) = fixed.strip_suffix('0') {
                one_decimal
            } else {
                fixed.as_str()
            };
            format!("{}%", trimmed)
        }
        _ => CONSULT.to_string(),
    }
}
