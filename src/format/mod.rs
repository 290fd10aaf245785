//! Display Formatting Module
//!
//! Turns raw backend values into the strings the dashboard renders:
//! BRL currency, percentages, dates and period filters.

mod currency;
mod date;
mod percentage;

pub use currency::format_currency;
pub use date::{format_date, period_to_date_range, today, DateRange, Period};
pub use percentage::format_percentage;

/// Placeholder rendered for missing, negative or unreadable amounts.
pub const CONSULT: &str = "Consulte";

// == Numeric Input ==
/// Values the backend may send where a number is expected.
///
/// Amounts arrive as JSON numbers, numeric strings or not at all; every
/// shape funnels through here so the formatters share one notion of
/// "usable number".
pub trait AsAmount {
    /// Returns the finite value, or None if there is nothing usable.
    fn as_amount(&self) -> Option<f64>;
}

impl AsAmount for f64 {
    fn as_amount(&self) -> Option<f64> {
        // Adding +0.0 folds -0.0 into 0.0
        self.is_finite().then_some(*self + 0.0)
    }
}

impl AsAmount for i64 {
    fn as_amount(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl AsAmount for u64 {
    fn as_amount(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl AsAmount for str {
    fn as_amount(&self) -> Option<f64> {
        self.trim().parse::<f64>().ok().and_then(|v| v.as_amount())
    }
}

impl AsAmount for String {
    fn as_amount(&self) -> Option<f64> {
        self.as_str().as_amount()
    }
}

impl AsAmount for serde_json::Value {
    fn as_amount(&self) -> Option<f64> {
        match self {
            serde_json::Value::Number(n) => n.as_f64().and_then(|v| v.as_amount()),
            serde_json::Value::String(s) => s.as_amount(),
            _ => None,
        }
    }
}

impl<T: AsAmount> AsAmount for Option<T> {
    fn as_amount(&self) -> Option<f64> {
        self.as_ref().and_then(AsAmount::as_amount)
    }
}

impl<T: AsAmount + ?Sized> AsAmount for &T {
    fn as_amount(&self) -> Option<f64> {
        (**self).as_amount()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_amounts() {
        assert_eq!(json!(12.5).as_amount(), Some(12.5));
        assert_eq!(json!("12.5").as_amount(), Some(12.5));
        assert_eq!(json!(null).as_amount(), None);
        assert_eq!(json!(true).as_amount(), None);
        assert_eq!(json!("abc").as_amount(), None);
    }

    #[test]
    fn test_negative_zero_is_plain_zero() {
        let zero = (-0.0_f64).as_amount().unwrap();
        assert!(zero.is_sign_positive());
        assert!("-0".as_amount().unwrap().is_sign_positive());
    }

    #[test]
    fn test_non_finite_is_unusable() {
        assert_eq!(f64::NAN.as_amount(), None);
        assert_eq!("inf".as_amount(), None);
    }
}
