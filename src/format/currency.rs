//! BRL currency formatting (pt-BR locale).

use super::{AsAmount, CONSULT};

/// Formats an amount as Brazilian reais with exactly two fraction digits.
///
/// Negative, non-numeric and absent inputs render as `"Consulte"`.
///
/// ```
/// use dashboard_query::format::format_currency;
/// assert_eq!(format_currency(&1234.5), "R$ 1.234,50");
/// assert_eq!(format_currency("abc"), "Consulte");
/// ```
pub fn format_currency<T: AsAmount + ?Sized>(value: &T) -> String {
    match value.as_amount() {
        Some(amount) if amount >= 0.0 => {
            let fixed = format!("{:.2}", amount);
            let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
            format!("R$ {},{}", group_thousands(integer), fraction)
        }
        _ => CONSULT.to_string(),
    }
}

/// Inserts `.` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_thousands_and_fraction() {
        assert_eq!(format_currency(&1234.5), "R$ 1.234,50");
        assert_eq!(format_currency(&1234567.891), "R$ 1.234.567,89");
        assert_eq!(format_currency(&999.0), "R$ 999,00");
        assert_eq!(format_currency(&0.0), "R$ 0,00");
    }

    #[test]
    fn test_invalid_inputs_render_consult() {
        assert_eq!(format_currency(&-5.0), "Consulte");
        assert_eq!(format_currency(&-5_i64), "Consulte");
        assert_eq!(format_currency("abc"), "Consulte");
        assert_eq!(format_currency(&None::<f64>), "Consulte");
        assert_eq!(format_currency(&json!(null)), "Consulte");
    }

    #[test]
    fn test_negative_zero_renders_zero() {
        assert_eq!(format_currency(&-0.0), "R$ 0,00");
        assert_eq!(format_currency("-0"), "R$ 0,00");
        assert_eq!(format_currency(&json!(-0.0)), "R$ 0,00");
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(format_currency("1500"), "R$ 1.500,00");
        assert_eq!(format_currency(&json!("89.9")), "R$ 89,90");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1.234");
        assert_eq!(group_thousands("123456"), "123.456");
    }
}
