//! Date display and period filters.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Renders an ISO `YYYY-MM-DD` date (optionally followed by a time part)
/// as `DD/MM/YYYY`. Returns None when the input is not a date.
pub fn format_date(iso: &str) -> Option<String> {
    let date_part = iso.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%d/%m/%Y").to_string())
}

/// Today's date in the gateway's local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

// == Date Range ==
/// Inclusive range sent to the backend as `start:end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

// == Period ==
/// Symbolic reporting periods offered by the dashboard filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    All,
    Today,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
    #[serde(rename = "last_90_days")]
    Last90Days,
    CurrentMonth,
    PreviousMonth,
    CurrentYear,
    #[serde(rename = "last_3_months")]
    Last3Months,
    #[serde(rename = "last_6_months")]
    Last6Months,
}

impl Period {
    /// Resolves the period against `today`. `All` means "no filter".
    pub fn date_range(self, today: NaiveDate) -> Option<DateRange> {
        let days_back = |n: u64| today.checked_sub_days(Days::new(n)).unwrap_or(today);
        let months_back = |n: u32| today.checked_sub_months(Months::new(n)).unwrap_or(today);
        let first_of_month = today.with_day(1).unwrap_or(today);

        let start = match self {
            Period::All => return None,
            Period::Today => today,
            Period::Last7Days => days_back(6),
            Period::Last30Days => days_back(29),
            Period::Last90Days => days_back(89),
            Period::CurrentMonth => first_of_month,
            Period::PreviousMonth => {
                let end = first_of_month.pred_opt().unwrap_or(first_of_month);
                let start = end.with_day(1).unwrap_or(end);
                return Some(DateRange { start, end });
            }
            Period::CurrentYear => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
            Period::Last3Months => months_back(3),
            Period::Last6Months => months_back(6),
        };

        Some(DateRange { start, end: today })
    }
}

impl FromStr for Period {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_string()))
            .map_err(|_| DashboardError::Validation(format!("Unknown period '{}'", s)))
    }
}

/// Converts a period name into the backend's `start:end` parameter.
///
/// `"all"` yields None: the parameter is omitted, not sent as a range.
pub fn period_to_date_range(period: &str, today: NaiveDate) -> Result<Option<String>> {
    let period: Period = period.parse()?;
    Ok(period.date_range(today).map(|range| range.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-07"), Some("07/03/2024".to_string()));
        assert_eq!(
            format_date("2024-03-07T10:15:00Z"),
            Some("07/03/2024".to_string())
        );
        assert_eq!(format_date("07/03/2024"), None);
        assert_eq!(format_date(""), None);
    }

    #[test]
    fn test_all_is_absent() {
        assert_eq!(period_to_date_range("all", day(2024, 5, 15)).unwrap(), None);
    }

    #[test]
    fn test_today() {
        assert_eq!(
            period_to_date_range("today", day(2024, 5, 15)).unwrap(),
            Some("2024-05-15:2024-05-15".to_string())
        );
    }

    #[test]
    fn test_rolling_windows_are_inclusive() {
        let today = day(2024, 5, 15);
        assert_eq!(
            Period::Last7Days.date_range(today).unwrap().to_string(),
            "2024-05-09:2024-05-15"
        );
        assert_eq!(
            Period::Last30Days.date_range(today).unwrap().start,
            day(2024, 4, 16)
        );
        assert_eq!(
            Period::Last90Days.date_range(today).unwrap().start,
            day(2024, 2, 16)
        );
    }

    #[test]
    fn test_calendar_periods() {
        let today = day(2024, 3, 10);
        assert_eq!(
            Period::CurrentMonth.date_range(today).unwrap().to_string(),
            "2024-03-01:2024-03-10"
        );
        // leap year February
        assert_eq!(
            Period::PreviousMonth.date_range(today).unwrap().to_string(),
            "2024-02-01:2024-02-29"
        );
        assert_eq!(
            Period::CurrentYear.date_range(today).unwrap().to_string(),
            "2024-01-01:2024-03-10"
        );
        assert_eq!(
            Period::Last3Months.date_range(today).unwrap().start,
            day(2023, 12, 10)
        );
        assert_eq!(
            Period::Last6Months.date_range(today).unwrap().start,
            day(2023, 9, 10)
        );
    }

    #[test]
    fn test_previous_month_across_year() {
        assert_eq!(
            Period::PreviousMonth
                .date_range(day(2024, 1, 20))
                .unwrap()
                .to_string(),
            "2023-12-01:2023-12-31"
        );
    }

    #[test]
    fn test_period_names_parse() {
        assert_eq!("last_7_days".parse::<Period>().unwrap(), Period::Last7Days);
        assert_eq!("last_6_months".parse::<Period>().unwrap(), Period::Last6Months);
        assert_eq!("previous_month".parse::<Period>().unwrap(), Period::PreviousMonth);
    }

    #[test]
    fn test_unknown_period_is_validation_error() {
        let result = period_to_date_range("fortnight", day(2024, 1, 1));
        assert!(matches!(result, Err(DashboardError::Validation(_))));
    }
}
