//! Date range filtering for transaction lists and treasury reports

use clochette_config::TimeRange;
use chrono::{Datelike, NaiveDate};

use crate::models::Transaction;

/// Selected reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeContext {
    pub range: TimeRange,
    /// Start bound (when range is Custom)
    pub custom_start: Option<NaiveDate>,
    /// End bound, inclusive (when range is Custom)
    pub custom_end: Option<NaiveDate>,
}

impl Default for TimeContext {
    fn default() -> Self {
        Self::new(TimeRange::Month)
    }
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn last_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next = if month == 12 {
        first_of_month(year.checked_add(1)?, 1)
    } else {
        first_of_month(year, month + 1)
    };
    next.and_then(|d| d.pred_opt())
}

impl TimeContext {
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            custom_start: None,
            custom_end: None,
        }
    }

    /// Create with custom date range
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            range: TimeRange::Custom,
            custom_start: Some(start),
            custom_end: Some(end),
        }
    }

    /// Parse a `range` query value.
    ///
    /// Accepts `month`, `quarter`, `year`, `all`, `year:YYYY`,
    /// `year:YYYY-MM` and `custom:YYYY-MM-DD,YYYY-MM-DD`. Anything else
    /// yields `fallback`.
    pub fn parse(value: &str, fallback: TimeRange) -> Self {
        let value = value.trim();

        if let Some(year_month) = value.strip_prefix("year:") {
            let mut parts = year_month.splitn(2, '-');
            let year = parts.next().and_then(|y| y.parse::<i32>().ok());
            let month = parts.next().map(|m| m.parse::<u32>().ok());
            let bounds = match (year, month) {
                (Some(y), None) => NaiveDate::from_ymd_opt(y, 1, 1).zip(NaiveDate::from_ymd_opt(y, 12, 31)),
                (Some(y), Some(Some(m))) => first_of_month(y, m).and_then(|start| last_of_month(y, m).map(|end| (start, end))),
                _ => None,
            };
            return match bounds {
                Some((start, end)) => Self::custom(start, end),
                None => Self::new(fallback),
            };
        }

        if let Some(custom) = value.strip_prefix("custom:") {
            let parsed = custom.split_once(',').and_then(|(start, end)| {
                let start = NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d").ok()?;
                let end = NaiveDate::parse_from_str(end.trim(), "%Y-%m-%d").ok()?;
                Some((start, end))
            });
            return match parsed {
                Some((start, end)) if start <= end => Self::custom(start, end),
                _ => Self::new(fallback),
            };
        }

        match value.parse::<TimeRange>() {
            Ok(TimeRange::Custom) | Err(_) => Self::new(fallback),
            Ok(range) => Self::new(range),
        }
    }

    /// Value that `parse` turns back into this context
    pub fn to_query(&self) -> String {
        match (self.range, self.custom_start, self.custom_end) {
            (TimeRange::Custom, Some(start), Some(end)) => format!("custom:{},{}", start, end),
            (range, _, _) => range.to_string(),
        }
    }

    /// Inclusive bounds relative to `today`
    pub fn bounds_at(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match self.range {
            TimeRange::Month => (
                first_of_month(today.year(), today.month()),
                last_of_month(today.year(), today.month()),
            ),
            TimeRange::Quarter => {
                let first_month = (today.month0() / 3) * 3 + 1;
                (
                    first_of_month(today.year(), first_month),
                    last_of_month(today.year(), first_month + 2),
                )
            }
            TimeRange::Year => (
                NaiveDate::from_ymd_opt(today.year(), 1, 1),
                NaiveDate::from_ymd_opt(today.year(), 12, 31),
            ),
            TimeRange::All => (None, None),
            TimeRange::Custom => (self.custom_start, self.custom_end),
        }
    }

    /// Check if a date is within the range, relative to `today`
    pub fn contains_at(&self, date: &NaiveDate, today: NaiveDate) -> bool {
        match self.bounds_at(today) {
            (None, None) => true,
            (Some(s), None) => *date >= s,
            (None, Some(e)) => *date <= e,
            (Some(s), Some(e)) => *date >= s && *date <= e,
        }
    }

    /// Human-readable description of the range
    pub fn description(&self) -> String {
        match self.range {
            TimeRange::Month => "Mois en cours".to_string(),
            TimeRange::Quarter => "Trimestre en cours".to_string(),
            TimeRange::Year => "Année en cours".to_string(),
            TimeRange::All => "Depuis le début".to_string(),
            TimeRange::Custom => match (self.custom_start, self.custom_end) {
                (Some(start), Some(end)) => format!(
                    "Du {} au {}",
                    start.format("%d/%m/%Y"),
                    end.format("%d/%m/%Y")
                ),
                _ => "Période personnalisée".to_string(),
            },
        }
    }
}

/// Time filtering trait
pub trait TimeFilter {
    fn filter_by_time(&self, context: &TimeContext, today: NaiveDate) -> bool;
}

impl TimeFilter for Transaction {
    fn filter_by_time(&self, context: &TimeContext, today: NaiveDate) -> bool {
        context.contains_at(&self.datetime.date(), today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds_in_december() {
        let ctx = TimeContext::new(TimeRange::Month);
        assert_eq!(
            ctx.bounds_at(date(2026, 12, 15)),
            (Some(date(2026, 12, 1)), Some(date(2026, 12, 31)))
        );
    }

    #[test]
    fn test_quarter_bounds() {
        let ctx = TimeContext::new(TimeRange::Quarter);
        assert_eq!(
            ctx.bounds_at(date(2026, 5, 3)),
            (Some(date(2026, 4, 1)), Some(date(2026, 6, 30)))
        );
        assert_eq!(ctx.bounds_at(date(2026, 11, 30)).1, Some(date(2026, 12, 31)));
    }

    #[test]
    fn test_all_contains_everything() {
        let ctx = TimeContext::new(TimeRange::All);
        assert!(ctx.contains_at(&date(1999, 1, 1), date(2026, 1, 1)));
        assert_eq!(ctx.bounds_at(date(2026, 1, 1)), (None, None));
    }

    #[test]
    fn test_parse_year_and_month() {
        let ctx = TimeContext::parse("year:2025", TimeRange::Month);
        assert_eq!(ctx.custom_start, Some(date(2025, 1, 1)));
        assert_eq!(ctx.custom_end, Some(date(2025, 12, 31)));

        let ctx = TimeContext::parse("year:2024-02", TimeRange::Month);
        assert_eq!(ctx.custom_end, Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_parse_custom_round_trip() {
        let ctx = TimeContext::parse("custom:2026-01-01,2026-01-31", TimeRange::Month);
        assert_eq!(ctx.range, TimeRange::Custom);
        assert_eq!(TimeContext::parse(&ctx.to_query(), TimeRange::All), ctx);
    }

    #[test]
    fn test_parse_invalid_falls_back() {
        assert_eq!(TimeContext::parse("custom:2026-02-01,2026-01-01", TimeRange::Year).range, TimeRange::Year);
        assert_eq!(TimeContext::parse("year:abc", TimeRange::All).range, TimeRange::All);
        assert_eq!(TimeContext::parse("year:2026-13", TimeRange::All).range, TimeRange::All);
        assert_eq!(TimeContext::parse("custom", TimeRange::Quarter).range, TimeRange::Quarter);
        assert_eq!(TimeContext::parse("", TimeRange::Month).range, TimeRange::Month);
    }

    #[test]
    fn test_parse_extreme_year_falls_back() {
        assert_eq!(TimeContext::parse("year:2147483647-12", TimeRange::Month), TimeContext::new(TimeRange::Month));
        assert_eq!(TimeContext::parse("year:2147483647", TimeRange::Quarter).range, TimeRange::Quarter);
        assert_eq!(TimeContext::parse("year:-2147483648-01", TimeRange::All).range, TimeRange::All);
    }

    #[test]
    fn test_custom_contains_inclusive() {
        let ctx = TimeContext::custom(date(2024, 1, 1), date(2024, 12, 31));
        let today = date(2026, 6, 1);
        assert!(ctx.contains_at(&date(2024, 12, 31), today));
        assert!(!ctx.contains_at(&date(2025, 1, 1), today));
    }
}
