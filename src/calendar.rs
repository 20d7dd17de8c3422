//! Calendar bucketing for the grid's time axis

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

use crate::model::ViewMode;

/// Maximum number of week columns shown in the quarterly view
pub const WEEKS_PER_QUARTER: usize = 13;

/// One column of the time axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub label: String,
    pub sub_label: Option<String>,
    /// Representative date: the day itself, the week's Sunday, or the 1st of the month
    pub date: NaiveDate,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

impl Period {
    /// Weekends and holidays carry no allocations
    pub fn is_non_working(&self) -> bool {
        self.is_weekend || self.is_holiday
    }
}

/// Direction for period navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Build the columns for `view` around `anchor`
pub fn periods(view: ViewMode, anchor: NaiveDate, holidays: &[NaiveDate]) -> Vec<Period> {
    match view {
        ViewMode::Monthly => {
            let (start, end) = month_bounds(anchor);
            day_range(start, end)
                .map(|day| Period {
                    label: day.day().to_string(),
                    sub_label: Some(day.format("%a").to_string()),
                    date: day,
                    is_weekend: is_weekend(day),
                    is_holiday: holidays.contains(&day),
                })
                .collect()
        }
        ViewMode::Quarterly => {
            let quarter = quarter_of(anchor);
            let (start, end) = quarter_bounds(anchor);
            let offset = (quarter as usize - 1) * WEEKS_PER_QUARTER;

            let mut weeks = Vec::new();
            let mut next = Some(week_start(start));
            while let Some(sunday) = next.filter(|s| *s <= end) {
                if weeks.len() == WEEKS_PER_QUARTER {
                    break;
                }
                weeks.push(sunday);
                next = sunday.checked_add_signed(Duration::days(7));
            }

            weeks
                .into_iter()
                .enumerate()
                .map(|(i, sunday)| Period {
                    label: format!("W{}", offset + i + 1),
                    sub_label: None,
                    date: sunday,
                    is_weekend: false,
                    is_holiday: false,
                })
                .collect()
        }
        ViewMode::Annual => (1..=12)
            .filter_map(|month| NaiveDate::from_ymd_opt(anchor.year(), month, 1))
            .map(|first| Period {
                label: first.format("%b").to_string(),
                sub_label: None,
                date: first,
                is_weekend: false,
                is_holiday: false,
            })
            .collect(),
    }
}

/// Move the anchor one view-sized step, clamping the day of month
pub fn shift(view: ViewMode, anchor: NaiveDate, direction: Direction) -> NaiveDate {
    let months = match view {
        ViewMode::Monthly => 1,
        ViewMode::Quarterly => 3,
        ViewMode::Annual => 12,
    };
    let step = Months::new(months);
    let shifted = match direction {
        Direction::Previous => anchor.checked_sub_months(step),
        Direction::Next => anchor.checked_add_months(step),
    };
    shifted.unwrap_or(anchor)
}

/// Header title for the current view, e.g. "Feb 2024", "Q1 2024", "2024"
pub fn period_title(view: ViewMode, anchor: NaiveDate) -> String {
    match view {
        ViewMode::Monthly => anchor.format("%b %Y").to_string(),
        ViewMode::Quarterly => format!("Q{} {}", quarter_of(anchor), anchor.year()),
        ViewMode::Annual => anchor.format("%Y").to_string(),
    }
}

/// Calendar quarter, 1..=4
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(date.weekday().num_days_from_sunday() as i64))
        .unwrap_or(NaiveDate::MIN)
}

/// First and last day of the month containing `date`
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}

/// First and last day of the quarter containing `date`
pub fn quarter_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_month = (quarter_of(date) - 1) * 3 + 1;
    let first = NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date);
    let last_month_day = first
        .checked_add_months(Months::new(2))
        .unwrap_or(first);
    (first, month_bounds(last_month_day).1)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn day_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_periods() {
        let holidays = [date(2024, 2, 14), date(2024, 2, 19)];
        let periods = periods(ViewMode::Monthly, date(2024, 2, 1), &holidays);

        // 2024 is a leap year
        assert_eq!(periods.len(), 29);
        assert_eq!(periods[0].label, "1");
        assert_eq!(periods[0].sub_label.as_deref(), Some("Thu"));

        let feb3 = &periods[2];
        assert!(feb3.is_weekend);
        let feb14 = &periods[13];
        assert!(feb14.is_holiday);
        assert!(!feb14.is_weekend);
        assert!(feb14.is_non_working());
        assert!(!periods[14].is_non_working());
    }

    #[test]
    fn test_quarterly_periods() {
        let periods = periods(ViewMode::Quarterly, date(2024, 2, 14), &[]);
        assert_eq!(periods.len(), WEEKS_PER_QUARTER);
        // Jan 1 2024 is a Monday, so the first week starts Sunday Dec 31
        assert_eq!(periods[0].date, date(2023, 12, 31));
        assert_eq!(periods[0].label, "W1");
        assert_eq!(periods[12].label, "W13");

        let q3 = super::periods(ViewMode::Quarterly, date(2024, 8, 1), &[]);
        assert_eq!(q3[0].label, "W27");
        assert!(q3.len() <= WEEKS_PER_QUARTER);
        assert!(q3.iter().all(|p| p.date.weekday() == Weekday::Sun));
    }

    #[test]
    fn test_annual_periods() {
        let periods = periods(ViewMode::Annual, date(2024, 6, 15), &[]);
        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0].label, "Jan");
        assert_eq!(periods[11].date, date(2024, 12, 1));
    }

    #[test]
    fn test_shift() {
        let jan31 = date(2024, 1, 31);
        assert_eq!(shift(ViewMode::Monthly, jan31, Direction::Next), date(2024, 2, 29));
        assert_eq!(shift(ViewMode::Monthly, jan31, Direction::Previous), date(2023, 12, 31));
        assert_eq!(shift(ViewMode::Quarterly, jan31, Direction::Next), date(2024, 4, 30));
        assert_eq!(shift(ViewMode::Annual, date(2024, 2, 29), Direction::Next), date(2025, 2, 28));
    }

    #[test]
    fn test_period_title() {
        let anchor = date(2024, 2, 1);
        assert_eq!(period_title(ViewMode::Monthly, anchor), "Feb 2024");
        assert_eq!(period_title(ViewMode::Quarterly, anchor), "Q1 2024");
        assert_eq!(period_title(ViewMode::Annual, anchor), "2024");
    }

    #[test]
    fn test_bounds() {
        assert_eq!(week_start(date(2024, 2, 14)), date(2024, 2, 11));
        assert_eq!(week_start(date(2024, 2, 11)), date(2024, 2, 11));
        assert_eq!(month_bounds(date(2024, 2, 14)), (date(2024, 2, 1), date(2024, 2, 29)));
        assert_eq!(quarter_bounds(date(2024, 11, 5)), (date(2024, 10, 1), date(2024, 12, 31)));
        assert_eq!(quarter_of(date(2024, 4, 1)), 2);
    }

    #[test]
    fn test_extreme_dates_clamp() {
        assert_eq!(week_start(NaiveDate::MIN), NaiveDate::MIN);
        assert_eq!(month_bounds(NaiveDate::MAX).1, NaiveDate::MAX);

        for anchor in [NaiveDate::MIN, NaiveDate::MAX] {
            let weeks = periods(ViewMode::Quarterly, anchor, &[]);
            assert!(!weeks.is_empty());
            assert!(weeks.len() <= WEEKS_PER_QUARTER);
            assert!(!periods(ViewMode::Monthly, anchor, &[]).is_empty());
        }
    }
}
