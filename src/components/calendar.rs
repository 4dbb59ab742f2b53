use chrono::{Datelike, Days, NaiveDate};
use gpui::SharedString;

use crate::i18n::I18nManager;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    #[default]
    YearMonthDayDash,
    /// `YYYY/MM/DD`
    YearMonthDaySlash,
    /// `DD-MM-YYYY`
    DayMonthYearDash,
    /// `DD/MM/YYYY`
    DayMonthYearSlash,
}

impl DateFormat {
    pub const ALL: [DateFormat; 4] = [
        DateFormat::YearMonthDayDash,
        DateFormat::YearMonthDaySlash,
        DateFormat::DayMonthYearDash,
        DateFormat::DayMonthYearSlash,
    ];

    pub fn from_pattern(pattern: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.pattern() == pattern)
    }

    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::YearMonthDayDash => "YYYY-MM-DD",
            DateFormat::YearMonthDaySlash => "YYYY/MM/DD",
            DateFormat::DayMonthYearDash => "DD-MM-YYYY",
            DateFormat::DayMonthYearSlash => "DD/MM/YYYY",
        }
    }

    fn separator(self) -> char {
        match self {
            DateFormat::YearMonthDayDash | DateFormat::DayMonthYearDash => '-',
            DateFormat::YearMonthDaySlash | DateFormat::DayMonthYearSlash => '/',
        }
    }

    fn year_first(self) -> bool {
        matches!(
            self,
            DateFormat::YearMonthDayDash | DateFormat::YearMonthDaySlash
        )
    }
}

pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    let year = format!("{:04}", date.year());
    let month = format!("{:02}", date.month());
    let day = format!("{:02}", date.day());
    let sep = format.separator();
    if format.year_first() {
        format!("{year}{sep}{month}{sep}{day}")
    } else {
        format!("{day}{sep}{month}{sep}{year}")
    }
}

/// Parses text in the component order of `format`. Either separator is
/// accepted; anything but three digit groups naming a real date yields
/// `None`.
pub fn parse_date(text: &str, format: DateFormat) -> Option<NaiveDate> {
    let parts = text.split(['-', '/']).collect::<Vec<_>>();
    let [first, second, third] = parts.as_slice() else {
        return None;
    };
    let all_digits = parts
        .iter()
        .all(|part| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit()));
    if !all_digits {
        return None;
    }

    let (year, month, day) = if format.year_first() {
        (first, second, third)
    } else {
        (third, second, first)
    };
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// The month a calendar grid shows.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CalendarAnchor {
    pub year: i32,
    /// 1 through 12.
    pub month: u32,
}

impl CalendarAnchor {
    /// Years outside the supported date range are clamped to its ends.
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year: year.clamp(NaiveDate::MIN.year(), NaiveDate::MAX.year()),
            month: month.clamp(1, 12),
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn prev_month(self) -> Self {
        if self.month > 1 {
            Self::new(self.year, self.month - 1)
        } else if self.year <= NaiveDate::MIN.year() {
            Self::new(self.year, 1)
        } else {
            Self::new(self.year - 1, 12)
        }
    }

    pub fn next_month(self) -> Self {
        if self.month < 12 {
            Self::new(self.year, self.month + 1)
        } else if self.year >= NaiveDate::MAX.year() {
            Self::new(self.year, 12)
        } else {
            Self::new(self.year + 1, 1)
        }
    }

    pub fn prev_year(self) -> Self {
        Self::new(self.year.saturating_sub(1), self.month)
    }

    pub fn next_year(self) -> Self {
        Self::new(self.year.saturating_add(1), self.month)
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        (28..=31)
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day))
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Every date from the Sunday on or before the first of the month through
/// the Saturday on or after its last day.
pub fn calendar_days(anchor: CalendarAnchor) -> Vec<NaiveDate> {
    let (Some(first), Some(last)) = (anchor.first_day(), anchor.last_day()) else {
        return Vec::new();
    };
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let trail = u64::from(6 - last.weekday().num_days_from_sunday());
    let (Some(start), Some(end)) = (
        first.checked_sub_days(Days::new(lead)),
        last.checked_add_days(Days::new(trail)),
    ) else {
        return Vec::new();
    };

    let mut days = Vec::with_capacity(42);
    let mut current = Some(start);
    while let Some(day) = current.filter(|day| *day <= end) {
        days.push(day);
        current = day.succ_opt();
    }
    days
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

pub fn calendar_cells(
    anchor: CalendarAnchor,
    selected: Option<NaiveDate>,
    today: NaiveDate,
) -> Vec<CalendarCell> {
    calendar_days(anchor)
        .into_iter()
        .map(|date| CalendarCell {
            date,
            in_month: anchor.contains(date),
            is_today: date == today,
            is_selected: selected == Some(date),
        })
        .collect()
}

/// Column headers, Sunday first.
pub fn weekday_labels(i18n: &I18nManager) -> [SharedString; 7] {
    std::array::from_fn(|index| i18n.t(&format!("date.weekday.{index}")))
}

pub fn month_name(month: u32, i18n: &I18nManager) -> SharedString {
    i18n.t(&format!("date.month.{month}"))
}

/// Header text for the grid, e.g. "March 2024".
pub fn month_label(anchor: CalendarAnchor, i18n: &I18nManager) -> SharedString {
    let month = month_name(anchor.month, i18n);
    let year = anchor.year.to_string();
    i18n.t_with("date.title", &[("month", month.as_ref()), ("year", &year)])
}
