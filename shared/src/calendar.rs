//! Month arithmetic and the fixed 6x7 day grid rendered by the date picker.
//!
//! Everything in here is pure: the same displayed month always yields the
//! same grid, which keeps the UI layer free of calendar computations.

use chrono::{Datelike, Days, Month, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

pub const GRID_COLUMNS: usize = 7;
pub const GRID_ROWS: usize = 6;
pub const GRID_CELLS: usize = GRID_COLUMNS * GRID_ROWS;

/// Number of days in a month, accounting for leap years.
pub fn days_in_month(year: i32, month: Month) -> u32 {
    match month {
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Month for a 1-based month number.
pub fn month_from_number(number: u32) -> Option<Month> {
    u8::try_from(number).ok().and_then(|n| Month::try_from(n).ok())
}

/// The (year, month) pair shown by the picker. The day component is always
/// the first of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayedMonth {
    first: NaiveDate,
}

impl DisplayedMonth {
    pub fn new(year: i32, month: Month) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month.number_from_month(), 1).map(|first| Self { first })
    }

    /// The month a given date falls into.
    pub fn containing(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        Self { first }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> Month {
        month_from_number(self.first.month()).unwrap_or(Month::January)
    }

    pub fn month_number(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first.with_day(self.num_days()).unwrap_or(self.first)
    }

    pub fn num_days(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month_number()
    }

    /// Following month; stays put at the end of the representable range.
    pub fn next(&self) -> Self {
        *self + 1
    }

    /// Preceding month; stays put at the start of the representable range.
    pub fn prev(&self) -> Self {
        *self - 1
    }

    /// Same year, other month.
    pub fn with_month(&self, month: Month) -> Self {
        Self::new(self.year(), month).unwrap_or(*self)
    }

    /// Same month, other year.
    pub fn with_year(&self, year: i32) -> Self {
        Self::new(year, self.month()).unwrap_or(*self)
    }
}

impl fmt::Display for DisplayedMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month().name(), self.year())
    }
}

impl Add<u32> for DisplayedMonth {
    type Output = DisplayedMonth;

    fn add(self, rhs: u32) -> Self::Output {
        self.first
            .checked_add_months(Months::new(rhs))
            .map(|first| DisplayedMonth { first })
            .unwrap_or(self)
    }
}

impl Sub<u32> for DisplayedMonth {
    type Output = DisplayedMonth;

    fn sub(self, rhs: u32) -> Self::Output {
        self.first
            .checked_sub_months(Months::new(rhs))
            .map(|first| DisplayedMonth { first })
            .unwrap_or(self)
    }
}

impl PartialOrd for DisplayedMonth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DisplayedMonth {
    fn cmp(&self, other: &Self) -> Ordering {
        self.first.cmp(&other.first)
    }
}

/// First column of the rendered week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Saturday,
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Saturday => Weekday::Sat,
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Zero-based column of `day` in a week starting on `self`.
    pub fn column_of(self, day: Weekday) -> usize {
        let start = self.weekday().num_days_from_monday();
        ((day.num_days_from_monday() + 7 - start) % 7) as usize
    }

    /// Column headers, first column first.
    pub fn headers(self) -> [&'static str; GRID_COLUMNS] {
        let mut headers = [""; GRID_COLUMNS];
        let mut day = self.weekday();
        for header in headers.iter_mut() {
            *header = weekday_label(day);
            day = day.succ();
        }
        headers
    }
}

fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// One day slot of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub date: NaiveDate,
    /// False for padding days borrowed from the adjacent months
    pub is_current_month: bool,
}

/// The 42 cells shown for a displayed month: trailing days of the previous
/// month, every day of the month, then leading days of the next month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    displayed: DisplayedMonth,
    week_start: WeekStart,
    cells: Vec<GridCell>,
}

impl CalendarGrid {
    /// Grid for a Saturday-first week.
    pub fn generate(displayed: DisplayedMonth) -> Self {
        Self::generate_with(displayed, WeekStart::Saturday)
    }

    pub fn generate_with(displayed: DisplayedMonth, week_start: WeekStart) -> Self {
        let first = displayed.first_day();
        let lead = week_start.column_of(first.weekday());
        let origin = first.checked_sub_days(Days::new(lead as u64)).unwrap_or(first);

        let cells: Vec<GridCell> = origin
            .iter_days()
            .take(GRID_CELLS)
            .map(|date| GridCell {
                date,
                is_current_month: displayed.contains(date),
            })
            .collect();

        log::debug!(
            "Generated grid for {}: {} leading padding days, {} cells",
            displayed,
            lead,
            cells.len()
        );

        CalendarGrid {
            displayed,
            week_start,
            cells,
        }
    }

    pub fn displayed(&self) -> DisplayedMonth {
        self.displayed
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(GRID_COLUMNS)
    }

    /// Padding days in front of the first of the month.
    pub fn leading_padding(&self) -> usize {
        self.cells
            .iter()
            .take_while(|cell| !cell.is_current_month)
            .count()
    }

    pub fn current_month_days(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_current_month).count()
    }

    pub fn headers(&self) -> [&'static str; GRID_COLUMNS] {
        self.week_start.headers()
    }
}

impl IntoIterator for CalendarGrid {
    type Item = GridCell;
    type IntoIter = std::vec::IntoIter<GridCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}
