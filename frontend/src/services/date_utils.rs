use chrono::NaiveDate;

/// Today's date in the browser's local timezone.
pub fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    local_date(now.get_full_year(), now.get_month(), now.get_date())
}

/// Build a date from the components a JavaScript `Date` reports (0-based month).
fn local_date(full_year: u32, zero_based_month: u32, day: u32) -> NaiveDate {
    let year = i32::try_from(full_year).unwrap_or(1970);
    NaiveDate::from_ymd_opt(year, zero_based_month + 1, day).unwrap_or_default()
}
