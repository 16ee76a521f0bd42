pub mod calendar;
pub mod config;
pub mod date;
pub mod picker;

pub use calendar::{
    days_in_month, is_leap_year, month_from_number, CalendarGrid, DisplayedMonth, GridCell,
    WeekStart, GRID_CELLS, GRID_COLUMNS, GRID_ROWS,
};
pub use config::{ConfigError, InitialMonth, PickerConfig, DEFAULT_PLACEHOLDER, DEFAULT_YEAR_SPAN};
pub use date::{format_iso, format_long, parse_date, parse_initial_date, DateParseError};
pub use picker::{
    ChangeHandler, DatePicker, DayCellView, ObserverId, OutsideClickSource, PickerAction,
    PickerEvent, PickerState, PickerView, SelectOption, Subscription,
};
