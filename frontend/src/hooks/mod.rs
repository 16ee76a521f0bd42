pub mod use_date_picker;

pub use use_date_picker::{use_date_picker, UseDatePickerActions};
