use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

use crate::calendar::WeekStart;

pub const DEFAULT_PLACEHOLDER: &str = "Select a date";

/// Years offered by the year selector, counted back from the current year.
pub const DEFAULT_YEAR_SPAN: u32 = 70;

/// Which month the dropdown shows when the picker is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialMonth {
    /// Month of the initial selection, today's month when there is none
    #[default]
    Selection,
    /// Always today's month
    Today,
}

/// Presentation settings of a date picker. Class names and placeholder are
/// cosmetic; the remaining fields shape the dropdown contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub placeholder: String,
    /// Extra classes of the dropdown container
    pub class: String,
    /// Extra classes of the read-only text field
    pub input_class: String,
    pub year_span: u32,
    pub week_start: WeekStart,
    pub initial_month: InitialMonth,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            class: String::new(),
            input_class: String::new(),
            year_span: DEFAULT_YEAR_SPAN,
            week_start: WeekStart::default(),
            initial_month: InitialMonth::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid picker configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl PickerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn input_class(mut self, class: impl Into<String>) -> Self {
        self.input_class = class.into();
        self
    }

    pub fn initial_month(mut self, initial_month: InitialMonth) -> Self {
        self.initial_month = initial_month;
        self
    }

    /// `year_span` years before the current year through the current year.
    pub fn year_window(&self, today: NaiveDate) -> RangeInclusive<i32> {
        let end = today.year();
        let span = i32::try_from(self.year_span).unwrap_or(i32::MAX);
        end.saturating_sub(span)..=end
    }
}
