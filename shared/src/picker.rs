//! Date picker state machine.
//!
//! [`PickerState::apply`] is the pure transition function. [`DatePicker`]
//! wraps it with the side effects a rendered picker needs: the selection
//! callback, observers that receive a freshly derived [`PickerView`] after
//! every mutation, and the outside-click subscription that only exists while
//! the dropdown is open.

use chrono::{Datelike, Month, NaiveDate};

use crate::calendar::{month_from_number, CalendarGrid, DisplayedMonth, GRID_COLUMNS};
use crate::config::{InitialMonth, PickerConfig};
use crate::date::{format_long, parse_initial_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    /// Click on the text field
    Toggle,
    /// Pointer press outside the widget
    Dismiss,
    /// Click on a day cell
    Pick(NaiveDate),
    PrevMonth,
    NextMonth,
    SelectMonth(Month),
    SelectYear(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEvent {
    Opened,
    Closed,
    Selected(NaiveDate),
    Navigated(DisplayedMonth),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    pub selected: Option<NaiveDate>,
    pub displayed: DisplayedMonth,
    pub is_open: bool,
}

impl PickerState {
    pub fn new(selected: Option<NaiveDate>, displayed: DisplayedMonth) -> Self {
        Self {
            selected,
            displayed,
            is_open: false,
        }
    }

    /// Apply one user action. Returns `None` when the action left the state
    /// untouched.
    pub fn apply(&mut self, action: PickerAction) -> Option<PickerEvent> {
        match action {
            PickerAction::Toggle => {
                self.is_open = !self.is_open;
                Some(if self.is_open {
                    PickerEvent::Opened
                } else {
                    PickerEvent::Closed
                })
            }
            PickerAction::Dismiss => {
                if !self.is_open {
                    return None;
                }
                self.is_open = false;
                Some(PickerEvent::Closed)
            }
            PickerAction::Pick(date) => {
                // Day cells only exist while the dropdown is open
                if !self.is_open {
                    return None;
                }
                self.selected = Some(date);
                self.is_open = false;
                Some(PickerEvent::Selected(date))
            }
            PickerAction::PrevMonth => self.navigate(self.displayed.prev()),
            PickerAction::NextMonth => self.navigate(self.displayed.next()),
            PickerAction::SelectMonth(month) => self.navigate(self.displayed.with_month(month)),
            PickerAction::SelectYear(year) => self.navigate(self.displayed.with_year(year)),
        }
    }

    fn navigate(&mut self, to: DisplayedMonth) -> Option<PickerEvent> {
        if to == self.displayed {
            return None;
        }
        self.displayed = to;
        Some(PickerEvent::Navigated(to))
    }
}

/// An attached listener. Dropping it detaches the listener, exactly once.
#[must_use = "dropping a Subscription detaches it immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption<T> {
    pub value: T,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCellView {
    pub date: NaiveDate,
    pub day: u32,
    pub is_current_month: bool,
    pub is_selected: bool,
}

/// Everything needed to render the picker, derived from its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerView {
    /// Long form of the selection, `None` shows the placeholder
    pub field_text: Option<String>,
    pub placeholder: String,
    /// Extra classes of the dropdown container
    pub class: String,
    /// Extra classes of the text field
    pub input_class: String,
    pub is_open: bool,
    pub displayed: DisplayedMonth,
    pub heading: String,
    pub month_options: Vec<SelectOption<u32>>,
    pub year_options: Vec<SelectOption<i32>>,
    pub weekdays: [&'static str; GRID_COLUMNS],
    pub cells: Vec<DayCellView>,
}

impl PickerView {
    pub fn field_value(&self) -> &str {
        self.field_text.as_deref().unwrap_or("")
    }

    pub fn selected_cell(&self) -> Option<&DayCellView> {
        self.cells.iter().find(|cell| cell.is_selected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

pub type Observer = Box<dyn FnMut(&PickerView)>;
pub type ChangeHandler = Box<dyn FnMut(NaiveDate)>;
pub type OutsideClickSource = Box<dyn FnMut() -> Subscription>;

/// A date picker instance.
pub struct DatePicker {
    state: PickerState,
    today: NaiveDate,
    config: PickerConfig,
    on_change: Option<ChangeHandler>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
    outside_clicks: Option<OutsideClickSource>,
    listener: Option<Subscription>,
}

impl DatePicker {
    /// Create a closed picker. `initial` is parsed leniently: anything that
    /// is not a date results in an empty selection.
    pub fn new(initial: Option<&str>, today: NaiveDate, config: PickerConfig) -> Self {
        let selected = parse_initial_date(initial);
        let displayed = match (config.initial_month, selected) {
            (InitialMonth::Selection, Some(date)) => DisplayedMonth::containing(date),
            _ => DisplayedMonth::containing(today),
        };

        log::debug!(
            "Created date picker: selected={:?}, displayed={}",
            selected,
            displayed
        );

        Self {
            state: PickerState::new(selected, displayed),
            today,
            config,
            on_change: None,
            observers: Vec::new(),
            next_observer: 0,
            outside_clicks: None,
            listener: None,
        }
    }

    pub fn with_on_change(mut self, on_change: impl FnMut(NaiveDate) + 'static) -> Self {
        self.set_on_change(Some(Box::new(on_change)));
        self
    }

    pub fn set_on_change(&mut self, on_change: Option<ChangeHandler>) {
        self.on_change = on_change;
    }

    /// Install the source of outside-click listeners. The source is invoked
    /// each time the dropdown opens; the returned subscription is dropped when
    /// it closes or when the picker itself is dropped.
    pub fn with_outside_clicks(mut self, source: impl FnMut() -> Subscription + 'static) -> Self {
        self.set_outside_clicks(Box::new(source));
        self
    }

    pub fn set_outside_clicks(&mut self, mut source: OutsideClickSource) {
        // A listener from the previous source must not outlive it
        self.listener = None;
        if self.state.is_open {
            self.listener = Some(source());
        }
        self.outside_clicks = Some(source);
    }

    /// Drop the outside-click source together with any live listener.
    pub fn detach_outside_clicks(&mut self) {
        self.listener = None;
        self.outside_clicks = None;
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&PickerView) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.state.selected
    }

    pub fn displayed(&self) -> DisplayedMonth {
        self.state.displayed
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn has_outside_click_listener(&self) -> bool {
        self.listener.is_some()
    }

    pub fn toggle(&mut self) -> Option<PickerEvent> {
        self.dispatch(PickerAction::Toggle)
    }

    pub fn dismiss(&mut self) -> Option<PickerEvent> {
        self.dispatch(PickerAction::Dismiss)
    }

    pub fn pick(&mut self, date: NaiveDate) -> Option<PickerEvent> {
        self.dispatch(PickerAction::Pick(date))
    }

    pub fn prev_month(&mut self) -> Option<PickerEvent> {
        self.dispatch(PickerAction::PrevMonth)
    }

    pub fn next_month(&mut self) -> Option<PickerEvent> {
        self.dispatch(PickerAction::NextMonth)
    }

    pub fn select_month(&mut self, month: Month) -> Option<PickerEvent> {
        self.dispatch(PickerAction::SelectMonth(month))
    }

    /// Select by 1-based month number, as delivered by a `<select>` value.
    pub fn select_month_number(&mut self, number: u32) -> Option<PickerEvent> {
        let month = month_from_number(number)?;
        self.select_month(month)
    }

    pub fn select_year(&mut self, year: i32) -> Option<PickerEvent> {
        self.dispatch(PickerAction::SelectYear(year))
    }

    pub fn dispatch(&mut self, action: PickerAction) -> Option<PickerEvent> {
        let event = self.state.apply(action)?;
        log::debug!("Date picker {:?} -> {:?}", action, event);

        match event {
            PickerEvent::Opened => {
                self.listener = self.outside_clicks.as_mut().map(|source| source());
            }
            PickerEvent::Closed | PickerEvent::Selected(_) => {
                self.listener = None;
            }
            PickerEvent::Navigated(_) => {}
        }

        self.notify();

        if let PickerEvent::Selected(date) = event {
            log::info!("Date picked: {}", date);
            if let Some(on_change) = self.on_change.as_mut() {
                on_change(date);
            }
        }

        Some(event)
    }

    pub fn view(&self) -> PickerView {
        let state = &self.state;
        let grid = CalendarGrid::generate_with(state.displayed, self.config.week_start);

        let month_options = (1..=12)
            .filter_map(month_from_number)
            .map(|month| SelectOption {
                value: month.number_from_month(),
                label: month.name().to_string(),
                selected: month.number_from_month() == state.displayed.month_number(),
            })
            .collect();

        let mut years: Vec<i32> = self.config.year_window(self.today).collect();
        if !years.contains(&state.displayed.year()) {
            years.push(state.displayed.year());
            years.sort_unstable();
        }
        let year_options = years
            .into_iter()
            .map(|year| SelectOption {
                value: year,
                label: year.to_string(),
                selected: year == state.displayed.year(),
            })
            .collect();

        let cells = grid
            .cells()
            .iter()
            .map(|cell| DayCellView {
                date: cell.date,
                day: cell.date.day(),
                is_current_month: cell.is_current_month,
                is_selected: state.selected == Some(cell.date),
            })
            .collect();

        PickerView {
            field_text: state.selected.map(format_long),
            placeholder: self.config.placeholder.clone(),
            class: self.config.class.clone(),
            input_class: self.config.input_class.clone(),
            is_open: state.is_open,
            displayed: state.displayed,
            heading: state.displayed.to_string(),
            month_options,
            year_options,
            weekdays: grid.headers(),
            cells,
        }
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let view = self.view();
        for (_, observer) in self.observers.iter_mut() {
            observer(&view);
        }
    }
}

impl std::fmt::Debug for DatePicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatePicker")
            .field("state", &self.state)
            .field("today", &self.today)
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .field("listener", &self.listener)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        ymd(2026, 10, 16)
    }

    fn picker(initial: Option<&str>) -> DatePicker {
        DatePicker::new(initial, today(), PickerConfig::default())
    }

    /// Counts live listeners the way a document would.
    fn counting_source(live: &Rc<Cell<i32>>, acquired: &Rc<Cell<u32>>) -> impl FnMut() -> Subscription {
        let live = live.clone();
        let acquired = acquired.clone();
        move || {
            live.set(live.get() + 1);
            acquired.set(acquired.get() + 1);
            let live = live.clone();
            Subscription::new(move || live.set(live.get() - 1))
        }
    }

    #[test]
    fn test_state_toggle_and_dismiss() {
        let mut state = PickerState::new(None, DisplayedMonth::containing(today()));

        assert_eq!(state.apply(PickerAction::Dismiss), None);
        assert_eq!(state.apply(PickerAction::Toggle), Some(PickerEvent::Opened));
        assert!(state.is_open);
        assert_eq!(state.apply(PickerAction::Toggle), Some(PickerEvent::Closed));
        assert_eq!(state.apply(PickerAction::Toggle), Some(PickerEvent::Opened));
        assert_eq!(state.apply(PickerAction::Dismiss), Some(PickerEvent::Closed));
        assert!(!state.is_open);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_state_pick_requires_open_dropdown() {
        let mut state = PickerState::new(None, DisplayedMonth::containing(today()));
        assert_eq!(state.apply(PickerAction::Pick(ymd(2026, 10, 1))), None);
        assert_eq!(state.selected, None);

        state.apply(PickerAction::Toggle);
        assert_eq!(
            state.apply(PickerAction::Pick(ymd(2026, 10, 1))),
            Some(PickerEvent::Selected(ymd(2026, 10, 1)))
        );
        assert_eq!(state.selected, Some(ymd(2026, 10, 1)));
        assert!(!state.is_open);
    }

    #[test]
    fn test_navigation_leaves_selection_and_open_flag_alone() {
        let mut state = PickerState::new(Some(ymd(1990, 5, 21)), DisplayedMonth::containing(ymd(1990, 5, 21)));
        state.apply(PickerAction::Toggle);

        state.apply(PickerAction::NextMonth);
        state.apply(PickerAction::SelectYear(2001));
        state.apply(PickerAction::SelectMonth(Month::February));
        state.apply(PickerAction::PrevMonth);

        assert_eq!(state.displayed, DisplayedMonth::containing(ymd(2001, 1, 1)));
        assert_eq!(state.selected, Some(ymd(1990, 5, 21)));
        assert!(state.is_open);
    }

    #[test]
    fn test_selecting_current_value_is_not_an_event() {
        let mut state = PickerState::new(None, DisplayedMonth::containing(ymd(2024, 1, 1)));
        assert_eq!(state.apply(PickerAction::SelectYear(2024)), None);
        assert_eq!(state.apply(PickerAction::SelectMonth(Month::January)), None);
    }

    #[test]
    fn test_new_with_invalid_initial_value() {
        let picker = picker(Some(""));
        assert_eq!(picker.selected(), None);
        assert!(!picker.is_open());
        assert_eq!(picker.displayed(), DisplayedMonth::containing(today()));

        let picker = self::picker(Some("garbage"));
        assert_eq!(picker.selected(), None);
        assert_eq!(picker.view().field_text, None);
        assert_eq!(picker.view().field_value(), "");
    }

    #[test]
    fn test_new_displays_selection_month() {
        let picker = picker(Some("1990-05-21"));
        assert_eq!(picker.selected(), Some(ymd(1990, 5, 21)));
        assert_eq!(picker.displayed(), DisplayedMonth::containing(ymd(1990, 5, 1)));
    }

    #[test]
    fn test_new_can_always_display_today() {
        let config = PickerConfig::default().initial_month(InitialMonth::Today);
        let picker = DatePicker::new(Some("1990-05-21"), today(), config);
        assert_eq!(picker.selected(), Some(ymd(1990, 5, 21)));
        assert_eq!(picker.displayed(), DisplayedMonth::containing(today()));
    }

    #[test]
    fn test_pick_fires_callback_once_and_closes() {
        let picked = Rc::new(RefCell::new(Vec::new()));
        let mut picker = {
            let picked = picked.clone();
            picker(None).with_on_change(move |date| picked.borrow_mut().push(date))
        };

        picker.toggle();
        picker.prev_month();
        let date = picker.view().cells[10].date;
        assert_eq!(picker.pick(date), Some(PickerEvent::Selected(date)));

        assert_eq!(*picked.borrow(), vec![date]);
        assert!(!picker.is_open());
        assert_eq!(picker.selected(), Some(date));

        // Picking while closed does nothing
        assert_eq!(picker.pick(date), None);
        assert_eq!(picked.borrow().len(), 1);
    }

    #[test]
    fn test_no_callback_for_initial_state_or_dismiss() {
        let calls = Rc::new(Cell::new(0));
        let mut picker = {
            let calls = calls.clone();
            picker(Some("1990-05-21")).with_on_change(move |_| calls.set(calls.get() + 1))
        };

        picker.toggle();
        picker.next_month();
        picker.dismiss();

        assert_eq!(calls.get(), 0);
        assert_eq!(picker.selected(), Some(ymd(1990, 5, 21)));
        assert!(!picker.is_open());
    }

    #[test]
    fn test_outside_click_listener_only_while_open() {
        let live = Rc::new(Cell::new(0));
        let acquired = Rc::new(Cell::new(0));
        let mut picker = picker(None).with_outside_clicks(counting_source(&live, &acquired));
        assert_eq!(live.get(), 0);

        // toggle closed
        picker.toggle();
        assert_eq!(live.get(), 1);
        assert!(picker.has_outside_click_listener());
        picker.next_month();
        assert_eq!(live.get(), 1);
        picker.toggle();
        assert_eq!(live.get(), 0);

        // dismissed
        picker.toggle();
        assert_eq!(live.get(), 1);
        picker.dismiss();
        assert_eq!(live.get(), 0);

        // day picked
        picker.toggle();
        picker.pick(ymd(2026, 10, 3));
        assert_eq!(live.get(), 0);
        assert!(!picker.has_outside_click_listener());

        assert_eq!(acquired.get(), 3);
    }

    #[test]
    fn test_outside_click_listener_released_on_drop() {
        let live = Rc::new(Cell::new(0));
        let acquired = Rc::new(Cell::new(0));
        let mut picker = picker(None).with_outside_clicks(counting_source(&live, &acquired));

        picker.toggle();
        assert_eq!(live.get(), 1);
        drop(picker);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_outside_click_source_installed_while_open() {
        let live = Rc::new(Cell::new(0));
        let acquired = Rc::new(Cell::new(0));
        let mut picker = picker(None);

        picker.toggle();
        picker.set_outside_clicks(Box::new(counting_source(&live, &acquired)));
        assert_eq!(live.get(), 1);

        // replacing the source releases the old listener first
        picker.set_outside_clicks(Box::new(counting_source(&live, &acquired)));
        assert_eq!(live.get(), 1);
        assert_eq!(acquired.get(), 2);
    }

    #[test]
    fn test_detach_outside_clicks() {
        let live = Rc::new(Cell::new(0));
        let acquired = Rc::new(Cell::new(0));
        let mut picker = picker(None).with_outside_clicks(counting_source(&live, &acquired));

        picker.toggle();
        picker.detach_outside_clicks();
        assert_eq!(live.get(), 0);

        // the picker keeps working without a source
        picker.toggle();
        picker.toggle();
        assert_eq!(acquired.get(), 1);
        assert!(picker.is_open());
    }

    #[test]
    fn test_observers_notified_on_every_mutation() {
        let views = Rc::new(RefCell::new(Vec::<PickerView>::new()));
        let mut picker = picker(None);
        let id = {
            let views = views.clone();
            picker.subscribe(move |view| views.borrow_mut().push(view.clone()))
        };

        picker.toggle();
        picker.select_year(1990);
        picker.select_month_number(5);
        picker.pick(ymd(1990, 5, 21));

        {
            let views = views.borrow();
            assert_eq!(views.len(), 4);
            assert!(views[0].is_open);
            assert_eq!(views[1].heading, "October 1990");
            assert_eq!(views[2].heading, "May 1990");
            assert_eq!(views[3].field_text.as_deref(), Some("May 21, 1990"));
            assert!(!views[3].is_open);
        }

        // no-ops do not notify
        picker.dismiss();
        picker.select_month_number(13);
        assert_eq!(views.borrow().len(), 4);

        assert!(picker.unsubscribe(id));
        assert!(!picker.unsubscribe(id));
        picker.toggle();
        assert_eq!(views.borrow().len(), 4);
    }

    #[test]
    fn test_view_contents() {
        let mut picker = picker(Some("2024-01-05"));
        picker.toggle();
        let view = picker.view();

        assert_eq!(view.field_text.as_deref(), Some("January 5, 2024"));
        assert_eq!(view.placeholder, "Select a date");
        assert_eq!(view.weekdays, ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"]);
        assert_eq!(view.cells.len(), 42);
        assert_eq!(view.cells[0].date, ymd(2023, 12, 30));
        assert!(!view.cells[0].is_current_month);

        let selected = view.selected_cell().unwrap();
        assert_eq!(selected.date, ymd(2024, 1, 5));
        assert_eq!(selected.day, 5);
        assert_eq!(view.cells.iter().filter(|c| c.is_selected).count(), 1);

        assert_eq!(view.month_options.len(), 12);
        assert_eq!(view.month_options[0].label, "January");
        assert!(view.month_options[0].selected);
        assert_eq!(view.year_options.len(), 71);
        assert_eq!(view.year_options[0].value, 1956);
        assert_eq!(view.year_options[70].value, 2026);
        assert!(view.year_options.iter().any(|o| o.value == 2024 && o.selected));
    }

    #[test]
    fn test_view_carries_presentation_config() {
        let config = PickerConfig::default()
            .placeholder("Select your birth date")
            .class("bg-white rounded-3xl")
            .input_class("pl-4");
        let picker = DatePicker::new(None, today(), config);
        let view = picker.view();

        assert_eq!(view.field_value(), "");
        assert_eq!(view.placeholder, "Select your birth date");
        assert_eq!(view.class, "bg-white rounded-3xl");
        assert_eq!(view.input_class, "pl-4");
    }

    #[test]
    fn test_view_highlights_selection_in_padding() {
        // Dec 31st 2023 shows up as padding of January 2024
        let mut picker = picker(Some("2023-12-31"));
        picker.toggle();
        picker.next_month();

        let view = picker.view();
        let selected = view.selected_cell().unwrap();
        assert_eq!(selected.date, ymd(2023, 12, 31));
        assert!(!selected.is_current_month);
    }

    #[test]
    fn test_view_year_options_follow_navigation_outside_window() {
        let mut picker = picker(None);
        picker.toggle();
        for _ in 0..3 {
            picker.next_month();
        }

        let view = picker.view();
        assert_eq!(picker.displayed().year(), 2027);
        assert_eq!(view.year_options.len(), 72);
        assert_eq!(view.year_options.last().unwrap().value, 2027);
        assert!(view.year_options.last().unwrap().selected);
    }

    #[test]
    fn test_subscription_detaches_once() {
        let detached = Rc::new(Cell::new(0));
        let subscription = {
            let detached = detached.clone();
            Subscription::new(move || detached.set(detached.get() + 1))
        };
        assert!(format!("{:?}", subscription).contains("attached: true"));
        drop(subscription);
        assert_eq!(detached.get(), 1);
    }
}
