use chrono::NaiveDate;
use shared::{DayCellView, PickerConfig, PickerView, DEFAULT_PLACEHOLDER};
use yew::prelude::*;

use crate::hooks::{use_date_picker, UseDatePickerActions};

#[derive(Properties, PartialEq)]
pub struct CalendarProps {
    /// Initial selection in YYYY-MM-DD format; anything unparsable means no selection
    #[prop_or_default]
    pub default_value: Option<AttrValue>,
    /// Called with the picked date on every user selection
    #[prop_or_default]
    pub on_change: Option<Callback<NaiveDate>>,
    /// Extra classes of the dropdown
    #[prop_or_default]
    pub class: AttrValue,
    /// Extra classes of the text field
    #[prop_or_default]
    pub input_class: AttrValue,
    #[prop_or(AttrValue::Static(DEFAULT_PLACEHOLDER))]
    pub placeholder: AttrValue,
}

impl CalendarProps {
    fn picker_config(&self) -> PickerConfig {
        PickerConfig::default()
            .placeholder(self.placeholder.to_string())
            .class(self.class.to_string())
            .input_class(self.input_class.to_string())
    }
}

#[function_component(Calendar)]
pub fn calendar(props: &CalendarProps) -> Html {
    let picker = use_date_picker(
        props.default_value.clone(),
        props.on_change.clone(),
        props.picker_config(),
    );
    let view = &picker.view;
    let actions = &picker.actions;

    html! {
        <div class="calendar-picker relative" ref={picker.root_ref.clone()}>
            <input
                type="text"
                readonly={true}
                value={view.field_value().to_string()}
                placeholder={view.placeholder.clone()}
                onclick={actions.toggle.clone()}
                class={classes!("calendar-input", view.input_class.clone())}
            />
            if view.is_open {
                <div class={classes!("calendar-dropdown", view.class.clone())}>
                    {dropdown_header(view, actions)}
                    <div class="calendar-grid">
                        {for view.weekdays.iter().map(|day| html! {
                            <div class="calendar-weekday">{*day}</div>
                        })}
                        {for view.cells.iter().map(|cell| day_cell(cell, &actions.pick))}
                    </div>
                </div>
            }
        </div>
    }
}

fn dropdown_header(view: &PickerView, actions: &UseDatePickerActions) -> Html {
    let key = selector_key(view);

    html! {
        <div class="calendar-header">
            <button
                type="button"
                class="nav-button"
                aria-label="Previous month"
                onclick={actions.prev_month.clone()}
            >
                {"‹"}
            </button>
            <div class="calendar-selectors" aria-label={view.heading.clone()}>
                <select
                    key={format!("month-{}", key)}
                    class="month-select"
                    onchange={actions.select_month.clone()}>
                    {for view.month_options.iter().map(|option| html! {
                        <option value={option.value.to_string()} selected={option.selected}>
                            {option.label.clone()}
                        </option>
                    })}
                </select>
                <select
                    key={format!("year-{}", key)}
                    class="year-select"
                    onchange={actions.select_year.clone()}>
                    {for view.year_options.iter().map(|option| html! {
                        <option value={option.value.to_string()} selected={option.selected}>
                            {option.label.clone()}
                        </option>
                    })}
                </select>
            </div>
            <button
                type="button"
                class="nav-button"
                aria-label="Next month"
                onclick={actions.next_month.clone()}
            >
                {"›"}
            </button>
        </div>
    }
}

/// Key of the month and year selectors. A selector is recreated each time the
/// displayed month changes, as an option picked by hand ignores later
/// `selected` updates.
fn selector_key(view: &PickerView) -> String {
    view.displayed.to_string()
}

fn day_cell(cell: &DayCellView, pick: &Callback<NaiveDate>) -> Html {
    let onclick = {
        let pick = pick.clone();
        let date = cell.date;
        Callback::from(move |_: MouseEvent| pick.emit(date))
    };

    html! {
        <button
            type="button"
            key={cell.date.to_string()}
            class={day_cell_classes(cell)}
            onclick={onclick}
        >
            {cell.day}
        </button>
    }
}

fn day_cell_classes(cell: &DayCellView) -> Classes {
    classes!(
        "calendar-day",
        if cell.is_current_month {
            "current-month"
        } else {
            "other-month"
        },
        cell.is_selected.then_some("selected"),
    )
}
