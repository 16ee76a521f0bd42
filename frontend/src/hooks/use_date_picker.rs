use std::rc::Rc;

use chrono::NaiveDate;
use shared::{ChangeHandler, DatePicker, PickerConfig, PickerView};
use web_sys::{HtmlSelectElement, MouseEvent};
use yew::prelude::*;

use crate::services::date_utils::today;
use crate::services::outside_click::outside_click_source;

pub struct UseDatePickerResult {
    /// Render model, replaced by the picker's observer after every mutation
    pub view: PickerView,
    /// Attach to the element wrapping field and dropdown
    pub root_ref: NodeRef,
    pub actions: UseDatePickerActions,
}

#[derive(Clone)]
pub struct UseDatePickerActions {
    pub toggle: Callback<MouseEvent>,
    pub prev_month: Callback<MouseEvent>,
    pub next_month: Callback<MouseEvent>,
    pub select_month: Callback<Event>,
    pub select_year: Callback<Event>,
    pub pick: Callback<NaiveDate>,
}

/// Owns one [`DatePicker`] for the lifetime of the calling component.
///
/// `default_value` and `config` are only read on the first render;
/// `on_change` follows the latest props.
#[hook]
pub fn use_date_picker(
    default_value: Option<AttrValue>,
    on_change: Option<Callback<NaiveDate>>,
    config: PickerConfig,
) -> UseDatePickerResult {
    let root_ref = use_node_ref();
    let picker = use_mut_ref(move || DatePicker::new(default_value.as_deref(), today(), config));
    let view = use_state({
        let picker = picker.clone();
        move || picker.borrow().view()
    });

    // Observer and outside-click source for as long as the component is mounted
    {
        let picker = picker.clone();
        let view = view.clone();
        let root_ref = root_ref.clone();
        use_effect_with((), move |_| {
            let id = {
                let mut inner = picker.borrow_mut();
                inner.set_outside_clicks(Box::new(outside_click_source(
                    root_ref,
                    Rc::downgrade(&picker),
                )));
                inner.subscribe(move |next| view.set(next.clone()))
            };

            move || {
                let mut inner = picker.borrow_mut();
                inner.unsubscribe(id);
                inner.detach_outside_clicks();
            }
        });
    }

    {
        let picker = picker.clone();
        use_effect_with(on_change, move |on_change| {
            let handler = on_change.clone().map(|callback| {
                Box::new(move |date: NaiveDate| callback.emit(date)) as ChangeHandler
            });
            picker.borrow_mut().set_on_change(handler);
            || ()
        });
    }

    let toggle = {
        let picker = picker.clone();
        Callback::from(move |_: MouseEvent| {
            picker.borrow_mut().toggle();
        })
    };

    let prev_month = {
        let picker = picker.clone();
        Callback::from(move |_: MouseEvent| {
            picker.borrow_mut().prev_month();
        })
    };

    let next_month = {
        let picker = picker.clone();
        Callback::from(move |_: MouseEvent| {
            picker.borrow_mut().next_month();
        })
    };

    let select_month = {
        let picker = picker.clone();
        Callback::from(move |e: Event| {
            if let Some(number) = selected_value::<u32>(&e) {
                picker.borrow_mut().select_month_number(number);
            }
        })
    };

    let select_year = {
        let picker = picker.clone();
        Callback::from(move |e: Event| {
            if let Some(year) = selected_value::<i32>(&e) {
                picker.borrow_mut().select_year(year);
            }
        })
    };

    let pick = {
        let picker = picker.clone();
        Callback::from(move |date: NaiveDate| {
            picker.borrow_mut().pick(date);
        })
    };

    UseDatePickerResult {
        view: (*view).clone(),
        root_ref,
        actions: UseDatePickerActions {
            toggle,
            prev_month,
            next_month,
            select_month,
            select_year,
            pick,
        },
    }
}

fn selected_value<T: std::str::FromStr>(e: &Event) -> Option<T> {
    let select = e.target_dyn_into::<HtmlSelectElement>()?;
    select.value().parse().ok()
}
