mod components;
mod hooks;
mod services;

use chrono::NaiveDate;
use log::LevelFilter;
use serde::Serialize;
use yew::prelude::*;

use components::Calendar;
use services::logging::Logger;

const LABEL_CLASS: &str = "text-base font-medium";
const DROPDOWN_CLASS: &str = "bg-white border-gray-200 rounded-3xl";
const INPUT_CLASS: &str = "rounded-3xl pl-4 bg-gray-100";

/// Form state of the host page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BirthdateForm {
    /// YYYY-MM-DD, empty until a date is picked
    pub date_of_birth: String,
}

impl BirthdateForm {
    pub fn with_date_of_birth(&self, date: NaiveDate) -> Self {
        Self {
            date_of_birth: shared::format_iso(date),
        }
    }

    pub fn date_of_birth_value(&self) -> Option<AttrValue> {
        if self.date_of_birth.is_empty() {
            None
        } else {
            Some(AttrValue::from(self.date_of_birth.clone()))
        }
    }
}

#[function_component(App)]
fn app() -> Html {
    let form = use_state(BirthdateForm::default);

    let on_date_change = {
        let form = form.clone();
        Callback::from(move |date: NaiveDate| {
            let updated = form.with_date_of_birth(date);
            if let Ok(json) = serde_json::to_string(&updated) {
                Logger::info_with_component("birthdate-form", &format!("Form updated: {}", json));
            }
            form.set(updated);
        })
    };

    html! {
        <div class="min-h-screen bg-gray-100">
            <div class="flex flex-col space-y-2 max-w-lg w-full mx-auto pt-20">
                <label for="dateOfBirth" class={LABEL_CLASS}>{"Date of Birth"}</label>
                <Calendar
                    default_value={form.date_of_birth_value()}
                    on_change={on_date_change}
                    class={DROPDOWN_CLASS}
                    input_class={INPUT_CLASS}
                    placeholder="Select your birth date"
                />
                <input
                    type="hidden"
                    id="dateOfBirth"
                    name="date_of_birth"
                    value={form.date_of_birth.clone()}
                />
            </div>
        </div>
    }
}

fn main() {
    Logger::init(if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    yew::Renderer::<App>::new().render();
}
