use std::cell::RefCell;
use std::rc::Weak;

use gloo::events::EventListener;
use shared::{DatePicker, Subscription};
use wasm_bindgen::JsCast;
use web_sys::{Event, Node};
use yew::NodeRef;

use crate::services::logging::Logger;

/// Source of `mousedown` listeners on the document for one picker.
///
/// Each listener dismisses the picker when the press lands outside `root`.
/// The listener lives exactly as long as the returned [`Subscription`], which
/// the picker holds only while its dropdown is open.
pub fn outside_click_source(
    root: NodeRef,
    picker: Weak<RefCell<DatePicker>>,
) -> impl FnMut() -> Subscription {
    listener_source(move || root.get(), picker)
}

fn listener_source<R>(root: R, picker: Weak<RefCell<DatePicker>>) -> impl FnMut() -> Subscription
where
    R: Fn() -> Option<Node> + Clone + 'static,
{
    move || {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            Logger::warn_with_component("calendar", "No document, outside clicks are not tracked");
            return Subscription::new(|| ());
        };

        let root = root.clone();
        let picker = picker.clone();
        let listener = EventListener::new(&document, "mousedown", move |event| {
            if is_inside(root().as_ref(), event) {
                return;
            }
            if let Some(picker) = picker.upgrade() {
                // A busy picker is already handling this interaction
                if let Ok(mut picker) = picker.try_borrow_mut() {
                    picker.dismiss();
                }
            }
        });

        Logger::debug_with_component("calendar", "Attached outside-click listener");
        Subscription::new(move || {
            drop(listener);
            Logger::debug_with_component("calendar", "Removed outside-click listener");
        })
    }
}

fn is_inside(root: Option<&Node>, event: &Event) -> bool {
    let Some(root) = root else {
        return false;
    };
    event
        .target()
        .and_then(|target| target.dyn_into::<Node>().ok())
        .map(|target| root.contains(Some(&target)))
        .unwrap_or(false)
}
