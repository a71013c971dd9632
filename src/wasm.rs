//! Browser binding: the same behaviors installed on the live document.
//!
//! Listeners are delegated to the document, one per event type, and the
//! controller state is shared between them through `Rc<RefCell<_>>` on the
//! single browser thread.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, Window,
};

use crate::enhancer::{AnnotationPolicy, DISMISS_SELECTOR, EnhancerConfig};
use crate::rules::{FieldFacts, evaluate_form, is_blank};

struct BrowserAlert {
    banner: Element,
    timer_id: i32,
}

struct BrowserEnhancer {
    window: Window,
    document: Document,
    config: EnhancerConfig,
    alerts: Vec<BrowserAlert>,
}

type Shared = Rc<RefCell<BrowserEnhancer>>;

/// Installs the enhancer with the default configuration once the document
/// is ready.
#[wasm_bindgen]
pub fn install() -> Result<(), JsValue> {
    install_config(EnhancerConfig::default())
}

/// Same as [`install`] with custom banner delays.
#[wasm_bindgen(js_name = installWithDelays)]
pub fn install_with_delays(hide_ms: i32, remove_ms: i32) -> Result<(), JsValue> {
    install_config(EnhancerConfig {
        alert_hide_delay_ms: i64::from(hide_ms),
        alert_remove_delay_ms: i64::from(remove_ms),
        ..EnhancerConfig::default()
    })
}

fn install_config(config: EnhancerConfig) -> Result<(), JsValue> {
    if let Err(err) = config.validate() {
        let message = err.to_string();
        web_sys::console::error_1(&JsValue::from_str(&message));
        return Err(JsValue::from_str(&message));
    }
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let state = Rc::new(RefCell::new(BrowserEnhancer {
        window,
        document: document.clone(),
        config,
        alerts: Vec::new(),
    }));

    if document.ready_state() == "loading" {
        let ready = Closure::once_into_js(move || {
            if let Err(err) = attach(&state) {
                web_sys::console::error_2(&JsValue::from_str("form enhancer install failed"), &err);
            }
        });
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            ready.unchecked_ref::<js_sys::Function>(),
        )?;
        Ok(())
    } else {
        attach(&state)
    }
}

fn attach(state: &Shared) -> Result<(), JsValue> {
    let document = state.borrow().document.clone();
    listen(&document, "submit", true, state, on_submit)?;
    listen(&document, "blur", true, state, on_blur)?;
    listen(&document, "input", false, state, on_input)?;
    listen(&document, "click", false, state, on_click)?;
    schedule_banners(state)
}

fn listen(
    document: &Document,
    event_type: &str,
    capture: bool,
    state: &Shared,
    handler: fn(&Shared, &Event) -> Result<(), JsValue>,
) -> Result<(), JsValue> {
    let state = Rc::clone(state);
    let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Err(err) = handler(&state, &event) {
            web_sys::console::error_1(&err);
        }
    });
    document.add_event_listener_with_callback_and_bool(
        event_type,
        callback.as_ref().unchecked_ref(),
        capture,
    )?;
    // the listener lives as long as the page
    callback.forget();
    Ok(())
}

fn target_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn field_value(element: &Element) -> String {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
        textarea.value()
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else {
        String::new()
    }
}

fn is_field(element: &Element) -> bool {
    matches!(
        element.tag_name().to_ascii_lowercase().as_str(),
        "input" | "textarea" | "select"
    )
}

fn annotation_for(config: &EnhancerConfig, field: &Element) -> Option<Element> {
    field
        .next_element_sibling()
        .filter(|sibling| sibling.class_list().contains(&config.feedback_class))
}

fn mark_invalid(
    document: &Document,
    config: &EnhancerConfig,
    field: &Element,
    message: &str,
) -> Result<(), JsValue> {
    field.class_list().add_1(&config.invalid_class)?;
    if annotation_for(config, field).is_some() {
        return Ok(());
    }
    let Some(parent) = field.parent_node() else {
        return Ok(());
    };
    let annotation = document.create_element("div")?;
    annotation.set_class_name(&config.feedback_class);
    annotation.set_text_content(Some(message));
    parent.insert_before(&annotation, field.next_sibling().as_ref())?;
    Ok(())
}

fn clear_invalid(config: &EnhancerConfig, field: &Element) -> Result<(), JsValue> {
    field.class_list().remove_1(&config.invalid_class)?;
    if config.annotation_policy == AnnotationPolicy::RemoveWhenValid {
        if let Some(annotation) = annotation_for(config, field) {
            annotation.remove();
        }
    }
    Ok(())
}

fn on_submit(state: &Shared, event: &Event) -> Result<(), JsValue> {
    let Some(form) = target_element(event) else {
        return Ok(());
    };
    if !form.tag_name().eq_ignore_ascii_case("form") {
        return Ok(());
    }
    let state = state.borrow();

    let nodes = form.query_selector_all("input, textarea, select")?;
    let mut facts = Vec::new();
    for index in 0..nodes.length() {
        let Some(field) = nodes
            .item(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };
        let is_input = field.tag_name().eq_ignore_ascii_case("input");
        let kind = field.get_attribute("type").unwrap_or_default();
        facts.push(FieldFacts {
            is_input,
            required: field.has_attribute("required"),
            email: is_input && kind.trim().eq_ignore_ascii_case("email"),
            name: field.get_attribute("name"),
            value: field_value(&field),
            key: field,
        });
    }

    let report = evaluate_form(&facts).map_err(|err| JsValue::from_str(&err.to_string()))?;
    for (field, verdict) in report.entries() {
        match verdict {
            Some(violation) => {
                mark_invalid(&state.document, &state.config, field, violation.message())?
            }
            None => clear_invalid(&state.config, field)?,
        }
    }

    if !report.is_valid() {
        event.prevent_default();
        event.stop_propagation();
    }
    Ok(())
}

fn feedback_field(event: &Event) -> Result<Option<Element>, JsValue> {
    let Some(element) = target_element(event) else {
        return Ok(None);
    };
    if !is_field(&element) {
        return Ok(None);
    }
    let in_form = element
        .parent_element()
        .map(|parent| parent.closest("form"))
        .transpose()?
        .flatten()
        .is_some();
    Ok(in_form.then_some(element))
}

fn on_blur(state: &Shared, event: &Event) -> Result<(), JsValue> {
    let Some(field) = feedback_field(event)? else {
        return Ok(());
    };
    let state = state.borrow();
    if field.has_attribute("required") && is_blank(&field_value(&field)) {
        field.class_list().add_1(&state.config.invalid_class)
    } else {
        clear_invalid(&state.config, &field)
    }
}

fn on_input(state: &Shared, event: &Event) -> Result<(), JsValue> {
    let Some(field) = feedback_field(event)? else {
        return Ok(());
    };
    let state = state.borrow();
    if field.class_list().contains(&state.config.invalid_class)
        && !is_blank(&field_value(&field))
    {
        clear_invalid(&state.config, &field)?;
    }
    Ok(())
}

fn on_click(state: &Shared, event: &Event) -> Result<(), JsValue> {
    let Some(target) = target_element(event) else {
        return Ok(());
    };

    let guarded = {
        let state = state.borrow();
        match target.closest(&state.config.confirm_selector())? {
            Some(control) if !control.has_attribute("disabled") => {
                let marker = control.get_attribute(&state.config.confirm_attribute);
                let message = state.config.prompt_for(marker.as_deref()).to_string();
                Some(state.window.confirm_with_message(&message)?)
            }
            _ => None,
        }
    };
    if guarded == Some(false) {
        event.prevent_default();
        return Ok(());
    }

    let Some(control) = target.closest(DISMISS_SELECTOR)? else {
        return Ok(());
    };
    let alert_selector = state.borrow().config.alert_selector.clone();
    if let Some(banner) = control.closest(&alert_selector)? {
        dismiss(state, &banner);
    }
    Ok(())
}

fn dismiss(state: &Shared, banner: &Element) {
    let mut state = state.borrow_mut();
    if let Some(index) = state.alerts.iter().position(|alert| alert.banner == *banner) {
        let alert = state.alerts.swap_remove(index);
        state.window.clear_timeout_with_handle(alert.timer_id);
    }
    banner.remove();
}

fn delay_ms(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn schedule_banners(state: &Shared) -> Result<(), JsValue> {
    let (document, selector) = {
        let state = state.borrow();
        (state.document.clone(), state.config.alert_selector.clone())
    };
    let banners = document.query_selector_all(&selector)?;
    for index in 0..banners.length() {
        let Some(banner) = banners
            .item(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };
        let delay = delay_ms(state.borrow().config.alert_hide_delay_ms);
        let hide_state = Rc::clone(state);
        let hide_banner = banner.clone();
        let timer_id = set_timeout(state, delay, move || hide(&hide_state, &hide_banner))?;
        state.borrow_mut().alerts.push(BrowserAlert { banner, timer_id });
    }
    Ok(())
}

fn set_timeout(
    state: &Shared,
    delay: i32,
    callback: impl FnOnce() -> Result<(), JsValue> + 'static,
) -> Result<i32, JsValue> {
    let callback = Closure::once_into_js(move || {
        if let Err(err) = callback() {
            web_sys::console::error_1(&err);
        }
    });
    let window = state.borrow().window.clone();
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref::<js_sys::Function>(),
        delay,
    )
}

fn hide(state: &Shared, banner: &Element) -> Result<(), JsValue> {
    if !banner.is_connected() {
        forget_alert(state, banner);
        return Ok(());
    }
    let (shown_class, delay) = {
        let state = state.borrow();
        (
            state.config.shown_class.clone(),
            delay_ms(state.config.alert_remove_delay_ms),
        )
    };
    banner.class_list().remove_1(&shown_class)?;

    let remove_state = Rc::clone(state);
    let remove_banner = banner.clone();
    let timer_id = set_timeout(state, delay, move || {
        forget_alert(&remove_state, &remove_banner);
        if remove_banner.is_connected() {
            remove_banner.remove();
        }
        Ok(())
    })?;
    if let Some(alert) = state
        .borrow_mut()
        .alerts
        .iter_mut()
        .find(|alert| alert.banner == *banner)
    {
        alert.timer_id = timer_id;
    }
    Ok(())
}

fn forget_alert(state: &Shared, banner: &Element) {
    state
        .borrow_mut()
        .alerts
        .retain(|alert| alert.banner != *banner);
}
