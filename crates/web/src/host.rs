//! Adapters from a JavaScript host object to the slideshow traits.

use deck_core::slideshow::missing;
use deck_core::{KeyboardHost, ListenerId, MountPoint, Notice, Result, ViewPort};
use wasm_bindgen::{JsCast, JsValue};

/// Look up a function property on the host object.
fn method(host: &JsValue, name: &str) -> Option<js_sys::Function> {
    js_sys::Reflect::get(host, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
}

/// Call `name(arg)` on the host. `None` when the host lacks the function.
fn call(host: &JsValue, name: &str, arg: &JsValue) -> Option<()> {
    let function = method(host, name)?;
    if let Err(e) = function.call1(host, arg) {
        log::warn!("host.{} threw: {:?}", name, e);
    }
    Some(())
}

/// Set `style.display` on the page element with `element_id`.
///
/// Returns `false` outside a document or when no such element exists.
pub fn set_display(element_id: &str, display: &str) -> bool {
    let Ok(document) = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("document"))
    else {
        return false;
    };
    let Some(get_element) = method(&document, "getElementById") else {
        return false;
    };
    let element = match get_element.call1(&document, &JsValue::from_str(element_id)) {
        Ok(element) if element.is_object() => element,
        _ => return false,
    };
    js_sys::Reflect::get(&element, &JsValue::from_str("style"))
        .and_then(|style| {
            js_sys::Reflect::set(&style, &JsValue::from_str("display"), &JsValue::from_str(display))
        })
        .unwrap_or(false)
}

/// View port writing into the host's mount-point callbacks.
pub struct JsViewPort {
    host: JsValue,
}

impl JsViewPort {
    pub fn new(host: JsValue) -> Self {
        Self { host }
    }

    fn set(&self, name: &str, mount: MountPoint, value: JsValue) -> Result<()> {
        match call(&self.host, name, &value) {
            Some(()) => Ok(()),
            None => missing(mount),
        }
    }
}

impl ViewPort for JsViewPort {
    fn set_title(&mut self, title: &str) -> Result<()> {
        self.set("setTitle", MountPoint::Title, JsValue::from_str(title))
    }

    fn set_content(&mut self, markup: &str) -> Result<()> {
        self.set("setContent", MountPoint::Content, JsValue::from_str(markup))
    }

    fn set_counter(&mut self, counter: &str) -> Result<()> {
        self.set("setCounter", MountPoint::Counter, JsValue::from_str(counter))
    }

    fn set_previous_enabled(&mut self, enabled: bool) -> Result<()> {
        self.set(
            "setPreviousEnabled",
            MountPoint::PreviousControl,
            JsValue::from_bool(enabled),
        )
    }

    fn set_next_enabled(&mut self, enabled: bool) -> Result<()> {
        self.set(
            "setNextEnabled",
            MountPoint::NextControl,
            JsValue::from_bool(enabled),
        )
    }

    fn notify(&mut self, notice: Notice) {
        let message = JsValue::from_str(&notice.to_string());
        if call(&self.host, "notify", &message).is_none() {
            log::warn!("{}", notice);
        }
    }
}

/// Key slot delegating to the host's `attachKeys(id)` / `detachKeys(id)`.
pub struct JsKeyboard {
    host: JsValue,
    next_id: u64,
}

impl JsKeyboard {
    pub fn new(host: JsValue) -> Self {
        Self { host, next_id: 0 }
    }
}

impl KeyboardHost for JsKeyboard {
    fn install(&mut self) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        if call(&self.host, "attachKeys", &JsValue::from_f64(id.0 as f64)).is_none() {
            log::warn!("host has no attachKeys, keyboard navigation disabled");
        }
        id
    }

    fn remove(&mut self, listener: ListenerId) {
        if call(&self.host, "detachKeys", &JsValue::from_f64(listener.0 as f64)).is_none() {
            log::debug!("host has no detachKeys");
        }
    }
}
