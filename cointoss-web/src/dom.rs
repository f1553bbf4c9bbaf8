use js_sys::{Array, Date};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, BlobPropertyBag, CustomEvent, CustomEventInit, Document, HtmlAnchorElement, Storage,
    Url, Window,
};

/// Retrieve the global `window` object.
///
/// # Errors
/// Returns an error when executed outside of a browser context.
pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("`window` unavailable"))
}

/// Retrieve the document object for DOM interactions.
///
/// # Errors
/// Returns an error when the window or its document cannot be accessed.
pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("`document` unavailable"))
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> f64 {
    Date::now()
}

/// [`now_ms`] truncated to whole milliseconds.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn now_ms_u64() -> u64 {
    let now = now_ms();
    if now.is_finite() && now > 0.0 {
        now as u64
    } else {
        0
    }
}

/// The browser's user agent string, or an empty string when unavailable.
#[must_use]
pub fn user_agent() -> String {
    window()
        .ok()
        .and_then(|win| win.navigator().user_agent().ok())
        .unwrap_or_default()
}

/// Access the browser `localStorage` handle.
///
/// # Errors
/// Returns an error if the browser window cannot be accessed or `localStorage` is unavailable.
pub fn local_storage() -> Result<Storage, JsValue> {
    window()?
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("localStorage unavailable"))
}

/// Run `callback` once after `delay_ms`.
///
/// # Errors
/// Returns an error if the timer cannot be scheduled.
pub fn set_timeout(callback: impl FnOnce() + 'static, delay_ms: u32) -> Result<i32, JsValue> {
    let closure = Closure::once(callback);
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    let handle = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        delay,
    )?;
    closure.forget();
    Ok(handle)
}

/// Dispatch a `CustomEvent` named `name` on the document.
///
/// # Errors
/// Returns an error if the event cannot be constructed or dispatched.
pub fn dispatch_custom_event(name: &str, detail: &JsValue) -> Result<(), JsValue> {
    let init = CustomEventInit::new();
    init.set_detail(detail);
    let event = CustomEvent::new_with_event_init_dict(name, &init)?;
    document()?.dispatch_event(&event)?;
    Ok(())
}

/// Offer `contents` to the user as a file download.
///
/// # Errors
/// Returns an error if the blob, object URL, or anchor element cannot be created.
pub fn download_text(file_name: &str, contents: &str, mime: &str) -> Result<(), JsValue> {
    let parts = Array::of1(&JsValue::from_str(contents));
    let bag = BlobPropertyBag::new();
    bag.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &bag)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let doc = document()?;
    let anchor: HtmlAnchorElement = doc.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    let body = doc
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    body.append_child(&anchor)?;
    anchor.click();
    anchor.remove();

    Url::revoke_object_url(&url)
}
