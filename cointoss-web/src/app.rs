//! JavaScript-facing API for the Coin Toss page.
//!
//! The page owns rendering and animation; it calls into [`CoinTossApp`] for
//! every toss and re-renders from the values returned here.
use cointoss_core::timing::{HELP_NOTIFICATION_MS, NOTIFICATION_MS, RESIZE_DEBOUNCE_MS};
use cointoss_core::{AchievementId, CoinConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::dom;
use crate::schedule::{self, Debounced, Throttled};
use crate::session::{SessionError, TossSession};
use crate::storage::WebStorage;

const EXPORT_MIME: &str = "application/json";

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(Into::into)
}

fn session_error(err: &SessionError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn invoke(callback: &js_sys::Function) {
    if let Err(err) = callback.call0(&JsValue::NULL) {
        dom::console_error(&dom::js_error_message(&err));
    }
}

#[cfg(target_arch = "wasm32")]
fn announce(ids: &[AchievementId]) {
    crate::events::announce_unlocks(ids);
}

#[cfg(not(target_arch = "wasm32"))]
const fn announce(_ids: &[AchievementId]) {}

#[wasm_bindgen]
pub struct CoinTossApp {
    session: TossSession<WebStorage>,
}

#[wasm_bindgen]
impl CoinTossApp {
    /// Open the app over `localStorage`, seeding the coin from the clock.
    ///
    /// # Errors
    /// Returns an error if the coin cannot be configured.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Self, JsValue> {
        Self::with_seed(dom::now_ms_u64())
    }

    /// # Errors
    /// Returns an error if the coin cannot be configured.
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(seed: u64) -> Result<Self, JsValue> {
        let session =
            TossSession::new(WebStorage, seed, CoinConfig::default(), dom::now_ms_u64())
                .map_err(|err| session_error(&err))?;
        log::debug!(
            "coin toss app ready with {} saved tosses",
            session.engine().stats().total
        );
        Ok(Self { session })
    }

    /// Flip the coin and record the result.
    ///
    /// # Errors
    /// Returns an error if the report cannot be converted for JavaScript.
    pub fn toss(&mut self) -> Result<JsValue, JsValue> {
        let report = self.session.toss();
        announce(&report.unlocked);
        to_js(&report)
    }

    /// Record an outcome decided by the page (`"heads"`, `"tails"`, `"edge"`).
    ///
    /// # Errors
    /// Returns an error for an unknown outcome tag.
    pub fn record(&mut self, outcome: &str) -> Result<JsValue, JsValue> {
        let report = self
            .session
            .record_tag(outcome)
            .map_err(|err| session_error(&err))?;
        announce(&report.unlocked);
        to_js(&report)
    }

    /// # Errors
    /// Returns an error if the report cannot be converted for JavaScript.
    #[wasm_bindgen(js_name = autoToss)]
    pub fn auto_toss(&mut self, count: u32) -> Result<JsValue, JsValue> {
        let report = self.session.auto_toss(count);
        announce(&report.unlocked);
        to_js(&report)
    }

    pub fn reset(&mut self) {
        self.session.engine_mut().reset();
    }

    /// # Errors
    /// Returns an error if the summary cannot be converted for JavaScript.
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.engine().summarize())
    }

    /// # Errors
    /// Returns an error if the stats cannot be converted for JavaScript.
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.engine().stats())
    }

    /// # Errors
    /// Returns an error if the achievements cannot be converted for JavaScript.
    pub fn achievements(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.engine().achievements())
    }

    /// Unlock a host-driven achievement such as `"wisdom-seeker"`.
    ///
    /// Unknown ids are ignored. Returns whether the flag flipped.
    pub fn unlock(&mut self, id: &str) -> bool {
        let flipped = self.session.engine_mut().unlock_by_name(id);
        if flipped && let Some(achievement) = AchievementId::from_name(id) {
            announce(&[achievement]);
        }
        flipped
    }

    /// The export document as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if the document cannot be serialized.
    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.session
            .export(dom::now_ms_u64(), &dom::user_agent())
            .map(|file| file.body)
            .map_err(|err| session_error(&err))
    }

    /// Download the export document as `coin-toss-data-<timestamp>.json`.
    ///
    /// # Errors
    /// Returns an error if the document cannot be built or downloaded.
    #[wasm_bindgen(js_name = exportData)]
    pub fn export_data(&self) -> Result<(), JsValue> {
        let file = self
            .session
            .export(dom::now_ms_u64(), &dom::user_agent())
            .map_err(|err| session_error(&err))?;
        dom::download_text(&file.file_name, &file.body, EXPORT_MIME)?;
        log::info!("exported stats to {}", file.file_name);
        Ok(())
    }

    /// Replace all stats and achievements from an exported document.
    ///
    /// # Errors
    /// Returns an error, leaving the current state untouched, if the text
    /// is rejected.
    #[wasm_bindgen(js_name = importData)]
    pub fn import_data(&mut self, text: &str) -> Result<(), JsValue> {
        self.session.import(text).map_err(|err| {
            log::warn!("import rejected: {err}");
            session_error(&err)
        })
    }

    /// Call `callback` once the window stops resizing.
    ///
    /// # Errors
    /// Returns an error if the resize listener cannot be installed.
    #[wasm_bindgen(js_name = onResize)]
    pub fn on_resize(&self, callback: js_sys::Function) -> Result<(), JsValue> {
        schedule::on_window_resize(Debounced::new(RESIZE_DEBOUNCE_MS, move || {
            invoke(&callback);
        }))
    }
}

/// Run `callback` once a notification's lifetime has elapsed.
///
/// # Errors
/// Returns an error if the timer cannot be scheduled.
#[wasm_bindgen(js_name = scheduleDismiss)]
pub fn schedule_dismiss(callback: js_sys::Function, help: bool) -> Result<(), JsValue> {
    let lifetime = if help {
        HELP_NOTIFICATION_MS
    } else {
        NOTIFICATION_MS
    };
    dom::set_timeout(move || invoke(&callback), lifetime)?;
    Ok(())
}

/// Trailing-edge debounce wrapper for page callbacks.
#[wasm_bindgen]
pub struct DebouncedCallback(Debounced);

#[wasm_bindgen]
impl DebouncedCallback {
    #[wasm_bindgen(constructor)]
    pub fn new(callback: js_sys::Function, wait_ms: u32) -> Self {
        Self(Debounced::new(wait_ms, move || invoke(&callback)))
    }

    /// # Errors
    /// Returns an error if the timer cannot be scheduled.
    pub fn call(&self) -> Result<(), JsValue> {
        self.0.trigger()
    }

    pub fn cancel(&self) {
        self.0.cancel();
    }

    /// Whether a trailing call is still waiting to fire.
    #[wasm_bindgen(js_name = isPending)]
    pub fn is_pending(&self) -> bool {
        self.0.is_pending()
    }
}

/// Leading-edge throttle wrapper for page callbacks.
#[wasm_bindgen]
pub struct ThrottledCallback(Throttled);

#[wasm_bindgen]
impl ThrottledCallback {
    #[wasm_bindgen(constructor)]
    pub fn new(callback: js_sys::Function, limit_ms: u32) -> Self {
        Self(Throttled::new(limit_ms, move || invoke(&callback)))
    }

    /// Returns whether the callback ran.
    pub fn call(&self) -> bool {
        self.0.trigger()
    }
}
