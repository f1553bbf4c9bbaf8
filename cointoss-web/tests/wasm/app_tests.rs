#![cfg(target_arch = "wasm32")]
use std::cell::Cell;
use std::rc::Rc;

use cointoss_core::{ACHIEVEMENTS_KEY, KeyValueStore, STATS_KEY};
use cointoss_web::app::CoinTossApp;
use cointoss_web::dom;
use cointoss_web::schedule::{Debounced, Throttled};
use cointoss_web::storage::WebStorage;
use wasm_bindgen_test::*;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn clear_storage() {
    let storage = dom::local_storage().expect("localStorage");
    storage.remove_item(STATS_KEY).expect("clear stats");
    storage.remove_item(ACHIEVEMENTS_KEY).expect("clear achievements");
}

#[wasm_bindgen_test]
fn web_storage_roundtrips_values() {
    clear_storage();
    WebStorage.set("cointoss-roundtrip", "{}").expect("write");
    assert_eq!(
        WebStorage.get("cointoss-roundtrip").expect("read").as_deref(),
        Some("{}")
    );
    assert_eq!(WebStorage.get("cointoss-missing").expect("read"), None);
}

#[wasm_bindgen_test]
fn app_persists_tosses_across_instances() {
    clear_storage();
    let mut app = CoinTossApp::with_seed(7).expect("app");
    app.record("heads").expect("record");
    app.record("tails").expect("record");
    assert!(app.record("rim").is_err());

    let reopened = CoinTossApp::with_seed(8).expect("app");
    let json = reopened.export_json().expect("export");
    assert!(json.contains("\"total\": 2"));
}

#[wasm_bindgen_test]
fn import_rejects_documents_without_achievements() {
    clear_storage();
    let mut app = CoinTossApp::with_seed(1).expect("app");
    assert!(app.import_data(r#"{"stats":{"total":0}}"#).is_err());
    assert!(app.unlock("wisdom-seeker"));
    assert!(!app.unlock("wisdom-seeker"));
    assert!(!app.unlock("retired-badge"));

    let json = app.export_json().expect("export");
    assert!(json.contains("\"wisdom-seeker\": true"));
    assert!(json.contains("\"total\": 0"));
}

#[wasm_bindgen_test]
fn import_data_replaces_state_and_persists() {
    clear_storage();
    let mut app = CoinTossApp::with_seed(3).expect("app");
    app.import_data(r#"{"stats":{"history":["edge","edge"]},"achievements":{"edge-land":true}}"#)
        .expect("import");

    let reopened = CoinTossApp::with_seed(4).expect("app");
    let json = reopened.export_json().expect("export");
    assert!(json.contains("\"edge\": 2"));
    assert!(json.contains("\"currentStreak\": 2"));
    assert!(json.contains("\"edge-land\": true"));
}

#[wasm_bindgen_test]
fn debounced_cancel_clears_pending_call() {
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    let debounced = Debounced::new(60_000, move || counter.set(counter.get() + 1));
    assert!(!debounced.is_pending());
    debounced.trigger().expect("timer");
    assert!(debounced.is_pending());
    debounced.cancel();
    assert!(!debounced.is_pending());
    assert_eq!(hits.get(), 0);
}

#[wasm_bindgen_test]
fn throttled_callback_drops_calls_inside_window() {
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    let throttled = Throttled::new(60_000, move || counter.set(counter.get() + 1));
    assert!(throttled.trigger());
    assert!(!throttled.trigger());
    assert_eq!(hits.get(), 1);
}
