#[cfg(target_arch = "wasm32")]
use cointoss_web::dom;
use cointoss_core::{AchievementId, CoinConfig, MemoryStore, Outcome, STATS_KEY, TossStats};
use cointoss_web::events::{ACHIEVEMENT_UNLOCKED_EVENT, AchievementEventDetail};
use cointoss_web::session::{SessionError, TossSession};
use serde_json::Value;

#[cfg(target_arch = "wasm32")]
#[test]
fn dom_helpers_resolve_window() {
    assert!(dom::window().is_ok());
    assert!(dom::document().is_ok());
}

fn open(store: &MemoryStore) -> TossSession<MemoryStore> {
    TossSession::new(store.clone(), 42, CoinConfig::default(), 1_000).expect("session")
}

#[test]
fn page_reported_tosses_flow_into_storage() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    for tag in ["heads", "heads", "tails", "edge"] {
        session.record_tag(tag).expect("known tag");
    }

    let saved: TossStats =
        serde_json::from_str(&store.raw(STATS_KEY).expect("saved stats")).expect("stats json");
    assert_eq!(saved.total, 4);
    assert_eq!(saved.edge, 1);
    assert_eq!(saved.history.last(), Some(&Outcome::Edge));
}

#[test]
fn unknown_tag_leaves_stats_alone() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    let err = session.record_tag("rim").unwrap_err();
    assert!(matches!(err, SessionError::UnknownOutcome(ref tag) if tag == "rim"));
    assert!(store.raw(STATS_KEY).is_none());
}

#[test]
fn export_then_import_into_fresh_session() {
    let mut source = open(&MemoryStore::new());
    source.auto_toss(150);
    let file = source.export(1_700_000_000_000, "test-agent").expect("export");
    assert_eq!(file.file_name, "coin-toss-data-1700000000000.json");

    let doc: Value = serde_json::from_str(&file.body).expect("export json");
    assert_eq!(doc["stats"]["total"], 150);
    assert!(doc["summary"]["entropy"].is_number());
    assert_eq!(doc["userAgent"], "test-agent");

    let store = MemoryStore::new();
    let mut target = open(&store);
    target.import(&file.body).expect("import");
    assert_eq!(target.engine().stats(), source.engine().stats());
    assert!(
        target
            .engine()
            .achievements()
            .is_unlocked(AchievementId::HundredTosses)
    );
}

#[test]
fn rejected_import_keeps_previous_session() {
    let mut session = open(&MemoryStore::new());
    session.record_tag("tails").expect("known tag");
    assert!(matches!(
        session.import(r#"{"stats":{}}"#),
        Err(SessionError::Import(_))
    ));
    assert!(matches!(
        session.import("not json"),
        Err(SessionError::Import(_))
    ));
    assert_eq!(session.engine().stats().tails, 1);
}

#[test]
fn achievement_event_detail_matches_page_contract() {
    assert_eq!(ACHIEVEMENT_UNLOCKED_EVENT, "achievementUnlocked");
    let detail = AchievementEventDetail::from(AchievementId::LongStreak);
    let json = serde_json::to_value(&detail).expect("detail json");
    assert_eq!(json["achievementId"], "long-streak");
    for field in ["name", "icon", "description"] {
        assert!(
            json[field].as_str().is_some_and(|s| !s.is_empty()),
            "missing {field}"
        );
    }
}
