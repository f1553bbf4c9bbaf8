//! DOM notifications for achievement unlocks.
use cointoss_core::AchievementId;
use serde::Serialize;

/// Name of the `CustomEvent` fired on `document` for each unlock.
pub const ACHIEVEMENT_UNLOCKED_EVENT: &str = "achievementUnlocked";

/// `event.detail` payload of [`ACHIEVEMENT_UNLOCKED_EVENT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementEventDetail {
    pub achievement_id: AchievementId,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

impl From<AchievementId> for AchievementEventDetail {
    fn from(id: AchievementId) -> Self {
        let info = id.info();
        Self {
            achievement_id: id,
            name: info.name,
            icon: info.icon,
            description: info.description,
        }
    }
}

/// Fire one unlock event per id, in order.
///
/// A failed dispatch is logged and does not stop the rest.
#[cfg(target_arch = "wasm32")]
pub fn announce_unlocks(ids: &[AchievementId]) {
    for id in ids {
        if let Err(err) = announce(*id) {
            log::warn!(
                "failed to dispatch {ACHIEVEMENT_UNLOCKED_EVENT} for {id}: {}",
                crate::dom::js_error_message(&err)
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn announce(id: AchievementId) -> Result<(), wasm_bindgen::JsValue> {
    let detail = AchievementEventDetail::from(id);
    let value = serde_wasm_bindgen::to_value(&detail)?;
    crate::dom::dispatch_custom_event(ACHIEVEMENT_UNLOCKED_EVENT, &value)
}
