use web_sys::Window;

use crate::constants::BEST_SCORE_KEY;

/// Read the persisted best score. A missing key or an unparsable value
/// counts as 0.
pub fn load_best_score(window: &Window) -> u32 {
    window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|s| s.get_item(BEST_SCORE_KEY).ok().flatten())
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(0)
}

/// Overwrite the persisted best score. Storage failures (private mode,
/// quota) are swallowed; the in-memory value still wins for the session.
pub fn store_best_score(window: &Window, value: u32) {
    if let Ok(Some(storage)) = window.local_storage() {
        let _ = storage.set_item(BEST_SCORE_KEY, &value.to_string());
    }
}
