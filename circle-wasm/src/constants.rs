/// Application-wide constants.
/// Coordinates are in canvas backing-store pixels unless noted otherwise.
pub const BEST_SCORE_KEY: &str = "bestScore";
/// Live stroke styling.
pub const STROKE_COLOR: &str = "#38bdf8";
pub const STROKE_WIDTH: f64 = 4.0;
/// Reference circle drawn under an analyzed stroke.
pub const GUIDE_COLOR: &str = "#475569";
pub const GUIDE_WIDTH: f64 = 1.5;
/// How long a toast stays visible (ms).
pub const TOAST_HIDE_MS: i32 = 2600;
