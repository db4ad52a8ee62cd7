// Timing and wire constants shared by the control components.
// Tunable values live in `Config`; these are the defaults it falls back to.

use std::time::Duration;

// === Control surface ===

/// Inactivity delay after which the controls hide during playback
pub const HIDE_CONTROLS_DELAY: Duration = Duration::from_millis(3500);

/// How long to wait before checking whether a native fullscreen request took effect
pub const FULLSCREEN_CONFIRM_DELAY: Duration = Duration::from_millis(300);

/// Arrow-key seek step in seconds
pub const SEEK_STEP_SECS: f64 = 10.0;

/// Volumes strictly below this render the "low" speaker icon
pub const LOW_VOLUME_THRESHOLD: f64 = 0.5;

// === Header-duration probe ===

/// Response headers the byte server may use to report duration, in lookup order
pub const DURATION_HEADERS: [&str; 4] = [
    "X-Content-Duration",
    "Content-Duration",
    "X-Duration-Seconds",
    "X-Video-Duration",
];

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
