//! Tunables for editing sessions and layout.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default maximum number of undo snapshots to retain.
pub const DEFAULT_MAX_UNDO_DEPTH: usize = 1000;

/// Editor configuration.
///
/// Durations are written in milliseconds on the wire:
///
/// ```
/// use richtext_canvas::EditorConfig;
/// use std::time::Duration;
///
/// let config: EditorConfig =
///     serde_json::from_str(r#"{"caretBlinkInterval": 400, "maxUndoDepth": 50}"#).unwrap();
/// assert_eq!(config.caret_blink_interval, Duration::from_millis(400));
/// assert_eq!(config.max_undo_depth, 50);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Caret visibility toggle period while editing.
    #[serde(with = "millis")]
    pub caret_blink_interval: Duration,
    /// Taps closer together than this count toward double/triple activation.
    #[serde(with = "millis")]
    pub multi_click_window: Duration,
    /// Maximum pointer travel (px) between taps of one multi-click.
    pub multi_click_distance: f32,
    /// Oldest undo snapshots are dropped past this depth.
    pub max_undo_depth: usize,
    /// Usable widths below this abandon wrapping for newline-only splitting.
    pub min_wrap_width: f32,
    /// Fraction of a line's largest font size that sits above the baseline.
    pub ascent_ratio: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            caret_blink_interval: Duration::from_millis(530),
            multi_click_window: Duration::from_millis(500),
            multi_click_distance: 4.0,
            max_undo_depth: DEFAULT_MAX_UNDO_DEPTH,
            min_wrap_width: 1.0,
            ascent_ratio: 0.8,
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
