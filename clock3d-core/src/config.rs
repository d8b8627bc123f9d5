use crate::font::BUILTIN_FONT;
use crate::labels::LabelMode;

/// Session settings shared by every render driver.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockConfig {
    /// Font identifier handed to the font source
    pub font_id: String,
    /// Numerals shown when the clock starts
    pub initial_labels: LabelMode,
    /// Target redraws per second
    pub frame_rate: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            font_id: BUILTIN_FONT.to_string(),
            initial_labels: LabelMode::Numeric,
            frame_rate: 30,
        }
    }
}
