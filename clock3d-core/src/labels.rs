/// Numeral label sets for the clock face
use std::fmt;
use std::str::FromStr;

use crate::error::ClockError;

/// Number of labels in a full numeral ring.
pub const HOUR_COUNT: usize = 12;

const ROMAN: [&str; HOUR_COUNT] = [
    "XII", "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI",
];

/// Which numerals to show around the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelMode {
    #[default]
    Numeric,
    Roman,
    None,
}

impl LabelMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            LabelMode::Numeric => "numeric",
            LabelMode::Roman => "roman",
            LabelMode::None => "none",
        }
    }
}

impl fmt::Display for LabelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelMode {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "numeric" => Ok(LabelMode::Numeric),
            "roman" => Ok(LabelMode::Roman),
            "none" => Ok(LabelMode::None),
            _ => Err(ClockError::UnknownLabelMode(s.to_string())),
        }
    }
}

/// Labels for `mode`, starting at twelve o'clock and running clockwise.
///
/// Returns 12 entries, or none for [`LabelMode::None`].
pub fn label_set(mode: LabelMode) -> Vec<String> {
    match mode {
        LabelMode::Numeric => (0..HOUR_COUNT)
            .map(|hour| if hour == 0 { HOUR_COUNT } else { hour }.to_string())
            .collect(),
        LabelMode::Roman => ROMAN.iter().map(|label| label.to_string()).collect(),
        LabelMode::None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_labels() {
        let labels = label_set(LabelMode::Numeric);
        assert_eq!(labels.len(), HOUR_COUNT);
        assert_eq!(labels[0], "12");
        assert_eq!(labels[1], "1");
        assert_eq!(labels[11], "11");
    }

    #[test]
    fn test_roman_labels() {
        let labels = label_set(LabelMode::Roman);
        assert_eq!(labels.len(), HOUR_COUNT);
        assert_eq!(labels[0], "XII");
        assert_eq!(labels[1], "I");
        assert_eq!(labels[4], "IV");
        assert_eq!(labels[11], "XI");
    }

    #[test]
    fn test_none_is_empty() {
        assert!(label_set(LabelMode::None).is_empty());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Roman".parse::<LabelMode>(), Ok(LabelMode::Roman));
        assert_eq!("none".parse::<LabelMode>(), Ok(LabelMode::None));
        assert_eq!(
            "hex".parse::<LabelMode>(),
            Err(ClockError::UnknownLabelMode("hex".to_string()))
        );
        assert_eq!(LabelMode::Numeric.to_string(), "numeric");
    }
}
