/// Wall-clock time to pointer rotation
///
/// Angles are rotations about the vertical axis in radians. They are
/// negative because turning clockwise when seen from above is a negative
/// rotation about +Y. There is no interpolation: every hand jumps to the
/// whole hour, minute or second.
use std::f32::consts::TAU;

use chrono::Timelike;

use crate::catalog::PointerKind;

/// Rotation for `fraction` of a full turn.
pub fn turns(fraction: f32) -> f32 {
    TAU * fraction
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClockAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl ClockAngles {
    /// Angles for a 24-hour reading; hours are folded onto the 12-hour dial.
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hour: turns(-((hours % 12) as f32) / 12.0),
            minute: turns(-(minutes as f32) / 60.0),
            second: turns(-(seconds as f32) / 60.0),
        }
    }

    pub fn at<T: Timelike>(time: &T) -> Self {
        Self::from_hms(time.hour(), time.minute(), time.second())
    }

    pub fn get(&self, kind: PointerKind) -> f32 {
        match kind {
            PointerKind::Hour => self.hour,
            PointerKind::Minute => self.minute,
            PointerKind::Second => self.second,
        }
    }
}
