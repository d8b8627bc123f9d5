/// Key-driven switching between numeral sets
use crate::error::ClockError;
use crate::labels::{label_set, LabelMode};
use crate::model::ClockModel;

/// Default key bindings: `a` numeric, `s` roman, `d` none.
pub const DEFAULT_BINDINGS: [(char, LabelMode); 3] = [
    ('a', LabelMode::Numeric),
    ('s', LabelMode::Roman),
    ('d', LabelMode::None),
];

#[derive(Debug, Clone)]
pub struct LabelSwitchController {
    bindings: Vec<(char, LabelMode)>,
    active: LabelMode,
}

impl LabelSwitchController {
    pub fn new(initial: LabelMode) -> Self {
        Self {
            bindings: DEFAULT_BINDINGS.to_vec(),
            active: initial,
        }
    }

    /// The mode bound to `key`, if any
    pub fn trigger(&self, key: char) -> Option<LabelMode> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|&(_, mode)| mode)
    }

    /// Mode most recently requested
    pub fn active(&self) -> LabelMode {
        self.active
    }

    /// Switch the model's numerals for `key`.
    ///
    /// Returns `Ok(false)` for unbound keys, which are otherwise ignored.
    pub fn handle_key(&mut self, key: char, model: &mut ClockModel) -> Result<bool, ClockError> {
        let Some(mode) = self.trigger(key) else {
            return Ok(false);
        };
        self.switch(mode, model)?;
        Ok(true)
    }

    pub fn switch(&mut self, mode: LabelMode, model: &mut ClockModel) -> Result<(), ClockError> {
        log::debug!("switching numerals to {mode}");
        model.apply_label_set(&label_set(mode))?;
        self.active = mode;
        Ok(())
    }
}

impl Default for LabelSwitchController {
    fn default() -> Self {
        Self::new(LabelMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FontCache, StdFontSource, BUILTIN_FONT};

    fn model() -> ClockModel {
        ClockModel::new(FontCache::new(StdFontSource), BUILTIN_FONT).unwrap()
    }

    #[test]
    fn test_key_mapping() {
        let controller = LabelSwitchController::default();
        assert_eq!(controller.trigger('a'), Some(LabelMode::Numeric));
        assert_eq!(controller.trigger('s'), Some(LabelMode::Roman));
        assert_eq!(controller.trigger('d'), Some(LabelMode::None));
        assert_eq!(controller.trigger('x'), None);
        assert_eq!(controller.trigger('A'), None);
    }

    #[test]
    fn test_keys_switch_labels() {
        let mut model = model();
        let mut controller = LabelSwitchController::new(LabelMode::None);

        assert_eq!(controller.handle_key('s', &mut model), Ok(true));
        assert_eq!(controller.active(), LabelMode::Roman);
        assert_eq!(model.pump(), Some(Ok(12)));
        assert_eq!(model.label_texts()[0], "XII");

        assert_eq!(controller.handle_key('d', &mut model), Ok(true));
        assert_eq!(model.label_count(), 0);
        assert_eq!(controller.active(), LabelMode::None);
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut model = model();
        let mut controller = LabelSwitchController::default();
        controller.handle_key('a', &mut model).unwrap();
        model.pump();

        assert_eq!(controller.handle_key('z', &mut model), Ok(false));
        assert_eq!(model.label_count(), 12);
        assert!(!model.has_pending_labels());
        assert_eq!(controller.active(), LabelMode::Numeric);
    }
}
