/// Clock3D Web - WASM bindings for the clock model
///
/// Exposes the clock's pointer angles and numeral ring to a browser-side
/// renderer. Numerals use the builtin typeface; the host redraws from the
/// values returned by `tick` and `label_positions`.

use clock3d_core::{
    ClockAngles, ClockConfig, ClockModel, LabelMode, LabelSwitchController, NodeContent,
    StdFontSource,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WebClock {
    model: ClockModel,
    controller: LabelSwitchController,
}

#[wasm_bindgen]
impl WebClock {
    /// Create a clock showing `labels` ("numeric", "roman" or "none")
    #[wasm_bindgen(constructor)]
    pub fn new(labels: &str) -> Result<WebClock, JsValue> {
        let mode: LabelMode = labels.parse().map_err(|e| JsValue::from_str(&format!("{e}")))?;
        let config = ClockConfig {
            initial_labels: mode,
            ..ClockConfig::default()
        };
        let model = ClockModel::from_config(&config, StdFontSource)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(WebClock {
            model,
            controller: LabelSwitchController::new(mode),
        })
    }

    /// Forward a key press; returns whether it switched the numerals
    pub fn key(&mut self, key: &str) -> bool {
        let Some(key) = key.chars().next() else {
            return false;
        };
        match self.controller.handle_key(key, &mut self.model) {
            Ok(switched) => switched,
            Err(err) => {
                report(&format!("label switch failed: {err}"));
                false
            }
        }
    }

    /// Point the hands at the given time and settle pending numerals.
    ///
    /// Returns the hour, minute and second rotations in radians.
    pub fn tick(&mut self, hours: u32, minutes: u32, seconds: u32) -> Vec<f32> {
        let angles = ClockAngles::from_hms(hours, minutes, seconds);
        self.model.set_angles(&angles);

        if let Some(Err(err)) = self.model.pump() {
            report(&err.to_string());
        }
        vec![angles.hour, angles.minute, angles.second]
    }

    /// Active numeral set name
    pub fn labels(&self) -> String {
        self.controller.active().to_string()
    }

    pub fn label_count(&self) -> usize {
        self.model.label_count()
    }

    pub fn label_text(&self, index: usize) -> Option<String> {
        self.model
            .label_texts()
            .get(index)
            .map(|text| text.to_string())
    }

    /// World positions of the attached labels, flattened as x, y, z triples
    pub fn label_positions(&self) -> Vec<f32> {
        let scene = self.model.scene();
        scene
            .children(self.model.numerals())
            .iter()
            .filter(|&&id| matches!(scene.get(id).map(|n| &n.content), Some(NodeContent::Label { .. })))
            .filter_map(|&id| scene.world_matrix(id))
            .flat_map(|world| [world[(0, 3)], world[(1, 3)], world[(2, 3)]])
            .collect()
    }
}

fn report(message: &str) {
    log::error!("{message}");
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(message));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_attaches_numerals() {
        let mut clock = WebClock::new("roman").unwrap();
        assert_eq!(clock.label_count(), 0);

        clock.tick(3, 0, 0);
        assert_eq!(clock.label_count(), 12);
        assert_eq!(clock.label_text(0).as_deref(), Some("XII"));
        assert_eq!(clock.label_text(12), None);
        assert_eq!(clock.labels(), "roman");
    }

    #[test]
    fn test_tick_returns_angles() {
        let mut clock = WebClock::new("none").unwrap();
        let angles = clock.tick(6, 30, 15);
        let expected = ClockAngles::from_hms(6, 30, 15);
        assert_eq!(angles, vec![expected.hour, expected.minute, expected.second]);
    }

    #[test]
    fn test_keys_switch_numerals() {
        let mut clock = WebClock::new("numeric").unwrap();
        clock.tick(0, 0, 0);

        assert!(clock.key("d"));
        assert_eq!(clock.label_count(), 0);
        assert!(clock.label_positions().is_empty());
        assert!(!clock.key("z"));
        assert!(!clock.key(""));

        assert!(clock.key("a"));
        clock.tick(0, 0, 1);
        assert_eq!(clock.label_positions().len(), 36);
    }
}
