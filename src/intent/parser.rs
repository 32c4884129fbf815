//! Keyword-span command parser
//!
//! The verb group is decided first, in fixed priority. Scope and the
//! specific action are then resolved inside the group. First match wins at
//! every step.

use std::sync::Arc;

use tracing::debug;

use crate::devices::DeviceRegistry;

use super::types::{Action, Color, ColorTemp, Intent};

/// Set, switch or recolor
const DIRECT_VERBS: [&str; 4] = [" turn ", " power ", " set ", " change "];
const INCREASE_VERBS: [&str; 2] = [" increase ", " raise "];
const DECREASE_VERBS: [&str; 2] = [" decrease ", " reduce "];
const REBOOT_VERBS: [&str; 2] = [" reboot ", " restart "];

/// Brightness step for increase/decrease commands, in percent
pub const BRIGHTNESS_STEP: i32 = 25;

/// Stateless parser over a shared device table
#[derive(Debug, Clone)]
pub struct IntentParser {
    registry: Arc<DeviceRegistry>,
}

impl IntentParser {
    pub fn new(registry: Arc<DeviceRegistry>) -> Self {
        Self { registry }
    }

    /// Parse one utterance. Never fails; unmatched text yields `Action::Unknown`.
    ///
    /// The text may still carry the activation keyword; it is not a keyword
    /// of any rule and does not affect the result.
    pub fn parse(&self, utterance: &str) -> Intent {
        let text = format!(" {} ", utterance.trim().to_lowercase());

        let intent = if contains_any(&text, &DIRECT_VERBS) {
            self.parse_direct(&text)
        } else if contains_any(&text, &INCREASE_VERBS) {
            self.parse_brightness(&text, BRIGHTNESS_STEP)
        } else if contains_any(&text, &DECREASE_VERBS) {
            self.parse_brightness(&text, -BRIGHTNESS_STEP)
        } else if contains_any(&text, &REBOOT_VERBS) {
            if text.contains(" system ") {
                Intent::system(Action::Reboot)
            } else {
                Intent::system(Action::Ignore)
            }
        } else {
            Intent::unknown()
        };

        debug!(utterance, %intent, "parsed utterance");
        intent
    }

    fn parse_direct(&self, text: &str) -> Intent {
        if text.contains(" all ") && text.contains(" lights ") {
            let action = on_off(text).unwrap_or(Action::Unknown);
            return Intent::all_lights(action);
        }

        if text.contains(" light ") {
            let Some(device) = self.registry.find_in(text) else {
                return Intent::light(Action::Unknown, None);
            };
            return Intent::light(light_action(text), Some(device.clone()));
        }

        if text.contains(" system ") {
            let action = if text.contains(" off ") {
                Action::PowerOff
            } else {
                Action::Ignore
            };
            return Intent::system(action);
        }

        Intent::unknown()
    }

    fn parse_brightness(&self, text: &str, delta: i32) -> Intent {
        // "light" is deliberately unpadded here, so "lights" also qualifies
        if !(text.contains(" brightness ") && text.contains("light")) {
            return Intent::unknown();
        }

        let target = self.registry.find_in(text).cloned();
        Intent::light(Action::AdjustBrightness(delta), target)
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

fn on_off(text: &str) -> Option<Action> {
    if text.contains(" on ") {
        Some(Action::On)
    } else if text.contains(" off ") {
        Some(Action::Off)
    } else {
        None
    }
}

fn light_action(text: &str) -> Action {
    if let Some(action) = on_off(text) {
        return action;
    }
    if let Some(color) = Color::ALL.into_iter().find(|c| text.contains(c.keyword())) {
        return Action::SetColor(color);
    }
    if let Some(temp) = ColorTemp::ALL.into_iter().find(|t| text.contains(t.keyword())) {
        return Action::SetColorTemp(temp);
    }
    Action::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::Device;
    use crate::intent::Scope;

    fn office() -> Device {
        Device {
            name: "office".to_string(),
            color_item: Some("office_color".to_string()),
            color_temperature_item: Some("office_ct".to_string()),
        }
    }

    fn parser() -> IntentParser {
        IntentParser::new(Arc::new(DeviceRegistry::new(vec![office()])))
    }

    #[test]
    fn test_turn_on_named_light() {
        let intent = parser().parse("home turn on the office light ");
        assert_eq!(intent, Intent::light(Action::On, Some(office())));
    }

    #[test]
    fn test_keyword_stripped_text_parses_the_same() {
        let p = parser();
        assert_eq!(
            p.parse("turn off the office light"),
            p.parse("home turn off the office light ")
        );
    }

    #[test]
    fn test_named_color() {
        let intent = parser().parse("home turn the office light red ");
        assert_eq!(intent.action, Action::SetColor(Color::Red));
        assert_eq!(intent.target, Some(office()));
    }

    #[test]
    fn test_on_beats_color() {
        let intent = parser().parse("home turn on the office light blue");
        assert_eq!(intent.action, Action::On);
    }

    #[test]
    fn test_color_beats_temperature() {
        let intent = parser().parse("home set the office light warm green");
        assert_eq!(intent.action, Action::SetColor(Color::Green));
    }

    #[test]
    fn test_color_temperature() {
        let intent = parser().parse("home set the office light to natural");
        assert_eq!(intent.action, Action::SetColorTemp(ColorTemp::Natural));
    }

    #[test]
    fn test_keywords_need_word_boundaries() {
        // "reddish" and "online" must not match " red " / " on "
        let intent = parser().parse("home set the office light reddish online");
        assert_eq!(intent.action, Action::Unknown);
        assert_eq!(intent.scope, Some(Scope::SingleLight));
    }

    #[test]
    fn test_unknown_device() {
        let intent = parser().parse("home turn off the kitchen light ");
        assert_eq!(intent, Intent::light(Action::Unknown, None));
    }

    #[test]
    fn test_all_lights() {
        let p = parser();
        assert_eq!(p.parse("home turn on all lights"), Intent::all_lights(Action::On));
        assert_eq!(p.parse("home power off all the lights"), Intent::all_lights(Action::Off));
        assert_eq!(
            p.parse("home turn all lights blue"),
            Intent::all_lights(Action::Unknown)
        );
    }

    #[test]
    fn test_all_lights_checked_before_single_light() {
        let intent = parser().parse("home turn off all lights and the office light");
        assert_eq!(intent.scope, Some(Scope::AllLights));
    }

    #[test]
    fn test_system_power_off() {
        let p = parser();
        assert_eq!(p.parse("home turn off the system"), Intent::system(Action::PowerOff));
        assert_eq!(p.parse("home turn on the system"), Intent::system(Action::Ignore));
    }

    #[test]
    fn test_direct_verb_without_scope() {
        assert_eq!(parser().parse("home turn it up"), Intent::unknown());
    }

    #[test]
    fn test_increase_brightness() {
        let intent = parser().parse("home increase the office light brightness ");
        assert_eq!(
            intent,
            Intent::light(Action::AdjustBrightness(BRIGHTNESS_STEP), Some(office()))
        );
    }

    #[test]
    fn test_reduce_brightness() {
        let intent = parser().parse("home reduce the office light brightness");
        assert_eq!(intent.action, Action::AdjustBrightness(-BRIGHTNESS_STEP));
    }

    #[test]
    fn test_brightness_requires_brightness_and_light() {
        let p = parser();
        assert_eq!(p.parse("home raise the office light"), Intent::unknown());
        assert_eq!(p.parse("home raise the brightness"), Intent::unknown());
    }

    #[test]
    fn test_brightness_unknown_device_leaves_target_empty() {
        let intent = parser().parse("home raise the kitchen light brightness");
        assert_eq!(intent.action, Action::AdjustBrightness(BRIGHTNESS_STEP));
        assert!(intent.target.is_none());
    }

    #[test]
    fn test_direct_group_has_priority_over_increase() {
        let intent = parser().parse("home turn on and increase the office light brightness");
        assert_eq!(intent.action, Action::On);
    }

    #[test]
    fn test_reboot() {
        let p = parser();
        assert_eq!(p.parse("home reboot the system"), Intent::system(Action::Reboot));
        assert_eq!(p.parse("home restart the router"), Intent::system(Action::Ignore));
    }

    #[test]
    fn test_unmatched_text() {
        assert_eq!(parser().parse("home what time is it"), Intent::unknown());
        assert_eq!(parser().parse(""), Intent::unknown());
    }

    #[test]
    fn test_first_declared_device_wins() {
        let lamp = Device {
            name: "lamp".to_string(),
            color_item: Some("lamp_color".to_string()),
            color_temperature_item: None,
        };
        let desk_lamp = Device {
            name: "desk lamp".to_string(),
            color_item: Some("desk_color".to_string()),
            color_temperature_item: None,
        };
        let p = IntentParser::new(Arc::new(DeviceRegistry::new(vec![lamp.clone(), desk_lamp])));
        let intent = p.parse("home turn on the desk lamp light");
        assert_eq!(intent.target, Some(lamp));
    }
}
