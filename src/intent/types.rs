//! Parsed intent types

use std::fmt;

use crate::devices::Device;

/// What an intent applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The all-lights group item
    AllLights,
    /// One named light
    SingleLight,
    /// The host running the daemon
    System,
}

/// Named colors, mapped to openHAB hue degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Pink,
    Green,
}

impl Color {
    /// Matching order used by the parser
    pub const ALL: [Color; 5] = [
        Color::Red,
        Color::Yellow,
        Color::Blue,
        Color::Pink,
        Color::Green,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Color::Red => " red ",
            Color::Yellow => " yellow ",
            Color::Blue => " blue ",
            Color::Pink => " pink ",
            Color::Green => " green ",
        }
    }

    pub fn hue(self) -> u16 {
        match self {
            Color::Red => 0,
            Color::Yellow => 100,
            Color::Blue => 260,
            Color::Pink => 340,
            Color::Green => 140,
        }
    }

    /// Named colors are always fully saturated
    pub fn saturation(self) -> u8 {
        100
    }
}

/// Named color temperatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTemp {
    Cool,
    Warm,
    Natural,
}

impl ColorTemp {
    pub const ALL: [ColorTemp; 3] = [ColorTemp::Cool, ColorTemp::Warm, ColorTemp::Natural];

    pub fn keyword(self) -> &'static str {
        match self {
            ColorTemp::Cool => " cool ",
            ColorTemp::Warm => " warm ",
            ColorTemp::Natural => " natural ",
        }
    }

    /// Percentage written to the color temperature item
    pub fn level(self) -> u8 {
        match self {
            ColorTemp::Cool => 0,
            ColorTemp::Warm => 100,
            ColorTemp::Natural => 50,
        }
    }
}

/// Action requested by an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    On,
    Off,
    SetColor(Color),
    SetColorTemp(ColorTemp),
    /// Relative brightness change in percent
    AdjustBrightness(i32),
    PowerOff,
    Reboot,
    /// Recognized as addressed to us but deliberately left alone, e.g.
    /// "set the system to quiet"
    Ignore,
    Unknown,
}

/// Result of parsing one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub scope: Option<Scope>,
    pub action: Action,
    /// Resolved light for `SingleLight` scope, if the name was known
    pub target: Option<Device>,
}

impl Intent {
    pub fn unknown() -> Self {
        Self {
            scope: None,
            action: Action::Unknown,
            target: None,
        }
    }

    pub fn all_lights(action: Action) -> Self {
        Self {
            scope: Some(Scope::AllLights),
            action,
            target: None,
        }
    }

    pub fn light(action: Action, target: Option<Device>) -> Self {
        Self {
            scope: Some(Scope::SingleLight),
            action,
            target,
        }
    }

    pub fn system(action: Action) -> Self {
        Self {
            scope: Some(Scope::System),
            action,
            target: None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.scope, &self.target) {
            (Some(scope), Some(device)) => write!(f, "{:?} {:?} ({})", scope, self.action, device.name),
            (Some(scope), None) => write!(f, "{:?} {:?}", scope, self.action),
            (None, _) => write!(f, "{:?}", self.action),
        }
    }
}
