use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Input bitmask of a single replay frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keys(u32);

impl Keys {
    pub const NONE: Keys = Keys(0);
    pub const M1: Keys = Keys(1 << 0);
    pub const M2: Keys = Keys(1 << 1);
    pub const K1: Keys = Keys(1 << 2);
    pub const K2: Keys = Keys(1 << 3);
    pub const SMOKE: Keys = Keys(1 << 4);

    /// Any of the four gameplay buttons
    pub const ANY_BUTTON: Keys = Keys(0b1111);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Keys) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Keys) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if any mouse button or key is held down
    pub const fn any_held(self) -> bool {
        self.intersects(Keys::ANY_BUTTON)
    }
}

impl BitOr for Keys {
    type Output = Keys;

    fn bitor(self, rhs: Keys) -> Keys {
        Keys(self.0 | rhs.0)
    }
}

impl BitOrAssign for Keys {
    fn bitor_assign(&mut self, rhs: Keys) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Keys {
    type Output = Keys;

    fn bitand(self, rhs: Keys) -> Keys {
        Keys(self.0 & rhs.0)
    }
}

impl fmt::Display for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Keys, &str); 5] = [
            (Keys::M1, "M1"),
            (Keys::M2, "M2"),
            (Keys::K1, "K1"),
            (Keys::K2, "K2"),
            (Keys::SMOKE, "Smoke"),
        ];

        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(key, _)| self.contains(*key))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            f.write_str("None")
        } else {
            f.write_str(&names.join("|"))
        }
    }
}

/// Keys that went down on this tick.
///
/// A keyboard key held now suppresses the mouse button it aliases, and a
/// keyboard press also reports that mouse button so both count as a click.
pub fn detect_presses(previous: Keys, current: Keys) -> Keys {
    let mut pressed = Keys::NONE;

    if !previous.contains(Keys::M1) && current.contains(Keys::M1) && !current.contains(Keys::K1) {
        pressed |= Keys::M1;
    }
    if !previous.contains(Keys::M2) && current.contains(Keys::M2) && !current.contains(Keys::K2) {
        pressed |= Keys::M2;
    }
    if !previous.contains(Keys::K1) && current.contains(Keys::K1) {
        pressed |= Keys::K1 | Keys::M1;
    }
    if !previous.contains(Keys::K2) && current.contains(Keys::K2) {
        pressed |= Keys::K2 | Keys::M2;
    }

    pressed
}

/// Running press totals per logical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyCounter {
    pub m1: u32,
    pub m2: u32,
    pub k1: u32,
    pub k2: u32,
}

impl KeyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the new presses between two consecutive masks
    pub fn update(&mut self, previous: Keys, current: Keys) {
        let pressed = detect_presses(previous, current);
        if pressed.contains(Keys::K1) {
            self.k1 += 1;
        } else if pressed.contains(Keys::M1) {
            self.m1 += 1;
        }
        if pressed.contains(Keys::K2) {
            self.k2 += 1;
        } else if pressed.contains(Keys::M2) {
            self.m2 += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.m1 + self.m2 + self.k1 + self.k2
    }
}

impl fmt::Display for KeyCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M1: {} M2: {} K1: {} K2: {}",
            self.m1, self.m2, self.k1, self.k2
        )
    }
}
