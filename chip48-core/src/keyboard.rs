use std::collections::HashMap;

pub const KEY_COUNT: u8 = 16;

/// Hex keypad state. Keys never reported are treated as released.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: HashMap<u8, bool>,
}

impl Keypad {
    pub fn set(&mut self, key: u8, pressed: bool) {
        self.keys.insert(key, pressed);
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(&key).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keys_are_released() {
        let keypad = Keypad::default();
        assert!(!keypad.is_pressed(0x3));
        assert!(!keypad.is_pressed(0xFF));
    }

    #[test]
    fn press_and_release() {
        let mut keypad = Keypad::default();
        keypad.set(0xA, true);
        keypad.set(0x2, true);
        assert!(keypad.is_pressed(0x2));
        assert!(keypad.is_pressed(0xA));
        keypad.set(0xA, false);
        assert!(!keypad.is_pressed(0xA));
    }
}
