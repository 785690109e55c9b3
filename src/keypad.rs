use minifb::Key;

/// The 16-key hex keypad. The frame loop rebuilds the pressed set once per
/// tick; the dispatcher only ever reads it.
pub struct Keypad {
    keys: [bool; 16],
}

impl Keypad {
    pub fn new() -> Self {
        Self { keys: [false; 16] }
    }

    /// Replaces the whole pressed set for this tick.
    pub fn set_keys(&mut self, keys: [bool; 16]) {
        self.keys = keys;
    }

    /// `key` comes from a register, so values past 0xF are possible; those
    /// are never pressed.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    /// Lowest pressed key index, if any. This is the key `FX0A` reports.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|k| k as u8)
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a host key to its logical keypad index.
///
/// The original hex layout sits under the left 4 columns:
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|      |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub fn keymap(key: Key) -> Option<u8> {
    match key {
        Key::X => Some(0x0),
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::Z => Some(0xA),
        Key::C => Some(0xB),
        Key::Key4 => Some(0xC),
        Key::R => Some(0xD),
        Key::F => Some(0xE),
        Key::V => Some(0xF),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_pressed_keys() {
        let mut keypad = Keypad::new();
        let mut keys = [false; 16];
        keys[0xA] = true;
        keypad.set_keys(keys);
        assert!(keypad.is_pressed(0xA));
        assert!(!keypad.is_pressed(0x0));
    }

    #[test]
    fn out_of_range_key_is_never_pressed() {
        let keypad = Keypad::new();
        assert!(!keypad.is_pressed(0x42));
    }

    #[test]
    fn first_pressed_returns_lowest_index() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.first_pressed(), None);
        let mut keys = [false; 16];
        keys[0x7] = true;
        keys[0x3] = true;
        keypad.set_keys(keys);
        assert_eq!(keypad.first_pressed(), Some(0x3));
    }

    #[test]
    fn keymap_covers_the_hex_layout() {
        assert_eq!(keymap(Key::X), Some(0x0));
        assert_eq!(keymap(Key::Key1), Some(0x1));
        assert_eq!(keymap(Key::Key4), Some(0xC));
        assert_eq!(keymap(Key::V), Some(0xF));
        assert_eq!(keymap(Key::P), None);
    }
}
