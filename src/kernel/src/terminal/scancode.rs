//! PS/2 scan code set 1 decoding.
//!
//! One raw byte arrives per key transition. Bit 7 set means release; the low
//! seven bits index into a pair of US-layout tables. Left shift is
//! level-triggered, caps lock toggles on press only, and either one selects
//! the upper table for every key, symbols included.

use serpent_common::InputError;

/// Number of entries in each scan table.
pub const TABLE_SIZE: usize = 128;

/// Scan code of the left shift key.
pub const LEFT_SHIFT: u8 = 42;

/// Scan code of the caps lock key.
pub const CAPS_LOCK: u8 = 58;

const RELEASE_BIT: u8 = 0x80;

/// A decoded table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// A character the keyboard produces.
    Char(u8),
    /// No printable mapping.
    Unknown,
}

impl Symbol {
    /// Converts to a character, rejecting the sentinel.
    pub fn to_char(self) -> Result<char, InputError> {
        match self {
            Symbol::Char(byte) => Ok(char::from(byte)),
            Symbol::Unknown => Err(InputError::NotMapped),
        }
    }
}

// Indices 0..=57 of the legacy layout; NUL marks keys without a character
// (Esc, Ctrl, both shifts, Alt).
const LOWER_KEYS: &[u8; 58] =
    b"\x00\x001234567890-=\x08\tqwertyuiop[]\n\x00asdfghjkl;'`\x00\\zxcvbnm,./\x00*\x00 ";
const UPPER_KEYS: &[u8; 58] =
    b"\x00\x00!@#$%^&*()_+\x08\tQWERTYUIOP{}\n\x00ASDFGHJKL:\"~\x00|ZXCVBNM<>?\x00*\x00 ";

// Keypad minus and plus sit between the cursor keys.
const KEYPAD_MINUS: usize = 74;
const KEYPAD_PLUS: usize = 78;

const fn build_table(keys: &[u8; 58]) -> [Symbol; TABLE_SIZE] {
    let mut table = [Symbol::Unknown; TABLE_SIZE];
    let mut i = 0;
    while i < keys.len() {
        if keys[i] != 0 {
            table[i] = Symbol::Char(keys[i]);
        }
        i += 1;
    }
    table[KEYPAD_MINUS] = Symbol::Char(b'-');
    table[KEYPAD_PLUS] = Symbol::Char(b'+');
    table
}

/// The lower and upper lookup tables.
pub struct ScanTables {
    lower: [Symbol; TABLE_SIZE],
    upper: [Symbol; TABLE_SIZE],
}

impl ScanTables {
    /// The US layout.
    pub const US: ScanTables = ScanTables {
        lower: build_table(LOWER_KEYS),
        upper: build_table(UPPER_KEYS),
    };

    /// Looks up `index`; anything past the table is `Unknown`.
    pub fn lookup(&self, index: usize, upper: bool) -> Symbol {
        let table = if upper { &self.upper } else { &self.lower };
        table.get(index).copied().unwrap_or(Symbol::Unknown)
    }
}

/// A single key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanEvent {
    /// Scan code index, 0 through 127.
    pub index: u8,
    /// `true` for make codes, `false` for break codes.
    pub pressed: bool,
}

impl ScanEvent {
    /// Splits a raw port byte.
    pub const fn from_raw(raw: u8) -> Self {
        ScanEvent {
            index: raw & !RELEASE_BIT,
            pressed: raw & RELEASE_BIT == 0,
        }
    }
}

/// Shift and caps lock state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModifierState {
    /// Mirrors the physical left shift key.
    pub shift_held: bool,
    /// Flips on every caps lock press.
    pub caps_lock_active: bool,
}

impl ModifierState {
    /// Returns `true` when the upper table applies.
    pub const fn upper(&self) -> bool {
        self.shift_held || self.caps_lock_active
    }
}

/// Turns raw scan codes into characters.
pub struct Decoder {
    modifiers: ModifierState,
    tables: &'static ScanTables,
}

impl Decoder {
    /// Creates a decoder with no modifiers active.
    pub const fn new() -> Self {
        Decoder {
            modifiers: ModifierState {
                shift_held: false,
                caps_lock_active: false,
            },
            tables: &ScanTables::US,
        }
    }

    /// Current modifier state.
    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }

    /// Resolves a symbol under the current modifiers without changing state.
    pub fn resolve(&self, index: u8) -> Symbol {
        self.tables
            .lookup(usize::from(index), self.modifiers.upper())
    }

    /// Consumes one raw byte, returning the character it produced.
    ///
    /// Modifier keys, releases and unmapped keys produce nothing.
    pub fn on_scan_event(&mut self, raw: u8) -> Option<char> {
        let event = ScanEvent::from_raw(raw);
        match event.index {
            LEFT_SHIFT => {
                self.modifiers.shift_held = event.pressed;
                None
            }
            CAPS_LOCK => {
                if event.pressed {
                    self.modifiers.caps_lock_active = !self.modifiers.caps_lock_active;
                }
                None
            }
            _ if !event.pressed => None,
            index => self.resolve(index).to_char().ok(),
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: u8 = 30;
    const ONE: u8 = 2;

    fn release(index: u8) -> u8 {
        index | 0x80
    }

    #[test]
    fn test_tables_are_total() {
        for index in 0..=255usize {
            for upper in [false, true] {
                match ScanTables::US.lookup(index, upper) {
                    Symbol::Char(byte) => {
                        assert!(index < TABLE_SIZE);
                        assert!(byte.is_ascii() && byte != 0);
                    }
                    Symbol::Unknown => {}
                }
            }
        }
    }

    #[test]
    fn test_layout() {
        let tables = &ScanTables::US;
        assert_eq!(tables.lookup(A as usize, false), Symbol::Char(b'a'));
        assert_eq!(tables.lookup(A as usize, true), Symbol::Char(b'A'));
        assert_eq!(tables.lookup(ONE as usize, true), Symbol::Char(b'!'));
        assert_eq!(tables.lookup(28, false), Symbol::Char(b'\n'));
        assert_eq!(tables.lookup(43, true), Symbol::Char(b'|'));
        assert_eq!(tables.lookup(53, true), Symbol::Char(b'?'));
        assert_eq!(tables.lookup(57, false), Symbol::Char(b' '));
        assert_eq!(tables.lookup(74, false), Symbol::Char(b'-'));
        assert_eq!(tables.lookup(78, true), Symbol::Char(b'+'));
        assert_eq!(tables.lookup(1, false), Symbol::Unknown);
        assert_eq!(tables.lookup(59, false), Symbol::Unknown);
        assert_eq!(tables.lookup(127, true), Symbol::Unknown);
    }

    #[test]
    fn test_release_produces_nothing() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.on_scan_event(A), Some('a'));
        assert_eq!(decoder.on_scan_event(release(A)), None);
        assert_eq!(decoder.on_scan_event(1), None);
    }

    #[test]
    fn test_caps_lock_toggles_on_press_only() {
        let mut decoder = Decoder::new();
        decoder.on_scan_event(CAPS_LOCK);
        assert!(decoder.modifiers().caps_lock_active);
        decoder.on_scan_event(release(CAPS_LOCK));
        assert!(decoder.modifiers().caps_lock_active);
        decoder.on_scan_event(CAPS_LOCK);
        decoder.on_scan_event(release(CAPS_LOCK));
        assert!(!decoder.modifiers().caps_lock_active);
    }

    #[test]
    fn test_shift_is_level_triggered() {
        let mut decoder = Decoder::new();
        decoder.on_scan_event(LEFT_SHIFT);
        assert_eq!(decoder.on_scan_event(A), Some('A'));
        decoder.on_scan_event(LEFT_SHIFT);
        assert!(decoder.modifiers().shift_held);
        decoder.on_scan_event(release(LEFT_SHIFT));
        assert!(!decoder.modifiers().shift_held);
        assert_eq!(decoder.on_scan_event(A), Some('a'));
    }

    #[test]
    fn test_caps_lock_shifts_symbols() {
        let mut decoder = Decoder::new();
        decoder.on_scan_event(CAPS_LOCK);
        assert_eq!(decoder.on_scan_event(ONE), Some('!'));
        assert_eq!(decoder.on_scan_event(A), Some('A'));
    }

    #[test]
    fn test_right_shift_is_ignored() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.on_scan_event(54), None);
        assert!(!decoder.modifiers().upper());
        assert_eq!(decoder.on_scan_event(A), Some('a'));
    }
}
