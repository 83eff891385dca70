//! Host-side test doubles for the hardware boundaries.

use crate::terminal::{Foreground, KeyOutcome};
use serpent_hal::{Console, InterruptController};
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

/// Records everything written to the display.
///
/// `clear` only counts; the output history is kept.
#[derive(Debug, Default)]
pub struct MockConsole {
    pub output: String,
    pub clears: usize,
}

impl Console for MockConsole {
    fn write_str(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}

/// Records end-of-interrupt signals; `true` means the secondary was included.
#[derive(Debug, Default)]
pub struct MockController {
    pub enabled: bool,
    pub acks: Vec<bool>,
}

impl InterruptController for MockController {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn end_of_interrupt(&mut self, secondary: bool) {
        self.acks.push(secondary);
    }
}

/// A foreground program that answers keys from a script.
#[derive(Debug, Default)]
pub struct ScriptedGame {
    pub starts: usize,
    pub keys: Vec<char>,
    script: VecDeque<KeyOutcome>,
}

impl ScriptedGame {
    pub fn with_script(script: &[KeyOutcome]) -> Self {
        ScriptedGame {
            script: script.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl Foreground for ScriptedGame {
    fn start(&mut self, _console: &mut dyn Console) {
        self.starts += 1;
    }

    fn on_key(&mut self, key: char, _console: &mut dyn Console) -> KeyOutcome {
        self.keys.push(key);
        self.script.pop_front().unwrap_or(KeyOutcome::Continue)
    }
}
