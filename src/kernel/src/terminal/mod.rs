//! Terminal subsystem for Serpent.
//!
//! Turns keyboard scan codes into either shell commands or a key feed for the
//! foreground program.
//!
//! # Architecture
//!
//! - `scancode`: scan code decoding with shift / caps lock state
//! - `shell`: bounded line buffer and line editing
//! - `commands`: built-in shell commands
//! - `router`: the shell / interactive mode switch

pub mod commands;
pub mod router;
pub mod scancode;
pub mod shell;

pub use commands::Command;
pub use router::{Foreground, KeyOutcome, Keyboard, Mode, ModeRouter, Outcome};
pub use scancode::{Decoder, ModifierState, ScanTables, Symbol};
pub use shell::{LineBuffer, LineEditor};

use crate::game::Snake;
use core::fmt;
use serpent_hal::Console;

/// The keyboard input path, driven by the IRQ 1 handler.
///
/// Only the interrupt path locks this once interrupts are enabled.
pub static KEYBOARD: spin::Mutex<Keyboard<Snake>> = spin::Mutex::new(Keyboard::new(Snake::new()));

/// Adapts a [`Console`] to `core::fmt::Write`.
pub struct ConsoleWriter<'a> {
    console: &'a mut dyn Console,
}

impl<'a> ConsoleWriter<'a> {
    /// Wraps `console`.
    pub fn new(console: &'a mut dyn Console) -> Self {
        ConsoleWriter { console }
    }
}

impl fmt::Write for ConsoleWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.console.write_str(s);
        Ok(())
    }
}
