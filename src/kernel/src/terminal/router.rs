//! Routes decoded keys to the shell or to the foreground program.
//!
//! Everything here runs inside the keyboard interrupt. Nothing blocks: a key
//! is echoed, handled and, for a completed line, dispatched before the
//! handler returns and the line is re-armed.

use super::commands::Effect;
use super::scancode::Decoder;
use super::shell::{LineEditor, PROMPT};
use super::ConsoleWriter;
use core::fmt::Write;
use log::{debug, info};
use serpent_hal::Console;

/// Who receives decoded keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Keys are buffered into lines and run as commands.
    Shell,
    /// Keys go straight to the foreground program.
    Interactive,
}

/// Result of handing one key to the foreground program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Keep sending keys.
    Continue,
    /// Start the program over.
    RestartRequested,
    /// The user asked to leave.
    QuitRequested,
    /// The program ended and will not restart.
    Terminal,
}

/// A program that takes over the keyboard while the shell is suspended.
pub trait Foreground {
    /// (Re)starts the program.
    fn start(&mut self, console: &mut dyn Console);

    /// Handles one decoded key.
    fn on_key(&mut self, key: char, console: &mut dyn Console) -> KeyOutcome;
}

/// What the kernel should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep waiting for interrupts.
    Idle,
    /// Stop taking input and halt.
    Shutdown,
}

/// Characters written back to the display as they are typed.
fn is_echoed(c: char) -> bool {
    c == '\n' || c == ' ' || c.is_ascii_graphic()
}

/// The mode flag plus the state each mode needs.
pub struct ModeRouter<G> {
    mode: Mode,
    editor: LineEditor,
    foreground: G,
}

impl<G: Foreground> ModeRouter<G> {
    /// Creates a router in shell mode.
    pub const fn new(foreground: G) -> Self {
        ModeRouter {
            mode: Mode::Shell,
            editor: LineEditor::new(),
            foreground,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The line being edited.
    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    /// The foreground program.
    pub fn foreground(&self) -> &G {
        &self.foreground
    }

    /// Display the shell prompt.
    pub fn prompt(&self, console: &mut dyn Console) {
        console.write_str(PROMPT);
    }

    /// Handles one decoded character.
    pub fn on_character(&mut self, c: char, console: &mut dyn Console) -> Outcome {
        if is_echoed(c) {
            console.write_char(c);
        }
        match self.mode {
            Mode::Shell => self.on_shell_char(c, console),
            Mode::Interactive => self.on_interactive_char(c, console),
        }
    }

    fn on_shell_char(&mut self, c: char, console: &mut dyn Console) -> Outcome {
        let parsed = match self.editor.handle_char(c, console) {
            Some(parsed) => parsed,
            None => return Outcome::Idle,
        };

        let command = match parsed {
            Ok(command) => command,
            Err(err) => {
                let _ = writeln!(ConsoleWriter::new(console), "{}", err);
                self.prompt(console);
                return Outcome::Idle;
            }
        };

        debug!("shell: {}", command.name());
        match command.execute(console) {
            Effect::Prompt => {
                self.prompt(console);
                Outcome::Idle
            }
            Effect::EnterInteractive => {
                info!("keyboard handed to foreground program");
                self.mode = Mode::Interactive;
                self.foreground.start(console);
                Outcome::Idle
            }
            Effect::Shutdown => {
                info!("shutdown requested from shell");
                Outcome::Shutdown
            }
        }
    }

    fn on_interactive_char(&mut self, c: char, console: &mut dyn Console) -> Outcome {
        match self.foreground.on_key(c, console) {
            KeyOutcome::Continue => {}
            KeyOutcome::RestartRequested => {
                debug!("foreground program restarting");
                self.foreground.start(console);
            }
            KeyOutcome::QuitRequested | KeyOutcome::Terminal => self.enter_shell(console),
        }
        Outcome::Idle
    }

    /// Returns the keyboard to the shell with an empty line and one prompt.
    fn enter_shell(&mut self, console: &mut dyn Console) {
        info!("keyboard returned to shell");
        self.mode = Mode::Shell;
        self.editor.clear();
        self.prompt(console);
    }
}

/// The complete keyboard input path: scan code decoding plus routing.
pub struct Keyboard<G> {
    decoder: Decoder,
    router: ModeRouter<G>,
}

impl<G: Foreground> Keyboard<G> {
    /// Creates the input path in shell mode.
    pub const fn new(foreground: G) -> Self {
        Keyboard {
            decoder: Decoder::new(),
            router: ModeRouter::new(foreground),
        }
    }

    /// Handles one raw scan code byte.
    pub fn on_scancode(&mut self, raw: u8, console: &mut dyn Console) -> Outcome {
        match self.decoder.on_scan_event(raw) {
            Some(c) => self.router.on_character(c, console),
            None => Outcome::Idle,
        }
    }

    /// The scan code decoder.
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// The mode router.
    pub fn router(&self) -> &ModeRouter<G> {
        &self.router
    }
}
