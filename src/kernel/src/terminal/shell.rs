//! Line-buffered shell input.

use super::commands::Command;
use log::warn;
use serpent_common::InputError;
use serpent_hal::Console;

/// Maximum input line length.
pub const LINE_CAPACITY: usize = 256;

/// The shell prompt.
pub const PROMPT: &str = ">";

/// Fixed-capacity line storage.
pub struct LineBuffer {
    bytes: [u8; LINE_CAPACITY],
    len: usize,
}

impl LineBuffer {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        LineBuffer {
            bytes: [0; LINE_CAPACITY],
            len: 0,
        }
    }

    /// Appends `byte`, refusing once the buffer is full.
    pub fn push(&mut self, byte: u8) -> Result<(), InputError> {
        if self.len >= LINE_CAPACITY {
            return Err(InputError::LineTooLong);
        }
        self.bytes[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Removes the last byte.
    pub fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.bytes[self.len])
    }

    /// The buffered line. Only ASCII is ever pushed.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.bytes[..self.len]).unwrap_or("")
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` once capacity is reached.
    pub fn is_full(&self) -> bool {
        self.len == LINE_CAPACITY
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.bytes = [0; LINE_CAPACITY];
        self.len = 0;
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects characters into a line and parses it on newline.
///
/// Characters typed past capacity are echoed but not stored. Backspace
/// erases those first, so the screen and the buffer agree again once every
/// dropped character is gone.
pub struct LineEditor {
    buffer: LineBuffer,
    dropped: usize,
}

impl LineEditor {
    /// Creates an empty editor.
    pub const fn new() -> Self {
        LineEditor {
            buffer: LineBuffer::new(),
            dropped: 0,
        }
    }

    /// Handles a character. Echo has already happened.
    ///
    /// Returns the parsed command when `c` ends the line.
    pub fn handle_char(
        &mut self,
        c: char,
        console: &mut dyn Console,
    ) -> Option<Result<Command, InputError>> {
        match c {
            '\n' => Some(self.submit()),
            '\x08' => {
                if self.dropped > 0 {
                    self.dropped -= 1;
                    console.write_char('\x08');
                } else if self.buffer.pop().is_some() {
                    console.write_char('\x08');
                }
                None
            }
            c if c.is_ascii() && !c.is_ascii_control() => {
                self.insert(c as u8);
                None
            }
            // Tab and anything else non-printing
            _ => None,
        }
    }

    fn insert(&mut self, byte: u8) {
        if let Err(err) = self.buffer.push(byte) {
            if self.dropped == 0 {
                warn!("{}: dropping input past {} characters", err, LINE_CAPACITY);
            }
            self.dropped += 1;
        }
    }

    /// Resolves the current line and empties the buffer.
    fn submit(&mut self) -> Result<Command, InputError> {
        let result = if self.is_overflowed() {
            Err(InputError::LineTooLong)
        } else {
            Command::parse(self.buffer.as_str()).ok_or(InputError::UnknownCommand)
        };
        self.clear();
        result
    }

    /// Discards the current line.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.dropped = 0;
    }

    /// Returns `true` while typed characters are being dropped.
    pub fn is_overflowed(&self) -> bool {
        self.dropped > 0
    }

    /// Get the current input buffer.
    pub fn input(&self) -> &str {
        self.buffer.as_str()
    }

    /// Number of buffered characters.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockConsole;

    fn feed(editor: &mut LineEditor, text: &str) -> Option<Result<Command, InputError>> {
        let mut console = MockConsole::default();
        let mut last = None;
        for c in text.chars() {
            last = editor.handle_char(c, &mut console);
        }
        last
    }

    #[test]
    fn test_buffer_capacity_is_strict() {
        let mut buffer = LineBuffer::new();
        for _ in 0..LINE_CAPACITY {
            assert!(buffer.push(b'x').is_ok());
        }
        assert!(buffer.is_full());
        assert_eq!(buffer.push(b'y'), Err(InputError::LineTooLong));
        assert_eq!(buffer.len(), LINE_CAPACITY);
        assert!(!buffer.as_str().contains('y'));
    }

    #[test]
    fn test_submit_parses_and_clears() {
        let mut editor = LineEditor::new();
        assert_eq!(feed(&mut editor, "help"), None);
        assert_eq!(editor.input(), "help");
        assert_eq!(feed(&mut editor, "\n"), Some(Ok(Command::Help)));
        assert!(editor.is_empty());
    }

    #[test]
    fn test_empty_line_is_unknown() {
        let mut editor = LineEditor::new();
        assert_eq!(feed(&mut editor, "\n"), Some(Err(InputError::UnknownCommand)));
    }

    #[test]
    fn test_backspace() {
        let mut editor = LineEditor::new();
        let mut console = MockConsole::default();
        for c in "clsx\x08".chars() {
            editor.handle_char(c, &mut console);
        }
        assert_eq!(editor.input(), "cls");
        assert_eq!(console.output, "\x08");

        let mut console = MockConsole::default();
        let mut empty = LineEditor::new();
        empty.handle_char('\x08', &mut console);
        assert!(console.output.is_empty());
    }

    #[test]
    fn test_tab_is_ignored() {
        let mut editor = LineEditor::new();
        feed(&mut editor, "c\tls");
        assert_eq!(editor.input(), "cls");
    }

    #[test]
    fn test_overflow_reports_line_too_long() {
        let mut editor = LineEditor::new();
        for _ in 0..LINE_CAPACITY + 1 {
            feed(&mut editor, "a");
        }
        assert_eq!(editor.len(), LINE_CAPACITY);
        assert_eq!(feed(&mut editor, "\n"), Some(Err(InputError::LineTooLong)));
        assert!(editor.is_empty());

        // The flag does not leak into the next line.
        assert_eq!(feed(&mut editor, "cls\n"), Some(Ok(Command::Cls)));
    }

    #[test]
    fn test_erasing_dropped_input_clears_overflow() {
        let mut editor = LineEditor::new();
        let mut console = MockConsole::default();
        for _ in 0..LINE_CAPACITY + 2 {
            editor.handle_char('a', &mut console);
        }
        assert!(editor.is_overflowed());

        // Dropped characters go first; the buffer is untouched.
        editor.handle_char('\x08', &mut console);
        editor.handle_char('\x08', &mut console);
        assert!(!editor.is_overflowed());
        assert_eq!(editor.len(), LINE_CAPACITY);
        assert_eq!(console.output, "\x08\x08");

        for _ in 0..LINE_CAPACITY {
            editor.handle_char('\x08', &mut console);
        }
        assert!(editor.is_empty());
        assert_eq!(feed(&mut editor, "help\n"), Some(Ok(Command::Help)));
    }

    #[test]
    fn test_partial_erase_keeps_overflow() {
        let mut editor = LineEditor::new();
        for _ in 0..LINE_CAPACITY + 3 {
            feed(&mut editor, "a");
        }
        feed(&mut editor, "\x08");
        assert!(editor.is_overflowed());
        assert_eq!(feed(&mut editor, "\n"), Some(Err(InputError::LineTooLong)));
    }

    #[test]
    fn test_exactly_full_line_still_dispatches() {
        let mut editor = LineEditor::new();
        for _ in 0..LINE_CAPACITY {
            feed(&mut editor, "a");
        }
        assert_eq!(feed(&mut editor, "\n"), Some(Err(InputError::UnknownCommand)));
    }
}
