//! VGA text mode display.
//!
//! Output always lands on the bottom row; a newline scrolls everything up.

use core::fmt::{self, Write};
use core::ptr;
use spin::Mutex;

/// VGA text buffer memory-mapped I/O address.
const VGA_BUFFER_ADDR: usize = 0xB8000;

const BUFFER_HEIGHT: usize = 25;
const BUFFER_WIDTH: usize = 80;

/// VGA palette entries used by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    /// Black color.
    Black = 0,
    /// Cyan color.
    Cyan = 3,
    /// Light green color.
    LightGreen = 10,
    /// Light red color.
    LightRed = 12,
    /// White color.
    White = 15,
}

const fn attribute(foreground: Color, background: Color) -> u8 {
    (background as u8) << 4 | (foreground as u8)
}

/// A single character cell: code point byte plus attribute byte.
#[derive(Clone, Copy)]
#[repr(C)]
struct Cell {
    ascii: u8,
    attribute: u8,
}

type Buffer = [[Cell; BUFFER_WIDTH]; BUFFER_HEIGHT];

/// Global VGA writer instance.
pub static WRITER: spin::Once<Mutex<Writer>> = spin::Once::new();

/// Initializes the global VGA writer.
///
/// Idempotent - safe to call multiple times.
pub fn init() {
    WRITER.call_once(|| Mutex::new(Writer::new()));
}

fn get_writer() -> &'static Mutex<Writer> {
    WRITER.call_once(|| Mutex::new(Writer::new()))
}

/// VGA text mode writer.
pub struct Writer {
    column: usize,
    attribute: u8,
    buffer: *mut Buffer,
}

// SAFETY: the buffer pointer is the fixed VGA MMIO region, valid for the
// kernel's lifetime; all access goes through the WRITER spinlock.
unsafe impl Send for Writer {}

impl Writer {
    fn new() -> Self {
        Writer {
            column: 0,
            attribute: attribute(Color::White, Color::Black),
            buffer: VGA_BUFFER_ADDR as *mut Buffer,
        }
    }

    /// Sets the foreground and background colors for subsequent writes.
    pub fn set_color(&mut self, foreground: Color, background: Color) {
        self.attribute = attribute(foreground, background);
    }

    fn read_cell(&self, row: usize, col: usize) -> Cell {
        debug_assert!(row < BUFFER_HEIGHT && col < BUFFER_WIDTH);
        // SAFETY: indices are in range and the buffer is always mapped.
        // Volatile because the display hardware reads this memory.
        unsafe { ptr::read_volatile(&(*self.buffer)[row][col]) }
    }

    fn store_cell(&mut self, row: usize, col: usize, cell: Cell) {
        debug_assert!(row < BUFFER_HEIGHT && col < BUFFER_WIDTH);
        // SAFETY: as in `read_cell`.
        unsafe { ptr::write_volatile(&mut (*self.buffer)[row][col], cell) }
    }

    fn write_cell(&mut self, row: usize, col: usize, ascii: u8) {
        let attribute = self.attribute;
        self.store_cell(row, col, Cell { ascii, attribute });
    }

    /// Writes a single byte, handling newline, backspace and wrapping.
    pub fn write_byte(&mut self, byte: u8) {
        match byte {
            b'\n' => self.new_line(),
            0x08 => {
                if self.column > 0 {
                    self.column -= 1;
                    self.write_cell(BUFFER_HEIGHT - 1, self.column, b' ');
                }
            }
            byte => {
                if self.column >= BUFFER_WIDTH {
                    self.new_line();
                }
                self.write_cell(BUFFER_HEIGHT - 1, self.column, byte);
                self.column += 1;
            }
        }
    }

    fn new_line(&mut self) {
        for row in 1..BUFFER_HEIGHT {
            for col in 0..BUFFER_WIDTH {
                let cell = self.read_cell(row, col);
                self.store_cell(row - 1, col, cell);
            }
        }
        self.clear_row(BUFFER_HEIGHT - 1);
        self.column = 0;
    }

    fn clear_row(&mut self, row: usize) {
        for col in 0..BUFFER_WIDTH {
            self.write_cell(row, col, b' ');
        }
    }

    /// Clears the entire screen.
    pub fn clear_screen(&mut self) {
        for row in 0..BUFFER_HEIGHT {
            self.clear_row(row);
        }
        self.column = 0;
    }
}

impl fmt::Write for Writer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            match byte {
                0x20..=0x7e | b'\n' | 0x08 => self.write_byte(byte),
                _ => self.write_byte(0xfe),
            }
        }
        Ok(())
    }
}

impl serpent_hal::Console for Writer {
    fn write_str(&mut self, s: &str) {
        let _ = <Self as fmt::Write>::write_str(self, s);
    }

    fn clear(&mut self) {
        self.clear_screen();
    }
}

/// Prints to the VGA buffer without a newline.
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::arch::x86_64::vga::_print(format_args!($($arg)*))
    };
}

/// Prints to the VGA buffer with a newline.
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)))
}

/// Internal print function used by macros.
#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    // Interrupt handlers draw too; never spin on a lock the interrupted code holds.
    x86_64::instructions::interrupts::without_interrupts(|| {
        let _ = get_writer().lock().write_fmt(args);
    });
}

/// Runs `f` with the screen as a [`serpent_hal::Console`].
///
/// For interrupt context, where interrupts are already masked.
pub fn with_console<R>(f: impl FnOnce(&mut dyn serpent_hal::Console) -> R) -> R {
    let mut writer = get_writer().lock();
    f(&mut *writer)
}

/// Like [`with_console`], but skips `f` if the screen is locked.
pub fn try_with_console(f: impl FnOnce(&mut dyn serpent_hal::Console)) {
    if let Some(mut writer) = get_writer().try_lock() {
        f(&mut *writer);
    }
}

/// Sets the VGA output color.
pub fn set_color(foreground: Color, background: Color) {
    x86_64::instructions::interrupts::without_interrupts(|| {
        get_writer().lock().set_color(foreground, background);
    });
}

/// Clears the VGA screen.
pub fn clear_screen() {
    x86_64::instructions::interrupts::without_interrupts(|| {
        get_writer().lock().clear_screen();
    });
}
