//! Serial port driver for x86_64.
//!
//! COM1 carries the kernel log and the boot self-check report.

use core::fmt::{self, Write};
use spin::Mutex;
use uart_16550::SerialPort;

/// COM1 I/O port address.
const COM1_PORT: u16 = 0x3F8;

/// Global serial port instance, lazily initialized.
pub static SERIAL: spin::Once<Mutex<SerialPort>> = spin::Once::new();

/// Initializes the global serial port.
///
/// Idempotent - safe to call multiple times.
pub fn init() {
    get_serial();
}

fn get_serial() -> &'static Mutex<SerialPort> {
    SERIAL.call_once(|| {
        // SAFETY: COM1_PORT is the standard first UART; the kernel has full
        // I/O port access and nothing else drives it.
        let mut serial = unsafe { SerialPort::new(COM1_PORT) };
        serial.init();
        Mutex::new(serial)
    })
}

/// Prints to the serial port without a newline.
#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {
        $crate::arch::x86_64::serial::_print(format_args!($($arg)*))
    };
}

/// Prints to the serial port with a newline.
#[macro_export]
macro_rules! serial_println {
    () => ($crate::serial_print!("\n"));
    ($($arg:tt)*) => ($crate::serial_print!("{}\n", format_args!($($arg)*)))
}

/// Internal print function used by macros.
#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    // The keyboard handler logs; keep it from spinning on a held port lock.
    x86_64::instructions::interrupts::without_interrupts(|| {
        let _ = get_serial().lock().write_fmt(args);
    });
}

/// Writes to the serial port unless it is already locked.
///
/// For the fault path, which may have interrupted a holder of the lock.
/// Returns `false` if nothing was written.
pub fn try_print(args: fmt::Arguments) -> bool {
    SERIAL.get().is_some_and(|serial| try_write(serial, args))
}

fn try_write<W: Write>(port: &Mutex<W>, args: fmt::Arguments) -> bool {
    match port.try_lock() {
        Some(mut port) => port.write_fmt(args).is_ok(),
        None => false,
    }
}
