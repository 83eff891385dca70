//! x86_64 architecture support.
//!
//! Provides the IDT and interrupt entry stubs, the legacy PIC pair, the PS/2
//! keyboard port, VGA text mode output and the COM1 serial port.

pub mod interrupts;
pub mod pic;
pub mod ps2;
pub mod serial;
pub mod vga;

pub use serial::SERIAL;
pub use vga::{Color, Writer, WRITER};

/// Halts the CPU until the next interrupt.
#[inline]
pub fn hlt() {
    x86_64::instructions::hlt();
}

/// Halts the CPU in an infinite loop.
///
/// Used after unrecoverable errors (faults, panics, shutdown).
pub fn halt_loop() -> ! {
    loop {
        hlt();
    }
}
