//! Serpent Hardware Abstraction Layer (HAL) traits.
//!
//! This crate defines the boundaries between the kernel's input path and the
//! hardware it runs on: the text display, the interrupt controller pair and
//! the keyboard data port.

#![no_std]

/// Trait for a text-based console output.
pub trait Console {
    /// Writes a string to the console.
    fn write_str(&mut self, s: &str);

    /// Writes a single character to the console.
    fn write_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.write_str(c.encode_utf8(&mut buf));
    }

    /// Clears the console screen.
    fn clear(&mut self);
}

/// Trait for controlling interrupts.
pub trait InterruptController {
    /// Globally enables interrupts.
    fn enable(&mut self);
    /// Globally disables interrupts.
    fn disable(&mut self);
    /// Signals the end of an interrupt.
    ///
    /// The primary controller is always acknowledged; the secondary one is
    /// acknowledged first when `secondary` is set.
    fn end_of_interrupt(&mut self, secondary: bool);
}

/// Trait for the keyboard controller's data port.
pub trait ScancodePort {
    /// Reads the pending raw scan code byte.
    fn read_scancode(&mut self) -> u8;
}
