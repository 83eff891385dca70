//! PS/2 keyboard controller data port.

use serpent_hal::ScancodePort;
use x86_64::instructions::port::Port;

/// Keyboard controller data port.
const DATA_PORT: u16 = 0x60;

/// The keyboard controller's output buffer.
pub struct Ps2Keyboard {
    data: Port<u8>,
}

impl Ps2Keyboard {
    /// Creates a handle to the data port.
    pub const fn new() -> Self {
        Ps2Keyboard {
            data: Port::new(DATA_PORT),
        }
    }
}

impl Default for Ps2Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ScancodePort for Ps2Keyboard {
    fn read_scancode(&mut self) -> u8 {
        // SAFETY: reading port 0x60 has no side effect besides consuming the
        // byte the controller raised IRQ 1 for.
        unsafe { self.data.read() }
    }
}
