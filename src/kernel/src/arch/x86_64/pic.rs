//! Support for the primary and secondary 8259 Programmable Interrupt Controllers (PICs).

use crate::interrupts::{PIC_1_OFFSET, PIC_2_OFFSET};
use pic8259::ChainedPics;
use serpent_hal::InterruptController;
use spin::Mutex;

/// The global instance of the chained PICs.
pub static PICS: Mutex<ChainedPics> =
    Mutex::new(unsafe { ChainedPics::new(PIC_1_OFFSET, PIC_2_OFFSET) });

/// Reprograms both controllers so IRQ *n* arrives on vector 32 + *n*.
///
/// # Safety
///
/// Must run with interrupts disabled, before any hardware line is unmasked
/// at the CPU.
pub unsafe fn remap() {
    // SAFETY: forwarded to the caller.
    unsafe { PICS.lock().initialize() };
}

/// The chained PICs behind the HAL interface.
pub struct LegacyPics;

impl InterruptController for LegacyPics {
    fn enable(&mut self) {
        x86_64::instructions::interrupts::enable();
    }

    fn disable(&mut self) {
        x86_64::instructions::interrupts::disable();
    }

    fn end_of_interrupt(&mut self, secondary: bool) {
        // ChainedPics acknowledges the secondary, then the primary, for any
        // vector the secondary owns; the primary alone otherwise.
        let vector = if secondary { PIC_2_OFFSET } else { PIC_1_OFFSET };
        // SAFETY: only called from the dispatcher for the line being serviced.
        unsafe { PICS.lock().notify_end_of_interrupt(vector) };
    }
}
