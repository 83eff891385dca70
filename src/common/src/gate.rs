//! Interrupt gate attribute bits.

use bitflags::bitflags;

bitflags! {
    /// The type/attribute byte of an interrupt descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct GateFlags: u8 {
        /// Interrupt gate: IF is cleared on entry.
        const INTERRUPT_GATE = 0x0E;
        /// Trap gate: IF is left untouched.
        const TRAP_GATE      = 0x0F;
        /// Callable from ring 3 (DPL = 3).
        const RING_3         = 0x60;
        /// The descriptor is valid.
        const PRESENT        = 1 << 7;
    }
}

impl GateFlags {
    /// Present, ring 0 interrupt gate (`0x8E`).
    pub const KERNEL_INTERRUPT: GateFlags =
        GateFlags::PRESENT.union(GateFlags::INTERRUPT_GATE);

    /// Returns `true` if the present bit is set.
    pub const fn is_present(self) -> bool {
        self.contains(GateFlags::PRESENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_interrupt_byte() {
        assert_eq!(GateFlags::KERNEL_INTERRUPT.bits(), 0x8E);
        assert!(GateFlags::KERNEL_INTERRUPT.is_present());
        assert!(!GateFlags::empty().is_present());
    }
}
