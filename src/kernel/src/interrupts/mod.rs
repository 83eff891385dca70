//! Interrupt dispatch tables.
//!
//! Everything here is plain data and can be exercised on the host; the
//! `arch` module supplies the entry stubs, the `lidt` call and the
//! 8259 controller pair that drive it on real hardware.
//!
//! - `idt`: the 256-entry vector table
//! - `irq`: the 16-line hardware interrupt registry and dispatcher
//! - `fault`: CPU exception reporting

pub mod fault;
pub mod idt;
pub mod irq;

pub use fault::Fault;
pub use idt::{GateEntry, HandlerAddr, VectorTable};
pub use irq::{Dispatch, IrqHandler, IrqLine, IrqRegistry};

/// Number of vectors reserved for CPU exceptions.
pub const EXCEPTION_VECTORS: usize = 32;

/// The offset of the first PIC (primary).
///
/// IRQs 0..7 are mapped to interrupts 32..39.
pub const PIC_1_OFFSET: u8 = 32;

/// The offset of the second PIC (secondary).
///
/// IRQs 8..15 are mapped to interrupts 40..47.
pub const PIC_2_OFFSET: u8 = PIC_1_OFFSET + 8;

/// Processor state captured when an interrupt was taken.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSnapshot {
    /// The vector the CPU dispatched through.
    pub vector: u8,
    /// Instruction pointer of the interrupted code.
    pub instruction_pointer: u64,
    /// Code segment of the interrupted code.
    pub code_segment: u64,
    /// RFLAGS at the time of the interrupt.
    pub cpu_flags: u64,
    /// Stack pointer of the interrupted code.
    pub stack_pointer: u64,
    /// Stack segment of the interrupted code.
    pub stack_segment: u64,
}

impl RegisterSnapshot {
    /// A snapshot carrying only the vector number.
    pub const fn for_vector(vector: u8) -> Self {
        RegisterSnapshot {
            vector,
            instruction_pointer: 0,
            code_segment: 0,
            cpu_flags: 0,
            stack_pointer: 0,
            stack_segment: 0,
        }
    }
}
