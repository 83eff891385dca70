//! CPU exception reporting.
//!
//! There is no recovery path: the arch stubs report the fault and halt.

use super::{RegisterSnapshot, EXCEPTION_VECTORS};
use crate::terminal::ConsoleWriter;
use core::fmt::{self, Write};
use serpent_hal::Console;

const EXCEPTION_NAMES: [&str; EXCEPTION_VECTORS] = [
    "Divide Error",
    "Debug",
    "Non-Maskable Interrupt",
    "Breakpoint",
    "Overflow",
    "Bound Range Exceeded",
    "Invalid Opcode",
    "Device Not Available",
    "Double Fault",
    "Coprocessor Segment Overrun",
    "Invalid TSS",
    "Segment Not Present",
    "Stack-Segment Fault",
    "General Protection Fault",
    "Page Fault",
    "Reserved",
    "x87 Floating-Point Exception",
    "Alignment Check",
    "Machine Check",
    "SIMD Floating-Point Exception",
    "Virtualization Exception",
    "Control Protection Exception",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Hypervisor Injection Exception",
    "VMM Communication Exception",
    "Security Exception",
    "Reserved",
];

/// Vectors for which the CPU pushes an error code.
pub const fn has_error_code(vector: u8) -> bool {
    matches!(vector, 8 | 10..=14 | 17 | 21 | 29 | 30)
}

/// Returns the name of exception `vector`.
pub fn exception_name(vector: u8) -> &'static str {
    EXCEPTION_NAMES
        .get(usize::from(vector))
        .copied()
        .unwrap_or("Unknown")
}

/// A CPU exception as seen by the fault reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    /// Exception vector, 0 through 31.
    pub vector: u8,
    /// Error code pushed by the CPU, if the exception has one.
    pub error_code: Option<u64>,
    /// State of the faulting code.
    pub registers: RegisterSnapshot,
}

impl Fault {
    /// Records a fault.
    pub fn new(vector: u8, error_code: Option<u64>, registers: RegisterSnapshot) -> Self {
        Fault {
            vector,
            error_code,
            registers,
        }
    }

    /// Name of the exception.
    pub fn name(&self) -> &'static str {
        exception_name(self.vector)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EXCEPTION: {} (vector {})", self.name(), self.vector)?;
        if let Some(code) = self.error_code {
            write!(f, ", error code {:#x}", code)?;
        }
        write!(f, " at {:#x}", self.registers.instruction_pointer)
    }
}

/// Writes the fault to the display.
pub fn report(fault: &Fault, console: &mut dyn Console) {
    let mut out = ConsoleWriter::new(console);
    let _ = writeln!(out);
    let _ = writeln!(out, "EXCEPTION: {}", fault.name());
    if let Some(code) = fault.error_code {
        let _ = writeln!(out, "Error Code: {:#x}", code);
    }
    let _ = writeln!(
        out,
        "Instruction Pointer: {:#x}",
        fault.registers.instruction_pointer
    );
    let _ = writeln!(out, "System halted.");
}
