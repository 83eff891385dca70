//! Interrupt entry stubs and the live dispatch tables for x86_64.
//!
//! Every exception vector enters through a stub that reports the fault and
//! halts. Every hardware line enters through a stub that funnels into the
//! IRQ registry's `dispatch`.

use super::pic::{self, LegacyPics};
use super::ps2::Ps2Keyboard;
use super::{serial, vga};
use crate::interrupts::fault::{self, Fault};
use crate::interrupts::irq::IRQ_LINES;
use crate::interrupts::{
    HandlerAddr, IrqHandler, IrqLine, IrqRegistry, RegisterSnapshot, VectorTable,
    EXCEPTION_VECTORS, PIC_1_OFFSET,
};
use crate::terminal::{Outcome, KEYBOARD};
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use lazy_static::lazy_static;
use log::{debug, error, info, trace};
use serpent_hal::ScancodePort;
use spin::Mutex;
use x86_64::instructions::interrupts::without_interrupts;
use x86_64::structures::idt::InterruptStackFrame;

macro_rules! fault_stub {
    ($name:ident, $vector:literal) => {
        extern "x86-interrupt" fn $name(frame: InterruptStackFrame) -> ! {
            fault_entry($vector, None, &frame)
        }
    };
    ($name:ident, $vector:literal, error_code) => {
        extern "x86-interrupt" fn $name(frame: InterruptStackFrame, error_code: u64) -> ! {
            fault_entry($vector, Some(error_code), &frame)
        }
    };
}

macro_rules! irq_stub {
    ($name:ident, $line:literal) => {
        extern "x86-interrupt" fn $name(frame: InterruptStackFrame) {
            hardware_entry(PIC_1_OFFSET + $line, &frame);
        }
    };
}

macro_rules! addr {
    ($($stub:ident),* $(,)?) => {
        [$(HandlerAddr::new($stub as usize as u64)),*]
    };
}

fault_stub!(fault_0, 0);
fault_stub!(fault_1, 1);
fault_stub!(fault_2, 2);
fault_stub!(fault_3, 3);
fault_stub!(fault_4, 4);
fault_stub!(fault_5, 5);
fault_stub!(fault_6, 6);
fault_stub!(fault_7, 7);
fault_stub!(fault_8, 8, error_code);
fault_stub!(fault_9, 9);
fault_stub!(fault_10, 10, error_code);
fault_stub!(fault_11, 11, error_code);
fault_stub!(fault_12, 12, error_code);
fault_stub!(fault_13, 13, error_code);
fault_stub!(fault_14, 14, error_code);
fault_stub!(fault_15, 15);
fault_stub!(fault_16, 16);
fault_stub!(fault_17, 17, error_code);
fault_stub!(fault_18, 18);
fault_stub!(fault_19, 19);
fault_stub!(fault_20, 20);
fault_stub!(fault_21, 21, error_code);
fault_stub!(fault_22, 22);
fault_stub!(fault_23, 23);
fault_stub!(fault_24, 24);
fault_stub!(fault_25, 25);
fault_stub!(fault_26, 26);
fault_stub!(fault_27, 27);
fault_stub!(fault_28, 28);
fault_stub!(fault_29, 29, error_code);
fault_stub!(fault_30, 30, error_code);
fault_stub!(fault_31, 31);

irq_stub!(irq_0, 0);
irq_stub!(irq_1, 1);
irq_stub!(irq_2, 2);
irq_stub!(irq_3, 3);
irq_stub!(irq_4, 4);
irq_stub!(irq_5, 5);
irq_stub!(irq_6, 6);
irq_stub!(irq_7, 7);
irq_stub!(irq_8, 8);
irq_stub!(irq_9, 9);
irq_stub!(irq_10, 10);
irq_stub!(irq_11, 11);
irq_stub!(irq_12, 12);
irq_stub!(irq_13, 13);
irq_stub!(irq_14, 14);
irq_stub!(irq_15, 15);

fn fault_stubs() -> [HandlerAddr; EXCEPTION_VECTORS] {
    addr![
        fault_0, fault_1, fault_2, fault_3, fault_4, fault_5, fault_6, fault_7, fault_8,
        fault_9, fault_10, fault_11, fault_12, fault_13, fault_14, fault_15, fault_16,
        fault_17, fault_18, fault_19, fault_20, fault_21, fault_22, fault_23, fault_24,
        fault_25, fault_26, fault_27, fault_28, fault_29, fault_30, fault_31,
    ]
}

fn irq_stubs() -> [HandlerAddr; IRQ_LINES] {
    addr![
        irq_0, irq_1, irq_2, irq_3, irq_4, irq_5, irq_6, irq_7, irq_8, irq_9, irq_10, irq_11,
        irq_12, irq_13, irq_14, irq_15,
    ]
}

lazy_static! {
    /// The Interrupt Descriptor Table.
    static ref VECTORS: Mutex<VectorTable> = {
        let mut table = VectorTable::new();
        table.initialize(&fault_stubs());
        // Every line gets a gate so an unclaimed interrupt is still acknowledged.
        for (line, stub) in irq_stubs().into_iter().enumerate() {
            table.install(PIC_1_OFFSET + line as u8, stub);
        }
        Mutex::new(table)
    };
}

/// Handlers for the 16 hardware lines.
static IRQS: Mutex<IrqRegistry> = Mutex::new(IrqRegistry::new());

/// Timer interrupts seen since boot.
static TICKS: AtomicU64 = AtomicU64::new(0);

/// Set once the shell asked to power off.
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Loads the IDT, installs the timer and keyboard handlers and remaps the
/// PICs. Interrupts stay disabled; the caller enables them.
pub fn init_idt() {
    x86_64::instructions::interrupts::disable();

    // SAFETY: VECTORS lives in a static and is never moved or dropped.
    unsafe { VECTORS.lock().load() };

    install_irq(IrqLine::TIMER, timer_interrupt_handler);
    install_irq(IrqLine::KEYBOARD, keyboard_interrupt_handler);

    // SAFETY: interrupts are disabled.
    unsafe { pic::remap() };

    info!(
        "IDT loaded: {} exception gates, hardware lines on vectors {}..{}",
        EXCEPTION_VECTORS,
        PIC_1_OFFSET,
        PIC_1_OFFSET + IRQ_LINES as u8
    );
}

/// Installs `handler` on `line`, replacing any previous one.
pub fn install_irq(line: IrqLine, handler: IrqHandler) {
    without_interrupts(|| {
        if IRQS.lock().install(line, handler).is_some() {
            debug!("IRQ {}: handler replaced", line.as_u8());
        }
        VECTORS
            .lock()
            .install(line.vector(), irq_stubs()[line.as_usize()]);
    });
}

/// Removes the handler on `line`. The line is still acknowledged.
pub fn uninstall_irq(line: IrqLine) -> Option<IrqHandler> {
    without_interrupts(|| IRQS.lock().uninstall(line))
}

/// Returns `true` if the CPU can currently dispatch through `vector`.
pub fn is_dispatchable(vector: u8) -> bool {
    without_interrupts(|| VECTORS.lock().is_dispatchable(vector))
}

/// Number of timer interrupts since boot.
pub fn ticks() -> u64 {
    TICKS.load(Ordering::Relaxed)
}

/// Returns `true` once the shell asked to power off.
pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::Acquire)
}

fn snapshot(vector: u8, frame: &InterruptStackFrame) -> RegisterSnapshot {
    RegisterSnapshot {
        vector,
        instruction_pointer: frame.instruction_pointer.as_u64(),
        code_segment: frame.code_segment,
        cpu_flags: frame.cpu_flags,
        stack_pointer: frame.stack_pointer.as_u64(),
        stack_segment: frame.stack_segment,
    }
}

/// Common path for every hardware line.
fn hardware_entry(vector: u8, frame: &InterruptStackFrame) {
    let registers = snapshot(vector, frame);
    // Copy the table out so a handler may itself install or uninstall.
    let registry = *IRQS.lock();
    if let Err(err) = registry.dispatch(vector, &registers, &mut LegacyPics) {
        error!("hardware entry: {}", err);
    }
}

/// Common path for every CPU exception. Faults are fatal.
fn fault_entry(vector: u8, error_code: Option<u64>, frame: &InterruptStackFrame) -> ! {
    let fault = Fault::new(vector, error_code, snapshot(vector, frame));
    vga::try_with_console(|console| fault::report(&fault, console));
    // The log path spins on the port lock; the faulting code may hold it.
    serial::try_print(format_args!("[ERROR] {}\n", fault));

    x86_64::instructions::interrupts::disable();
    super::halt_loop()
}

/// Handler for the timer interrupt.
fn timer_interrupt_handler(_registers: &RegisterSnapshot) {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

/// Handler for the keyboard interrupt.
fn keyboard_interrupt_handler(_registers: &RegisterSnapshot) {
    let scancode = Ps2Keyboard::new().read_scancode();
    trace!("scancode {:#04x}", scancode);

    let outcome = vga::with_console(|console| KEYBOARD.lock().on_scancode(scancode, console));
    if outcome == Outcome::Shutdown {
        SHUTDOWN.store(true, Ordering::Release);
    }
}
