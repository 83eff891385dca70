//! Boot self-check.
//!
//! Runs after the IDT is loaded and before interrupts are enabled. Results
//! go to the serial port; a failed check panics.

use crate::arch::x86_64::interrupts;
use crate::interrupts::{Dispatch, IrqLine, IrqRegistry, RegisterSnapshot, PIC_1_OFFSET};
use crate::serial_println;
use crate::terminal::{Command, Decoder};
use serpent_hal::InterruptController;

/// Runs all boot checks.
pub fn run_all() {
    serial_println!("Running boot self-check...");

    check_vector_table();
    check_dispatch();
    check_decoder();
    check_commands();

    serial_println!("Boot self-check passed!");
}

fn check_vector_table() {
    serial_println!("check_vector_table... ");
    for vector in 0..PIC_1_OFFSET + 16 {
        assert!(interrupts::is_dispatchable(vector), "vector {} has no gate", vector);
    }
    assert!(!interrupts::is_dispatchable(PIC_1_OFFSET + 16));
    serial_println!("[ok]");
}

/// Counts acknowledgements without touching the real controllers.
#[derive(Default)]
struct CountingController {
    primary: usize,
    secondary: usize,
}

impl InterruptController for CountingController {
    fn enable(&mut self) {}

    fn disable(&mut self) {}

    fn end_of_interrupt(&mut self, secondary: bool) {
        if secondary {
            self.secondary += 1;
        } else {
            self.primary += 1;
        }
    }
}

fn check_dispatch() {
    serial_println!("check_dispatch... ");
    fn noop(_registers: &RegisterSnapshot) {}

    let mut registry = IrqRegistry::new();
    let mut controller = CountingController::default();
    registry.install(IrqLine::TIMER, noop);

    let timer = RegisterSnapshot::for_vector(IrqLine::TIMER.vector());
    assert_eq!(
        registry.dispatch(timer.vector, &timer, &mut controller),
        Ok(Dispatch::Handled)
    );
    let unclaimed = RegisterSnapshot::for_vector(PIC_1_OFFSET + 12);
    assert_eq!(
        registry.dispatch(unclaimed.vector, &unclaimed, &mut controller),
        Ok(Dispatch::Unclaimed)
    );
    assert!(registry.dispatch(14, &unclaimed, &mut controller).is_err());

    assert_eq!(controller.primary, 1);
    assert_eq!(controller.secondary, 1);
    serial_println!("[ok]");
}

fn check_decoder() {
    serial_println!("check_decoder... ");
    let mut decoder = Decoder::new();
    assert_eq!(decoder.on_scan_event(30), Some('a'));
    assert_eq!(decoder.on_scan_event(30 | 0x80), None);
    assert_eq!(decoder.on_scan_event(58), None);
    assert_eq!(decoder.on_scan_event(30), Some('A'));
    assert_eq!(decoder.on_scan_event(58), None);
    serial_println!("[ok]");
}

fn check_commands() {
    serial_println!("check_commands... ");
    for command in Command::ALL {
        assert_eq!(Command::parse(command.name()), Some(command));
    }
    assert_eq!(Command::parse("CLS"), None);
    serial_println!("[ok]");
}
