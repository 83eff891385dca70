//! Hardware interrupt lines and their handler registry.

use super::{RegisterSnapshot, PIC_1_OFFSET};
use serpent_common::IrqError;
use serpent_hal::InterruptController;

/// Number of legacy interrupt lines.
pub const IRQ_LINES: usize = 16;

/// A registered hardware interrupt handler.
pub type IrqHandler = fn(&RegisterSnapshot);

/// A legacy IRQ line, 0 through 15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IrqLine(u8);

impl IrqLine {
    /// The programmable interval timer.
    pub const TIMER: IrqLine = IrqLine(0);
    /// The PS/2 keyboard.
    pub const KEYBOARD: IrqLine = IrqLine(1);

    /// Validates a raw line number.
    pub const fn new(line: u8) -> Result<Self, IrqError> {
        if (line as usize) < IRQ_LINES {
            Ok(IrqLine(line))
        } else {
            Err(IrqError::InvalidLine(line))
        }
    }

    /// Maps a remapped vector (32..=47) back to its line.
    pub const fn from_vector(vector: u8) -> Result<Self, IrqError> {
        match vector.checked_sub(PIC_1_OFFSET) {
            Some(line) if (line as usize) < IRQ_LINES => Ok(IrqLine(line)),
            _ => Err(IrqError::NotHardwareVector(vector)),
        }
    }

    /// Returns the line number.
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Returns the line number as an index.
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// The vector this line arrives on after remapping.
    pub const fn vector(self) -> u8 {
        PIC_1_OFFSET + self.0
    }

    /// Returns `true` for lines wired through the secondary controller.
    pub const fn is_secondary(self) -> bool {
        self.0 >= 8
    }
}

/// What `dispatch` did with an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A handler ran to completion.
    Handled,
    /// No handler is installed; the line was only acknowledged.
    Unclaimed,
}

/// Maps each IRQ line to at most one handler.
#[derive(Clone, Copy)]
pub struct IrqRegistry {
    handlers: [Option<IrqHandler>; IRQ_LINES],
}

impl IrqRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        IrqRegistry {
            handlers: [None; IRQ_LINES],
        }
    }

    /// Installs `handler` on `line`, returning the handler it replaced.
    pub fn install(&mut self, line: IrqLine, handler: IrqHandler) -> Option<IrqHandler> {
        self.handlers[line.as_usize()].replace(handler)
    }

    /// Removes the handler on `line`, returning it.
    ///
    /// The line keeps being acknowledged.
    pub fn uninstall(&mut self, line: IrqLine) -> Option<IrqHandler> {
        self.handlers[line.as_usize()].take()
    }

    /// Returns the handler installed on `line`.
    pub fn handler(&self, line: IrqLine) -> Option<IrqHandler> {
        self.handlers[line.as_usize()]
    }

    /// Number of lines with a handler installed.
    pub fn installed(&self) -> usize {
        self.handlers.iter().filter(|h| h.is_some()).count()
    }

    /// Runs the handler for `vector`, then sends end-of-interrupt.
    ///
    /// The handler runs synchronously; the line is only re-armed after it
    /// returns. Lines without a handler are still acknowledged.
    pub fn dispatch(
        &self,
        vector: u8,
        registers: &RegisterSnapshot,
        controller: &mut dyn InterruptController,
    ) -> Result<Dispatch, IrqError> {
        let line = IrqLine::from_vector(vector)?;

        let outcome = match self.handler(line) {
            Some(handler) => {
                handler(registers);
                Dispatch::Handled
            }
            None => Dispatch::Unclaimed,
        };

        controller.end_of_interrupt(line.is_secondary());
        Ok(outcome)
    }
}

impl Default for IrqRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockController;
    use core::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_line_bounds() {
        assert!(IrqLine::new(15).is_ok());
        assert_eq!(IrqLine::new(16), Err(IrqError::InvalidLine(16)));
        assert_eq!(IrqLine::from_vector(33), Ok(IrqLine::KEYBOARD));
        assert_eq!(
            IrqLine::from_vector(31),
            Err(IrqError::NotHardwareVector(31))
        );
        assert_eq!(
            IrqLine::from_vector(48),
            Err(IrqError::NotHardwareVector(48))
        );
        assert_eq!(IrqLine::KEYBOARD.vector(), 33);
    }

    #[test]
    fn test_install_replaces() {
        static FIRST: AtomicUsize = AtomicUsize::new(0);
        static SECOND: AtomicUsize = AtomicUsize::new(0);
        fn first(_: &RegisterSnapshot) {
            FIRST.fetch_add(1, Ordering::Relaxed);
        }
        fn second(_: &RegisterSnapshot) {
            SECOND.fetch_add(1, Ordering::Relaxed);
        }

        let mut registry = IrqRegistry::new();
        assert!(registry.install(IrqLine::KEYBOARD, first).is_none());
        assert!(registry.install(IrqLine::KEYBOARD, second).is_some());
        assert_eq!(registry.installed(), 1);

        let mut pics = MockController::default();
        let regs = RegisterSnapshot::for_vector(33);
        assert_eq!(registry.dispatch(33, &regs, &mut pics), Ok(Dispatch::Handled));
        assert_eq!(FIRST.load(Ordering::Relaxed), 0);
        assert_eq!(SECOND.load(Ordering::Relaxed), 1);
        assert_eq!(pics.acks, [false]);
    }

    #[test]
    fn test_uninstalled_line_is_still_acknowledged() {
        fn noop(_: &RegisterSnapshot) {}

        let mut registry = IrqRegistry::new();
        registry.install(IrqLine::KEYBOARD, noop);
        assert!(registry.uninstall(IrqLine::KEYBOARD).is_some());
        assert!(registry.uninstall(IrqLine::KEYBOARD).is_none());

        let mut pics = MockController::default();
        let regs = RegisterSnapshot::for_vector(33);
        assert_eq!(
            registry.dispatch(33, &regs, &mut pics),
            Ok(Dispatch::Unclaimed)
        );
        assert_eq!(pics.acks.len(), 1);
    }

    #[test]
    fn test_secondary_lines_ack_both_controllers() {
        let registry = IrqRegistry::new();
        let mut pics = MockController::default();

        for vector in 32..=47u8 {
            let regs = RegisterSnapshot::for_vector(vector);
            registry.dispatch(vector, &regs, &mut pics).unwrap();
        }
        let secondary = pics.acks.iter().filter(|s| **s).count();
        assert_eq!(pics.acks.len(), 16);
        assert_eq!(secondary, 8);
        assert!(!pics.acks[7]);
        assert!(pics.acks[8]);
    }

    #[test]
    fn test_exception_vector_is_rejected() {
        let registry = IrqRegistry::new();
        let mut pics = MockController::default();
        let regs = RegisterSnapshot::for_vector(14);
        assert_eq!(
            registry.dispatch(14, &regs, &mut pics),
            Err(IrqError::NotHardwareVector(14))
        );
        assert!(pics.acks.is_empty());
    }
}
