//! System-wide error types for Serpent.

use core::fmt;

/// Errors raised by the keyboard input path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputError {
    /// The line buffer reached capacity and input was dropped
    LineTooLong,
    /// The submitted line matched no shell command
    UnknownCommand,
    /// The scan code has no printable mapping
    NotMapped,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::LineTooLong => write!(f, "line too long"),
            InputError::UnknownCommand => write!(f, "command not found"),
            InputError::NotMapped => write!(f, "no mapping"),
        }
    }
}

/// Errors raised by the hardware interrupt router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IrqError {
    /// IRQ line outside 0..=15
    InvalidLine(u8),
    /// Vector outside the remapped hardware range 32..=47
    NotHardwareVector(u8),
}

impl fmt::Display for IrqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrqError::InvalidLine(line) => write!(f, "invalid IRQ line {}", line),
            IrqError::NotHardwareVector(vector) => {
                write!(f, "vector {} is not a hardware interrupt", vector)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn test_input_error_messages() {
        assert_eq!(InputError::LineTooLong.to_string(), "line too long");
        assert_eq!(InputError::UnknownCommand.to_string(), "command not found");
    }

    #[test]
    fn test_irq_error_messages() {
        assert_eq!(IrqError::InvalidLine(16).to_string(), "invalid IRQ line 16");
        assert_eq!(
            IrqError::NotHardwareVector(3).to_string(),
            "vector 3 is not a hardware interrupt"
        );
    }
}
