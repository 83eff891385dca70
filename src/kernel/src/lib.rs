//! Serpent kernel
//!
//! A small interrupt-driven x86_64 kernel: a vector table for CPU exceptions
//! and the 16 legacy hardware lines, a PS/2 keyboard driver and a line-based
//! shell that can hand the keyboard to a snake game.
//!
//! # Architecture
//!
//! - `interrupts`: vector table, IRQ registry and fault reporting
//! - `terminal`: scan code decoding, line editing, commands, mode routing
//! - `game`: the interactive foreground program
//! - `arch`: entry stubs, PICs, PS/2 port, VGA and serial (x86_64 only)
//! - `logger`, `boot`, `selftest`: boot-time plumbing
//!
//! Everything outside `arch` is plain data driven through the
//! `serpent_hal` traits and is unit-tested on the host.
//!
//! # Safety
//!
//! This is a `#![no_std]` kernel. All unsafe code is documented with safety
//! invariants explaining why the usage is correct.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "x86_64", feature(abi_x86_interrupt))]
#![warn(missing_docs)]

#[cfg(target_arch = "x86_64")]
pub mod arch;
#[cfg(target_arch = "x86_64")]
pub mod boot;
pub mod game;
pub mod interrupts;
#[cfg(target_arch = "x86_64")]
pub mod logger;
#[cfg(target_arch = "x86_64")]
pub mod selftest;
pub mod terminal;

#[cfg(test)]
pub(crate) mod testutil;

/// Initializes the output devices and the logger.
///
/// Called first thing in the boot process; everything after may log.
#[cfg(target_arch = "x86_64")]
pub fn init() {
    arch::x86_64::serial::init();
    arch::x86_64::vga::init();
    if logger::init().is_err() {
        serial_println!("logger already installed");
    }
}
