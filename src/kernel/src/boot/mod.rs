//! Boot progress reporting.
//!
//! Each stage prints one `[ OK ]`-style line on the screen and mirrors it to
//! the kernel log.

pub mod banner;

use crate::arch::x86_64::vga::{self, Color};
use crate::{print, println};
use log::info;

/// Reports a completed boot stage as `[ OK ] message`.
pub fn log_ok(message: &str) {
    info!("boot: {}", message);

    vga::set_color(Color::LightGreen, Color::Black);
    print!("[ OK ]");
    vga::set_color(Color::White, Color::Black);
    println!(" {}", message);
}

/// Prints an indented line under the previous stage.
pub fn log_detail(message: &str) {
    println!("       {}", message);
}
