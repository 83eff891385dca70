//! Boot banner.

use crate::arch::x86_64::vga::{self, Color};
use crate::println;

/// Kernel version shown on the banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prints the Serpent banner.
pub fn print_banner() {
    vga::set_color(Color::LightGreen, Color::Black);
    println!("  ____                            _   ");
    println!(" / ___|  ___ _ __ _ __   ___ _ __ | |_ ");
    println!(" \\___ \\ / _ \\ '__| '_ \\ / _ \\ '_ \\| __|");
    println!("  ___) |  __/ |  | |_) |  __/ | | | |_ ");
    println!(" |____/ \\___|_|  | .__/ \\___|_| |_|\\__|");
    println!("                 |_|                   ");
    vga::set_color(Color::White, Color::Black);
    println!(" Serpent v{}", VERSION);
    println!();
}
