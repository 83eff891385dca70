//! Serpent kernel entry point.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod kernel {
    use bootloader::{entry_point, BootInfo};
    use core::panic::PanicInfo;
    use log::info;
    use serpent_hal::InterruptController;
    use serpent_kernel::arch::x86_64::{self, interrupts, pic::LegacyPics, vga, vga::Color};
    use serpent_kernel::boot;
    use serpent_kernel::terminal::KEYBOARD;
    use serpent_kernel::{println, selftest, serial_println};

    entry_point!(kernel_main);

    /// Kernel entry point.
    ///
    /// Called by the bootloader after setting up the initial environment.
    fn kernel_main(_boot_info: &'static BootInfo) -> ! {
        serpent_kernel::init();

        vga::clear_screen();
        boot::banner::print_banner();
        boot::log_ok("Serial port initialized");

        interrupts::init_idt();
        boot::log_ok("IDT loaded");
        boot::log_ok("PICs remapped to vectors 32-47");
        boot::log_detail("IRQ 0: timer, IRQ 1: keyboard");

        selftest::run_all();
        boot::log_ok("Self-check passed");

        println!();
        vga::set_color(Color::Cyan, Color::Black);
        println!(" Type 'help' for available commands.\n");
        vga::set_color(Color::White, Color::Black);

        vga::with_console(|console| KEYBOARD.lock().router().prompt(console));
        LegacyPics.enable();
        info!("interrupts enabled, waiting for input");

        while !interrupts::shutdown_requested() {
            x86_64::hlt();
        }

        LegacyPics.disable();
        info!("halted after {} timer ticks", interrupts::ticks());
        x86_64::halt_loop()
    }

    /// Panic handler.
    ///
    /// Called when the kernel encounters an unrecoverable error.
    #[panic_handler]
    fn panic(info: &PanicInfo) -> ! {
        serial_println!("KERNEL PANIC: {}", info);

        vga::set_color(Color::LightRed, Color::Black);
        println!("\n\n!!! KERNEL PANIC !!!");
        vga::set_color(Color::White, Color::Black);
        println!("{}", info);

        x86_64::halt_loop()
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
