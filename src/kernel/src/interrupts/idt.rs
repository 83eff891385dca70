//! The Interrupt Descriptor Table.
//!
//! Gates use the long-mode layout: the handler address is split into
//! low/mid/high parts around the selector and attribute bytes.

use super::EXCEPTION_VECTORS;
use serpent_common::GateFlags;

/// Kernel code segment selector (GDT entry 1).
pub const KERNEL_CODE_SELECTOR: u16 = 0x08;

/// Number of entries in the table.
pub const VECTOR_COUNT: usize = 256;

/// Address of an interrupt entry stub.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct HandlerAddr(u64);

impl HandlerAddr {
    /// The null address; a gate pointing here is never dispatchable.
    pub const NULL: HandlerAddr = HandlerAddr(0);

    /// Wraps a raw address.
    pub const fn new(addr: u64) -> Self {
        HandlerAddr(addr)
    }

    /// Returns the raw address.
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns `true` for the null address.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// A single 16-byte gate descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct GateEntry {
    offset_low: u16,
    selector: u16,
    ist: u8,
    flags: u8,
    offset_mid: u16,
    offset_high: u32,
    reserved: u32,
}

impl GateEntry {
    /// An absent gate.
    pub const fn missing() -> Self {
        GateEntry {
            offset_low: 0,
            selector: 0,
            ist: 0,
            flags: 0,
            offset_mid: 0,
            offset_high: 0,
            reserved: 0,
        }
    }

    /// A present ring 0 interrupt gate pointing at `handler`.
    pub const fn interrupt(handler: HandlerAddr) -> Self {
        let addr = handler.as_u64();
        GateEntry {
            offset_low: addr as u16,
            selector: KERNEL_CODE_SELECTOR,
            ist: 0,
            flags: GateFlags::KERNEL_INTERRUPT.bits(),
            offset_mid: (addr >> 16) as u16,
            offset_high: (addr >> 32) as u32,
            reserved: 0,
        }
    }

    /// Reassembles the handler address.
    pub const fn handler(&self) -> HandlerAddr {
        HandlerAddr::new(
            self.offset_low as u64
                | (self.offset_mid as u64) << 16
                | (self.offset_high as u64) << 32,
        )
    }

    /// Returns the code segment selector.
    pub const fn selector(&self) -> u16 {
        self.selector
    }

    /// Returns the type/attribute byte.
    pub const fn flags(&self) -> GateFlags {
        GateFlags::from_bits_retain(self.flags)
    }

    /// Returns `true` if the present bit is set.
    pub const fn is_present(&self) -> bool {
        self.flags().is_present()
    }
}

/// The 256-entry vector table.
///
/// All entries exist for the table's lifetime; unused ones are absent.
#[repr(C, align(16))]
pub struct VectorTable {
    entries: [GateEntry; VECTOR_COUNT],
}

impl VectorTable {
    /// Creates a table with every entry absent.
    pub const fn new() -> Self {
        VectorTable {
            entries: [GateEntry::missing(); VECTOR_COUNT],
        }
    }

    /// Marks every entry absent, then installs the 32 exception stubs.
    pub fn initialize(&mut self, fault_stubs: &[HandlerAddr; EXCEPTION_VECTORS]) {
        self.entries = [GateEntry::missing(); VECTOR_COUNT];
        for (vector, stub) in fault_stubs.iter().enumerate() {
            self.entries[vector] = GateEntry::interrupt(*stub);
        }
    }

    /// Points `vector` at `handler`, replacing whatever was there.
    ///
    /// A null address leaves the gate absent.
    pub fn install(&mut self, vector: u8, handler: HandlerAddr) {
        self.entries[usize::from(vector)] = if handler.is_null() {
            GateEntry::missing()
        } else {
            GateEntry::interrupt(handler)
        };
    }

    /// Returns the gate at `vector`.
    pub fn entry(&self, vector: u8) -> &GateEntry {
        &self.entries[usize::from(vector)]
    }

    /// Returns `true` if the CPU can dispatch through `vector`.
    pub fn is_dispatchable(&self, vector: u8) -> bool {
        let entry = self.entry(vector);
        entry.is_present() && !entry.handler().is_null()
    }

    /// Value for the `limit` field of the descriptor table register.
    pub const fn limit() -> u16 {
        (core::mem::size_of::<[GateEntry; VECTOR_COUNT]>() - 1) as u16
    }

    /// Points the processor at this table.
    ///
    /// Loading twice is harmless.
    ///
    /// # Safety
    ///
    /// The table must stay at its current address, and stay valid, for as
    /// long as it is the loaded table. Gates installed afterwards take effect
    /// without reloading.
    #[cfg(target_arch = "x86_64")]
    pub unsafe fn load(&self) {
        use x86_64::instructions::tables::lidt;
        use x86_64::structures::DescriptorTablePointer;
        use x86_64::VirtAddr;

        let pointer = DescriptorTablePointer {
            limit: Self::limit(),
            base: VirtAddr::new(self.entries.as_ptr() as u64),
        };
        // SAFETY: the caller guarantees the table outlives its use by the CPU.
        unsafe { lidt(&pointer) };
    }
}

impl Default for VectorTable {
    fn default() -> Self {
        Self::new()
    }
}
