use bitfield_struct::bitfield;

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
use crate::{LoadRegisterUnsafe, StoreRegisterUnsafe};

/// CR0 in 64-bit mode.
///
/// Reserved bits are kept private and default to zero.
#[bitfield(u64)]
pub struct Cr0 {
    /// Bit 0 — Protection Enable (PE).
    pub protection_enable: bool,

    /// Bit 1 — Monitor Coprocessor (MP).
    pub monitor_coprocessor: bool,

    /// Bit 2 — Emulation (EM).
    pub emulation: bool,

    /// Bit 3 — Task Switched (TS).
    pub task_switched: bool,

    /// Bit 4 — Extension Type (ET). Hard-wired to 1 on modern CPUs.
    pub extension_type: bool,

    /// Bit 5 — Numeric Error (NE).
    pub numeric_error: bool,

    #[bits(10, default = 0)]
    _reserved_6_15: u16,

    /// Bit 16 — Write Protect (WP).
    ///
    /// When set, ring 0 faults on writes to read-only pages just like
    /// user code does. Without it, the read-only kernel text mapping is
    /// advisory only.
    pub write_protect: bool,

    #[bits(default = 0)]
    _reserved_17: bool,

    /// Bit 18 — Alignment Mask (AM).
    pub alignment_mask: bool,

    #[bits(10, default = 0)]
    _reserved_19_28: u16,

    /// Bit 29 — Not-Write-Through (NW).
    pub not_write_through: bool,

    /// Bit 30 — Cache Disable (CD).
    pub cache_disable: bool,

    /// Bit 31 — Paging (PG).
    pub paging: bool,

    #[bits(32, default = 0)]
    _reserved_32_63: u32,
}

impl Cr0 {
    /// Turn on [`write_protect`](Self::write_protect) in the live register.
    ///
    /// # Safety
    /// Ring 0 only. Any code that relies on writing to read-only pages from
    /// supervisor mode breaks afterwards.
    #[cfg(all(feature = "asm", target_arch = "x86_64"))]
    pub unsafe fn enable_write_protect() {
        unsafe {
            let cr0 = Self::load_unsafe();
            cr0.with_write_protect(true).store_unsafe();
        }
    }
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl LoadRegisterUnsafe for Cr0 {
    unsafe fn load_unsafe() -> Self {
        let mut cr0: u64;
        unsafe {
            core::arch::asm!("mov {}, cr0", out(reg) cr0, options(nomem, nostack, preserves_flags));
        }
        Self::from_bits(cr0)
    }
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl StoreRegisterUnsafe for Cr0 {
    unsafe fn store_unsafe(self) {
        let cr0 = self.into_bits();
        unsafe {
            core::arch::asm!("mov cr0, {}", in(reg) cr0, options(nostack, preserves_flags));
        }
    }
}
