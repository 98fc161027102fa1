use bitfield_struct::bitfield;
use kernel_memory_addresses::{PAGE_SHIFT, PhysicalAddress, PhysicalPage};

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
use crate::{LoadRegisterUnsafe, StoreRegisterUnsafe};

/// CR3 with PCID disabled.
///
/// Points the MMU at the physical frame of the top-level (PML4) table.
#[bitfield(u64)]
pub struct Cr3 {
    #[bits(3, default = 0)]
    _reserved_0_2: u8,

    /// Bit 3 — Page-level Write-Through for the PML4 access.
    pub write_through: bool,

    /// Bit 4 — Page-level Cache Disable for the PML4 access.
    pub cache_disable: bool,

    #[bits(7, default = 0)]
    _reserved_5_11: u8,

    /// Bits 12–51 — Frame number of the PML4 table.
    #[bits(40)]
    root_frame: u64,

    #[bits(12, default = 0)]
    _reserved_52_63: u16,
}

impl Cr3 {
    /// Value selecting `root` as the top-level table, with default caching.
    #[must_use]
    pub const fn from_root(root: PhysicalPage) -> Self {
        Self::new().with_root_frame(root.number())
    }

    /// Frame of the top-level table.
    #[must_use]
    pub const fn root(&self) -> PhysicalPage {
        PhysicalPage::from_number(self.root_frame())
    }

    /// Physical address of the top-level table.
    #[must_use]
    pub const fn root_address(&self) -> PhysicalAddress {
        PhysicalAddress::new(self.root_frame() << PAGE_SHIFT)
    }
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl LoadRegisterUnsafe for Cr3 {
    unsafe fn load_unsafe() -> Self {
        let mut cr3: u64;
        unsafe {
            core::arch::asm!("mov {}, cr3", out(reg) cr3, options(nomem, nostack, preserves_flags));
        }
        Self::from_bits(cr3)
    }
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl StoreRegisterUnsafe for Cr3 {
    unsafe fn store_unsafe(self) {
        let cr3 = self.into_bits();
        unsafe {
            core::arch::asm!("mov cr3, {}", in(reg) cr3, options(nostack, preserves_flags));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_frame_lands_in_bits_12_and_up() {
        let cr3 = Cr3::from_root(PhysicalPage::from_number(0x1234));
        assert_eq!(cr3.into_bits(), 0x0123_4000);
        assert_eq!(cr3.root_address(), PhysicalAddress::new(0x0123_4000));
        assert!(!cr3.write_through());
        assert!(!cr3.cache_disable());
    }

    #[test]
    fn low_flag_bits_do_not_leak_into_root() {
        let cr3 = Cr3::from_bits(0x0000_0000_0040_0018);
        assert!(cr3.write_through());
        assert!(cr3.cache_disable());
        assert_eq!(cr3.root().number(), 0x400);
    }

    #[test]
    fn root_value_can_be_built_at_compile_time() {
        const BOOT: Cr3 = Cr3::from_root(PhysicalPage::from_number(0x10));
        assert_eq!(BOOT.root(), PhysicalPage::from_number(0x10));
        assert_eq!(BOOT.into_bits(), 0x1_0000);
    }
}
