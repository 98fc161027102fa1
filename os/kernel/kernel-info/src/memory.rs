//! # Memory Layout
//!
//! All of physical memory is reachable at a single offset, [`KERNEL_BASE`].
//! The kernel image lives inside that window as well, so the same offset
//! translates both heap pointers and the addresses of the image's sections.

use kernel_memory_addresses::{PhysicalAddress, VirtualAddress};

/// Base of the kernel's view of physical memory.
///
/// Physical address `pa` is accessible at `KERNEL_BASE + pa`.
///
/// # Kernel Build
/// This information is sourced in the kernel's `build.rs` to configure
/// the linker.
pub const KERNEL_BASE: u64 = 0x0000_0080_0400_0000;

/// Physical address at which the loader places the kernel image (2 MiB).
///
/// # Kernel Build
/// This information is sourced in the kernel's `build.rs` to configure
/// the linker.
pub const LOADER_PHYS_BASE: u64 = 0x0020_0000;

/// Size of the stack the entry point switches to before any Rust code runs.
pub const KERNEL_STACK_SIZE: usize = 32 * 1024;

/// Amount of RAM the kernel's page allocator hands out.
///
/// The loader passes no memory map, so the size is fixed at build time and
/// the machine must be started with at least this much memory.
pub const DEFAULT_RAM_BYTES: u64 = 64 * 1024 * 1024;

const _: () = {
    assert!(KERNEL_STACK_SIZE.is_multiple_of(4096));
    assert!(KERNEL_BASE.is_multiple_of(0x20_0000));
    assert!(LOADER_PHYS_BASE.is_multiple_of(0x20_0000));
    assert!(DEFAULT_RAM_BYTES > LOADER_PHYS_BASE);
};

/// Kernel virtual address of physical address `pa`.
#[inline]
#[must_use]
pub const fn ptov(pa: PhysicalAddress) -> VirtualAddress {
    VirtualAddress::new(pa.as_u64() + KERNEL_BASE)
}

/// Physical address behind kernel virtual address `va`.
///
/// ### Debug assertions
/// - Asserts `va` lies inside the kernel window.
#[inline]
#[must_use]
pub const fn vtop(va: VirtualAddress) -> PhysicalAddress {
    debug_assert!(va.as_u64() >= KERNEL_BASE, "not a kernel virtual address");
    PhysicalAddress::new(va.as_u64() - KERNEL_BASE)
}
