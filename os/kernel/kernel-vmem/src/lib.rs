//! # Virtual Memory Support
//!
//! x86-64 four-level paging for the kernel's own address space.
//!
//! ## What you get
//! - A 4 KiB-aligned [`PageTable`] of 512 [`PageTableEntry`] values.
//! - An [`AddressSpace`] handle that walks, creates and queries the tree
//!   below one root (PML4) table.
//! - The [`bootstrap`] routine that maps all of physical memory at the
//!   kernel offset and write-protects the kernel text.
//! - A tiny allocator/mapper interface ([`FrameAlloc`], [`PhysMapper`]) so
//!   the same code runs against real frames in the kernel and against a
//!   `Vec` of frames in host tests.
//!
//! ## Virtual address split
//!
//! ```text
//! | 47‒39 | 38‒30 | 29‒21 | 20‒12 | 11‒0   |
//! |  PML4 |  PDPT |   PD  |   PT  | Offset |
//! ```
//!
//! Each field indexes one of 512 eight-byte entries at its [`Level`]. The
//! kernel map only ever installs 4 KiB leaves, so every walk that succeeds
//! ends in a PT entry.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod address_space;
pub mod bootstrap;
mod entry;
mod error;
mod table;

#[cfg(test)]
mod test_support;

pub use crate::address_space::AddressSpace;
pub use crate::bootstrap::{KernelLayout, KernelMap, MapStats, build_kernel_address_space};
pub use crate::entry::PageTableEntry;
pub use crate::error::{BootstrapError, WalkError};
pub use crate::table::{ENTRIES, Level, PageTable};

/// Re-export constants as info module.
pub use kernel_info::memory as info;

use kernel_memory_addresses::{PhysicalAddress, PhysicalPage};

/// Source of **physical** 4 KiB frames for page tables.
///
/// Frames need not be zeroed; [`AddressSpace`] clears every table it links.
/// Returns `None` when no frame is left.
pub trait FrameAlloc {
    fn alloc_4k(&mut self) -> Option<PhysicalPage>;
}

/// Turns physical addresses into references in the current address space.
///
/// The kernel adds [`KERNEL_BASE`](kernel_info::memory::KERNEL_BASE);
/// host tests index into a vector of frames.
pub trait PhysMapper {
    /// # Safety
    /// - `pa` must be mapped writable for the whole of `'a`.
    /// - The bytes at `pa` must be a valid `T` and must not be aliased by
    ///   another live reference.
    unsafe fn phys_to_mut<'a, T>(&self, pa: PhysicalAddress) -> &'a mut T;
}
