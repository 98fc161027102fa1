//! # Address Space (x86-64, PML4-rooted)
//!
//! Handle to one tree of page tables below a root (PML4) frame.
//!
//! - [`AddressSpace::allocate`] takes a fresh, zeroed root from a [`FrameAlloc`].
//! - [`AddressSpace::walk_or_create`] links missing intermediate tables down
//!   to the PT that holds the leaf for a virtual address.
//! - [`AddressSpace::map_4k`] installs one 4 KiB leaf.
//! - [`AddressSpace::leaf`] and [`AddressSpace::query`] read the tree back.
//! - [`AddressSpace::activate`] loads CR3 with the root.
//!
//! ## Safety
//!
//! Mutating the **active** space needs TLB maintenance (`invlpg` or a CR3
//! reload). The kernel only builds a space before activating it, so none is
//! done here.

use crate::{FrameAlloc, Level, PageTable, PageTableEntry, PhysMapper, WalkError};
use kernel_memory_addresses::{PhysicalAddress, PhysicalPage, VirtualAddress};

/// Handle to a single, concrete address space.
pub struct AddressSpace<'m, M: PhysMapper> {
    root: PhysicalPage,
    mapper: &'m M,
}

impl<'m, M: PhysMapper> AddressSpace<'m, M> {
    /// Use an existing root table.
    #[inline]
    pub const fn from_root(mapper: &'m M, root: PhysicalPage) -> Self {
        Self { root, mapper }
    }

    /// Allocate and clear a new root table.
    ///
    /// Returns `None` if the allocator is exhausted.
    pub fn allocate<A: FrameAlloc>(mapper: &'m M, alloc: &mut A) -> Option<Self> {
        let root = alloc.alloc_4k()?;
        let space = Self::from_root(mapper, root);
        space.table_mut(root).zero();
        Some(space)
    }

    /// Frame of the root (PML4) table.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> PhysicalPage {
        self.root
    }

    #[inline]
    #[allow(clippy::mut_from_ref)]
    fn table_mut(&self, page: PhysicalPage) -> &'m mut PageTable {
        // SAFETY: every frame reached here is either the root or was linked
        // as a table by `walk_or_create`, and the mapper covers it.
        unsafe { self.mapper.phys_to_mut::<PageTable>(page.base()) }
    }

    /// Frame of the PT that holds the leaf for `va`, if the chain exists.
    #[must_use]
    pub fn walk(&self, va: VirtualAddress) -> Option<PhysicalPage> {
        let mut table = self.root;
        for level in [Level::Pml4, Level::Pdpt, Level::Pd] {
            table = self.table_mut(table).get(level.index(va)).next_table()?;
        }
        Some(table)
    }

    /// Frame of the PT that holds the leaf for `va`, creating zeroed
    /// intermediate tables on the way.
    ///
    /// # Errors
    /// - [`WalkError::OutOfMemory`] when a missing table cannot be allocated.
    ///   Tables linked before the failure stay linked.
    /// - [`WalkError::HugePage`] when a huge leaf covers `va`.
    pub fn walk_or_create<A: FrameAlloc>(
        &self,
        alloc: &mut A,
        va: VirtualAddress,
    ) -> Result<PhysicalPage, WalkError> {
        let mut table = self.root;
        for level in [Level::Pml4, Level::Pdpt, Level::Pd] {
            let tbl = self.table_mut(table);
            let index = level.index(va);
            let entry = tbl.get(index);

            table = if let Some(next) = entry.next_table() {
                next
            } else if entry.present() {
                return Err(WalkError::HugePage { va, level });
            } else {
                let next_level = level.next().unwrap_or(Level::Pt);
                let frame = alloc.alloc_4k().ok_or(WalkError::OutOfMemory {
                    va,
                    level: next_level,
                })?;
                self.table_mut(frame).zero();
                tbl.set(index, PageTableEntry::table(frame));
                frame
            };
        }
        Ok(table)
    }

    /// Map the 4 KiB page at `va` to the frame `pa`.
    ///
    /// # Errors
    /// Propagates failures from [`walk_or_create`](Self::walk_or_create).
    pub fn map_4k<A: FrameAlloc>(
        &self,
        alloc: &mut A,
        va: VirtualAddress,
        pa: PhysicalPage,
        writable: bool,
    ) -> Result<(), WalkError> {
        debug_assert!(va.is_page_aligned(), "virtual address not 4 KiB aligned");
        let pt = self.walk_or_create(alloc, va)?;
        self.table_mut(pt)
            .set(Level::Pt.index(va), PageTableEntry::leaf(pa, writable));
        Ok(())
    }

    /// The leaf entry for `va`, if present.
    #[must_use]
    pub fn leaf(&self, va: VirtualAddress) -> Option<PageTableEntry> {
        let pt = self.walk(va)?;
        let entry = self.table_mut(pt).get(Level::Pt.index(va));
        entry.present().then_some(entry)
    }

    /// Translate `va` to the physical address it maps to.
    #[must_use]
    pub fn query(&self, va: VirtualAddress) -> Option<PhysicalAddress> {
        let leaf = self.leaf(va)?;
        Some(leaf.page().base() + va.page_offset())
    }

    /// Load CR3 with this space's root.
    ///
    /// # Safety
    /// The currently executing code, its stack and every static it touches
    /// must be mapped in this space at their current addresses.
    #[cfg(all(feature = "asm", target_arch = "x86_64"))]
    #[inline]
    pub unsafe fn activate(&self) {
        use kernel_registers::StoreRegisterUnsafe;
        use kernel_registers::cr3::Cr3;

        unsafe { Cr3::from_root(self.root).store_unsafe() };
    }
}
