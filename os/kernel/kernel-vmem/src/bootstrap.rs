//! # Kernel Address Space Bootstrap
//!
//! Builds the page tables the kernel runs on for the rest of its life:
//!
//! ```text
//!  virtual                                   physical
//!  KERNEL_BASE + 0 ─────────────────────────► 0
//!       …            one 4 KiB leaf per frame   …
//!  KERNEL_BASE + mem_end ───────────────────► mem_end (exclusive)
//! ```
//!
//! Every leaf is `present | writable`, except pages inside the kernel text
//! which are `present` only. Together with `CR0.WP` this makes stray
//! writes into kernel code fault instead of silently patching it.
//!
//! A `mem_end` that is not page aligned is rounded down: the partial frame
//! at the top is left unmapped.

use crate::{AddressSpace, BootstrapError, FrameAlloc, PhysMapper};
use core::ops::Range;
use kernel_info::memory::ptov;
use kernel_memory_addresses::{PAGE_SIZE, PhysicalAddress, PhysicalPage, VirtualAddress};
use log::{debug, info};

/// What to map.
#[derive(Debug, Clone)]
pub struct KernelLayout {
    /// Exclusive end of usable physical memory.
    pub mem_end: PhysicalAddress,
    /// Virtual range of the kernel's code, mapped read-only.
    pub kernel_text: Range<VirtualAddress>,
}

/// Counters collected while building the map.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct MapStats {
    /// Leaves installed.
    pub pages: u64,
    /// Leaves installed without write permission.
    pub read_only: u64,
    /// Page-table frames allocated, root included.
    pub tables: u64,
}

/// A finished kernel map, ready to be activated.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KernelMap {
    pub root: PhysicalPage,
    pub stats: MapStats,
}

/// Whether the leaf for the page at `va` may be written to.
#[inline]
#[must_use]
pub fn leaf_writable(va: VirtualAddress, kernel_text: &Range<VirtualAddress>) -> bool {
    !kernel_text.contains(&va)
}

/// Counts frames handed out by the wrapped allocator.
struct Counting<'a, A> {
    inner: &'a mut A,
    count: u64,
}

impl<A: FrameAlloc> FrameAlloc for Counting<'_, A> {
    fn alloc_4k(&mut self) -> Option<PhysicalPage> {
        let frame = self.inner.alloc_4k()?;
        self.count += 1;
        Some(frame)
    }
}

/// Build a fresh root table mapping `[0, mem_end)` at the kernel offset.
///
/// The returned root is not active yet; loading it into CR3 is up to the
/// caller.
///
/// # Errors
/// - [`BootstrapError::RootTable`] if not even the root can be allocated.
/// - [`BootstrapError::OutOfMemory`] with the virtual address being mapped
///   when an intermediate table cannot be allocated. There is no partial
///   result; the frames already taken are lost.
pub fn build_kernel_address_space<M: PhysMapper, A: FrameAlloc>(
    mapper: &M,
    alloc: &mut A,
    layout: &KernelLayout,
) -> Result<KernelMap, BootstrapError> {
    let mem_end = layout.mem_end.align_down();
    debug!(
        "Mapping physical memory up to {mem_end} at {}, text {}..{} read-only",
        ptov(PhysicalAddress::zero()),
        layout.kernel_text.start,
        layout.kernel_text.end
    );

    let mut alloc = Counting {
        inner: alloc,
        count: 0,
    };
    let space = AddressSpace::allocate(mapper, &mut alloc).ok_or(BootstrapError::RootTable)?;

    let mut stats = MapStats::default();
    let mut pa = PhysicalAddress::zero();
    while pa < mem_end {
        let va = ptov(pa);
        let writable = leaf_writable(va, &layout.kernel_text);
        space.map_4k(&mut alloc, va, pa.page(), writable)?;

        stats.pages += 1;
        if !writable {
            stats.read_only += 1;
        }
        pa += PAGE_SIZE;
    }
    stats.tables = alloc.count;

    info!(
        "Kernel page tables at {}: {} pages ({} read-only), {} tables",
        space.root(),
        stats.pages,
        stats.read_only,
        stats.tables
    );
    Ok(KernelMap {
        root: space.root(),
        stats,
    })
}
