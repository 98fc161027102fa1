use crate::PageTableEntry;
use core::fmt;
use kernel_memory_addresses::{PAGE_SHIFT, VirtualAddress};

/// Entries per table at every level.
pub const ENTRIES: usize = 512;

/// One 4 KiB page table.
///
/// The same layout serves as PML4, PDPT, PD and PT.
#[repr(C, align(4096))]
pub struct PageTable {
    entries: [PageTableEntry; ENTRIES],
}

const _: () = {
    assert!(size_of::<PageTable>() == 4096);
    assert!(align_of::<PageTable>() == 4096);
};

impl PageTable {
    /// Clear all entries to not-present.
    #[inline]
    pub fn zero(&mut self) {
        self.entries.fill(PageTableEntry::zero());
    }

    #[inline]
    #[must_use]
    pub const fn get(&self, index: usize) -> PageTableEntry {
        self.entries[index]
    }

    #[inline]
    pub const fn set(&mut self, index: usize, entry: PageTableEntry) {
        self.entries[index] = entry;
    }

    /// Number of present entries.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.entries.iter().filter(|e| e.present()).count()
    }
}

/// Paging level, from the root downwards.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Level {
    Pml4,
    Pdpt,
    Pd,
    Pt,
}

impl Level {
    /// Levels in walk order.
    pub const WALK: [Self; 4] = [Self::Pml4, Self::Pdpt, Self::Pd, Self::Pt];

    const fn shift(self) -> u32 {
        PAGE_SHIFT
            + 9 * match self {
                Self::Pml4 => 3,
                Self::Pdpt => 2,
                Self::Pd => 1,
                Self::Pt => 0,
            }
    }

    /// Index of `va` in a table at this level.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index(self, va: VirtualAddress) -> usize {
        ((va.as_u64() >> self.shift()) & 0x1ff) as usize
    }

    /// The level a link at this level points to.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pml4 => Some(Self::Pdpt),
            Self::Pdpt => Some(Self::Pd),
            Self::Pd => Some(Self::Pt),
            Self::Pt => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pml4 => "PML4",
            Self::Pdpt => "PDPT",
            Self::Pd => "PD",
            Self::Pt => "PT",
        })
    }
}
