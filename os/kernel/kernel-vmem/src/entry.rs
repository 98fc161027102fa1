use bitfield_struct::bitfield;
use kernel_memory_addresses::PhysicalPage;

/// One 64-bit x86-64 paging entry, valid at every level.
///
/// | Bits  | Field | Meaning |
/// |-------|-------|---------|
/// | 0     | P     | present |
/// | 1     | RW    | writable |
/// | 2     | US    | user accessible |
/// | 3     | PWT   | write-through |
/// | 4     | PCD   | cache disable |
/// | 5     | A     | accessed |
/// | 6     | D     | dirty (leaf only) |
/// | 7     | PS    | huge page (PDPT/PD only) |
/// | 8     | G     | global (leaf only) |
/// | 9–11  |       | available to software |
/// | 12–51 |       | frame number |
/// | 52–62 |       | available to software |
/// | 63    | XD    | execute disable |
///
/// For a non-leaf entry the frame is the next table; for a leaf it is the
/// mapped page.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct PageTableEntry {
    pub present: bool,
    pub writable: bool,
    pub user: bool,
    pub write_through: bool,
    pub cache_disable: bool,
    pub accessed: bool,
    pub dirty: bool,
    pub huge: bool,
    pub global: bool,

    #[bits(3)]
    pub available_low: u8,

    #[bits(40)]
    frame: u64,

    #[bits(11)]
    pub available_high: u16,

    pub execute_disable: bool,
}

impl PageTableEntry {
    /// A not-present entry with every bit clear.
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self::new()
    }

    /// Link to a next-level table: present and writable.
    ///
    /// The leaf decides the effective permission; intermediate levels never
    /// restrict it.
    #[inline]
    #[must_use]
    pub const fn table(next: PhysicalPage) -> Self {
        Self::new()
            .with_present(true)
            .with_writable(true)
            .with_frame(next.number())
    }

    /// 4 KiB leaf mapping `page`, writable or read-only.
    #[inline]
    #[must_use]
    pub const fn leaf(page: PhysicalPage, writable: bool) -> Self {
        Self::new()
            .with_present(true)
            .with_writable(writable)
            .with_frame(page.number())
    }

    /// Frame referenced by this entry.
    #[inline]
    #[must_use]
    pub const fn page(&self) -> PhysicalPage {
        PhysicalPage::from_number(self.frame())
    }

    /// The next-level table, if this entry links to one.
    #[inline]
    #[must_use]
    pub const fn next_table(&self) -> Option<PhysicalPage> {
        if self.present() && !self.huge() {
            Some(self.page())
        } else {
            None
        }
    }
}
