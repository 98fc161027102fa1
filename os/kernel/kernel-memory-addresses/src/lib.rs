//! # Virtual and Physical Memory Address Types
//!
//! Zero-cost wrappers that keep physical and virtual addresses apart at the
//! type level while the kernel builds its first page tables.
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`PhysicalAddress`] | A byte address in physical memory (RAM or MMIO). |
//! | [`VirtualAddress`] | A byte address translated by the page tables. |
//! | [`PhysicalPage`] | A 4 KiB-aligned physical frame. |
//!
//! Only the 4 KiB base page size is modelled; the early kernel map never
//! uses huge pages.
//!
//! ```rust
//! # use kernel_memory_addresses::*;
//! let pa = PhysicalAddress::new(0x0020_1234);
//! let frame = pa.page();
//! assert_eq!(frame.base().as_u64(), 0x0020_1000);
//! assert_eq!(pa.page_offset(), 0x234);
//! assert_eq!(frame.number(), 0x201);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

use core::fmt;
use core::ops::{Add, AddAssign, Sub};

/// log2 of the base page size.
pub const PAGE_SHIFT: u32 = 12;

/// Base page size in bytes (4 KiB).
pub const PAGE_SIZE: u64 = 1 << PAGE_SHIFT;

/// Mask selecting the in-page offset bits.
pub const PAGE_MASK: u64 = PAGE_SIZE - 1;

macro_rules! address_type {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name(u64);

        impl $name {
            #[inline]
            #[must_use]
            pub const fn new(v: u64) -> Self {
                Self(v)
            }

            #[inline]
            #[must_use]
            pub const fn zero() -> Self {
                Self(0)
            }

            #[inline]
            #[must_use]
            pub const fn as_u64(self) -> u64 {
                self.0
            }

            /// Byte offset of this address inside its 4 KiB page.
            #[inline]
            #[must_use]
            pub const fn page_offset(self) -> u64 {
                self.0 & PAGE_MASK
            }

            #[inline]
            #[must_use]
            pub const fn is_page_aligned(self) -> bool {
                self.page_offset() == 0
            }

            /// Round down to the enclosing page boundary.
            #[inline]
            #[must_use]
            pub const fn align_down(self) -> Self {
                Self(self.0 & !PAGE_MASK)
            }

            /// Round up to the next page boundary.
            ///
            /// Returns `None` if the result does not fit into 64 bits.
            #[inline]
            #[must_use]
            pub const fn checked_align_up(self) -> Option<Self> {
                match self.0.checked_add(PAGE_MASK) {
                    Some(v) => Some(Self(v & !PAGE_MASK)),
                    None => None,
                }
            }

            #[inline]
            #[must_use]
            pub const fn checked_add(self, rhs: u64) -> Option<Self> {
                match self.0.checked_add(rhs) {
                    Some(v) => Some(Self(v)),
                    None => None,
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "(0x{:016X})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{:016X}", self.0)
            }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(v: u64) -> Self {
                Self(v)
            }
        }

        impl Add<u64> for $name {
            type Output = Self;

            #[inline]
            fn add(self, rhs: u64) -> Self::Output {
                Self(self.0 + rhs)
            }
        }

        impl AddAssign<u64> for $name {
            #[inline]
            fn add_assign(&mut self, rhs: u64) {
                self.0 += rhs;
            }
        }

        impl Sub for $name {
            type Output = u64;

            #[inline]
            fn sub(self, rhs: Self) -> Self::Output {
                self.0 - rhs.0
            }
        }
    };
}

address_type!(
    /// Physical memory address.
    ///
    /// Carries intent only: no range or canonicality checks are performed.
    PhysicalAddress,
    "PA"
);

address_type!(
    /// Virtual memory address.
    ///
    /// Not validated for canonical form; the page-table walk only looks at
    /// bits 47..12.
    VirtualAddress,
    "VA"
);

impl PhysicalAddress {
    /// The 4 KiB frame containing this address.
    #[inline]
    #[must_use]
    pub const fn page(self) -> PhysicalPage {
        PhysicalPage(self.align_down())
    }
}

impl VirtualAddress {
    #[inline]
    #[must_use]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as u64)
    }

    #[inline]
    #[must_use]
    pub const fn as_mut_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }
}

/// A 4 KiB-aligned physical frame.
///
/// The base address is always page aligned; construction from an unaligned
/// address rounds down.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PhysicalPage(PhysicalAddress);

impl PhysicalPage {
    /// Frame containing `pa` (rounds down).
    #[inline]
    #[must_use]
    pub const fn containing(pa: PhysicalAddress) -> Self {
        pa.page()
    }

    /// Frame starting at `pa`.
    ///
    /// ### Debug assertions
    /// - Asserts `pa` is 4 KiB aligned.
    #[inline]
    #[must_use]
    pub const fn from_addr(pa: PhysicalAddress) -> Self {
        debug_assert!(pa.is_page_aligned(), "frame base not 4 KiB aligned");
        pa.page()
    }

    /// Frame with the given frame number (`base >> 12`).
    #[inline]
    #[must_use]
    pub const fn from_number(number: u64) -> Self {
        Self(PhysicalAddress::new(number << PAGE_SHIFT))
    }

    #[inline]
    #[must_use]
    pub const fn base(self) -> PhysicalAddress {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn number(self) -> u64 {
        self.0.as_u64() >> PAGE_SHIFT
    }
}

impl fmt::Debug for PhysicalPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame(0x{:016X})", self.0.as_u64())
    }
}

impl fmt::Display for PhysicalPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<PhysicalPage> for PhysicalAddress {
    #[inline]
    fn from(page: PhysicalPage) -> Self {
        page.base()
    }
}
