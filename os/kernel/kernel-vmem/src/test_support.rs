//! Fake physical memory for host tests.

use crate::{FrameAlloc, PhysMapper};
use core::cell::UnsafeCell;
use kernel_memory_addresses::{PhysicalAddress, PhysicalPage};

/// Hands out frames `next..end` in order, with no reuse.
pub struct BumpAlloc {
    start: u64,
    next: u64,
    end: u64,
}

impl BumpAlloc {
    /// Allocator over frame numbers `[start, end)`.
    pub const fn new(start: u64, end: u64) -> Self {
        Self {
            start,
            next: start,
            end,
        }
    }

    pub const fn used(&self) -> u64 {
        self.next - self.start
    }
}

impl FrameAlloc for BumpAlloc {
    fn alloc_4k(&mut self) -> Option<PhysicalPage> {
        if self.next >= self.end {
            return None;
        }
        let frame = PhysicalPage::from_number(self.next);
        self.next += 1;
        Some(frame)
    }
}

#[repr(C, align(4096))]
struct Aligned4K(#[allow(dead_code)] [u8; 4096]);

/// "Physical RAM" made of 4 KiB-aligned frames; frame `n` backs `n << 12`.
///
/// Frames start out filled with `0xA5` so a table that is not cleared
/// before use shows up as garbage entries.
pub struct TestPhys {
    frames: Box<[UnsafeCell<Aligned4K>]>,
}

impl TestPhys {
    pub fn with_frames(n: usize) -> Self {
        let frames = (0..n)
            .map(|_| UnsafeCell::new(Aligned4K([0xA5; 4096])))
            .collect();
        Self { frames }
    }
}

impl PhysMapper for TestPhys {
    unsafe fn phys_to_mut<'a, T>(&self, pa: PhysicalAddress) -> &'a mut T {
        let idx = usize::try_from(pa.as_u64() >> 12).expect("frame index");
        assert!(idx < self.frames.len(), "{pa:?} outside test memory");
        assert_eq!(pa.page_offset(), 0);

        // SAFETY: the frame is owned by `self`, 4 KiB aligned and large
        // enough for a page table; tests keep `self` alive for `'a`.
        unsafe { &mut *self.frames[idx].get().cast::<T>() }
    }
}
