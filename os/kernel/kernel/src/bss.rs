//! # `.bss` Zeroing
//!
//! The loader copies the image's file-backed sections only; `.bss` holds
//! whatever was in RAM before. [`clear`] zeroes it from the linker symbols.

use crate::image;

/// Zero every byte in `[_start_bss, _end_bss)`.
///
/// # Safety
/// Must run exactly once, first thing after the entry stub, before any
/// zero-initialized static is read. The current stack must not live in
/// `.bss`.
pub unsafe fn clear() {
    let bss = image::bss();
    let len = usize::try_from(bss.end - bss.start).unwrap_or(0);
    unsafe { core::ptr::write_bytes(bss.start.as_mut_ptr::<u8>(), 0, len) };
}
