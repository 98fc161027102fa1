//! Kernel image boundaries from `kernel.ld`.

use core::ops::Range;
use kernel_memory_addresses::VirtualAddress;

unsafe extern "C" {
    static _start_kernel_text: u8;
    static _end_kernel_text: u8;
    static _start_bss: u8;
    static _end_bss: u8;
    static _end_kernel: u8;
}

fn symbol(sym: *const u8) -> VirtualAddress {
    VirtualAddress::from_ptr(sym)
}

/// Executable code, page aligned at the end.
pub fn text() -> Range<VirtualAddress> {
    symbol(&raw const _start_kernel_text)..symbol(&raw const _end_kernel_text)
}

/// Zero-initialized data.
pub fn bss() -> Range<VirtualAddress> {
    symbol(&raw const _start_bss)..symbol(&raw const _end_bss)
}

/// First page after the image, boot stack included.
pub fn end() -> VirtualAddress {
    symbol(&raw const _end_kernel)
}
