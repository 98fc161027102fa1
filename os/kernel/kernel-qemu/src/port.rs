//! # x86 I/O Port Access
//!
//! `out` instructions for the few legacy ports the kernel writes to. On
//! hosted targets there is no port bus and the writes are discarded.

/// Write one byte to an I/O port.
///
/// # Safety
/// Ring 0 (or an I/O bitmap granting `port`). `port` must belong to a device
/// for which `val` is a harmless write.
#[inline]
pub unsafe fn outb(port: u16, val: u8) {
    #[cfg(all(target_arch = "x86_64", target_os = "none"))]
    unsafe {
        core::arch::asm!("out dx, al", in("dx") port, in("al") val, options(nomem, nostack, preserves_flags));
    }
    #[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
    let _ = (port, val);
}

/// Write one 16-bit word to an I/O port.
///
/// # Safety
/// As for [`outb`].
#[inline]
pub unsafe fn outw(port: u16, val: u16) {
    #[cfg(all(target_arch = "x86_64", target_os = "none"))]
    unsafe {
        core::arch::asm!("out dx, ax", in("dx") port, in("ax") val, options(nomem, nostack, preserves_flags));
    }
    #[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
    let _ = (port, val);
}
