//! # Power Off and Halt

use crate::port::outw;

/// ACPI PM1a control port as wired by QEMU's and Bochs' `-M pc` machines.
pub const POWER_OFF_PORT: u16 = 0x604;

/// `SLP_EN` with sleep type 0 (S5, soft off).
pub const POWER_OFF_VALUE: u16 = 0x2000;

/// Switch the virtual machine off.
///
/// Falls back to [`halt`] if the write has no effect, e.g. on real
/// hardware.
pub fn power_off() -> ! {
    // SAFETY: writing S5 to PM1a_CNT has no effect other than powering off.
    unsafe { outw(POWER_OFF_PORT, POWER_OFF_VALUE) };
    halt()
}

/// Disable interrupts and stop the CPU for good.
pub fn halt() -> ! {
    loop {
        #[cfg(all(target_arch = "x86_64", target_os = "none"))]
        unsafe {
            core::arch::asm!("cli; hlt", options(nomem, nostack));
        }
        #[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
        core::hint::spin_loop();
    }
}
