//! # Kernel Entry Point
//!
//! The loader jumps to [`_start`] in long mode with the first part of
//! physical memory mapped at `KERNEL_BASE`. From there:
//!
//! 1. disable interrupts and switch to the boot stack,
//! 2. zero `.bss`,
//! 3. install the QEMU debug-port logger,
//! 4. read the command line the loader left below its partition table,
//! 5. hand over to [`kernel_boot::boot`], which never returns.
//!
//! Only `x86_64-unknown-none` builds the real kernel; on a host target this
//! is a stub so the workspace still builds and tests.

#![cfg_attr(target_os = "none", no_std, no_main)]
#![allow(unsafe_code)]

#[cfg(target_os = "none")]
mod bss;
#[cfg(target_os = "none")]
mod image;
#[cfg(target_os = "none")]
mod paging;
#[cfg(target_os = "none")]
mod platform;
#[cfg(target_os = "none")]
mod services;

#[cfg(target_os = "none")]
mod entry {
    use crate::bss;
    use crate::platform::QemuPlatform;
    use crate::services::{BOOT_OPTIONS, KernelServices};
    use kernel_info::loader::{LOADER_ARG_CNT, LOADER_ARGS, LOADER_ARGS_LEN};
    use kernel_info::memory::{KERNEL_STACK_SIZE, ptov};
    use kernel_memory_addresses::PhysicalAddress;
    use kernel_qemu::{QemuLogger, qemu_trace};
    use log::LevelFilter;

    static LOGGER: QemuLogger = QemuLogger::new(if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    /// 16-byte aligned stack
    #[repr(align(16))]
    struct Aligned<const N: usize>([u8; N]);

    /// Outside `.bss`: it is in use while `.bss` is cleared.
    #[unsafe(link_section = ".boot_stack")]
    static mut BOOT_STACK: Aligned<KERNEL_STACK_SIZE> = Aligned([0; KERNEL_STACK_SIZE]);

    /// The kernel entry point.
    ///
    /// # Naked function & Stack
    /// Nothing about the loader's stack is assumed, so no Rust code may run
    /// before `RSP` points into [`BOOT_STACK`].
    #[unsafe(no_mangle)]
    #[unsafe(naked)]
    #[unsafe(link_section = ".text.entry")]
    pub unsafe extern "C" fn _start() -> ! {
        core::arch::naked_asm!(
            "cli",
            "lea rax, [rip + {stack_sym}]",
            "add rax, {stack_size}",
            "and rax, -16",
            "mov rsp, rax",
            // Emulate a CALL so RSP % 16 == 8 at entry
            "push 0",
            "xor rbp, rbp",
            "jmp {rust_entry}",
            stack_sym = sym BOOT_STACK,
            stack_size = const KERNEL_STACK_SIZE,
            rust_entry = sym kernel_entry,
        );
    }

    extern "C" fn kernel_entry() -> ! {
        // SAFETY: first code on the boot stack; no static has been read yet.
        unsafe { bss::clear() };

        if LOGGER.init().is_err() {
            qemu_trace!("logger already installed\n");
        }

        // SAFETY: the loader wrote both below its partition table, which the
        // temporary mapping covers; the count is not 4-byte aligned.
        let (blob, count) = unsafe {
            let blob = core::slice::from_raw_parts(
                ptov(PhysicalAddress::new(LOADER_ARGS)).as_mut_ptr::<u8>(),
                LOADER_ARGS_LEN,
            );
            let count = ptov(PhysicalAddress::new(LOADER_ARG_CNT))
                .as_mut_ptr::<u32>()
                .read_unaligned();
            (blob, count)
        };

        kernel_boot::boot(
            blob,
            count,
            &mut KernelServices::new(),
            &mut QemuPlatform::new(),
        )
    }

    #[panic_handler]
    fn panic(info: &core::panic::PanicInfo) -> ! {
        let power_off = BOOT_OPTIONS
            .get()
            .is_some_and(|options| options.power_off_when_done);
        kernel_boot::fatal(&mut QemuPlatform::new(), power_off, info)
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("the kernel runs on x86_64-unknown-none only; build it with --target");
}
