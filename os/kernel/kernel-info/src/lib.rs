//! # Kernel Layout and Boot Loader Interface
//!
//! Single source of truth for the addresses shared between the boot loader,
//! the kernel's linker script and the early boot code.
//!
//! ## Modules
//!
//! ### Loader ([`loader`])
//! Where the boot loader leaves the kernel command line: a fixed-size blob of
//! NUL-terminated tokens plus a 32-bit token count, both inside the loader's
//! own 512-byte boot sector.
//!
//! ```text
//! LOADER_BASE  0x7c00 ┌──────────────────────────────┐
//!                     │  boot sector code            │
//! LOADER_ARG_CNT      ├──────────────────────────────┤ 0x7d3a (4 bytes)
//! LOADER_ARGS         ├──────────────────────────────┤ 0x7d3e (128 bytes)
//! LOADER_PARTS        ├──────────────────────────────┤ 0x7dbe (64 bytes)
//! LOADER_SIG          ├──────────────────────────────┤ 0x7dfe (0x55 0xaa)
//! LOADER_END   0x7e00 └──────────────────────────────┘
//! ```
//!
//! ### Memory ([`memory`])
//! The kernel maps all physical memory at a single fixed offset:
//!
//! ```text
//! va = pa + KERNEL_BASE
//! ```
//!
//! The kernel image itself is loaded at [`LOADER_PHYS_BASE`](memory::LOADER_PHYS_BASE)
//! and therefore executes at `KERNEL_BASE + LOADER_PHYS_BASE`.
//!
//! ## Build integration
//! The kernel's `build.rs` reads these constants and passes them to the
//! linker as `--defsym`s, so the linker script and the Rust code cannot drift.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod loader;
pub mod memory;
