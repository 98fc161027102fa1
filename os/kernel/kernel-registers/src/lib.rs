//! # Typed `x86_64` Control Registers
//!
//! Only the two control registers the early kernel touches while switching
//! to its own page tables are modelled:
//!
//! - [`Cr0`](cr0::Cr0) for the write-protect bit that makes read-only
//!   mappings binding for supervisor code.
//! - [`Cr3`](cr3::Cr3) for the physical root of the active page tables.
//!
//! The register layouts are plain values and can be built and inspected on
//! any host. Reading or writing the actual registers requires the `asm`
//! feature and an `x86_64` target.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

#[cfg(feature = "cr0")]
pub mod cr0;

#[cfg(feature = "cr3")]
pub mod cr3;

pub trait LoadRegisterUnsafe {
    /// # Safety
    /// The caller must be running in ring 0; control registers are privileged.
    unsafe fn load_unsafe() -> Self;
}

pub trait StoreRegisterUnsafe {
    /// # Safety
    /// The caller must be running in ring 0 and the new value must keep the
    /// currently executing code and stack mapped.
    unsafe fn store_unsafe(self);
}
