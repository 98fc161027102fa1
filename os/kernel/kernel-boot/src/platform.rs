use core::fmt;
use core::ops::Range;
use kernel_memory_addresses::VirtualAddress;
use kernel_vmem::{KernelMap, PhysMapper};

/// The machine underneath the boot sequence.
pub trait Platform {
    type Mapper: PhysMapper;

    /// Access to physical frames while building page tables.
    fn phys_mapper(&self) -> &Self::Mapper;

    /// Virtual range of the kernel's code.
    fn kernel_text(&self) -> Range<VirtualAddress>;

    /// Make `map` the active, canonical kernel address space, with
    /// supervisor writes to read-only pages faulting.
    fn activate(&mut self, map: &KernelMap);

    /// Raw console output, no log prefix.
    fn console(&mut self, args: fmt::Arguments<'_>);

    /// Switch the machine off.
    fn power_off(&mut self) -> !;

    /// Stop the CPU without powering off.
    fn halt(&mut self) -> !;
}
