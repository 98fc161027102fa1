//! # Kernel Page Tables
//!
//! Physical frames are reached through the kernel offset mapping, which the
//! loader's temporary tables already provide for low memory.

use kernel_info::memory::ptov;
use kernel_memory_addresses::{PhysicalAddress, PhysicalPage};
use kernel_registers::cr0::Cr0;
use kernel_sync::SyncOnceCell;
use kernel_vmem::{AddressSpace, KernelMap, PhysMapper};
use log::{info, warn};

/// Root table of the kernel address space, once it is active.
pub static KERNEL_ROOT: SyncOnceCell<PhysicalPage> = SyncOnceCell::new();

/// Maps physical frames at `KERNEL_BASE + pa`.
pub struct KernelPhysMapper;

impl PhysMapper for KernelPhysMapper {
    unsafe fn phys_to_mut<'a, T>(&self, pa: PhysicalAddress) -> &'a mut T {
        unsafe { &mut *ptov(pa).as_mut_ptr::<T>() }
    }
}

/// Enforce read-only pages in ring 0, then switch to `map`.
///
/// # Safety
/// `map` must cover the running kernel: image, boot stack and the loader
/// area the command line was read from.
pub unsafe fn activate(map: &KernelMap) {
    if KERNEL_ROOT.set(map.root).is_err() {
        warn!("kernel address space activated twice");
    }

    let space = AddressSpace::from_root(&KernelPhysMapper, map.root);
    unsafe {
        Cr0::enable_write_protect();
        space.activate();
    }
    info!("Switched to kernel page tables at {}", map.root);
}
