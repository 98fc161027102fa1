use crate::image;
use crate::paging::{self, KernelPhysMapper};
use core::fmt;
use core::ops::Range;
use kernel_boot::Platform;
use kernel_memory_addresses::VirtualAddress;
use kernel_qemu::{power, qemu_trace};
use kernel_vmem::KernelMap;

/// A PC under QEMU or Bochs.
pub struct QemuPlatform {
    mapper: KernelPhysMapper,
}

impl QemuPlatform {
    pub const fn new() -> Self {
        Self {
            mapper: KernelPhysMapper,
        }
    }
}

impl Platform for QemuPlatform {
    type Mapper = KernelPhysMapper;

    fn phys_mapper(&self) -> &KernelPhysMapper {
        &self.mapper
    }

    fn kernel_text(&self) -> Range<VirtualAddress> {
        image::text()
    }

    fn activate(&mut self, map: &KernelMap) {
        // SAFETY: the map covers all of physical memory below `mem_end`,
        // which holds the image, its stack and the loader area.
        unsafe { paging::activate(map) };
    }

    fn console(&mut self, args: fmt::Arguments<'_>) {
        qemu_trace!("{args}");
    }

    fn power_off(&mut self) -> ! {
        power::power_off()
    }

    fn halt(&mut self) -> ! {
        power::halt()
    }
}
