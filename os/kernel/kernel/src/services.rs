//! # Kernel Services
//!
//! The subsystems the boot sequence drives. This kernel carries only the
//! boot core, so each stage records that it ran and each statistics line
//! reports what the core itself counted.

use crate::image;
use kernel_boot::{
    ActionExecutor, BootOptions, Collaborators, InitStage, Random, SchedulerPolicy, StatsSource,
};
use kernel_info::memory::{DEFAULT_RAM_BYTES, vtop};
use kernel_memory_addresses::{PAGE_SIZE, PhysicalAddress, PhysicalPage};
use kernel_qemu::{power, qemu_trace};
use kernel_sync::SyncOnceCell;
use kernel_vmem::FrameAlloc;
use log::{debug, info, warn};

/// Options in effect, for code that runs outside the boot sequence
/// (the panic handler).
pub static BOOT_OPTIONS: SyncOnceCell<BootOptions> = SyncOnceCell::new();

/// Hands out the frames between the end of the image and `mem_end`.
pub struct BootFrames {
    next: u64,
    end: u64,
}

impl BootFrames {
    /// No frames until [`KernelServices::init_memory`] ran.
    pub const fn empty() -> Self {
        Self { next: 0, end: 0 }
    }

    pub fn new(first: PhysicalAddress, mem_end: PhysicalAddress) -> Self {
        let next = first
            .checked_align_up()
            .map_or(u64::MAX, |pa| pa.page().number());
        Self {
            next,
            end: mem_end.page().number(),
        }
    }

    /// Frames still available.
    pub const fn remaining(&self) -> u64 {
        self.end.saturating_sub(self.next)
    }
}

impl FrameAlloc for BootFrames {
    fn alloc_4k(&mut self) -> Option<PhysicalPage> {
        if self.next >= self.end {
            return None;
        }
        let frame = PhysicalPage::from_number(self.next);
        self.next += 1;
        Some(frame)
    }
}

/// The kernel's side of [`Collaborators`].
pub struct KernelServices {
    frames: BootFrames,
    frames_at_bootstrap: u64,
    stages: u32,
}

impl KernelServices {
    pub const fn new() -> Self {
        Self {
            frames: BootFrames::empty(),
            frames_at_bootstrap: 0,
            stages: 0,
        }
    }
}

impl ActionExecutor for KernelServices {
    fn run_task(&mut self, task: &str, options: &BootOptions) {
        if options.thread_tests {
            warn!("no kernel test named `{task}'");
        } else {
            warn!("cannot load `{task}': no user program loader");
        }
    }

    #[cfg(feature = "filesys")]
    fn list_files(&mut self) {
        qemu_trace!("Files in the root directory:\nEnd of listing.\n");
    }

    #[cfg(feature = "filesys")]
    fn print_file(&mut self, file: &str) {
        warn!("{file}: open failed");
    }

    #[cfg(feature = "filesys")]
    fn remove_file(&mut self, file: &str) {
        warn!("{file}: delete failed");
    }

    #[cfg(feature = "filesys")]
    fn put_file(&mut self, file: &str) {
        warn!("{file}: no scratch disk");
    }

    #[cfg(feature = "filesys")]
    fn get_file(&mut self, file: &str) {
        warn!("{file}: no scratch disk");
    }
}

impl Collaborators for KernelServices {
    type Alloc = BootFrames;

    fn configure(&mut self, options: &BootOptions, mut random: Random) {
        if BOOT_OPTIONS.set(*options).is_err() {
            warn!("boot options configured twice");
        }
        debug!(
            "random seed {}, first word {:#010x}",
            options.random_seed,
            random.next_u32()
        );
        if options.scheduler == SchedulerPolicy::Mlfqs {
            info!("Using the multi-level feedback queue scheduler");
        }
    }

    fn init(&mut self, stage: InitStage, options: &BootOptions) {
        self.stages += 1;
        match stage {
            #[cfg(feature = "filesys")]
            InitStage::FileSystem if options.format_filesys => {
                info!("Formatting file system...done.");
            }
            #[cfg(feature = "userprog")]
            InitStage::DescriptorTables if options.user_page_limit != usize::MAX => {
                info!("User pool limited to {} pages", options.user_page_limit);
            }
            _ => debug!("{stage:?} initialized"),
        }
    }

    fn init_memory(&mut self, _options: &BootOptions) -> PhysicalAddress {
        let mem_end = PhysicalAddress::new(DEFAULT_RAM_BYTES);
        self.frames = BootFrames::new(vtop(image::end()), mem_end);
        info!(
            "Pages: {} free above the kernel, {} KiB RAM",
            self.frames.remaining(),
            DEFAULT_RAM_BYTES / 1024
        );
        mem_end
    }

    fn frame_allocator(&mut self) -> &mut BootFrames {
        self.frames_at_bootstrap = self.frames.remaining();
        &mut self.frames
    }

    #[cfg(feature = "filesys")]
    fn filesys_done(&mut self) {
        debug!("file system closed");
    }

    fn print_stats(&mut self, source: StatsSource) {
        match source {
            StatsSource::Timer => qemu_trace!("Timer: 0 ticks\n"),
            StatsSource::Threads => qemu_trace!(
                "Thread: 0 idle ticks, 0 kernel ticks, 0 user ticks ({} stages, {} page-table frames)\n",
                self.stages,
                self.frames_at_bootstrap.saturating_sub(self.frames.remaining())
            ),
            #[cfg(feature = "filesys")]
            StatsSource::Disk => qemu_trace!("hd0:0: 0 reads, 0 writes\n"),
            StatsSource::Console => qemu_trace!(
                "Console: {} characters output\n",
                kernel_qemu::bytes_written()
            ),
            StatsSource::Keyboard => qemu_trace!("Keyboard: 0 keys pressed\n"),
            #[cfg(feature = "userprog")]
            StatsSource::Exceptions => qemu_trace!("Exception: 0 page faults\n"),
        }
    }

    fn exit_initial_thread(&mut self) -> ! {
        info!("Initial thread done; no other threads to run");
        power::halt()
    }
}

const _: () = assert!(DEFAULT_RAM_BYTES % PAGE_SIZE == 0);
