use crate::{ActionExecutor, BootOptions, Random, StatsSource};
use kernel_memory_addresses::PhysicalAddress;
use kernel_vmem::FrameAlloc;

/// A subsystem brought up by the boot sequence, in the order of
/// [`InitStage::BEFORE_PAGING`] and [`InitStage::AFTER_PAGING`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InitStage {
    Threads,
    Console,
    Heap,
    /// Task-state segment and global descriptor table.
    #[cfg(feature = "userprog")]
    DescriptorTables,
    Interrupts,
    Timer,
    Keyboard,
    Input,
    #[cfg(feature = "userprog")]
    Exceptions,
    #[cfg(feature = "userprog")]
    Syscalls,
    /// Start the scheduler. Interrupts are enabled from here on.
    ThreadStart,
    SerialQueue,
    TimerCalibration,
    #[cfg(feature = "filesys")]
    Disk,
    /// Mount the file system, formatting it first under `-f`.
    #[cfg(feature = "filesys")]
    FileSystem,
    #[cfg(feature = "vm")]
    VirtualMemory,
}

impl InitStage {
    /// Stages that run before the page allocator.
    pub const BEFORE_PAGING: &[Self] = &[Self::Threads, Self::Console];

    /// Stages that run once the kernel page tables are active.
    pub const AFTER_PAGING: &[Self] = &[
        #[cfg(feature = "userprog")]
        Self::DescriptorTables,
        Self::Interrupts,
        Self::Timer,
        Self::Keyboard,
        Self::Input,
        #[cfg(feature = "userprog")]
        Self::Exceptions,
        #[cfg(feature = "userprog")]
        Self::Syscalls,
        Self::ThreadStart,
        Self::SerialQueue,
        Self::TimerCalibration,
        #[cfg(feature = "filesys")]
        Self::Disk,
        #[cfg(feature = "filesys")]
        Self::FileSystem,
        #[cfg(feature = "vm")]
        Self::VirtualMemory,
    ];
}

/// The kernel subsystems the boot sequence drives but does not own:
/// threads, memory, devices, file system.
pub trait Collaborators: ActionExecutor {
    type Alloc: FrameAlloc;

    /// Receive the parsed options and the generator seeded from `-rs`.
    fn configure(&mut self, options: &BootOptions, random: Random);

    /// Bring up `stage`.
    fn init(&mut self, stage: InitStage, options: &BootOptions);

    /// Initialize the page allocator and return the end of usable
    /// physical memory.
    fn init_memory(&mut self, options: &BootOptions) -> PhysicalAddress;

    /// Frames for the kernel page tables.
    fn frame_allocator(&mut self) -> &mut Self::Alloc;

    /// Flush and close the file system.
    #[cfg(feature = "filesys")]
    fn filesys_done(&mut self);

    /// Print the statistics line(s) of `source`.
    fn print_stats(&mut self, source: StatsSource);

    /// Retire the boot thread; the scheduler keeps running the others.
    fn exit_initial_thread(&mut self) -> !;
}
