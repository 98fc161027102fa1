use crate::Level;
use kernel_memory_addresses::VirtualAddress;

/// Failure while walking or extending the table tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalkError {
    #[error("out of memory allocating a {level} table for {va}")]
    OutOfMemory { va: VirtualAddress, level: Level },
    #[error("{va} is covered by a huge page at the {level} level")]
    HugePage { va: VirtualAddress, level: Level },
}

/// Failure while building the kernel address space.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
    #[error("out of memory allocating the kernel root page table")]
    RootTable,
    #[error("out of memory while mapping {va}")]
    OutOfMemory { va: VirtualAddress },
    #[error("cannot map {va}: {source}")]
    Walk { va: VirtualAddress, source: WalkError },
}

impl From<WalkError> for BootstrapError {
    fn from(err: WalkError) -> Self {
        match err {
            WalkError::OutOfMemory { va, .. } => Self::OutOfMemory { va },
            WalkError::HugePage { va, .. } => Self::Walk { va, source: err },
        }
    }
}
