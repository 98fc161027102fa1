//! # Shutdown Sequencer
//!
//! Orderly power-off: file system first, then statistics, then the machine.

use crate::{Collaborators, Platform};
use log::info;

/// Subsystems that report statistics at shutdown.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StatsSource {
    Timer,
    Threads,
    #[cfg(feature = "filesys")]
    Disk,
    Console,
    Keyboard,
    #[cfg(feature = "userprog")]
    Exceptions,
}

impl StatsSource {
    /// Order in which statistics are printed.
    pub const ORDER: &[Self] = &[
        Self::Timer,
        Self::Threads,
        #[cfg(feature = "filesys")]
        Self::Disk,
        Self::Console,
        Self::Keyboard,
        #[cfg(feature = "userprog")]
        Self::Exceptions,
    ];
}

/// Flush the file system, print statistics and power off.
pub fn shutdown<C, P>(services: &mut C, platform: &mut P) -> !
where
    C: Collaborators + ?Sized,
    P: Platform + ?Sized,
{
    #[cfg(feature = "filesys")]
    services.filesys_done();

    for &source in StatsSource::ORDER {
        services.print_stats(source);
    }

    info!("Powering off...");
    platform.power_off()
}
