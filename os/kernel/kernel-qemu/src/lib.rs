//! # QEMU Debug Console and Machine Control
//!
//! Output and power control for a kernel running under QEMU (or Bochs).
//!
//! ## Output path
//! ```text
//! log::info!(…)            qemu_trace!(…)
//!     ↓                        ↓
//! QemuLogger ──────────► QemuSink (fmt::Write)
//!                              ↓
//!                        port::outb(0x402, …)
//!                              ↓
//!                        -debugcon stdio / file:debug.log
//! ```
//!
//! Every byte that goes through the sink is counted; [`bytes_written`]
//! feeds the console line of the shutdown statistics.
//!
//! ## Machine control
//! [`power::power_off`] asks the emulator to switch the machine off and
//! [`power::halt`] parks the CPU. Neither returns.
//!
//! ## Features
//! * `enabled` (default): output reaches the debug port. Without it the
//!   trace macro compiles to nothing.
//!
//! Port I/O only happens on bare-metal targets. Hosted builds, such as
//! unit tests, discard the bytes but still count them.
//!
//! ```rust,no_run
//! use kernel_qemu::QemuLogger;
//! use log::{LevelFilter, info};
//!
//! static LOGGER: QemuLogger = QemuLogger::new(LevelFilter::Debug);
//!
//! LOGGER.init().ok();
//! info!("Kernel subsystem initialized");
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod logger;
pub mod port;
pub mod power;

pub use logger::QemuLogger;

use core::sync::atomic::{AtomicU64, Ordering};

/// QEMU's `-debugcon` port.
pub const QEMU_DEBUG_PORT: u16 = 0x402;

static BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);

/// Bytes sent to the debug console so far.
#[must_use]
pub fn bytes_written() -> u64 {
    BYTES_WRITTEN.load(Ordering::Relaxed)
}

#[cfg(feature = "enabled")]
#[doc(hidden)]
pub mod qemu_fmt {
    use super::{BYTES_WRITTEN, QEMU_DEBUG_PORT};
    use core::fmt::{self, Write};
    use core::sync::atomic::Ordering;

    pub struct QemuSink;

    impl Write for QemuSink {
        #[inline]
        fn write_str(&mut self, s: &str) -> fmt::Result {
            for b in s.bytes() {
                unsafe { crate::port::outb(QEMU_DEBUG_PORT, b) };
            }
            BYTES_WRITTEN.fetch_add(s.len() as u64, Ordering::Relaxed);
            Ok(())
        }
    }

    #[doc(hidden)]
    #[inline]
    pub fn qemu_write(args: fmt::Arguments) {
        // Best effort; the sink itself never fails.
        let _ = QemuSink.write_fmt(args);
    }
}

#[cfg(not(feature = "enabled"))]
#[doc(hidden)]
pub mod qemu_fmt {
    use core::fmt;

    #[doc(hidden)]
    #[inline(always)]
    #[allow(clippy::inline_always)]
    pub const fn qemu_write(_: fmt::Arguments) {}
}

/// `print!`-style output straight to the debug console, bypassing `log`.
#[macro_export]
macro_rules! qemu_trace {
    ($($arg:tt)*) => {{
        $crate::qemu_fmt::qemu_write(core::format_args!($($arg)*));
    }};
}
