//! # Kernel synchronization primitives
//!
//! Boot-time state is written exactly once, before other threads or
//! interrupts exist, and read everywhere afterwards. [`SyncOnceCell`] is
//! the cell for that pattern.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod sync_once_cell;

pub use sync_once_cell::SyncOnceCell;
