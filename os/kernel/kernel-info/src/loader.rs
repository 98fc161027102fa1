//! # Boot Loader Layout
//!
//! Physical addresses inside the boot sector where the loader leaves the
//! kernel command line.

/// Physical address at which the BIOS loads the boot sector.
pub const LOADER_BASE: u64 = 0x7c00;

/// Physical address one past the end of the boot sector.
pub const LOADER_END: u64 = 0x7e00;

/// Size of the `0x55 0xaa` boot signature.
pub const LOADER_SIG_LEN: u64 = 2;

/// Size of the partition table.
pub const LOADER_PARTS_LEN: u64 = 64;

/// Size of the command-line blob in bytes.
pub const LOADER_ARGS_LEN: usize = 128;

/// Size of the command-line token count.
pub const LOADER_ARG_CNT_LEN: u64 = 4;

/// Physical address of the boot signature.
pub const LOADER_SIG: u64 = LOADER_END - LOADER_SIG_LEN;

/// Physical address of the partition table.
pub const LOADER_PARTS: u64 = LOADER_SIG - LOADER_PARTS_LEN;

/// Physical address of the command-line blob.
pub const LOADER_ARGS: u64 = LOADER_PARTS - LOADER_ARGS_LEN as u64;

/// Physical address of the little-endian `u32` token count.
pub const LOADER_ARG_CNT: u64 = LOADER_ARGS - LOADER_ARG_CNT_LEN;

/// Number of slots in the decoded argument vector.
///
/// Every token occupies at least one byte (its terminator), so a blob of
/// `LOADER_ARGS_LEN` bytes holds at most half as many non-empty tokens;
/// one more slot is kept for the end marker.
pub const MAX_BOOT_ARGS: usize = LOADER_ARGS_LEN / 2 + 1;

const _: () = {
    assert!(LOADER_ARG_CNT > LOADER_BASE);
    assert!(LOADER_ARGS + LOADER_ARGS_LEN as u64 == LOADER_PARTS);
    assert!(LOADER_ARG_CNT + LOADER_ARG_CNT_LEN == LOADER_ARGS);
};
