//! # Boot Argument Reader
//!
//! The loader stores the command line as `count` NUL-terminated tokens
//! packed into a fixed [`LOADER_ARGS_LEN`]-byte blob. Decoding borrows the
//! tokens straight out of that blob; nothing is copied.
//!
//! The last token may run up to the end of the blob without a terminator.
//! Asking for more tokens than the blob holds is an
//! [`ArgumentOverflow`](BootError::ArgumentOverflow).

use crate::BootError;
use core::fmt;
use kernel_info::loader::{LOADER_ARGS_LEN, MAX_BOOT_ARGS};

/// Bounded reader over the argument blob.
#[derive(Debug, Clone)]
pub struct ArgCursor<'a> {
    blob: &'a [u8],
    pos: usize,
}

impl<'a> ArgCursor<'a> {
    #[must_use]
    pub const fn new(blob: &'a [u8]) -> Self {
        Self { blob, pos: 0 }
    }

    /// Offset of the next unread byte.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.blob.len().saturating_sub(self.pos)
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.pos >= self.blob.len()
    }

    /// Bytes up to the next NUL (or the end of the blob), skipping the
    /// terminator. `None` once the cursor has reached the end.
    pub fn next_token(&mut self) -> Option<&'a [u8]> {
        let rest = self.blob.get(self.pos..).filter(|r| !r.is_empty())?;
        let len = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        self.pos += len + 1;
        Some(&rest[..len])
    }
}

/// Decoded command line with room for [`ArgVector::CAPACITY`] tokens.
#[derive(Clone)]
pub struct ArgVector<'a> {
    slots: [&'a str; MAX_BOOT_ARGS],
    len: usize,
}

impl<'a> ArgVector<'a> {
    /// Most tokens a vector accepts; one slot stays free as end marker.
    pub const CAPACITY: usize = MAX_BOOT_ARGS - 1;

    const fn new() -> Self {
        Self {
            slots: [""; MAX_BOOT_ARGS],
            len: 0,
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[&'a str] {
        &self.slots[..self.len]
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for ArgVector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl PartialEq for ArgVector<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for ArgVector<'_> {}

/// Decode `count` tokens from the loader's argument blob.
///
/// # Errors
/// - [`BootError::ArgumentOverflow`] if `count` exceeds the vector capacity
///   or the blob ends before `count` tokens were read.
/// - [`BootError::ArgumentEncoding`] for a token that is not UTF-8.
pub fn read_command_line(blob: &[u8], count: u32) -> Result<ArgVector<'_>, BootError<'_>> {
    debug_assert!(blob.len() <= LOADER_ARGS_LEN, "argument blob too large");

    let count = usize::try_from(count).map_err(|_| BootError::ArgumentOverflow)?;
    if count > ArgVector::CAPACITY {
        return Err(BootError::ArgumentOverflow);
    }

    let mut cursor = ArgCursor::new(blob);
    let mut args = ArgVector::new();
    for index in 0..count {
        let token = cursor.next_token().ok_or(BootError::ArgumentOverflow)?;
        args.slots[index] =
            core::str::from_utf8(token).map_err(|_| BootError::ArgumentEncoding { index })?;
        args.len = index + 1;
    }
    Ok(args)
}

/// Console echo of the decoded command line.
///
/// Tokens that contain a space are wrapped in single quotes:
/// `Kernel command line: -q run 'args-many a b'`.
pub struct CommandLineEcho<'s, 'a>(pub &'s [&'a str]);

impl fmt::Display for CommandLineEcho<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Kernel command line:")?;
        for token in self.0 {
            if token.contains(' ') {
                write!(f, " '{token}'")?;
            } else {
                write!(f, " {token}")?;
            }
        }
        Ok(())
    }
}
