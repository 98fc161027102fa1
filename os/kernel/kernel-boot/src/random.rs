//! # Pseudo-Random Bytes
//!
//! The RC4 keystream keyed with the little-endian bytes of a 32-bit seed.
//! Not cryptographically meaningful here: the point is that `-rs=SEED`
//! makes every run with the same seed see the same numbers.

/// Seeded byte-stream generator.
#[derive(Clone)]
pub struct Random {
    s: [u8; 256],
    i: u8,
    j: u8,
}

impl Random {
    #[must_use]
    pub fn new(seed: u32) -> Self {
        let key = seed.to_le_bytes();
        let mut s = [0u8; 256];
        for (slot, value) in s.iter_mut().zip(0..=u8::MAX) {
            *slot = value;
        }

        let mut j = 0u8;
        for i in 0..256 {
            j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
            s.swap(i, usize::from(j));
        }
        Self { s, i: 0, j: 0 }
    }

    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[usize::from(self.i)]);
        self.s.swap(usize::from(self.i), usize::from(self.j));
        let k = self.s[usize::from(self.i)].wrapping_add(self.s[usize::from(self.j)]);
        self.s[usize::from(k)]
    }

    pub fn fill_bytes(&mut self, buf: &mut [u8]) {
        for b in buf {
            *b = self.next_byte();
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new(0)
    }
}

impl core::fmt::Debug for Random {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Random").finish_non_exhaustive()
    }
}
