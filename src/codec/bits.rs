// Bit accumulator shared by the BS-6 encoder and both decoders.
//
// Bits enter at the low end and leave from the high end, so the oldest
// bit is always the most significant occupied bit. The accumulator never
// holds more than 31 bits; callers drain it between pushes.

/// Fixed-capacity MSB-first bit buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitAccumulator {
    value: u32,
    len: u32,
}

#[inline]
const fn low_mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

impl BitAccumulator {
    pub const fn new() -> Self {
        Self { value: 0, len: 0 }
    }

    /// Append the low `width` bits of `bits`.
    #[inline]
    pub fn push(&mut self, bits: u32, width: u32) {
        debug_assert!(width <= 30, "push of {width} bits");
        debug_assert!(self.len + width < 32, "accumulator overflow");
        if width == 0 {
            return;
        }
        self.value = (self.value << width) | (bits & low_mask(width));
        self.len += width;
    }

    /// Remove and return the oldest `width` bits.
    #[inline]
    pub fn take(&mut self, width: u32) -> u32 {
        debug_assert!(width <= self.len);
        self.len -= width;
        let out = self.value >> self.len;
        self.value &= low_mask(self.len);
        out
    }

    /// Append `width` zero bits.
    #[inline]
    pub fn pad(&mut self, width: u32) {
        self.push(0, width);
    }

    /// Drain whole bytes into `dst` while at least 8 bits remain and there
    /// is room. Returns the number of bytes written.
    pub fn flush(&mut self, dst: &mut [u8]) -> usize {
        let mut written = 0;
        while self.len >= 8 && written < dst.len() {
            dst[written] = self.take(8) as u8;
            written += 1;
        }
        written
    }

    /// Number of occupied bits.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Occupied bits as an integer (zero when empty).
    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn clear(&mut self) {
        self.value = 0;
        self.len = 0;
    }
}
