//! Fixed-width 2-state bit vectors used for every simulated signal value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// The widest signal the kernel stores in a single machine word.
pub const MAX_WIDTH: u32 = 64;

/// A 2-state bit vector of 1 to [`MAX_WIDTH`] bits.
///
/// The value is always kept masked to the declared width, so two `Bits`
/// with the same width compare equal exactly when the hardware bits match.
/// Bit 0 is the least significant bit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bits {
    width: u32,
    value: u64,
}

impl Bits {
    /// Creates a value of the given width, discarding bits above the width.
    ///
    /// # Panics
    ///
    /// Panics if `width` is 0 or greater than [`MAX_WIDTH`].
    pub fn new(value: u64, width: u32) -> Self {
        assert!(
            (1..=MAX_WIDTH).contains(&width),
            "bit width {width} outside 1..={MAX_WIDTH}"
        );
        Self {
            width,
            value: value & Self::mask(width),
        }
    }

    /// Creates an all-zero value.
    pub fn zero(width: u32) -> Self {
        Self::new(0, width)
    }

    /// Creates an all-one value.
    pub fn ones(width: u32) -> Self {
        Self::new(u64::MAX, width)
    }

    /// Creates a single-bit value.
    pub fn from_bool(value: bool) -> Self {
        Self::new(u64::from(value), 1)
    }

    /// Returns the mask covering the low `width` bits.
    pub fn mask(width: u32) -> u64 {
        if width >= 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        }
    }

    /// Returns `true` if `value` is representable in `width` bits.
    pub fn fits(value: u64, width: u32) -> bool {
        value & !Self::mask(width) == 0
    }

    /// Returns the declared width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the value as an unsigned integer.
    pub fn as_u64(&self) -> u64 {
        self.value
    }

    /// Returns the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn bit(&self, index: u32) -> bool {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        (self.value >> index) & 1 != 0
    }

    /// Returns the least significant bit, the one edge detection looks at.
    pub fn lsb(&self) -> bool {
        self.value & 1 != 0
    }

    /// Returns `true` if any bit is set (Verilog truthiness).
    pub fn is_true(&self) -> bool {
        self.value != 0
    }

    /// Zero-extends or truncates to `width`.
    pub fn resize(&self, width: u32) -> Self {
        Self::new(self.value, width)
    }

    /// Extracts bits `high..=low` as a new value of width `high - low + 1`.
    ///
    /// # Panics
    ///
    /// Panics if `high < low` or `high >= self.width()`.
    pub fn slice(&self, high: u32, low: u32) -> Self {
        assert!(
            low <= high && high < self.width,
            "slice [{high}:{low}] out of bounds for width {}",
            self.width
        );
        Self::new(self.value >> low, high - low + 1)
    }

    /// Returns `self` with bits `high..=low` replaced by the low bits of `part`.
    pub fn with_slice(&self, high: u32, low: u32, part: u64) -> Self {
        let field = Self::mask(high - low + 1) << low;
        Self::new((self.value & !field) | ((part << low) & field), self.width)
    }

    /// Concatenates values MSB-first, as in Verilog `{a, b, c}`.
    ///
    /// Returns `None` if the combined width exceeds [`MAX_WIDTH`] or `parts`
    /// is empty.
    pub fn concat(parts: &[Bits]) -> Option<Self> {
        let total: u32 = parts.iter().map(|p| p.width).sum();
        if parts.is_empty() || total > MAX_WIDTH {
            return None;
        }
        let mut value = 0u64;
        for part in parts {
            value = if part.width >= 64 {
                part.value
            } else {
                (value << part.width) | part.value
            };
        }
        Some(Self::new(value, total))
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.width).rev() {
            write!(f, "{}", u8::from(self.bit(i)))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits({}'h{:x})", self.width, self.value)
    }
}

impl BitAnd for &Bits {
    type Output = Bits;

    fn bitand(self, rhs: Self) -> Bits {
        Bits::new(self.value & rhs.value, self.width.max(rhs.width))
    }
}

impl BitOr for &Bits {
    type Output = Bits;

    fn bitor(self, rhs: Self) -> Bits {
        Bits::new(self.value | rhs.value, self.width.max(rhs.width))
    }
}

impl BitXor for &Bits {
    type Output = Bits;

    fn bitxor(self, rhs: Self) -> Bits {
        Bits::new(self.value ^ rhs.value, self.width.max(rhs.width))
    }
}

impl Not for &Bits {
    type Output = Bits;

    fn not(self) -> Bits {
        Bits::new(!self.value, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_masks_to_width() {
        let v = Bits::new(0x3ff, 4);
        assert_eq!(v.as_u64(), 0xf);
        assert_eq!(v.width(), 4);
    }

    #[test]
    fn full_width_mask() {
        assert_eq!(Bits::mask(64), u64::MAX);
        assert_eq!(Bits::ones(64).as_u64(), u64::MAX);
        assert_eq!(Bits::mask(10), 0x3ff);
    }

    #[test]
    #[should_panic(expected = "outside 1..=64")]
    fn zero_width_panics() {
        let _ = Bits::new(0, 0);
    }

    #[test]
    fn fits_checks_high_bits() {
        assert!(Bits::fits(15, 4));
        assert!(!Bits::fits(16, 4));
        assert!(Bits::fits(u64::MAX, 64));
    }

    #[test]
    fn bit_access() {
        let v = Bits::new(0b1010, 4);
        assert!(!v.bit(0));
        assert!(v.bit(1));
        assert!(v.bit(3));
        assert!(!v.lsb());
    }

    #[test]
    fn slice_and_with_slice() {
        let v = Bits::new(0b1101_0110, 8);
        assert_eq!(v.slice(7, 4).as_u64(), 0b1101);
        assert_eq!(v.slice(3, 0).width(), 4);
        let w = v.with_slice(3, 0, 0b1111);
        assert_eq!(w.as_u64(), 0b1101_1111);
    }

    #[test]
    fn concat_msb_first() {
        let v = Bits::concat(&[Bits::new(0b10, 2), Bits::new(0b011, 3)]).unwrap();
        assert_eq!(v.width(), 5);
        assert_eq!(format!("{v}"), "10011");
    }

    #[test]
    fn concat_too_wide() {
        assert!(Bits::concat(&[Bits::zero(40), Bits::zero(40)]).is_none());
        assert!(Bits::concat(&[]).is_none());
    }

    #[test]
    fn bitwise_ops_widen() {
        let a = Bits::new(0b1100, 4);
        let b = Bits::new(0b1010, 4);
        assert_eq!((&a & &b).as_u64(), 0b1000);
        assert_eq!((&a | &b).as_u64(), 0b1110);
        assert_eq!((&a ^ &b).as_u64(), 0b0110);
        assert_eq!((!&a).as_u64(), 0b0011);
        let wide = Bits::new(0xff, 8);
        assert_eq!((&a & &wide).width(), 8);
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Bits::new(0x1f, 10)), "Bits(10'h1f)");
    }

    #[test]
    fn serde_roundtrip() {
        let v = Bits::new(0x2a, 7);
        let json = serde_json::to_string(&v).unwrap();
        let back: Bits = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
