//! Fixed-width ring identifiers and their modular arithmetic.

use std::fmt;

use serde::{Serialize, Serializer};

/// Widest supported identifier space, matching the SHA-512 digest width.
pub const MAX_ID_BITS: u16 = 512;

/// Byte width of a [`KeyId`] (512 bits).
pub const ID_BYTES: usize = 64;

/// An identifier on the ring: an unsigned integer in `[0, 2^b)` for a
/// configured bit width `b <= 512`.
///
/// Stored as a big-endian 64-byte array with everything above bit `b`
/// zero, so `Ord` on the raw bytes is numeric order and a `BTreeMap`
/// keyed by `KeyId` iterates the ring in ascending identifier order.
/// All arithmetic is performed modulo `2^b`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId([u8; ID_BYTES]);

impl KeyId {
    /// The zero identifier.
    pub const ZERO: KeyId = KeyId([0u8; ID_BYTES]);

    /// Build an identifier from its raw big-endian representation.
    pub fn from_bytes(bytes: [u8; ID_BYTES]) -> Self {
        Self(bytes)
    }

    /// Build a small identifier from a `u64` value.
    pub fn from_u64(value: u64) -> Self {
        let mut out = [0u8; ID_BYTES];
        out[ID_BYTES - 8..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }

    /// Raw big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; ID_BYTES] {
        &self.0
    }

    /// Compute `(self + 2^exp) mod 2^bits`.
    ///
    /// This is the finger-table target for finger index `exp`.
    pub fn add_pow2(&self, exp: u16, bits: u16) -> KeyId {
        debug_assert!(exp < bits, "finger exponent {exp} out of range for {bits}-bit space");
        let mut out = self.0;
        let mut idx = ID_BYTES - 1 - exp as usize / 8;
        let mut add = 1u16 << (exp % 8);
        loop {
            let sum = out[idx] as u16 + add;
            out[idx] = (sum & 0xff) as u8;
            if sum < 0x100 || idx == 0 {
                break;
            }
            idx -= 1;
            add = 1;
        }
        let mut id = KeyId(out);
        id.mask(bits);
        id
    }

    /// Cyclic distance `(self - other) mod 2^bits`.
    ///
    /// When `other > self` the subtraction wraps past zero, which adds
    /// the full modulus and yields the positive ring distance. This is
    /// the spacing recorded between a node and its predecessor.
    pub fn distance_from(&self, other: &KeyId, bits: u16) -> KeyId {
        let mut out = [0u8; ID_BYTES];
        let mut borrow = 0u16;
        for idx in (0..ID_BYTES).rev() {
            let lhs = self.0[idx] as u16;
            let rhs = other.0[idx] as u16 + borrow;
            if lhs < rhs {
                out[idx] = (lhs + 0x100 - rhs) as u8;
                borrow = 1;
            } else {
                out[idx] = (lhs - rhs) as u8;
                borrow = 0;
            }
        }
        let mut id = KeyId(out);
        id.mask(bits);
        id
    }

    /// Approximate the identifier as an `f64`.
    ///
    /// Used only for statistical aggregation; identifiers wider than 53
    /// bits lose precision.
    pub fn to_f64(&self) -> f64 {
        self.0.iter().fold(0.0, |acc, &b| acc * 256.0 + b as f64)
    }

    /// Hex rendering zero-padded to the width of a `bits`-bit space
    /// (one hex digit per 4 bits).
    pub fn to_hex_padded(&self, bits: u16) -> String {
        let nibbles = (bits as usize + 3) / 4;
        let full = hex::encode(self.0);
        full[full.len() - nibbles..].to_string()
    }

    /// Clear every bit at position `bits` or above, reducing the value
    /// modulo `2^bits`.
    fn mask(&mut self, bits: u16) {
        if bits >= MAX_ID_BITS {
            return;
        }
        let keep = (bits as usize + 7) / 8;
        for byte in &mut self.0[..ID_BYTES - keep] {
            *byte = 0;
        }
        if bits % 8 != 0 {
            self.0[ID_BYTES - keep] &= (1u8 << (bits % 8)) - 1;
        }
    }
}

/// Trimmed hex (no leading zeros), the form used in logs and traces.
impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            write!(f, "0")
        } else {
            write!(f, "{trimmed}")
        }
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({self})")
    }
}

impl Serialize for KeyId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
