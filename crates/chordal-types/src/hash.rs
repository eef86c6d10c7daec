//! SHA-512 key derivation with nibble truncation.

use sha2::{Digest, Sha512};

use crate::key::{KeyId, ID_BYTES, MAX_ID_BITS};

/// Hash arbitrary bytes into a `bits`-wide identifier.
///
/// The SHA-512 digest is truncated to its leading `ceil(bits / 4)` hex
/// nibbles, interpreted as a right-aligned integer. Truncation
/// granularity is therefore 4 bits; callers must only request widths
/// that are multiples of 4 (enforced by configuration validation, not
/// here). Deterministic: the same input and width always produce the
/// same identifier.
pub fn hash_key(data: &[u8], bits: u16) -> KeyId {
    let digest: [u8; ID_BYTES] = Sha512::digest(data).into();
    truncate_digest(&digest, bits)
}

/// Truncate a full 512-bit digest to its leading `ceil(bits / 4)`
/// nibbles. Widths of 512 bits or more return the digest unmodified.
pub fn truncate_digest(digest: &[u8; ID_BYTES], bits: u16) -> KeyId {
    if bits >= MAX_ID_BITS {
        return KeyId::from_bytes(*digest);
    }
    let nibbles = (bits as usize + 3) / 4;
    let mut out = [0u8; ID_BYTES];
    for j in 0..nibbles {
        let nib = if j % 2 == 0 {
            digest[j / 2] >> 4
        } else {
            digest[j / 2] & 0x0f
        };
        // Destination nibble position, counted from the least
        // significant end of the output.
        let pos = nibbles - 1 - j;
        let byte = ID_BYTES - 1 - pos / 2;
        out[byte] |= if pos % 2 == 0 { nib } else { nib << 4 };
    }
    KeyId::from_bytes(out)
}
