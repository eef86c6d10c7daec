//! Cyclic interval membership on the identifier ring.

use crate::key::KeyId;

/// Test whether `key` lies in the cyclic interval `(left, right)` or,
/// when `right_closed` is true, `(left, right]`.
///
/// When `right < left` the interval wraps past the modulus boundary:
/// the key is inside if it lies strictly after `left` (the tail
/// segment up to the wrap point) or at most `right` (the head segment
/// from zero). All operands must already be reduced to the same
/// identifier space, so the wrap point never needs to be named.
///
/// `left == right` denotes the empty interval in both variants.
pub fn in_interval(right_closed: bool, key: &KeyId, left: &KeyId, right: &KeyId) -> bool {
    let below_right = if right_closed { key <= right } else { key < right };
    if right < left {
        key > left || below_right
    } else {
        key > left && below_right
    }
}
