//! A single node on the ring.

use chordal_types::KeyId;

/// One finger-table entry.
///
/// Entries whose computed target resolves to the node's immediate
/// successor are stored as [`Finger::Successor`] instead of repeating
/// the identifier. Readers must substitute the successor; the sum type
/// makes skipping that substitution impossible rather than merely
/// discouraged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    /// The first node at or after `id + 2^i`, cyclically.
    Node(KeyId),
    /// Same as entry 0 (the successor); stored compressed.
    Successor,
}

/// A simulated endpoint placed on the ring.
///
/// Neighbor links are plain identifiers resolved through the
/// [`Ring`](crate::Ring), which is the sole owner of node lifetime.
/// They are set once during assembly and never mutated afterward; the
/// simulation models no churn.
#[derive(Debug, Clone)]
pub struct Node {
    id: KeyId,
    address: String,
    predecessor: KeyId,
    successor: KeyId,
    fingers: Vec<Finger>,
}

impl Node {
    pub(crate) fn new(
        id: KeyId,
        address: String,
        predecessor: KeyId,
        successor: KeyId,
        fingers: Vec<Finger>,
    ) -> Self {
        Self {
            id,
            address,
            predecessor,
            successor,
            fingers,
        }
    }

    pub fn id(&self) -> KeyId {
        self.id
    }

    /// Display name of the simulated endpoint (`"A.B.C.D:port"`).
    /// Never consulted by routing logic.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn predecessor(&self) -> KeyId {
        self.predecessor
    }

    pub fn successor(&self) -> KeyId {
        self.successor
    }

    /// Number of finger-table entries (the identifier width in bits).
    pub fn finger_count(&self) -> usize {
        self.fingers.len()
    }

    /// Finger entry `i` with the compression resolved: a compressed
    /// entry yields the successor.
    pub fn finger(&self, i: usize) -> KeyId {
        match self.fingers[i] {
            Finger::Node(id) => id,
            Finger::Successor => self.successor,
        }
    }

    /// The raw, possibly compressed entries.
    pub fn raw_fingers(&self) -> &[Finger] {
        &self.fingers
    }
}
