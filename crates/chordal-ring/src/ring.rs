//! The assembled ring: sorted nodes, neighbor links, finger tables.

use std::collections::BTreeMap;

use tracing::debug;

use chordal_types::KeyId;

use crate::error::RingError;
use crate::node::{Finger, Node};

/// The sorted, circular arrangement of nodes by identifier.
///
/// Built once by [`assemble`](Ring::assemble) (or through the
/// [`OverlayBuilder`](crate::OverlayBuilder)) and read-only thereafter.
/// Iteration order is always ascending by identifier.
#[derive(Debug, Clone)]
pub struct Ring {
    nodes: BTreeMap<KeyId, Node>,
    id_bits: u16,
}

impl Ring {
    /// Assemble a ring from explicit `(identifier, address)` placements.
    ///
    /// Sorts the placements, wires each node to its cyclic neighbors,
    /// and builds every finger table. Fails on duplicate identifiers or
    /// an empty placement list.
    pub fn assemble(placements: Vec<(KeyId, String)>, id_bits: u16) -> Result<Ring, RingError> {
        if placements.is_empty() {
            return Err(RingError::Empty);
        }

        let mut members: BTreeMap<KeyId, String> = BTreeMap::new();
        for (id, address) in placements {
            if members.insert(id, address).is_some() {
                return Err(RingError::DuplicateId(id));
            }
        }

        let ids: Vec<KeyId> = members.keys().copied().collect();
        let count = ids.len();

        let mut nodes = BTreeMap::new();
        for (idx, (id, address)) in members.iter().enumerate() {
            let predecessor = ids[(idx + count - 1) % count];
            let successor = ids[(idx + 1) % count];
            let fingers = build_fingers(&members, id, id_bits);
            debug_assert_eq!(
                fingers.first(),
                Some(&Finger::Node(successor)),
                "finger 0 must equal the successor"
            );
            debug!(node = %id, index = idx + 1, total = count, "built finger table");
            nodes.insert(
                *id,
                Node::new(*id, address.clone(), predecessor, successor, fingers),
            );
        }

        Ok(Ring { nodes, id_bits })
    }

    /// Identifier width of the ring's key space.
    pub fn id_bits(&self) -> u16 {
        self.id_bits
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by its exact identifier.
    pub fn node(&self, id: &KeyId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// The first node at or after `target`, cyclically: a tail search
    /// over the sorted map, wrapping to the smallest identifier when
    /// nothing lies past `target`. O(log N).
    pub fn successor_of(&self, target: &KeyId) -> KeyId {
        successor_key(&self.nodes, target)
    }

    /// Node identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &KeyId> {
        self.nodes.keys()
    }

    /// Nodes in ascending identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Cyclic distance from each node to its predecessor, in ring
    /// order. The first node's spacing wraps past the modulus boundary
    /// back to the largest identifier.
    pub fn spacings(&self) -> Vec<KeyId> {
        self.nodes
            .values()
            .map(|node| node.id().distance_from(&node.predecessor(), self.id_bits))
            .collect()
    }

    /// Row-oriented topology export: one `node_hex,finger_target_hex`
    /// line per (node, finger index) pair, in ring order then finger
    /// order, with compressed entries resolved. Identifiers are
    /// zero-padded to the width of the key space.
    pub fn topology_csv(&self) -> String {
        let mut out = String::new();
        for node in self.nodes.values() {
            let own = node.id().to_hex_padded(self.id_bits);
            for i in 0..node.finger_count() {
                out.push_str(&own);
                out.push(',');
                out.push_str(&node.finger(i).to_hex_padded(self.id_bits));
                out.push('\n');
            }
        }
        out
    }
}

/// First key at or after `target` in the sorted map, wrapping to the
/// smallest key past the modulus boundary.
fn successor_key<V>(members: &BTreeMap<KeyId, V>, target: &KeyId) -> KeyId {
    members
        .range(*target..)
        .next()
        .map(|(id, _)| *id)
        .unwrap_or_else(|| {
            *members
                .keys()
                .next()
                .expect("successor query on an empty ring")
        })
}

/// Finger table for `id`: entry `i` points at the first node at or
/// after `id + 2^i (mod 2^b)`. Entries beyond index 0 that resolve to
/// the successor are stored compressed.
fn build_fingers(members: &BTreeMap<KeyId, String>, id: &KeyId, id_bits: u16) -> Vec<Finger> {
    let mut fingers = Vec::with_capacity(id_bits as usize);
    let mut successor = KeyId::ZERO;
    for i in 0..id_bits {
        let target = id.add_pow2(i, id_bits);
        let found = successor_key(members, &target);
        if i == 0 {
            successor = found;
            fingers.push(Finger::Node(found));
        } else if found == successor {
            fingers.push(Finger::Successor);
        } else {
            fingers.push(Finger::Node(found));
        }
    }
    fingers
}
