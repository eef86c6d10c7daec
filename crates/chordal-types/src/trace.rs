//! Per-query routing record.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::key::KeyId;

/// The record of one lookup: the target key, the originating node,
/// every node visited on the way (excluding the resolving node), and
/// the node that finally claimed responsibility.
///
/// Created when a lookup starts, mutated only by the router while the
/// lookup runs, and finalized by [`set_end`](RouteTrace::set_end).
#[derive(Debug, Clone)]
pub struct RouteTrace {
    target: KeyId,
    start: KeyId,
    hops: Vec<KeyId>,
    end: Option<KeyId>,
}

impl RouteTrace {
    pub fn new(target: KeyId, start: KeyId) -> Self {
        Self {
            target,
            start,
            hops: Vec::new(),
            end: None,
        }
    }

    /// Record one forwarding step.
    pub fn add_hop(&mut self, node: KeyId) {
        self.hops.push(node);
    }

    /// Record the resolving node, ending the lookup.
    pub fn set_end(&mut self, node: KeyId) {
        self.end = Some(node);
    }

    pub fn target(&self) -> KeyId {
        self.target
    }

    pub fn start(&self) -> KeyId {
        self.start
    }

    pub fn hops(&self) -> &[KeyId] {
        &self.hops
    }

    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    pub fn end(&self) -> Option<KeyId> {
        self.end
    }
}

impl Serialize for RouteTrace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("RouteTrace", 5)?;
        s.serialize_field("target", &self.target)?;
        s.serialize_field("start_node", &self.start)?;
        s.serialize_field("end_node", &self.end)?;
        s.serialize_field("hop_count", &self.hop_count())?;
        s.serialize_field("hops", &self.hops)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_lifecycle() {
        let mut trace = RouteTrace::new(KeyId::from_u64(200), KeyId::from_u64(10));
        assert_eq!(trace.hop_count(), 0);
        assert!(trace.end().is_none());

        trace.add_hop(KeyId::from_u64(10));
        trace.add_hop(KeyId::from_u64(150));
        trace.set_end(KeyId::from_u64(220));

        assert_eq!(trace.hop_count(), 2);
        assert_eq!(trace.hops(), &[KeyId::from_u64(10), KeyId::from_u64(150)]);
        assert_eq!(trace.end(), Some(KeyId::from_u64(220)));
        assert_eq!(trace.start(), KeyId::from_u64(10));
        assert_eq!(trace.target(), KeyId::from_u64(200));
    }

    #[test]
    fn test_trace_json_shape() {
        let mut trace = RouteTrace::new(KeyId::from_u64(0xc8), KeyId::from_u64(0x0a));
        trace.add_hop(KeyId::from_u64(0x0a));
        trace.set_end(KeyId::from_u64(0xdc));

        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["target"], "c8");
        assert_eq!(json["start_node"], "a");
        assert_eq!(json["end_node"], "dc");
        assert_eq!(json["hop_count"], 1);
        assert_eq!(json["hops"][0], "a");
    }
}
