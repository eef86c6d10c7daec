//! The greedy lookup state machine.

use tracing::trace;

use chordal_ring::{Node, Ring};
use chordal_types::{in_interval, KeyId, RouteTrace};

/// Route a lookup for `target` starting at the node identified by
/// `start`, returning the completed trace.
///
/// Each iteration evaluates the standard Chord cases at the current
/// node: resolve locally when the target falls in
/// `(predecessor, current]`; resolve on the successor when it falls in
/// `(current, successor]`; otherwise forward to the closest preceding
/// finger. Only the trace accumulates state; every decision is a pure
/// function of the ring snapshot.
///
/// Termination is guaranteed on a well-formed ring because every
/// forward strictly advances toward the target, so no node is visited
/// twice and the loop is bounded by the ring size. A `start` or hop
/// identifier absent from the ring is a construction bug and panics.
pub fn lookup(ring: &Ring, target: KeyId, start: KeyId) -> RouteTrace {
    let mut trace = RouteTrace::new(target, start);
    let mut current = start;

    loop {
        let node = ring
            .node(&current)
            .expect("lookup reached an identifier that is not on the ring");

        if in_interval(true, &target, &node.predecessor(), &node.id()) {
            // The current node owns (predecessor, current].
            trace.set_end(node.id());
            break;
        }

        if in_interval(true, &target, &node.id(), &node.successor()) {
            // The successor owns the target; one final hop.
            trace.add_hop(node.id());
            trace.set_end(node.successor());
            break;
        }

        trace.add_hop(node.id());
        let next = closest_preceding(node, &target);
        if next == current {
            // Degenerate single-node ring: everything resolves here.
            trace.set_end(current);
            break;
        }
        trace!(%current, %next, %target, "forwarding lookup");
        current = next;
    }

    trace
}

/// The furthest-reaching finger still strictly between the current
/// node and the target (cyclic open interval), scanning from the
/// highest index down. Falls back to the successor when no finger
/// qualifies.
fn closest_preceding(node: &Node, target: &KeyId) -> KeyId {
    for i in (0..node.finger_count()).rev() {
        let candidate = node.finger(i);
        if in_interval(false, &candidate, &node.id(), target) {
            return candidate;
        }
    }
    node.successor()
}
