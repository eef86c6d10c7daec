//! Running statistics over ring spacings and completed lookups.

use std::collections::BTreeMap;

use chordal_types::{KeyId, RouteTrace};

/// Process-wide accumulator for one simulation run.
///
/// Created once, fed incrementally by every recorded spacing and every
/// completed lookup, read once at the end to render output. Means and
/// standard deviations are recomputed from the full frequency tables on
/// every update, so intermediate snapshots are exact rather than
/// incremental approximations.
#[derive(Debug, Clone, Default)]
pub struct AggregateStats {
    /// Occurrences of each node-to-predecessor distance.
    distances: BTreeMap<KeyId, u64>,
    /// Lookups served by each node (as a hop or as the end node).
    queries_per_node: BTreeMap<KeyId, u64>,
    /// How many nodes reached a given served-query count. Updated on
    /// every per-node increment, so a node counted at 3 has also been
    /// counted at 1 and 2.
    nodes_per_query_count: BTreeMap<u64, u64>,
    /// Occurrences of each hop total.
    hop_counts: BTreeMap<u64, u64>,
    /// Lookups resolved by each distinct end node.
    end_nodes: BTreeMap<KeyId, u64>,

    avg_distance: f64,
    std_dev_distance: f64,
    avg_hops: f64,
    std_dev_hops: f64,
    avg_queries_per_node: f64,
}

impl AggregateStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one node-to-predecessor spacing and refresh the distance
    /// aggregates.
    pub fn add_distance(&mut self, distance: KeyId) {
        bump(&mut self.distances, distance);
        let (avg, std_dev) = frequency_moments(
            self.distances.iter().map(|(d, count)| (d.to_f64(), *count)),
        );
        self.avg_distance = avg;
        self.std_dev_distance = std_dev;
    }

    /// Fold one completed lookup into the aggregates: every hop and the
    /// end node count as a served query, the hop total and the end node
    /// feed their frequency tables.
    pub fn record_route(&mut self, trace: &RouteTrace) {
        for hop in trace.hops() {
            self.bump_served(*hop);
        }

        bump(&mut self.hop_counts, trace.hop_count() as u64);
        let (avg, std_dev) = frequency_moments(
            self.hop_counts.iter().map(|(hops, count)| (*hops as f64, *count)),
        );
        self.avg_hops = avg;
        self.std_dev_hops = std_dev;

        if let Some(end) = trace.end() {
            bump(&mut self.end_nodes, end);
            self.bump_served(end);
        }

        let (avg, _) = frequency_moments(
            self.nodes_per_query_count
                .iter()
                .map(|(served, nodes)| (*served as f64, *nodes)),
        );
        self.avg_queries_per_node = avg;
    }

    fn bump_served(&mut self, node: KeyId) {
        let served = bump(&mut self.queries_per_node, node);
        bump(&mut self.nodes_per_query_count, served);
    }

    /// Number of distinct nodes that resolved at least one lookup.
    pub fn distinct_end_nodes(&self) -> usize {
        self.end_nodes.len()
    }

    pub fn avg_distance(&self) -> f64 {
        self.avg_distance
    }

    pub fn std_dev_distance(&self) -> f64 {
        self.std_dev_distance
    }

    pub fn avg_hops(&self) -> f64 {
        self.avg_hops
    }

    pub fn std_dev_hops(&self) -> f64 {
        self.std_dev_hops
    }

    pub fn avg_queries_per_node(&self) -> f64 {
        self.avg_queries_per_node
    }

    pub fn distances(&self) -> &BTreeMap<KeyId, u64> {
        &self.distances
    }

    pub fn hop_counts(&self) -> &BTreeMap<u64, u64> {
        &self.hop_counts
    }

    pub fn queries_per_node(&self) -> &BTreeMap<KeyId, u64> {
        &self.queries_per_node
    }

    /// Render the scalar aggregates followed by the three frequency
    /// tables. Identifier-valued keys print as trimmed hex; table rows
    /// are sorted ascending.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("avg_queries_per_node,{}\n", self.avg_queries_per_node));
        out.push_str(&format!("end_nodes,{}\n", self.distinct_end_nodes()));
        out.push_str(&format!("average_distance,{}\n", self.avg_distance));
        out.push_str(&format!("std_dev_distance,{}\n", self.std_dev_distance));
        out.push_str(&format!("avg_hops_per_query,{}\n", self.avg_hops));
        out.push_str(&format!("std_dev_hops_per_query,{}\n", self.std_dev_hops));

        out.push_str("\ndistance,count\n");
        for (distance, count) in &self.distances {
            out.push_str(&format!("{distance},{count}\n"));
        }

        out.push_str("\nquery_number,nodes\n");
        for (served, nodes) in &self.nodes_per_query_count {
            out.push_str(&format!("{served},{nodes}\n"));
        }

        out.push_str("\nhops_per_query,times\n");
        for (hops, times) in &self.hop_counts {
            out.push_str(&format!("{hops},{times}\n"));
        }

        out
    }
}

/// Increment `key`'s count, returning the new count.
fn bump<K: Ord>(map: &mut BTreeMap<K, u64>, key: K) -> u64 {
    let count = map.entry(key).or_insert(0);
    *count += 1;
    *count
}

/// Mean and standard deviation of a frequency table given as
/// `(value, occurrences)` pairs.
fn frequency_moments(table: impl Iterator<Item = (f64, u64)> + Clone) -> (f64, f64) {
    let mut sum = 0.0;
    let mut size = 0.0;
    for (value, count) in table.clone() {
        sum += value * count as f64;
        size += count as f64;
    }
    if size == 0.0 {
        return (0.0, 0.0);
    }
    let mean = sum / size;

    let mut dev_sum = 0.0;
    for (value, count) in table {
        dev_sum += (value - mean) * (value - mean) * count as f64;
    }
    (mean, (dev_sum / size).sqrt())
}

#[cfg(test)]
mod tests {
    use chordal_types::RouteTrace;

    use super::*;

    fn k(v: u64) -> KeyId {
        KeyId::from_u64(v)
    }

    fn route(start: u64, hops: &[u64], end: u64) -> RouteTrace {
        let mut trace = RouteTrace::new(k(0), k(start));
        for hop in hops {
            trace.add_hop(k(*hop));
        }
        trace.set_end(k(end));
        trace
    }

    #[test]
    fn test_distance_moments() {
        let mut stats = AggregateStats::new();
        stats.add_distance(k(70));
        stats.add_distance(k(70));
        stats.add_distance(k(70));
        stats.add_distance(k(46));

        assert_eq!(stats.avg_distance(), 64.0);
        // Variance: (3*(70-64)^2 + (46-64)^2) / 4 = 108, sqrt ≈ 10.392.
        assert!((stats.std_dev_distance() - 108f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_hop_moments_refresh_per_route() {
        let mut stats = AggregateStats::new();
        stats.record_route(&route(1, &[1, 2], 3));
        assert_eq!(stats.avg_hops(), 2.0);
        assert_eq!(stats.std_dev_hops(), 0.0);

        stats.record_route(&route(4, &[], 4));
        assert_eq!(stats.avg_hops(), 1.0);
        assert_eq!(stats.std_dev_hops(), 1.0);
    }

    #[test]
    fn test_served_counters_cover_hops_and_end() {
        let mut stats = AggregateStats::new();
        stats.record_route(&route(1, &[1, 2], 3));

        assert_eq!(stats.queries_per_node().get(&k(1)), Some(&1));
        assert_eq!(stats.queries_per_node().get(&k(2)), Some(&1));
        assert_eq!(stats.queries_per_node().get(&k(3)), Some(&1));
        assert_eq!(stats.distinct_end_nodes(), 1);

        // Node 3 resolves a second lookup.
        stats.record_route(&route(3, &[], 3));
        assert_eq!(stats.queries_per_node().get(&k(3)), Some(&2));
        assert_eq!(stats.distinct_end_nodes(), 1);
    }

    #[test]
    fn test_end_node_tally_counts_distinct() {
        let mut stats = AggregateStats::new();
        stats.record_route(&route(1, &[], 5));
        stats.record_route(&route(2, &[], 5));
        stats.record_route(&route(3, &[], 9));
        assert_eq!(stats.distinct_end_nodes(), 2);
    }

    #[test]
    fn test_csv_layout() {
        let mut stats = AggregateStats::new();
        stats.add_distance(k(70));
        stats.record_route(&route(0x0a, &[0x0a], 0x50));

        let csv = stats.to_csv();
        let mut sections = csv.split("\n\n");

        let scalars = sections.next().unwrap();
        assert!(scalars.starts_with("avg_queries_per_node,"));
        assert!(scalars.contains("\nend_nodes,1\n"));
        assert!(scalars.contains("\naverage_distance,70\n"));
        assert!(scalars.contains("\navg_hops_per_query,1\n"));

        let distances = sections.next().unwrap();
        assert_eq!(distances.lines().next(), Some("distance,count"));
        assert!(distances.contains("46,1"));

        let queries = sections.next().unwrap();
        assert_eq!(queries.lines().next(), Some("query_number,nodes"));

        let hops = sections.next().unwrap();
        assert_eq!(hops.lines().next(), Some("hops_per_query,times"));
        assert!(hops.contains("1,1"));
    }

    #[test]
    fn test_empty_stats_render() {
        let csv = AggregateStats::new().to_csv();
        assert!(csv.contains("avg_queries_per_node,0\n"));
        assert!(csv.contains("end_nodes,0\n"));
        assert!(csv.ends_with("hops_per_query,times\n"));
    }
}
