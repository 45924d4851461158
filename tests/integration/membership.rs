//! Integration test: membership changes.
//!
//! Add/remove round trips, no-op removals, collisions, and the orphaned
//! positions left by a replica-count change (reconciled with `purge_node`).

use ringlet_hash::HashAlgorithm;
use ringlet_integration_tests::{FixedHash, node_names, ring_with, sample_keys};
use ringlet_ring::{ConsistentHashRing, RingError};

#[test]
fn test_add_then_remove_restores_exact_state() {
    for algo in HashAlgorithm::ALL {
        let mut ring = ring_with(algo, 100, &["ServerA", "ServerB"]);
        let before = ring.positions();

        ring.add_node("ServerC");
        assert_eq!(ring.position_count(), before.len() + 100, "{algo}");
        ring.remove_node("ServerC");

        assert_eq!(ring.positions(), before, "{algo}: add+remove changed the ring");
    }
}

#[test]
fn test_removing_every_node_empties_ring() {
    let nodes = node_names(5);
    let names: Vec<&str> = nodes.iter().map(String::as_str).collect();
    let mut ring = ring_with(HashAlgorithm::Sha256, 50, &names);
    assert_eq!(ring.node_count(), 5);

    for node in &names {
        ring.remove_node(node);
    }

    assert!(ring.is_empty());
    assert!(ring.list_nodes().is_empty());
    for key in sample_keys(100) {
        assert_eq!(ring.get_node(&key), None);
    }
}

#[test]
fn test_remove_unknown_or_twice_is_noop() {
    let mut ring = ring_with(HashAlgorithm::Murmur3, 100, &["ServerA", "ServerB"]);
    ring.remove_node("ServerB");
    let after_first = ring.positions();

    ring.remove_node("ServerB");
    ring.remove_node("never-added");

    assert_eq!(ring.positions(), after_first);
}

#[test]
fn test_list_nodes_same_for_any_replica_count() {
    let nodes = ["ServerC", "ServerA", "ServerB"];
    let expected = vec!["ServerA", "ServerB", "ServerC"];

    for replicas in [1, 10, 100, 1_000] {
        let ring = ring_with(HashAlgorithm::Blake3, replicas, &nodes);
        assert_eq!(ring.list_nodes(), expected, "replicas={replicas}");
        assert_eq!(ring.position_count(), 3 * replicas as usize);
    }
}

#[test]
fn test_list_nodes_unchanged_by_set_replicas_readd() {
    let mut ring = ring_with(HashAlgorithm::Md5, 10, &["ServerA", "ServerB"]);
    let nodes = ring.list_nodes();

    ring.set_replicas(40).unwrap();
    ring.add_node("ServerA");

    assert_eq!(ring.list_nodes(), nodes);
    assert_eq!(ring.position_count(), 50);
}

#[test]
fn test_collision_hands_position_to_later_node() {
    let hash = FixedHash::new([("A#0", 10), ("A#1", 30), ("B#0", 30), ("B#1", 50)]);
    let mut ring = ConsistentHashRing::new(hash, 2).unwrap();
    ring.add_node("A");
    ring.add_node("B");

    assert_eq!(ring.position_count(), 3);
    assert_eq!(ring.get_node("20"), Some("B"));
    assert_eq!(ring.get_node("5"), Some("A"));
}

#[test]
fn test_replica_count_change_orphans_positions_until_purged() {
    let hash = FixedHash::new([("A#0", 10), ("A#1", 40), ("A#2", 70), ("B#0", 20)]);
    let mut ring = ConsistentHashRing::new(hash, 3).unwrap();
    ring.add_node("A");
    ring.set_replicas(1).unwrap();
    ring.add_node("B");

    ring.remove_node("A");

    // A#1 and A#2 were not recomputed, so A still owns them.
    assert!(ring.contains_node("A"));
    assert_eq!(ring.get_node("30"), Some("A"));
    assert_eq!(ring.position_count(), 3);

    assert_eq!(ring.purge_node("A"), 2);
    assert!(!ring.contains_node("A"));
    assert_eq!(ring.get_node("30"), Some("B"));
    assert_eq!(ring.list_nodes(), vec!["B"]);
}

#[test]
fn test_purge_then_empty() {
    let mut ring = ring_with(HashAlgorithm::Murmur3, 20, &["ServerA"]);
    assert_eq!(ring.purge_node("ServerA"), 20);
    assert!(ring.is_empty());
    assert_eq!(ring.get_node("user:1"), None);
}

#[test]
fn test_zero_replicas_is_an_error() {
    assert!(matches!(
        ConsistentHashRing::new(FixedHash::default(), 0),
        Err(RingError::ZeroReplicas)
    ));
}
