//! Integration test: concurrent access through `SharedRing`.
//!
//! Writers churn membership while readers check that every observation is a
//! whole ring: never a node with only some of its positions placed.

use std::sync::Arc;
use std::thread;

use ringlet_hash::Murmur3Hash;
use ringlet_integration_tests::sample_keys;
use ringlet_ring::{ConsistentHashRing, SharedRing};

const REPLICAS: u32 = 100;

#[test]
#[ntest::timeout(30000)]
fn test_readers_never_observe_partial_membership() {
    let ring = Arc::new(SharedRing::new(Murmur3Hash, REPLICAS).unwrap());
    ring.add_node("stable");

    let writers: Vec<_> = ["churn-1", "churn-2"]
        .into_iter()
        .map(|node| {
            let ring = Arc::clone(&ring);
            thread::spawn(move || {
                for _ in 0..200 {
                    ring.add_node(node);
                    ring.remove_node(node);
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let ring = Arc::clone(&ring);
            thread::spawn(move || {
                let keys = sample_keys(64);
                for _ in 0..200 {
                    let (positions, nodes) =
                        ring.inspect(|r| (r.position_count(), r.node_count()));
                    assert_eq!(positions, nodes * REPLICAS as usize, "torn ring");
                    for key in &keys {
                        assert!(ring.get_node(key).is_some());
                    }
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }
    assert_eq!(ring.list_nodes(), vec!["stable"]);
}

#[test]
#[ntest::timeout(30000)]
fn test_concurrent_adds_match_sequential_ring() {
    let shared = Arc::new(SharedRing::new(Murmur3Hash, REPLICAS).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || shared.add_node(&format!("node-{i}")))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut sequential = ConsistentHashRing::new(Murmur3Hash, REPLICAS).unwrap();
    for i in 0..8 {
        sequential.add_node(&format!("node-{i}"));
    }

    let shared = Arc::into_inner(shared).expect("all threads joined").into_inner();
    assert_eq!(shared.positions(), sequential.positions());
}

#[test]
#[ntest::timeout(30000)]
fn test_batched_update_is_atomic() {
    let ring = Arc::new(SharedRing::new(Murmur3Hash, REPLICAS).unwrap());
    ring.add_node("old");

    let writer = {
        let ring = Arc::clone(&ring);
        thread::spawn(move || {
            for _ in 0..100 {
                ring.update(|r| {
                    r.remove_node("old");
                    r.add_node("new");
                });
                ring.update(|r| {
                    r.remove_node("new");
                    r.add_node("old");
                });
            }
        })
    };

    let reader = {
        let ring = Arc::clone(&ring);
        thread::spawn(move || {
            for _ in 0..500 {
                assert_eq!(ring.node_count(), 1, "swap observed half done");
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
}
