use strata::data::{PriorityQueue, QueueError};

#[test]
fn priority_queue_len_counts_entries() {
    let mut pq = PriorityQueue::new();
    assert_eq!(pq.len(), 0);
    pq.add("a", 1.0);
    assert_eq!(pq.len(), 1);
    assert!(!pq.is_empty());
}

#[test]
fn priority_queue_keys_returns_all_keys() {
    let mut pq = PriorityQueue::new();
    pq.add("a", 1.0);
    pq.add(1.to_string(), 2.0);
    pq.add("c", 3.0);

    let mut keys: Vec<&str> = pq.keys().collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["1", "a", "c"]);
}

#[test]
fn priority_queue_has_and_priority_report_queued_keys() {
    let mut pq = PriorityQueue::new();
    pq.add("a", 1.0);
    assert!(pq.has("a"));
    assert!(!pq.has("b"));
    assert_eq!(pq.priority("a"), Some(1.0));
    assert_eq!(pq.priority("b"), None);
}

#[test]
fn priority_queue_min_fails_on_an_empty_queue() {
    let pq = PriorityQueue::new();
    assert_eq!(pq.min(), Err(QueueError::Empty));
}

#[test]
fn priority_queue_min_returns_the_smallest_key_without_removing_it() {
    let mut pq = PriorityQueue::new();
    pq.add("b", 2.0);
    pq.add("a", 1.0);
    pq.add("c", 3.0);
    assert_eq!(pq.min(), Ok("a"));
    assert_eq!(pq.len(), 3);
}

#[test]
fn priority_queue_add_ignores_a_key_already_queued() {
    let mut pq = PriorityQueue::new();
    assert!(pq.add("a", 1.0));
    assert!(!pq.add("a", 0.5));
    assert_eq!(pq.priority("a"), Some(1.0));
}

#[test]
fn priority_queue_remove_min_drains_in_priority_order() {
    let mut pq = PriorityQueue::new();
    for (key, priority) in [("d", 4.0), ("b", 2.0), ("a", 1.0), ("e", 5.0), ("c", 3.0)] {
        pq.add(key, priority);
    }

    let mut drained = Vec::new();
    while let Ok(key) = pq.remove_min() {
        drained.push(key);
    }
    assert_eq!(drained, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(pq.remove_min(), Err(QueueError::Empty));
}

#[test]
fn priority_queue_decrease_moves_a_key_to_the_front() {
    let mut pq = PriorityQueue::new();
    pq.add("a", 1.0);
    pq.add("b", 2.0);
    pq.add("c", 3.0);

    assert_eq!(pq.decrease("c", -1.0), Ok(()));
    assert_eq!(pq.min(), Ok("c"));
    assert_eq!(pq.priority("c"), Some(-1.0));
}

#[test]
fn priority_queue_decrease_rejects_a_higher_priority() {
    let mut pq = PriorityQueue::new();
    pq.add("a", 1.0);

    let err = pq.decrease("a", 2.0);
    assert!(matches!(err, Err(QueueError::PriorityIncrease { .. })));
    assert_eq!(pq.priority("a"), Some(1.0));
}

#[test]
fn priority_queue_decrease_rejects_an_unknown_key() {
    let mut pq = PriorityQueue::new();
    assert_eq!(
        pq.decrease("x", 0.0),
        Err(QueueError::UnknownKey("x".to_string()))
    );
}
