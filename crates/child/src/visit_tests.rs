use super::*;

fn cid(suffix: &str) -> CorrelationId {
    CorrelationId::from_string(format!("cor-{suffix:0>19}"))
}

#[test]
fn unrecorded_visit_returns_none() {
    let cache = VisitCache::new();
    assert_eq!(cache.get(&cid("a")), None);
}

#[test]
fn recorded_visit_is_memoized() {
    let mut cache = VisitCache::new();
    let id = cid("b");
    cache.record(id, true);
    assert_eq!(cache.get(&id), Some(true));
}

#[test]
fn eviction_drops_oldest_entry_once_full() {
    let mut cache = VisitCache::new();
    for i in 0..MAX_TRACKED_VISITS {
        cache.record(cid(&i.to_string()), false);
    }
    let first = cid("0");
    assert_eq!(cache.get(&first), Some(false));

    cache.record(cid(&MAX_TRACKED_VISITS.to_string()), true);
    assert_eq!(cache.get(&first), None);
}
