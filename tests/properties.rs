mod support;

use std::collections::HashSet;

use netalloc::{BitPool, Resource, ResourceError, StateStore, AUTO_VXLAN_RESOURCE};
use proptest::prelude::*;
use support::vxlan_resource;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn min_capacity_allocations_are_distinct(vxlans in 1usize..200, vlans in 1usize..200) {
        let (store, resource) = vxlan_resource("prop", vxlans, vlans);
        let n = vxlans.min(vlans);

        let mut seen_vxlans = HashSet::new();
        let mut seen_vlans = HashSet::new();
        for _ in 0..n {
            let pair = resource.allocate().unwrap();
            prop_assert!(seen_vxlans.insert(pair.vxlan));
            prop_assert!(seen_vlans.insert(pair.vlan));
        }

        let key = netalloc::oper_key(AUTO_VXLAN_RESOURCE, "prop");
        let before = store.read_raw(&key).unwrap();
        let is_exhausted = matches!(resource.allocate(), Err(ResourceError::Exhausted { .. }));
        prop_assert!(is_exhausted);
        prop_assert_eq!(before, store.read_raw(&key).unwrap());
    }

    #[test]
    fn deallocating_lowest_outstanding_pair_is_reallocated_next(
        capacity in 2usize..64,
        frees in proptest::collection::vec(any::<prop::sample::Index>(), 1..8),
    ) {
        let (_store, resource) = vxlan_resource("prop", capacity, capacity);
        let mut outstanding: Vec<_> = (0..capacity).map(|_| resource.allocate().unwrap()).collect();

        for index in frees {
            if outstanding.is_empty() {
                break;
            }
            let pair = outstanding.remove(index.index(outstanding.len()));
            resource.deallocate(pair).unwrap();
        }

        let mut freed: Vec<_> = (0..capacity)
            .map(|i| netalloc::VxlanVlanPair::new(i, i))
            .filter(|p| !outstanding.contains(p))
            .collect();
        freed.sort_by_key(|p| p.vxlan);
        prop_assert_eq!(resource.allocate().unwrap(), freed[0]);
    }

    #[test]
    fn bit_pool_round_trips_through_json(
        capacity in 0usize..300,
        bits in proptest::collection::vec(any::<prop::sample::Index>(), 0..40),
    ) {
        let mut pool = BitPool::with_capacity(capacity);
        if capacity > 0 {
            for bit in bits {
                pool.set(bit.index(capacity)).unwrap();
            }
        }
        let json = serde_json::to_string(&pool).unwrap();
        let back: BitPool = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, pool);
    }
}
