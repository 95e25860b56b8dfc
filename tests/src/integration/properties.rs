//! # Filter Algebra Properties
//!
//! Membership-level properties over random key samples. Bit-level codec
//! properties live next to the codec.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bloom_multicast::{
        BloomFilter, BloomMembershipService, ChannelTransport, InMemoryRoutingTable, MembershipApi,
        MulticastConfig, PeerLink, PublicKey,
    };
    use proptest::prelude::*;

    use crate::support::random_keys;

    fn filter_of(keys: &[PublicKey]) -> BloomFilter {
        let mut f = BloomFilter::new();
        for k in keys {
            f.insert(k.as_ref());
        }
        f
    }

    fn union(a: &BloomFilter, b: &BloomFilter) -> BloomFilter {
        let mut out = a.clone();
        out.union_with(b);
        out
    }

    fn key_strategy() -> impl Strategy<Value = PublicKey> {
        any::<[u8; 32]>().prop_map(PublicKey::new)
    }

    #[test]
    fn test_union_commutative_on_random_sample() {
        let (left, right) = (random_keys(200), random_keys(200));
        let (a, b) = (filter_of(&left), filter_of(&right));

        let ab = union(&a, &b);
        let ba = union(&b, &a);

        assert_eq!(ab, ba);
        for k in random_keys(500).iter().chain(&left).chain(&right) {
            assert_eq!(ab.contains(k.as_ref()), ba.contains(k.as_ref()));
        }
    }

    #[test]
    fn test_union_associative_on_random_sample() {
        let sets = [random_keys(100), random_keys(100), random_keys(100)];
        let [a, b, c] = sets.each_ref().map(|s| filter_of(s));

        let left = union(&union(&a, &b), &c);
        let right = union(&a, &union(&b, &c));

        assert_eq!(left, right);
        for k in sets.iter().flatten() {
            assert!(left.contains(k.as_ref()));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_union_is_superset(
            a in prop::collection::vec(key_strategy(), 0..40),
            b in prop::collection::vec(key_strategy(), 0..40),
        ) {
            let merged = union(&filter_of(&a), &filter_of(&b));
            for k in a.iter().chain(&b) {
                prop_assert!(merged.contains(k.as_ref()));
            }
        }

        #[test]
        fn prop_union_idempotent(keys in prop::collection::vec(key_strategy(), 0..60)) {
            let f = filter_of(&keys);
            prop_assert_eq!(union(&f, &f), f);
        }

        #[test]
        fn prop_encoded_len_matches_for_reachable_states(
            keys in prop::collection::vec(key_strategy(), 0..300),
        ) {
            let f = filter_of(&keys);
            let bytes = f.encode().unwrap();
            prop_assert_eq!(bytes.len(), f.encoded_len());
            prop_assert_eq!(BloomFilter::decode(&bytes).unwrap(), f);
        }

        /// No false negatives through aggregation: the filter sent to each
        /// child carries every sibling's interest and its own never.
        #[test]
        fn prop_aggregation_has_no_false_negatives(
            interests in prop::collection::vec(prop::collection::vec(key_strategy(), 1..10), 3),
        ) {
            let root = PublicKey::new([0; 32]);
            let children = [PublicKey::new([1; 32]), PublicKey::new([2; 32]), PublicKey::new([3; 32])];

            let routing = Arc::new(InMemoryRoutingTable::new(root));
            for (i, child) in children.iter().enumerate() {
                routing.set_parent(*child, root);
                routing.add_link(*child, PeerLink::new(i as u64, 0));
            }
            let (transport, _rx) = ChannelTransport::new(64);
            let mut service = BloomMembershipService::new(
                root,
                MulticastConfig::default(),
                routing,
                Arc::new(transport),
            );

            for (child, keys) in children.iter().zip(&interests) {
                service.add_peer(*child);
                service.handle_bloom(child, &filter_of(keys).encode().unwrap()).unwrap();
            }
            service.do_maintenance().unwrap();

            for (i, child) in children.iter().enumerate() {
                let sent = service.peers().get(child).unwrap().send_filter();
                prop_assert!(sent.contains(root.as_ref()));
                for (j, keys) in interests.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    for k in keys {
                        prop_assert!(sent.contains(k.as_ref()));
                    }
                }
            }
        }
    }
}
