//! Property tests for the path parser and analyzer determinism.

use morph::{Adapter, Bind, KeyValuePath};
use proptest::prelude::*;
use serde::Deserialize;

#[derive(Bind, Debug, Default, Deserialize)]
#[serde(default)]
struct Tagged {
    #[bind(form = "a", query = "a", path = "A")]
    a: String,
}

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,8}"
}

proptest! {
    /// Slash placement never changes the parsed pairs.
    #[test]
    fn parse_ignores_extra_slashes(segments in prop::collection::vec(segment(), 0..8)) {
        let plain = segments.join("/");
        let decorated = format!("//{}//", segments.join("///"));
        prop_assert_eq!(KeyValuePath::parse(&plain), KeyValuePath::parse(&decorated));
    }

    /// Every parsed key is one of the even-position segments, and a path of
    /// distinct keys round-trips exactly.
    #[test]
    fn parse_maps_keys_to_following_values(pairs in prop::collection::vec((segment(), segment()), 0..6)) {
        let mut distinct = pairs.clone();
        distinct.sort();
        distinct.dedup_by(|a, b| a.0 == b.0);

        let path = distinct
            .iter()
            .flat_map(|(k, v)| [k.clone(), v.clone()])
            .collect::<Vec<_>>()
            .join("/");
        let parsed = KeyValuePath::parse(&path);

        prop_assert_eq!(parsed.len(), distinct.len());
        for (key, value) in &distinct {
            prop_assert_eq!(parsed.get(key.as_str()), Some(value));
        }
    }

    /// A dangling trailing key always maps to the empty string.
    #[test]
    fn parse_dangling_key_is_empty(key in segment()) {
        let parsed = KeyValuePath::parse(&key);
        prop_assert_eq!(parsed.get(key.as_str()).map(String::as_str), Some(""));
    }

    /// Parsing is a pure function of its input.
    #[test]
    fn parse_is_deterministic(path in "[A-Za-z0-9/]{0,40}") {
        prop_assert_eq!(KeyValuePath::parse(&path), KeyValuePath::parse(&path));
    }
}

proptest! {
    /// Signature analysis is deterministic no matter how often it runs.
    #[test]
    fn plans_never_vary_across_registrations(_seed in 0u8..8) {
        fn handler(t: Tagged) -> String {
            t.a
        }

        let adapter = Adapter::new();
        let first = adapter.handler(handler);
        let second = adapter.handler(handler);
        prop_assert_eq!(first.plan(), second.plan());
    }
}
