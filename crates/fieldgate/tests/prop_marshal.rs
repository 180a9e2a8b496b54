//! Property-based tests for the marshalling walk.
//!
//! These check invariants that must hold for any activation set or field
//! value, not just the fixtures in `marshal_tests.rs`.

use fieldgate::{marshal, record, Options};
use proptest::prelude::*;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Fixtures — the same fields declared in two different orders
// ---------------------------------------------------------------------------

struct Forward {
    a: u8,
    b: u8,
    c: u8,
    d: u8,
}

record!(Forward {
    a: r#"json:"a" groups:"red""#,
    b: r#"json:"b" groups:"blue,green""#,
    c: r#"json:"c" groups:"green""#,
    d: r#"json:"d""#,
});

struct Reversed {
    d: u8,
    c: u8,
    b: u8,
    a: u8,
}

record!(Reversed {
    d: r#"json:"d""#,
    c: r#"json:"c" groups:"green""#,
    b: r#"json:"b" groups:"blue,green""#,
    a: r#"json:"a" groups:"red""#,
});

struct Sparse {
    text: String,
    count: i64,
    flag: bool,
    items: Vec<u8>,
}

record!(Sparse {
    text: r#"json:"text,omitempty""#,
    count: r#"json:"count,omitempty""#,
    flag: r#"json:"flag,omitempty""#,
    items: r#"json:"items,omitempty""#,
});

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_groups() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(vec!["red", "blue", "green", "yellow"], 0..=4)
        .prop_map(|gs| gs.into_iter().map(str::to_owned).collect())
}

fn declared(field: &str) -> &'static [&'static str] {
    match field {
        "a" => &["red"],
        "b" => &["blue", "green"],
        "c" => &["green"],
        _ => &[],
    }
}

proptest! {
    /// A grouped field is present iff its groups intersect the active ones,
    /// whatever the declaration order of its siblings.
    #[test]
    fn group_inclusion_is_order_independent(groups in arb_groups(), ungrouped in any::<bool>()) {
        let opts = Options::new().groups(groups.clone()).include_ungrouped(ungrouped);
        let fwd = marshal(&opts, &Forward { a: 1, b: 2, c: 3, d: 4 }).unwrap();
        let rev = marshal(&opts, &Reversed { d: 4, c: 3, b: 2, a: 1 }).unwrap();
        prop_assert_eq!(&fwd, &rev);

        let filtering = !groups.is_empty() || ungrouped;
        for field in ["a", "b", "c", "d"] {
            let decl = declared(field);
            let expected = if !filtering {
                true
            } else if decl.is_empty() {
                ungrouped
            } else {
                decl.iter().any(|g| groups.iter().any(|a| a == g))
            };
            prop_assert_eq!(fwd.get(field).is_some(), expected, "field {}", field);
        }
    }

    /// omitempty fields appear exactly when their value is non-zero/non-empty.
    #[test]
    fn omitempty_tracks_emptiness(
        text in "[a-z]{0,3}",
        count in -2i64..3,
        flag in any::<bool>(),
        items in prop::collection::vec(any::<u8>(), 0..3),
    ) {
        let value = Sparse { text: text.clone(), count, flag, items: items.clone() };
        let out = marshal(&Options::new(), &value).unwrap();
        prop_assert_eq!(out.get("text").is_some(), !text.is_empty());
        prop_assert_eq!(out.get("count").is_some(), count != 0);
        prop_assert_eq!(out.get("flag").is_some(), flag);
        prop_assert_eq!(out.get("items").is_some(), !items.is_empty());
    }

    /// Sequences keep length and order.
    #[test]
    fn sequences_preserve_order(values in prop::collection::vec(any::<u32>(), 0..20)) {
        let out = marshal(&Options::new(), &values).unwrap();
        prop_assert_eq!(out, json!(values));
    }

    /// Repeated calls with the same inputs produce equal trees.
    #[test]
    fn marshal_is_deterministic(groups in arb_groups(), inherit in any::<bool>()) {
        let opts = Options::new().groups(groups).inherit_groups(inherit);
        let first: Value = marshal(&opts, &Forward { a: 1, b: 2, c: 3, d: 4 }).unwrap();
        let second: Value = marshal(&opts, &Forward { a: 1, b: 2, c: 3, d: 4 }).unwrap();
        prop_assert_eq!(first, second);
    }
}
