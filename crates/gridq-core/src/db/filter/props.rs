use crate::{
    db::{bindings::Bindings, filter},
    test_fixtures::PRODUCT_MODEL,
};
use proptest::prelude::*;
use serde_json::{Value as JsonValue, json};

const FIELDS: [&str; 5] = [
    "product_id",
    "product_code",
    "product_name",
    "price",
    "nonexistent",
];

const ALIASES: [&str; 10] = [
    "=", "!=", "<>", ">", "<=", "contains", "notcontains", "startswith", "isnull", "between",
];

fn arb_scalar() -> impl Strategy<Value = JsonValue> {
    prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::from),
        any::<i64>().prop_map(JsonValue::from),
        any::<f64>().prop_filter("finite", |v| v.is_finite()).prop_map(JsonValue::from),
        "[a-zA-Z0-9%_?']{0,12}".prop_map(JsonValue::from),
    ]
}

fn arb_condition() -> impl Strategy<Value = JsonValue> {
    (
        proptest::sample::select(&FIELDS[..]),
        proptest::sample::select(&ALIASES[..]),
        arb_scalar(),
    )
        .prop_map(|(field, alias, value)| json!([field, alias, value]))
}

fn arb_expression() -> impl Strategy<Value = JsonValue> {
    let element = prop_oneof![
        4 => arb_condition(),
        1 => prop_oneof![Just(json!("and")), Just(json!("or")), Just(json!("xor"))],
    ];

    let level = proptest::collection::vec(element, 0..5).prop_map(JsonValue::Array);

    level.prop_recursive(3, 24, 4, |inner| {
        proptest::collection::vec(
            prop_oneof![
                3 => arb_condition(),
                1 => prop_oneof![Just(json!("and")), Just(json!("or"))],
                2 => inner,
            ],
            0..5,
        )
        .prop_map(JsonValue::Array)
    })
}

proptest! {
    /// Arbitrary text never panics the parser; it degrades to "no filter".
    #[test]
    fn parse_never_panics_on_junk(input in ".{0,64}") {
        let _ = filter::parse(&input);
    }

    /// Well-formed-ish expressions parse and render without panicking, and
    /// every rendered placeholder corresponds to exactly one bound value.
    #[test]
    fn rendered_placeholders_match_bound_values(expr in arb_expression()) {
        let text = expr.to_string();

        if let Some(tree) = filter::parse(&text) {
            let mut bindings = Bindings::new();

            if let Some(sql) = filter::render(&tree, &PRODUCT_MODEL, &mut bindings) {
                // Values never appear inline, so every '?' is a placeholder.
                let placeholders = sql.matches('?').count();
                prop_assert_eq!(placeholders, bindings.len());

                // Numbering is dense from ?1.
                for n in 1..=bindings.len() {
                    let needle = format!("?{n}");
                    prop_assert!(sql.contains(&needle));
                }

                let opens = sql.matches('(').count();
                let closes = sql.matches(')').count();
                prop_assert_eq!(opens, closes);

                prop_assert!(!sql.contains("nonexistent"));
            }
        }
    }
}
