use crate::{
    db::filter::{
        ast::{FilterNode, Joiner},
        op::FilterOp,
    },
    value::Value,
};
use serde_json::Value as JsonValue;

/// Parse a grid filter expression string into a tree.
///
/// The wire shape is a JSON array mixing three element kinds:
/// `[field, operator, value]` leaves, `"and"` / `"or"` joiner tokens that
/// apply to their whole level, and nested arrays forming sub-expressions.
///
/// Malformed JSON or a non-array shape yields `None` ("no filter") rather
/// than an error: read endpoints stay available under partial or legacy
/// grid state, by design.
#[must_use]
pub fn parse(filter_json: &str) -> Option<FilterNode> {
    let json: JsonValue = serde_json::from_str(filter_json).ok()?;

    match json {
        JsonValue::Array(items) => parse_group(&items),
        _ => None,
    }
}

/// One level of the expression array.
///
/// A joiner token applies to every condition collected at this level,
/// regardless of where in the array it appears; the last token wins.
fn parse_group(items: &[JsonValue]) -> Option<FilterNode> {
    let mut joiner = Joiner::default();
    let mut children = Vec::new();

    for item in items {
        match item {
            JsonValue::String(token) => {
                if let Some(parsed) = Joiner::parse(token) {
                    joiner = parsed;
                }
            }
            JsonValue::Array(inner) => {
                if is_condition_shape(inner) {
                    if let Some(leaf) = parse_condition(inner) {
                        children.push(leaf);
                    }
                } else if let Some(group) = parse_group(inner) {
                    children.push(group);
                }
            }
            _ => {}
        }
    }

    if children.is_empty() {
        None
    } else {
        Some(FilterNode::Group { joiner, children })
    }
}

// A leaf is exactly [field, operator, value] with string field/operator;
// any other array is a nested sub-expression.
fn is_condition_shape(items: &[JsonValue]) -> bool {
    items.len() == 3 && items[0].is_string() && items[1].is_string()
}

fn parse_condition(items: &[JsonValue]) -> Option<FilterNode> {
    let field = items[0].as_str()?.trim();
    let alias = items[1].as_str()?;

    if field.is_empty() {
        return None;
    }

    // Unknown operator: drop the condition, never the request.
    let op = FilterOp::parse(alias)?;

    let value = if op.takes_value() {
        Value::from_json(&items[2])?
    } else {
        Value::Null
    };

    Some(FilterNode::Condition {
        field: field.to_owned(),
        op,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(field: &str, op: FilterOp, value: Value) -> FilterNode {
        FilterNode::Condition {
            field: field.to_owned(),
            op,
            value,
        }
    }

    #[test]
    fn single_condition() {
        let node = parse(r#"[["ShiftCode", "=", "CA1"]]"#).unwrap();
        assert_eq!(
            node,
            FilterNode::Group {
                joiner: Joiner::And,
                children: vec![leaf("ShiftCode", FilterOp::Equal, Value::Text("CA1".into()))],
            }
        );
    }

    #[test]
    fn or_token_applies_to_the_level() {
        let node = parse(r#"[["a", "=", 1], "or", ["b", "=", 2]]"#).unwrap();
        let FilterNode::Group { joiner, children } = node else {
            panic!("expected group");
        };
        assert_eq!(joiner, Joiner::Or);
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn joiner_token_is_case_insensitive() {
        let node = parse(r#"[["a", "=", 1], "OR", ["b", "=", 2]]"#).unwrap();
        let FilterNode::Group { joiner, .. } = node else {
            panic!("expected group");
        };
        assert_eq!(joiner, Joiner::Or);
    }

    #[test]
    fn default_joiner_is_and() {
        let node = parse(r#"[["a", "=", 1], ["b", "=", 2]]"#).unwrap();
        let FilterNode::Group { joiner, .. } = node else {
            panic!("expected group");
        };
        assert_eq!(joiner, Joiner::And);
    }

    #[test]
    fn nested_arrays_become_sub_groups() {
        let node = parse(
            r#"[[["status", "=", 1], "or", ["status", "isnull", null]], "and", ["code", "contains", "ca"]]"#,
        )
        .unwrap();

        let FilterNode::Group { joiner, children } = node else {
            panic!("expected group");
        };
        assert_eq!(joiner, Joiner::And);
        assert_eq!(children.len(), 2);
        assert!(matches!(
            &children[0],
            FilterNode::Group {
                joiner: Joiner::Or,
                children
            } if children.len() == 2
        ));
    }

    #[test]
    fn null_tests_ignore_their_value_slot() {
        let node = parse(r#"[["deleted_at", "isnull", "whatever"]]"#).unwrap();
        let FilterNode::Group { children, .. } = node else {
            panic!("expected group");
        };
        assert_eq!(
            children[0],
            leaf("deleted_at", FilterOp::IsNull, Value::Null)
        );
    }

    #[test]
    fn unknown_operator_drops_the_condition() {
        let node = parse(r#"[["a", "between", 1], ["b", "=", 2]]"#).unwrap();
        let FilterNode::Group { children, .. } = node else {
            panic!("expected group");
        };
        assert_eq!(children.len(), 1);
        assert_eq!(children[0], leaf("b", FilterOp::Equal, Value::Int(2)));
    }

    #[test]
    fn malformed_input_is_no_filter() {
        assert_eq!(parse("not-json"), None);
        assert_eq!(parse(r#"{"filter": 1}"#), None);
        assert_eq!(parse("[]"), None);
        assert_eq!(parse(r"[42]"), None);
        assert_eq!(parse(r#"["and"]"#), None);
    }

    #[test]
    fn composite_values_drop_the_condition() {
        assert_eq!(parse(r#"[["a", "=", [1, 2]]]"#), None);
    }

    #[test]
    fn two_element_arrays_are_not_conditions() {
        // Not a leaf and, containing no leaves, not a group either.
        assert_eq!(parse(r#"[["a", "="]]"#), None);
    }
}
