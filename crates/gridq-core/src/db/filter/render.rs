use crate::{
    db::{
        bindings::Bindings,
        filter::{
            ast::{FilterNode, Joiner},
            op::FilterOp,
        },
    },
    model::EntityModel,
    value::Value,
};

/// Render a parsed filter tree against an entity model.
///
/// Field names resolve through the model's column map; conditions on
/// unknown fields are dropped silently. Returns `None` when nothing
/// survives resolution, so callers omit the clause entirely.
///
/// Every value goes through `bindings`; the emitted fragment contains only
/// metadata-resolved identifiers and placeholders.
#[must_use]
pub fn render(node: &FilterNode, model: &EntityModel, bindings: &mut Bindings) -> Option<String> {
    match node {
        FilterNode::Condition { field, op, value } => {
            let column = model.resolve_column(field)?;

            if !op.takes_value() {
                let test = if *op == FilterOp::IsNull {
                    "IS NULL"
                } else {
                    "IS NOT NULL"
                };
                return Some(format!("{column} {test}"));
            }

            if op.is_like() {
                let pattern = op.like_pattern(&value.pattern_text());
                let placeholder = bindings.push(&Value::Text(pattern));
                let negate = if *op == FilterOp::NotContains { "NOT " } else { "" };
                return Some(format!("{column} {negate}LIKE {placeholder}"));
            }

            let placeholder = bindings.push(value);
            Some(format!("{column} {} {placeholder}", op.sql_symbol()))
        }

        FilterNode::Group { joiner, children } => render_group(*joiner, children, model, bindings),
    }
}

fn render_group(
    joiner: Joiner,
    children: &[FilterNode],
    model: &EntityModel,
    bindings: &mut Bindings,
) -> Option<String> {
    let mut parts = Vec::with_capacity(children.len());

    for child in children {
        let Some(fragment) = render(child, model, bindings) else {
            continue;
        };

        // Sub-expressions keep their own precedence.
        if matches!(child, FilterNode::Group { .. }) {
            parts.push(format!("({fragment})"));
        } else {
            parts.push(fragment);
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&format!(" {} ", joiner.sql())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::filter::parse, test_fixtures::PRODUCT_MODEL};

    fn rendered(filter: &str) -> Option<(String, usize)> {
        let node = parse(filter)?;
        let mut bindings = Bindings::new();
        let sql = render(&node, &PRODUCT_MODEL, &mut bindings)?;
        Some((sql, bindings.len()))
    }

    #[test]
    fn equality_binds_one_parameter() {
        let (sql, params) = rendered(r#"[["product_code", "=", "CA1"]]"#).unwrap();
        assert_eq!(sql, "code = ?1");
        assert_eq!(params, 1);
    }

    #[test]
    fn field_names_resolve_case_insensitively_to_columns() {
        let (sql, _) = rendered(r#"[["ProductCode", "=", "CA1"]]"#).unwrap();
        assert_eq!(sql, "code = ?1");
    }

    #[test]
    fn or_level_renders_with_or() {
        let (sql, params) =
            rendered(r#"[["product_code", "=", "a"], "or", ["product_name", "=", "b"]]"#).unwrap();
        assert_eq!(sql, "code = ?1 OR name = ?2");
        assert_eq!(params, 2);
    }

    #[test]
    fn nested_groups_are_parenthesized() {
        let (sql, params) = rendered(
            r#"[[["price", ">", 10], "or", ["price", "isnull", null]], "and", ["product_code", "startswith", "ca"]]"#,
        )
        .unwrap();
        assert_eq!(sql, "(price > ?1 OR price IS NULL) AND code LIKE ?2");
        assert_eq!(params, 2);
    }

    #[test]
    fn like_operators_bind_patterns() {
        let (sql, _) = rendered(r#"[["product_name", "contains", "shift"]]"#).unwrap();
        assert_eq!(sql, "name LIKE ?1");

        let (sql, _) = rendered(r#"[["product_name", "notcontains", "shift"]]"#).unwrap();
        assert_eq!(sql, "name NOT LIKE ?1");

        let (sql, _) = rendered(r#"[["product_name", "endswith", "x"]]"#).unwrap();
        assert_eq!(sql, "name LIKE ?1");
    }

    #[test]
    fn unknown_fields_drop_their_condition_only() {
        let (sql, params) =
            rendered(r#"[["bogus", "=", 1], ["product_code", "=", "CA1"]]"#).unwrap();
        assert_eq!(sql, "code = ?1");
        assert_eq!(params, 1);
    }

    #[test]
    fn nothing_survives_nothing_renders() {
        assert_eq!(rendered(r#"[["bogus", "=", 1]]"#), None);
    }

    #[test]
    fn parameter_numbering_spans_the_whole_tree() {
        let (sql, params) = rendered(
            r#"[["product_code", "=", "a"], [["product_code", "=", "b"], "or", ["product_code", "=", "c"]]]"#,
        )
        .unwrap();
        assert_eq!(sql, "code = ?1 AND (code = ?2 OR code = ?3)");
        assert_eq!(params, 3);
    }

    #[test]
    fn unmapped_field_renders_by_its_own_name() {
        let (sql, _) = rendered(r#"[["display_label", "=", "x"]]"#).unwrap();
        assert_eq!(sql, "display_label = ?1");
    }
}
