use crate::model::EntityModel;
use serde_json::Value as JsonValue;

///
/// SortKey
///
/// One parsed sort entry, still in field-name space. Resolution against a
/// model happens in `render`, so the parse stays schema-free.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

/// Parse a grid sort spec: a JSON array of `{"Selector": …, "Desc": …}`
/// objects.
///
/// Entries that are not objects or lack a `Selector` string are skipped;
/// `DESC` applies only when `Desc` is the JSON literal `true` (a string
/// `"true"` sorts ascending). Malformed JSON yields an empty list, never
/// an error. Output order matches input order: the first key is the
/// primary sort.
#[must_use]
pub fn parse(sort_json: &str) -> Vec<SortKey> {
    let Ok(json) = serde_json::from_str::<JsonValue>(sort_json) else {
        return Vec::new();
    };

    let JsonValue::Array(items) = json else {
        return Vec::new();
    };

    let mut keys = Vec::with_capacity(items.len());

    for item in &items {
        let JsonValue::Object(entry) = item else {
            continue;
        };

        let Some(JsonValue::String(field)) = entry.get("Selector") else {
            continue;
        };

        if field.trim().is_empty() {
            continue;
        }

        let descending = matches!(entry.get("Desc"), Some(JsonValue::Bool(true)));

        keys.push(SortKey {
            field: field.clone(),
            descending,
        });
    }

    keys
}

/// Resolve parsed keys against a model into an ORDER BY body.
///
/// Unknown selectors are dropped; `None` means the clause is omitted.
#[must_use]
pub fn render(keys: &[SortKey], model: &EntityModel) -> Option<String> {
    let parts: Vec<String> = keys
        .iter()
        .filter_map(|key| {
            model.resolve_column(&key.field).map(|column| {
                let direction = if key.descending { "DESC" } else { "ASC" };
                format!("{column} {direction}")
            })
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::PRODUCT_MODEL;

    #[test]
    fn keys_keep_their_order() {
        let keys = parse(r#"[{"Selector":"product_code","Desc":true},{"Selector":"price","Desc":false}]"#);
        assert_eq!(
            keys,
            vec![
                SortKey {
                    field: "product_code".into(),
                    descending: true
                },
                SortKey {
                    field: "price".into(),
                    descending: false
                },
            ]
        );

        assert_eq!(
            render(&keys, &PRODUCT_MODEL).unwrap(),
            "code DESC, price ASC"
        );
    }

    #[test]
    fn desc_must_be_the_boolean_literal() {
        let keys = parse(r#"[{"Selector":"price","Desc":"true"},{"Selector":"price","Desc":1}]"#);
        assert!(keys.iter().all(|key| !key.descending));
    }

    #[test]
    fn missing_desc_sorts_ascending() {
        let keys = parse(r#"[{"Selector":"price"}]"#);
        assert_eq!(keys.len(), 1);
        assert!(!keys[0].descending);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let keys = parse(r#"[42, "x", {"Desc":true}, {"Selector":""}, {"Selector":"price"}]"#);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].field, "price");
    }

    #[test]
    fn malformed_json_is_an_empty_list() {
        assert!(parse("not-json").is_empty());
        assert!(parse(r#"{"Selector":"x"}"#).is_empty());
    }

    #[test]
    fn unknown_selectors_drop_out_of_the_clause() {
        let keys = parse(r#"[{"Selector":"bogus","Desc":true},{"Selector":"price"}]"#);
        assert_eq!(render(&keys, &PRODUCT_MODEL).unwrap(), "price ASC");

        let keys = parse(r#"[{"Selector":"bogus"}]"#);
        assert_eq!(render(&keys, &PRODUCT_MODEL), None);
    }
}
