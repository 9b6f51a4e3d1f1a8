use crate::{
    db::{bindings::Bindings, executor},
    error::{Error, SchemaError},
    traits::EntityKind,
    value::Value,
};
use log::debug;
use rusqlite::{Connection, params_from_iter};
use ulid::Ulid;

/// Persist an entity, deciding INSERT versus UPDATE from its key value.
///
/// - Nil ulid key: mint a fresh ulid, assign it, INSERT.
/// - Non-nil ulid key: probe for the row; UPDATE when it exists, INSERT
///   when it does not (upsert-by-absence, not merge).
/// - Any other key type: unset (null/zero/empty) inserts as-is, anything
///   else updates.
///
/// Up to two sequential statements, no surrounding transaction; callers
/// needing atomicity across several saves wrap the connection themselves.
/// A unique-constraint race on insert surfaces as a store error
/// (`Error::is_duplicate`).
pub fn save<E: EntityKind>(conn: &Connection, mut entity: E) -> Result<E, Error> {
    match entity.key_value() {
        Value::Ulid(id) if id.is_nil() => {
            entity.set_key_value(Value::Ulid(Ulid::new()));
            insert(conn, &entity)?;
        }
        key @ Value::Ulid(_) => {
            if executor::get::<E>(conn, &key)?.is_some() {
                update(conn, &entity)?;
            } else {
                insert(conn, &entity)?;
            }
        }
        key if key_is_unset(&key) => insert(conn, &entity)?,
        _ => update(conn, &entity)?,
    }

    Ok(entity)
}

/// Insert one row from the entity's mapped columns.
pub fn insert<E: EntityKind>(conn: &Connection, entity: &E) -> Result<(), Error> {
    let model = E::MODEL;

    let mut bindings = Bindings::new();
    let mut columns = Vec::new();
    let mut placeholders = Vec::new();

    for field in model.mapped_fields() {
        let value = entity.field_value(field.name).unwrap_or(Value::Null);
        columns.push(field.column_name());
        placeholders.push(bindings.push(&value));
    }

    if columns.is_empty() {
        return Err(SchemaError::NoMappedColumns {
            entity: model.entity_name,
        }
        .into());
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        model.table(),
        columns.join(", "),
        placeholders.join(", ")
    );

    debug!("insert {}: {sql}", model.entity_name);

    conn.prepare_cached(&sql)?
        .execute(params_from_iter(bindings.values().iter()))?;

    Ok(())
}

/// Update the row addressed by the entity's key, setting every mapped
/// non-key column. With nothing settable, the row is left untouched.
pub fn update<E: EntityKind>(conn: &Connection, entity: &E) -> Result<(), Error> {
    let model = E::MODEL;
    let key_field = model.key_field()?;

    let mut bindings = Bindings::new();
    let mut assignments = Vec::new();

    for field in model.mapped_fields() {
        if field.name.eq_ignore_ascii_case(key_field.name) {
            continue;
        }

        let value = entity.field_value(field.name).unwrap_or(Value::Null);
        let placeholder = bindings.push(&value);
        assignments.push(format!("{} = {placeholder}", field.column_name()));
    }

    if assignments.is_empty() {
        return Ok(());
    }

    let key_placeholder = bindings.push(&entity.key_value());
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = {key_placeholder}",
        model.table(),
        assignments.join(", "),
        key_field.column_name()
    );

    debug!("update {}: {sql}", model.entity_name);

    conn.prepare_cached(&sql)?
        .execute(params_from_iter(bindings.values().iter()))?;

    Ok(())
}

/// Delete rows by key, one `WHERE key IN (…)` statement.
pub fn delete<E: EntityKind>(conn: &Connection, keys: &[Value]) -> Result<usize, Error> {
    if keys.is_empty() {
        return Ok(0);
    }

    let model = E::MODEL;
    let key_field = model.key_field()?;

    let mut bindings = Bindings::new();
    let placeholders: Vec<String> = keys.iter().map(|key| bindings.push(key)).collect();

    let sql = format!(
        "DELETE FROM {} WHERE {} IN ({})",
        model.table(),
        key_field.column_name(),
        placeholders.join(", ")
    );

    debug!("delete {}: {sql}", model.entity_name);

    let affected = conn
        .prepare_cached(&sql)?
        .execute(params_from_iter(bindings.values().iter()))?;

    Ok(affected)
}

// Unset detection for non-ulid key types: the storage layer never assigns
// these values to a live row, so they mean "new record".
fn key_is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(text) => text.is_empty(),
        Value::Int(v) => *v == 0,
        Value::Uint(v) => *v == 0,
        Value::Ulid(id) => id.is_nil(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{executor, query::QueryDescription},
        model::{EntityModel, FieldModel},
        test_fixtures::{Product, create_products_table},
        traits::{EntitySchema, EntityValue, FieldValue},
    };
    use rusqlite::Connection;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_products_table(&conn);
        conn
    }

    fn sample(code: &str) -> Product {
        Product {
            id: Ulid::nil(),
            code: code.to_owned(),
            name: Some("sample".to_owned()),
            price: 12.5,
            display_label: "unsaved".to_owned(),
        }
    }

    #[test]
    fn save_with_nil_key_mints_and_inserts() {
        let conn = conn();
        let saved = save(&conn, sample("CA1")).unwrap();

        assert!(!saved.id.is_nil());

        let found: Option<Product> = executor::get(&conn, &saved.key_value()).unwrap();
        assert_eq!(found.map(|p| p.code), Some("CA1".to_owned()));
    }

    #[test]
    fn save_with_existing_key_updates_in_place() {
        let conn = conn();
        let mut saved = save(&conn, sample("CA1")).unwrap();

        saved.price = 99.0;
        let saved_again = save(&conn, saved.clone()).unwrap();
        assert_eq!(saved_again.id, saved.id);

        let desc = QueryDescription::new(1, 10);
        assert_eq!(executor::count::<Product>(&conn, &desc).unwrap(), 1);

        let found: Option<Product> = executor::get(&conn, &saved.key_value()).unwrap();
        assert_eq!(found.map(|p| p.price), Some(99.0));
    }

    #[test]
    fn save_twice_with_same_values_is_idempotent() {
        let conn = conn();
        let saved = save(&conn, sample("CA1")).unwrap();

        let again = save(&conn, saved.clone()).unwrap();
        assert_eq!(again.id, saved.id);

        let desc = QueryDescription::new(1, 10);
        assert_eq!(executor::count::<Product>(&conn, &desc).unwrap(), 1);
    }

    #[test]
    fn save_with_absent_key_inserts_by_absence() {
        let conn = conn();

        let mut ghost = sample("CA9");
        ghost.id = Ulid::new();

        save(&conn, ghost.clone()).unwrap();

        let found: Option<Product> = executor::get(&conn, &ghost.key_value()).unwrap();
        assert_eq!(found.map(|p| p.code), Some("CA9".to_owned()));
    }

    #[test]
    fn duplicate_insert_surfaces_as_duplicate_store_error() {
        let conn = conn();
        save(&conn, sample("CA1")).unwrap();

        let err = save(&conn, sample("CA1")).unwrap_err();
        assert!(err.is_duplicate());
    }

    #[test]
    fn delete_removes_by_key_list() {
        let conn = conn();
        let one = save(&conn, sample("CA1")).unwrap();
        let two = save(&conn, sample("CA2")).unwrap();
        save(&conn, sample("CA3")).unwrap();

        let removed =
            delete::<Product>(&conn, &[one.key_value(), two.key_value()]).unwrap();
        assert_eq!(removed, 2);

        let desc = QueryDescription::new(1, 10);
        assert_eq!(executor::count::<Product>(&conn, &desc).unwrap(), 1);

        assert_eq!(delete::<Product>(&conn, &[]).unwrap(), 0);
    }

    ///
    /// Bare
    ///
    /// No mapped columns at all; insert must refuse with a schema error.
    ///

    static BARE_FIELDS: [FieldModel; 1] = [FieldModel {
        name: "bare_id",
        column: None,
        required: false,
        is_key: true,
    }];

    static BARE_MODEL: EntityModel = EntityModel {
        path: "save::tests::Bare",
        entity_name: "Bare",
        table: Some("bares"),
        fields: &BARE_FIELDS,
        key: Some(0),
    };

    #[derive(Clone, Debug, Default)]
    struct Bare {
        id: i64,
    }

    impl EntitySchema for Bare {
        const MODEL: &'static EntityModel = &BARE_MODEL;
    }

    impl EntityValue for Bare {
        fn field_value(&self, field: &str) -> Option<Value> {
            (field == "bare_id").then(|| self.id.to_value())
        }

        fn key_value(&self) -> Value {
            self.id.to_value()
        }

        fn set_key_value(&mut self, value: Value) {
            if let Some(id) = i64::from_value(&value) {
                self.id = id;
            }
        }

        fn from_row(_row: &rusqlite::Row<'_>) -> Result<Self, rusqlite::Error> {
            Ok(Self::default())
        }
    }

    #[test]
    fn insert_without_mapped_columns_is_a_schema_error() {
        let conn = conn();
        let err = insert(&conn, &Bare { id: 0 }).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::NoMappedColumns { entity: "Bare" })
        ));
    }

    #[test]
    fn integer_zero_key_means_insert() {
        assert!(key_is_unset(&Value::Int(0)));
        assert!(key_is_unset(&Value::Null));
        assert!(key_is_unset(&Value::Text(String::new())));
        assert!(!key_is_unset(&Value::Int(5)));
        assert!(!key_is_unset(&Value::Text("k".to_owned())));
    }
}
