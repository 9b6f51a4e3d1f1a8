use crate::{traits::FieldValue, value::Value};

/// Read one column into a field value, tolerating projected-out columns.
///
/// Returns `Ok(None)` when the column is absent from the row (the caller
/// keeps the field's default, so partial projections still decode) or when
/// the stored value is NULL and the field type has no null form. A column
/// that is present with an incompatible storage type is a decode failure.
pub fn column_value<T: FieldValue>(
    row: &rusqlite::Row<'_>,
    column: &str,
) -> Result<Option<T>, rusqlite::Error> {
    let Ok(index) = row.as_ref().column_index(column) else {
        return Ok(None);
    };

    let raw: rusqlite::types::Value = row.get(index)?;
    let storage_type = raw.data_type();
    let value = Value::from_sql(raw);

    match T::from_value(&value) {
        Some(decoded) => Ok(Some(decoded)),
        None if value.is_null() => Ok(None),
        None => Err(rusqlite::Error::InvalidColumnType(
            index,
            column.to_owned(),
            storage_type,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn absent_column_decodes_as_none() {
        let conn = Connection::open_in_memory().unwrap();
        conn.query_row("SELECT 1 AS a", [], |row| {
            assert_eq!(column_value::<i64>(row, "a").unwrap(), Some(1));
            assert_eq!(column_value::<i64>(row, "missing").unwrap(), None);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn null_without_a_null_form_decodes_as_none() {
        let conn = Connection::open_in_memory().unwrap();
        conn.query_row("SELECT NULL AS a", [], |row| {
            assert_eq!(column_value::<String>(row, "a").unwrap(), None);
            assert_eq!(
                column_value::<Option<String>>(row, "a").unwrap(),
                Some(None)
            );
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn type_mismatch_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        conn.query_row("SELECT 'abc' AS a", [], |row| {
            assert!(column_value::<i64>(row, "a").is_err());
            Ok(())
        })
        .unwrap();
    }
}
