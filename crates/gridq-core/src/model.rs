use crate::error::SchemaError;

///
/// EntityModel
/// Static, macro-generated storage model for one entity.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Fully-qualified Rust type path (diagnostics).
    pub path: &'static str,
    /// Entity name; doubles as the fallback table name and the stem for
    /// key-field discovery by convention.
    pub entity_name: &'static str,
    /// Declared storage table, when given explicitly.
    pub table: Option<&'static str>,
    /// Ordered field list (authoritative for writes and lookups).
    pub fields: &'static [FieldModel],
    /// Index of the explicitly declared key field in `fields`.
    pub key: Option<usize>,
}

///
/// FieldModel
/// Runtime field metadata used by query building and persistence.
///

#[derive(Debug)]
pub struct FieldModel {
    /// Field name as referenced by filters, sorts and custom parameters.
    pub name: &'static str,
    /// Declared storage column. Fields without one remain addressable in
    /// read conditions (the field name doubles as the column) but are
    /// never written by insert/update.
    pub column: Option<&'static str>,
    /// Declared as required by the schema author.
    pub required: bool,
    /// Declared as the primary key.
    pub is_key: bool,
}

impl FieldModel {
    /// Storage column for read paths: the declared column, else the
    /// field's own name.
    #[must_use]
    pub const fn column_name(&self) -> &'static str {
        match self.column {
            Some(column) => column,
            None => self.name,
        }
    }

    /// Storage column for write paths: only explicitly mapped fields
    /// participate in insert/update.
    #[must_use]
    pub const fn mapped_column(&self) -> Option<&'static str> {
        self.column
    }
}

impl EntityModel {
    /// Storage table: the declared name, else the entity's own name.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self.table {
            Some(table) => table,
            None => self.entity_name,
        }
    }

    /// Case-insensitive field lookup.
    ///
    /// Unknown names resolve to `None` and every caller drops them
    /// silently; field references are deliberately not validated
    /// server-side, so stale grid state cannot take a read endpoint down.
    #[must_use]
    pub fn resolve_field(&self, name: &str) -> Option<&'static FieldModel> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }

    /// Storage column for a field reference, when the field exists.
    #[must_use]
    pub fn resolve_column(&self, name: &str) -> Option<&'static str> {
        self.resolve_field(name).map(FieldModel::column_name)
    }

    /// Fields that participate in INSERT/UPDATE statements.
    pub fn mapped_fields(&self) -> impl Iterator<Item = &'static FieldModel> {
        self.fields.iter().filter(|field| field.column.is_some())
    }

    /// Primary-key field.
    ///
    /// Resolution order: the explicitly declared key; else a field named
    /// `{Entity}Id` (case- and separator-insensitive, so `shift_id`
    /// matches entity `Shift`); else a field named `id`. No match is a
    /// schema-authoring error and aborts the operation.
    pub fn key_field(&self) -> Result<&'static FieldModel, SchemaError> {
        if let Some(index) = self.key {
            if let Some(field) = self.fields.get(index) {
                return Ok(field);
            }
        }

        let stem = format!("{}id", fold_ident(self.entity_name));
        if let Some(field) = self.fields.iter().find(|f| fold_ident(f.name) == stem) {
            return Ok(field);
        }

        if let Some(field) = self.fields.iter().find(|f| f.name.eq_ignore_ascii_case("id")) {
            return Ok(field);
        }

        Err(SchemaError::MissingKey {
            entity: self.entity_name,
        })
    }
}

// Identifier comparison across naming styles: `ShiftId`, `shift_id` and
// `SHIFTID` all fold to `shiftid`.
fn fold_ident(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
