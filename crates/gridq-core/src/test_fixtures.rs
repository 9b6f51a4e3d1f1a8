//! Hand-built models and a hand-implemented runtime entity.
//!
//! These bypass the derive on purpose: the static-descriptor path has to
//! keep working on its own, and invalid schemas (no key) cannot be
//! expressed through the derive at all.

use crate::{
    db::column_value,
    model::{EntityModel, FieldModel},
    traits::{EntitySchema, EntityValue, FieldValue},
    value::Value,
};
use ulid::Ulid;

pub(crate) static PRODUCT_FIELDS: [FieldModel; 5] = [
    FieldModel {
        name: "product_id",
        column: Some("product_id"),
        required: true,
        is_key: true,
    },
    FieldModel {
        name: "product_code",
        column: Some("code"),
        required: true,
        is_key: false,
    },
    FieldModel {
        name: "product_name",
        column: Some("name"),
        required: false,
        is_key: false,
    },
    FieldModel {
        name: "price",
        column: Some("price"),
        required: false,
        is_key: false,
    },
    // Addressable in conditions, never written.
    FieldModel {
        name: "display_label",
        column: None,
        required: false,
        is_key: false,
    },
];

pub(crate) static PRODUCT_MODEL: EntityModel = EntityModel {
    path: "test_fixtures::Product",
    entity_name: "Product",
    table: Some("products"),
    fields: &PRODUCT_FIELDS,
    key: Some(0),
};

pub(crate) static CONVENTION_FIELDS: [FieldModel; 2] = [
    FieldModel {
        name: "widget_id",
        column: Some("widget_id"),
        required: false,
        is_key: false,
    },
    FieldModel {
        name: "label",
        column: Some("label"),
        required: false,
        is_key: false,
    },
];

/// No declared key; discovery must land on `widget_id`.
pub(crate) static CONVENTION_MODEL: EntityModel = EntityModel {
    path: "test_fixtures::Widget",
    entity_name: "Widget",
    table: None,
    fields: &CONVENTION_FIELDS,
    key: None,
};

pub(crate) static CONVENTION_ID_FIELDS: [FieldModel; 2] = [
    FieldModel {
        name: "label",
        column: Some("label"),
        required: false,
        is_key: false,
    },
    FieldModel {
        name: "id",
        column: Some("id"),
        required: false,
        is_key: false,
    },
];

/// No declared key and no `{Entity}Id` field; discovery falls to `id`.
pub(crate) static CONVENTION_ID_MODEL: EntityModel = EntityModel {
    path: "test_fixtures::Gadget",
    entity_name: "Gadget",
    table: Some("gadgets"),
    fields: &CONVENTION_ID_FIELDS,
    key: None,
};

pub(crate) static ANONYMOUS_FIELDS: [FieldModel; 1] = [FieldModel {
    name: "label",
    column: Some("label"),
    required: false,
    is_key: false,
}];

/// Intentionally invalid: nothing resolves as a key.
pub(crate) static ANONYMOUS_MODEL: EntityModel = EntityModel {
    path: "test_fixtures::Orphan",
    entity_name: "Orphan",
    table: Some("orphans"),
    fields: &ANONYMOUS_FIELDS,
    key: None,
};

///
/// Product
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Product {
    pub id: Ulid,
    pub code: String,
    pub name: Option<String>,
    pub price: f64,
    pub display_label: String,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: Ulid::nil(),
            code: String::new(),
            name: None,
            price: 0.0,
            display_label: String::new(),
        }
    }
}

impl EntitySchema for Product {
    const MODEL: &'static EntityModel = &PRODUCT_MODEL;
}

impl EntityValue for Product {
    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "product_id" => Some(self.id.to_value()),
            "product_code" => Some(self.code.to_value()),
            "product_name" => Some(self.name.to_value()),
            "price" => Some(self.price.to_value()),
            "display_label" => Some(self.display_label.to_value()),
            _ => None,
        }
    }

    fn key_value(&self) -> Value {
        self.id.to_value()
    }

    fn set_key_value(&mut self, value: Value) {
        if let Some(id) = Ulid::from_value(&value) {
            self.id = id;
        }
    }

    fn from_row(row: &rusqlite::Row<'_>) -> Result<Self, rusqlite::Error> {
        let mut out = Self::default();
        if let Some(v) = column_value(row, "product_id")? {
            out.id = v;
        }
        if let Some(v) = column_value(row, "code")? {
            out.code = v;
        }
        if let Some(v) = column_value::<Option<String>>(row, "name")? {
            out.name = v;
        }
        if let Some(v) = column_value(row, "price")? {
            out.price = v;
        }
        Ok(out)
    }
}

/// products table for executor tests.
pub(crate) fn create_products_table(conn: &rusqlite::Connection) {
    conn.execute_batch(
        "CREATE TABLE products (
            product_id TEXT PRIMARY KEY,
            code       TEXT NOT NULL UNIQUE,
            name       TEXT,
            price      REAL NOT NULL DEFAULT 0
        )",
    )
    .unwrap();
}
