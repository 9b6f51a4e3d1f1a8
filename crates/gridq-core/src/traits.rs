use crate::{model::EntityModel, value::Value};
use time::{OffsetDateTime, Time};
use ulid::Ulid;

///
/// EntitySchema
///
/// Declared schema facts for an entity. Implementations are generated by
/// `#[derive(Entity)]`, or hand-built from static models where the derive
/// is not worth the ceremony.
///

pub trait EntitySchema {
    const MODEL: &'static EntityModel;
}

///
/// EntityValue
///
/// A concrete entity instance the executors can read and rebuild.
///

pub trait EntityValue: Sized {
    /// Current value of the named field, if the field exists.
    fn field_value(&self, field: &str) -> Option<Value>;

    /// Current value of the primary-key field.
    fn key_value(&self) -> Value;

    /// Overwrite the primary-key field.
    ///
    /// Values the key type cannot absorb are ignored; the executors only
    /// ever pass values produced for the key's own type.
    fn set_key_value(&mut self, value: Value);

    /// Rebuild the entity from one result row.
    ///
    /// Columns missing from the projection keep their default values,
    /// so partial-column reads still map onto the full record type.
    fn from_row(row: &rusqlite::Row<'_>) -> Result<Self, rusqlite::Error>;
}

///
/// EntityKind
///
/// Fully executor-ready entity: schema facts plus instance access.
///

pub trait EntityKind: EntitySchema + EntityValue + Clone {}
impl<T> EntityKind for T where T: EntitySchema + EntityValue + Clone {}

///
/// FieldValue
///
/// Conversion boundary between field types and the engine's value space.
/// Represents anything that can appear on the right-hand side of a
/// condition or be bound into a write.
///

pub trait FieldValue: Sized {
    fn to_value(&self) -> Value;

    #[must_use]
    fn from_value(value: &Value) -> Option<Self>;
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    // Booleans come back from storage as integers.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            Value::Int(v) => Some(*v != 0),
            Value::Uint(v) => Some(*v != 0),
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as Self),
            Value::Uint(v) => Some(*v as Self),
            _ => None,
        }
    }
}

impl FieldValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: &Value) -> Option<Self> {
        f64::from_value(value).map(|v| v as Self)
    }
}

impl FieldValue for Ulid {
    fn to_value(&self) -> Value {
        Value::Ulid(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Ulid(v) => Some(*v),
            Value::Text(v) => Self::from_string(v).ok(),
            _ => None,
        }
    }
}

impl FieldValue for Time {
    fn to_value(&self) -> Value {
        Value::Time(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Time(v) => Some(*v),
            Value::Text(v) => crate::value::parse_time(v),
            _ => None,
        }
    }
}

impl FieldValue for OffsetDateTime {
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Timestamp(v) => Some(*v),
            Value::Text(v) => crate::value::parse_timestamp(v),
            _ => None,
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        if matches!(value, Value::Null) {
            return Some(None);
        }

        T::from_value(value).map(Some)
    }
}

// impl_field_value
#[macro_export]
macro_rules! impl_field_value {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl FieldValue for $type {
                fn to_value(&self) -> Value {
                    Value::$variant((*self).into())
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(v) => (*v).try_into().ok(),
                        Value::Uint(v) => (*v).try_into().ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_field_value!(
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
);
