use serde_json::Value as JsonValue;
use time::{
    OffsetDateTime, Time, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};
use ulid::Ulid;

///
/// Value
///
/// Owned scalar used on the right-hand side of filter conditions, for
/// custom parameters, and for reading entity fields during writes.
///
/// This is the only type that carries caller input into SQL parameter
/// binding. Identifiers (tables, columns) never travel through it; they
/// are resolved from static entity metadata instead.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Ulid(Ulid),
    Time(Time),
    Timestamp(OffsetDateTime),
}

/// Storage encoding for time-of-day columns.
pub(crate) const TIME_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[hour]:[minute]:[second]");

impl Value {
    /// Convert a JSON scalar into a bindable value.
    ///
    /// Arrays and objects have no scalar meaning here; callers drop the
    /// enclosing clause when this returns `None`.
    #[must_use]
    pub fn from_json(json: &JsonValue) -> Option<Self> {
        match json {
            JsonValue::Null => Some(Self::Null),
            JsonValue::Bool(v) => Some(Self::Bool(*v)),
            JsonValue::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Some(Self::Int(v))
                } else if let Some(v) = n.as_u64() {
                    Some(Self::Uint(v))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            JsonValue::String(v) => Some(Self::Text(v.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text form used when the value feeds a LIKE pattern.
    #[must_use]
    pub fn pattern_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Uint(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Text(v) => v.clone(),
            Self::Ulid(v) => v.to_string(),
            Self::Time(v) => format_time(*v),
            Self::Timestamp(v) => format_timestamp(*v),
        }
    }

    /// Storage representation handed to the SQL layer.
    #[must_use]
    pub fn to_sql(&self) -> rusqlite::types::Value {
        match self {
            Self::Null => rusqlite::types::Value::Null,
            Self::Bool(v) => rusqlite::types::Value::Integer(i64::from(*v)),
            Self::Int(v) => rusqlite::types::Value::Integer(*v),
            // SQLite integers are i64; a u64 beyond that range degrades to
            // its decimal text form rather than wrapping.
            Self::Uint(v) => i64::try_from(*v).map_or_else(
                |_| rusqlite::types::Value::Text(v.to_string()),
                rusqlite::types::Value::Integer,
            ),
            Self::Float(v) => rusqlite::types::Value::Real(*v),
            Self::Text(v) => rusqlite::types::Value::Text(v.clone()),
            Self::Ulid(v) => rusqlite::types::Value::Text(v.to_string()),
            Self::Time(v) => rusqlite::types::Value::Text(format_time(*v)),
            Self::Timestamp(v) => rusqlite::types::Value::Text(format_timestamp(*v)),
        }
    }

    /// Lift a raw storage value back into the engine's value space.
    ///
    /// Typed interpretation (ulid, time, timestamp) happens later through
    /// `FieldValue::from_value` on the target field type; at this layer
    /// text stays text. Blobs are outside the value space and read as null.
    #[must_use]
    pub fn from_sql(value: rusqlite::types::Value) -> Self {
        match value {
            rusqlite::types::Value::Null | rusqlite::types::Value::Blob(_) => Self::Null,
            rusqlite::types::Value::Integer(v) => Self::Int(v),
            rusqlite::types::Value::Real(v) => Self::Float(v),
            rusqlite::types::Value::Text(v) => Self::Text(v),
        }
    }
}

/// Parse a stored `HH:MM:SS` time-of-day.
#[must_use]
pub fn parse_time(text: &str) -> Option<Time> {
    Time::parse(text, TIME_FORMAT).ok()
}

/// Parse a stored RFC 3339 timestamp.
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(text, &Rfc3339).ok()
}

pub(crate) fn format_time(time: Time) -> String {
    time.format(TIME_FORMAT).unwrap_or_default()
}

pub(crate) fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp.format(&Rfc3339).unwrap_or_default()
}
