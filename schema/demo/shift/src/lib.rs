//! Work-shift schema for the Gridq demo: the `Shift` entity, its status
//! enum, and the shift-specific repository operations.

pub mod repo;

use gridq::prelude::*;
use time::{OffsetDateTime, Time};
use ulid::Ulid;

///
/// ShiftStatus
///
/// Stored as an INTEGER column; unknown stored values fail decode rather
/// than guessing a state.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ShiftStatus {
    Inactive = 0,
    #[default]
    Active = 1,
}

impl FieldValue for ShiftStatus {
    fn to_value(&self) -> Value {
        Value::Int(*self as i64)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(0) | Value::Uint(0) => Some(Self::Inactive),
            Value::Int(1) | Value::Uint(1) => Some(Self::Active),
            _ => None,
        }
    }
}

///
/// Shift
///
/// One work shift: identity, the working window, an optional break
/// window, derived hour totals, free text, state, and audit columns.
///

#[derive(Clone, Debug, Entity, PartialEq)]
#[entity(table = "shifts")]
pub struct Shift {
    #[entity(key, column = "shift_id")]
    pub id: Ulid,

    /// Unique business code (`CA1`, …); uniqueness lives on the table.
    #[entity(column = "shift_code", required)]
    pub code: String,

    #[entity(column = "shift_name", required)]
    pub name: String,

    #[entity(column = "begin_shift_time", required)]
    pub begin_shift_time: Time,

    #[entity(column = "end_shift_time", required)]
    pub end_shift_time: Time,

    #[entity(column = "begin_break_time")]
    pub begin_break_time: Option<Time>,

    #[entity(column = "end_break_time")]
    pub end_break_time: Option<Time>,

    #[entity(column = "breaking_time_hours")]
    pub breaking_time: f64,

    #[entity(column = "working_time_hours")]
    pub working_time: f64,

    #[entity(column = "description")]
    pub description: Option<String>,

    #[entity(column = "status", required)]
    pub status: ShiftStatus,

    #[entity(column = "created_by", required)]
    pub created_by: String,

    #[entity(column = "created_date", required)]
    pub created_date: OffsetDateTime,

    #[entity(column = "modified_by")]
    pub modified_by: Option<String>,

    #[entity(column = "modified_date")]
    pub modified_date: Option<OffsetDateTime>,
}

impl Default for Shift {
    fn default() -> Self {
        Self {
            id: Ulid::nil(),
            code: String::new(),
            name: String::new(),
            begin_shift_time: Time::MIDNIGHT,
            end_shift_time: Time::MIDNIGHT,
            begin_break_time: None,
            end_break_time: None,
            breaking_time: 0.0,
            working_time: 0.0,
            description: None,
            status: ShiftStatus::default(),
            created_by: String::new(),
            created_date: OffsetDateTime::UNIX_EPOCH,
            modified_by: None,
            modified_date: None,
        }
    }
}
