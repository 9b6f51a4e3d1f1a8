//! Shift-specific repository operations layered on the generic executors.
//!
//! Everything generic (grid reads, counts, saves, deletes) goes through
//! `gridq::db`; only the hand-written statements the shift screen needs
//! beyond that live here.

use crate::{Shift, ShiftStatus};
use gridq::{
    Error, Value, db,
    rusqlite::{Connection, params_from_iter},
    traits::{EntityValue, FieldValue},
};
use log::debug;
use thiserror::Error as ThisError;
use ulid::Ulid;

///
/// ShiftError
///
/// Business-rule failures of the shift screen, wrapping engine errors for
/// transparent propagation.
///

#[derive(Debug, ThisError)]
pub enum ShiftError {
    #[error("shift code '{code}' is already in use")]
    DuplicateCode { code: String },

    #[error(transparent)]
    Engine(#[from] Error),
}

///
/// SaveState
///
/// Save intents coming from the grid editor.
///
/// Create    : brand-new record
/// Update    : edit of an existing record
/// Duplicate : copy of an existing record under a new code
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SaveState {
    Create,
    Update,
    Duplicate,
}

/// Demo/test schema for the shifts table. Uniqueness of the business code
/// is a storage-layer constraint; racing inserts lose here, not in code.
pub fn create_table(conn: &Connection) -> Result<(), Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS shifts (
            shift_id            TEXT PRIMARY KEY,
            shift_code          TEXT NOT NULL UNIQUE,
            shift_name          TEXT NOT NULL,
            begin_shift_time    TEXT NOT NULL,
            end_shift_time      TEXT NOT NULL,
            begin_break_time    TEXT,
            end_break_time      TEXT,
            breaking_time_hours REAL NOT NULL DEFAULT 0,
            working_time_hours  REAL NOT NULL DEFAULT 0,
            description         TEXT,
            status              INTEGER NOT NULL DEFAULT 1,
            created_by          TEXT NOT NULL,
            created_date        TEXT NOT NULL,
            modified_by         TEXT,
            modified_date       TEXT
        )",
    )?;

    Ok(())
}

/// Fetch one shift by id, failing when it does not exist.
pub fn get_shift(conn: &Connection, id: Ulid) -> Result<Shift, Error> {
    db::get(conn, &Value::Ulid(id))?.ok_or(Error::NotFound {
        entity: "Shift",
        key: id.to_string(),
    })
}

/// Fetch one shift by its unique business code.
pub fn find_by_code(conn: &Connection, code: &str) -> Result<Option<Shift>, Error> {
    let mut stmt =
        conn.prepare_cached("SELECT * FROM shifts WHERE shift_code = ?1 LIMIT 1")?;
    let mut rows = stmt.query_map([code], |row| Shift::from_row(row))?;

    rows.next().transpose().map_err(Error::from)
}

/// Flip the status of many shifts in one `IN`-list statement.
pub fn change_status(
    conn: &Connection,
    ids: &[Ulid],
    status: ShiftStatus,
) -> Result<usize, Error> {
    if ids.is_empty() {
        return Ok(0);
    }

    let placeholders: Vec<String> = (0..ids.len()).map(|i| format!("?{}", i + 2)).collect();
    let sql = format!(
        "UPDATE shifts SET status = ?1 WHERE shift_id IN ({})",
        placeholders.join(", ")
    );

    debug!("change_status: {sql}");

    let mut params = Vec::with_capacity(ids.len() + 1);
    params.push(status.to_value().to_sql());
    for id in ids {
        params.push(Value::Ulid(*id).to_sql());
    }

    let affected = conn.prepare_cached(&sql)?.execute(params_from_iter(params))?;
    Ok(affected)
}

/// Guard the unique shift code before a save.
///
/// The code is checked on create and duplicate; a plain update of the same
/// record may keep its own code. Another record holding the code is a
/// duplicate either way.
pub fn ensure_unique_code(
    conn: &Connection,
    shift: &Shift,
    state: SaveState,
) -> Result<(), ShiftError> {
    if state == SaveState::Update {
        return Ok(());
    }

    match find_by_code(conn, &shift.code)? {
        Some(existing) if existing.id != shift.id => Err(ShiftError::DuplicateCode {
            code: shift.code.clone(),
        }),
        _ => Ok(()),
    }
}

/// Persist a shift coming from the grid editor.
///
/// Applies the unique-code rule for the given intent, then hands the
/// record to the generic upsert. A duplicate intent drops the incoming id
/// so the copy is inserted under a fresh key.
pub fn save_shift(
    conn: &Connection,
    mut shift: Shift,
    state: SaveState,
) -> Result<Shift, ShiftError> {
    ensure_unique_code(conn, &shift, state)?;

    if state == SaveState::Duplicate {
        shift.id = Ulid::nil();
    }

    Ok(db::save(conn, shift)?)
}
