use crate::{
    db::{executor, save},
    error::Error,
    traits::EntityKind,
    value::Value,
};
use rusqlite::Connection;
use std::{
    path::Path,
    sync::{Mutex, PoisonError},
};

///
/// Db
///
/// Scoped access to one SQLite database.
///
/// Every operation borrows the connection for exactly one unit of work
/// (one statement, or save's probe-then-write pair) and releases it on
/// all exit paths. The engine keeps no other cross-call state; callers
/// wanting independent concurrency open independent `Db` values.
///

pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self {
            conn: Mutex::new(Connection::open(path)?),
        })
    }

    pub fn open_in_memory() -> Result<Self, Error> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    /// Run one unit of work against the scoped connection.
    pub fn with_conn<R>(&self, work: impl FnOnce(&Connection) -> Result<R, Error>) -> Result<R, Error> {
        let guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        work(&guard)
    }

    pub fn query<E: EntityKind>(
        &self,
        desc: &crate::db::query::QueryDescription,
    ) -> Result<Vec<E>, Error> {
        self.with_conn(|conn| executor::query(conn, desc))
    }

    pub fn count<E: EntityKind>(
        &self,
        desc: &crate::db::query::QueryDescription,
    ) -> Result<u64, Error> {
        self.with_conn(|conn| executor::count::<E>(conn, desc))
    }

    pub fn page<E: EntityKind>(
        &self,
        desc: &crate::db::query::QueryDescription,
    ) -> Result<crate::db::query::Page<E>, Error> {
        self.with_conn(|conn| executor::page(conn, desc))
    }

    pub fn all<E: EntityKind>(&self) -> Result<Vec<E>, Error> {
        self.with_conn(executor::all)
    }

    pub fn get<E: EntityKind>(&self, key: &Value) -> Result<Option<E>, Error> {
        self.with_conn(|conn| executor::get(conn, key))
    }

    pub fn save<E: EntityKind>(&self, entity: E) -> Result<E, Error> {
        self.with_conn(|conn| save::save(conn, entity))
    }

    pub fn insert<E: EntityKind>(&self, entity: &E) -> Result<(), Error> {
        self.with_conn(|conn| save::insert(conn, entity))
    }

    pub fn update<E: EntityKind>(&self, entity: &E) -> Result<(), Error> {
        self.with_conn(|conn| save::update(conn, entity))
    }

    pub fn delete<E: EntityKind>(&self, keys: &[Value]) -> Result<usize, Error> {
        self.with_conn(|conn| save::delete::<E>(conn, keys))
    }
}
