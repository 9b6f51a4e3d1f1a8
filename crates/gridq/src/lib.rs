//! Gridq — metadata-driven grid queries and persistence over SQLite.
//!
//! This is the public meta-crate. Downstream users depend on **gridq**
//! only; it re-exports the stable API from:
//!   - `gridq-core`   (entity models, values, the query engine, executors)
//!   - `gridq-derive` (the `Entity` derive)

mod config;

pub use config::StoreConfig;
pub use gridq_core::{MAX_PAGE_SIZE, db, error, model, rusqlite, traits, value};
pub use gridq_derive::Entity;

//
// Ergonomic top-level names
//

pub use gridq_core::{
    db::{Db, Page, QueryDescription},
    error::Error,
    value::Value,
};

///
/// Prelude
///

pub mod prelude {
    pub use gridq_core::prelude::*;
    pub use gridq_derive::Entity;
}
