use crate::{
    db::{
        bindings::Bindings,
        filter,
        query::{Page, QueryDescription},
        sort,
    },
    error::Error,
    model::EntityModel,
    traits::EntityKind,
    value::Value,
};
use log::debug;
use rusqlite::{Connection, params_from_iter};

/// Execute a grid read as one parameterized statement.
///
/// Assembly order: projection from `columns` (unknown names dropped; none
/// valid means `SELECT *`), WHERE from the AND of both filter trees and
/// the custom parameters, ORDER BY from the sort spec (omitted when
/// empty), then `LIMIT page_size OFFSET (page_index - 1) * page_size`.
pub fn query<E: EntityKind>(conn: &Connection, desc: &QueryDescription) -> Result<Vec<E>, Error> {
    desc.validate()?;

    let model = E::MODEL;
    let mut bindings = Bindings::new();

    let mut sql = format!(
        "SELECT {} FROM {}",
        select_clause(model, desc.columns.as_deref()),
        model.table()
    );

    if let Some(where_body) = where_clause(model, desc, &mut bindings) {
        sql.push_str(" WHERE ");
        sql.push_str(&where_body);
    }

    if let Some(order_body) = order_clause(model, desc.sort.as_deref()) {
        sql.push_str(" ORDER BY ");
        sql.push_str(&order_body);
    }

    let limit = bindings.push(&Value::Uint(u64::from(desc.page_size)));
    let offset = bindings.push(&Value::Uint(desc.offset()));
    sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));

    debug!("query {}: {sql}", model.entity_name);

    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(bindings.values().iter()), |row| {
            E::from_row(row)
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Count the rows a grid read would match, ignoring pagination.
///
/// Same WHERE construction as `query`; no projection, order or limit.
pub fn count<E: EntityKind>(conn: &Connection, desc: &QueryDescription) -> Result<u64, Error> {
    desc.validate()?;

    let model = E::MODEL;
    let mut bindings = Bindings::new();

    let mut sql = format!("SELECT COUNT(*) FROM {}", model.table());

    if let Some(where_body) = where_clause(model, desc, &mut bindings) {
        sql.push_str(" WHERE ");
        sql.push_str(&where_body);
    }

    debug!("count {}: {sql}", model.entity_name);

    let mut stmt = conn.prepare_cached(&sql)?;
    let total: i64 = stmt.query_row(params_from_iter(bindings.values().iter()), |row| {
        row.get(0)
    })?;

    Ok(u64::try_from(total).unwrap_or_default())
}

/// One page of rows plus the unpaginated total.
pub fn page<E: EntityKind>(conn: &Connection, desc: &QueryDescription) -> Result<Page<E>, Error> {
    Ok(Page {
        rows: query(conn, desc)?,
        total: count::<E>(conn, desc)?,
    })
}

/// Every row of the entity's table, unfiltered and unpaginated.
pub fn all<E: EntityKind>(conn: &Connection) -> Result<Vec<E>, Error> {
    let model = E::MODEL;
    let sql = format!("SELECT * FROM {}", model.table());

    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt
        .query_map([], |row| E::from_row(row))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Look one row up by primary key.
pub fn get<E: EntityKind>(conn: &Connection, key: &Value) -> Result<Option<E>, Error> {
    let model = E::MODEL;
    let key_field = model.key_field()?;

    let mut bindings = Bindings::new();
    let placeholder = bindings.push(key);
    let sql = format!(
        "SELECT * FROM {} WHERE {} = {placeholder} LIMIT 1",
        model.table(),
        key_field.column_name()
    );

    let mut stmt = conn.prepare_cached(&sql)?;
    let mut rows = stmt.query_map(params_from_iter(bindings.values().iter()), |row| {
        E::from_row(row)
    })?;

    rows.next().transpose().map_err(Error::from)
}

// Projection from a comma-separated field list. Unknown names drop out;
// when nothing survives, fall back to every column.
fn select_clause(model: &EntityModel, columns: Option<&str>) -> String {
    let Some(columns) = columns else {
        return "*".to_owned();
    };

    let mapped: Vec<&str> = columns
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| model.resolve_column(name))
        .collect();

    if mapped.is_empty() {
        "*".to_owned()
    } else {
        mapped.join(", ")
    }
}

// WHERE body: each survived source contributes one AND term. Filter trees
// are parenthesized as wholes so their inner OR joins stay contained.
fn where_clause(
    model: &EntityModel,
    desc: &QueryDescription,
    bindings: &mut Bindings,
) -> Option<String> {
    let mut conditions = Vec::new();

    for source in [desc.filter.as_deref(), desc.custom_filter.as_deref()] {
        let Some(tree) = source.and_then(filter::parse) else {
            continue;
        };
        if let Some(fragment) = filter::render(&tree, model, bindings) {
            conditions.push(format!("({fragment})"));
        }
    }

    for (field, json) in &desc.custom_param {
        let Some(column) = model.resolve_column(field) else {
            continue;
        };
        let Some(value) = Value::from_json(json) else {
            continue;
        };
        let placeholder = bindings.push(&value);
        conditions.push(format!("{column} = {placeholder}"));
    }

    if conditions.is_empty() {
        None
    } else {
        Some(conditions.join(" AND "))
    }
}

fn order_clause(model: &EntityModel, sort_json: Option<&str>) -> Option<String> {
    let keys = sort::parse(sort_json?);
    sort::render(&keys, model)
}
