//! Statement construction.
//!
//! Pure functions from (table, key parts, filters, ttl) to [`Statement`].
//! Caller-supplied values are always bound parameters; the only
//! caller-influenced text fragments are filter map keys, which CQL needs
//! inline and which are therefore escaped.

use std::collections::BTreeMap;

use strata_api::{Filter, Param, SchemaTag, Statement, StoreError};

// ════════════════════════════════════════════════════════════════
//  Identifier validation & escaping
// ════════════════════════════════════════════════════════════════

/// Validate a CQL identifier (keyspace or table name).
/// Allowed: `^[a-zA-Z_][a-zA-Z0-9_]*$`.
pub fn validate_identifier(name: &str, context: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::Config(format!("{context}: identifier is empty")));
    }
    let mut chars = name.chars();
    let first = chars.next().unwrap();
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(StoreError::Config(format!(
            "{context}: invalid identifier '{name}' — must start with a letter or underscore"
        )));
    }
    for ch in chars {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(StoreError::Config(format!(
                "{context}: invalid character '{ch}' in identifier '{name}'"
            )));
        }
    }
    Ok(())
}

/// Escape a string for use inside a single-quoted CQL literal.
/// CQL doubles embedded quotes.
fn escape_literal(s: &str) -> String {
    s.replace('\'', "''")
}

// ════════════════════════════════════════════════════════════════
//  Statements
// ════════════════════════════════════════════════════════════════

/// Column definitions of the backing table.
const TABLE_COLUMNS: &str = "    partition text,\n    area      text,\n    id        text,\n    value     text,\n    filter    map<text, text>,\n    updated   timestamp,\n    model     text,\n    version   int";

/// Backing table DDL, issued by `init`.
pub fn create_table(table: &str) -> Statement {
    Statement::new(format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n{TABLE_COLUMNS},\n    PRIMARY KEY ((partition, area), id)\n)"
    ))
}

/// Single-row write. The `updated` column is set server-side. A positive
/// TTL renders a `USING TTL` clause; zero or absent renders none at all.
#[allow(clippy::too_many_arguments)]
pub fn insert(
    table: &str,
    partition: &str,
    area: &str,
    id: &str,
    payload: String,
    filters: &[Filter],
    schema: Option<SchemaTag>,
    ttl: Option<u32>,
) -> Statement {
    let mut text = format!(
        "INSERT INTO {table} (partition, area, id, value, filter, model, version, updated) \
         VALUES (?, ?, ?, ?, ?, ?, ?, toTimestamp(now()))"
    );
    if let Some(secs) = ttl {
        if secs > 0 {
            text.push_str(&format!(" USING TTL {secs}"));
        }
    }

    let filter_map: BTreeMap<String, String> = filters.iter().map(Filter::map_entry).collect();
    let (model, version) = match schema {
        Some(tag) => (Param::Text(tag.model.to_string()), Param::Int(i64::from(tag.version))),
        None => (Param::Null, Param::Null),
    };

    Statement::with_params(
        text,
        vec![
            Param::Text(partition.to_string()),
            Param::Text(area.to_string()),
            Param::Text(id.to_string()),
            Param::Text(payload),
            Param::Map(filter_map),
            model,
            version,
        ],
    )
}

/// Point read of one row's payload — a true single-row read on the full
/// primary key, never combined with filter clauses.
pub fn select_value(table: &str, partition: &str, area: &str, id: &str) -> Statement {
    Statement::with_params(
        format!("SELECT value FROM {table} WHERE partition = ? AND area = ? AND id = ?"),
        vec![
            Param::Text(partition.to_string()),
            Param::Text(area.to_string()),
            Param::Text(id.to_string()),
        ],
    )
}

/// Partition scan. Each predicate appends one equality clause against the
/// filter map. Any filter clause forces the backend's broad-scan opt-in;
/// with no filters the opt-in must be omitted.
pub fn select_scan(
    table: &str,
    columns: &str,
    partition: &str,
    area: &str,
    filters: &[Filter],
) -> Statement {
    let mut conditions = vec!["partition = ?".to_string(), "area = ?".to_string()];
    let mut params = vec![
        Param::Text(partition.to_string()),
        Param::Text(area.to_string()),
    ];
    for f in filters {
        conditions.push(format!("filter['{}'] = ?", escape_literal(&f.name)));
        params.push(Param::Text(f.value.storage_repr()));
    }

    let mut text = format!(
        "SELECT {columns} FROM {table} WHERE {}",
        conditions.join(" AND "),
    );
    if !filters.is_empty() {
        text.push_str(" ALLOW FILTERING");
    }
    Statement::with_params(text, params)
}

/// Whole-table selector for one schema generation. Always a broad scan:
/// model/version are not part of any key.
pub fn select_generation(table: &str, tag: &SchemaTag) -> Statement {
    Statement::with_params(
        format!(
            "SELECT partition, area, id, value FROM {table} \
             WHERE model = ? AND version = ? ALLOW FILTERING"
        ),
        vec![
            Param::Text(tag.model.to_string()),
            Param::Int(i64::from(tag.version)),
        ],
    )
}

/// Delete one row by full primary key.
pub fn delete_row(table: &str, partition: &str, area: &str, id: &str) -> Statement {
    Statement::with_params(
        format!("DELETE FROM {table} WHERE partition = ? AND area = ? AND id = ?"),
        vec![
            Param::Text(partition.to_string()),
            Param::Text(area.to_string()),
            Param::Text(id.to_string()),
        ],
    )
}

/// Delete every row of one (partition, area) pair — a single-partition
/// delete on the composite shard key.
pub fn delete_partition(table: &str, partition: &str, area: &str) -> Statement {
    Statement::with_params(
        format!("DELETE FROM {table} WHERE partition = ? AND area = ?"),
        vec![
            Param::Text(partition.to_string()),
            Param::Text(area.to_string()),
        ],
    )
}

/// Drop every row in the table. Destructive, unscoped.
pub fn truncate(table: &str) -> Statement {
    Statement::new(format!("TRUNCATE {table}"))
}

// ════════════════════════════════════════════════════════════════
//  Tests
// ════════════════════════════════════════════════════════════════
