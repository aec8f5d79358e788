//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! All SQL in this module has been reviewed for SQL injection safety:
//! - User input is ALWAYS passed via `.bind()` parameters
//! - Identifiers that must be spliced into DDL come from the Postgres
//!   catalog and are quoted with [`quote_ident`]
//!
//! When adding new SQL here:
//! 1. Document why Diesel DSL can't be used
//! 2. Ensure all user input uses `.bind()`

use diesel::prelude::*;
use diesel::sql_types::Text;

/// Names of the unique constraints on a table.
///
/// Postgres generates (and truncates to 63 bytes) the name of a constraint
/// declared without one, so callers resolve it here instead of guessing.
///
/// # Safety
/// Schema and table names are passed via `.bind()`.
///
/// # Why raw SQL?
/// Diesel has no DSL for the `pg_catalog` tables.
pub const UNIQUE_CONSTRAINTS_QUERY: &str = "SELECT con.conname::text AS name \
    FROM pg_constraint con \
    JOIN pg_class rel ON rel.oid = con.conrelid \
    JOIN pg_namespace nsp ON nsp.oid = rel.relnamespace \
    WHERE rel.relname = $1 \
      AND nsp.nspname = $2 \
      AND con.contype = 'u' \
    ORDER BY con.conname";

/// `ON DELETE` action of a named foreign key, as the single-letter
/// `confdeltype` code (`a` no action, `r` restrict, `c` cascade, `n` set null,
/// `d` set default).
///
/// # Safety
/// The constraint and schema names are passed via `.bind()`.
pub const FOREIGN_KEY_DELETE_ACTION_QUERY: &str = "SELECT con.confdeltype::text AS name \
    FROM pg_constraint con \
    JOIN pg_namespace nsp ON nsp.oid = con.connamespace \
    WHERE con.conname = $1 \
      AND nsp.nspname = $2 \
      AND con.contype = 'f'";

/// Whether a table exists in a schema.
///
/// # Safety
/// Names are passed via `.bind()`.
pub const TABLE_EXISTS_QUERY: &str = "SELECT c.relname::text AS name \
    FROM pg_class c \
    JOIN pg_namespace n ON n.oid = c.relnamespace \
    WHERE n.nspname = $1 AND c.relname = $2 AND c.relkind = 'r'";

#[derive(QueryableByName, Debug)]
pub struct NameRow {
    #[diesel(sql_type = Text)]
    pub name: String,
}

pub fn unique_constraints(
    conn: &mut PgConnection,
    schema: &str,
    table: &str,
) -> QueryResult<Vec<String>> {
    let rows: Vec<NameRow> = diesel::sql_query(UNIQUE_CONSTRAINTS_QUERY)
        .bind::<Text, _>(table)
        .bind::<Text, _>(schema)
        .load(conn)?;
    Ok(rows.into_iter().map(|r| r.name).collect())
}

pub fn foreign_key_delete_action(
    conn: &mut PgConnection,
    schema: &str,
    constraint: &str,
) -> QueryResult<Option<char>> {
    let row: Option<NameRow> = diesel::sql_query(FOREIGN_KEY_DELETE_ACTION_QUERY)
        .bind::<Text, _>(constraint)
        .bind::<Text, _>(schema)
        .get_result(conn)
        .optional()?;
    Ok(row.and_then(|r| r.name.chars().next()))
}

pub fn table_exists(conn: &mut PgConnection, schema: &str, table: &str) -> QueryResult<bool> {
    let row: Option<NameRow> = diesel::sql_query(TABLE_EXISTS_QUERY)
        .bind::<Text, _>(schema)
        .bind::<Text, _>(table)
        .get_result(conn)
        .optional()?;
    Ok(row.is_some())
}

/// Quote an identifier for splicing into DDL (`ALTER TABLE ... DROP
/// CONSTRAINT "<name>"`). Embedded quotes are doubled.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_plain() {
        assert_eq!(
            quote_ident("recipez_ingredient_ingredient_name_ingredient_quantity_ingr_key"),
            "\"recipez_ingredient_ingredient_name_ingredient_quantity_ingr_key\""
        );
    }

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
