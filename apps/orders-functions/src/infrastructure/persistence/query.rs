//! Statement execution shared by the SQL backends.
//!
//! Binding, row decoding, execution and table reads are written once over
//! [`sqlx::Database`]; a backend only states its placeholder syntax and how
//! it reports affected rows.

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::{Arguments, ColumnIndex, Database, Decode, Encode, Executor, IntoArguments, Row as _, Type};

use super::sql_text::{PlaceholderStyle, select_all, to_positional};
use crate::application::ports::{ResultSet, Statement, StoreError};
use crate::domain::{ColumnSpec, ColumnType, Row, TypedValue};

/// A sqlx database the session port can run statements on.
pub trait SqlDriver: Database {
    /// Positional placeholder syntax.
    const PLACEHOLDERS: PlaceholderStyle;

    /// Rows touched by a statement.
    fn rows_affected(result: &Self::QueryResult) -> u64;
}

fn arguments<'q, DB>(statement: &Statement) -> Result<(String, DB::Arguments<'q>), StoreError>
where
    DB: SqlDriver,
    i64: Encode<'q, DB> + Type<DB>,
    String: Encode<'q, DB> + Type<DB>,
    DateTime<Utc>: Encode<'q, DB> + Type<DB>,
{
    let positional = to_positional(statement, DB::PLACEHOLDERS)?;
    let mut args: DB::Arguments<'q> = Default::default();
    for (name, value) in positional.values {
        let added = match value {
            TypedValue::Uint64(v) => {
                let v = i64::try_from(v).map_err(|e| StoreError::encode(&name, e))?;
                args.add(v)
            }
            TypedValue::Utf8(v) => args.add(v),
            TypedValue::Timestamp(v) => args.add(v),
        };
        added.map_err(|e| StoreError::encode(&name, e))?;
    }
    Ok((positional.sql, args))
}

fn decode_row<DB>(row: &DB::Row, columns: &[ColumnSpec]) -> Result<Row, StoreError>
where
    DB: SqlDriver,
    for<'r> i64: Decode<'r, DB> + Type<DB>,
    for<'r> String: Decode<'r, DB> + Type<DB>,
    for<'r> DateTime<Utc>: Decode<'r, DB> + Type<DB>,
    for<'n> &'n str: ColumnIndex<DB::Row>,
{
    let mut decoded = Row::with_capacity(columns.len());
    for column in columns {
        let value = match column.ty {
            ColumnType::Uint64 => {
                let raw: i64 = row
                    .try_get(column.name)
                    .map_err(|e| StoreError::decode(column.name, e))?;
                TypedValue::uint64(
                    u64::try_from(raw).map_err(|e| StoreError::decode(column.name, e))?,
                )
            }
            ColumnType::Utf8 => TypedValue::utf8(
                row.try_get::<String, _>(column.name)
                    .map_err(|e| StoreError::decode(column.name, e))?,
            ),
            ColumnType::Timestamp => TypedValue::timestamp(
                row.try_get::<DateTime<Utc>, _>(column.name)
                    .map_err(|e| StoreError::decode(column.name, e))?,
            ),
        };
        decoded.push(column.name, value);
    }
    Ok(decoded)
}

/// Execute `statement`, decoding its `RETURNING` columns when it has any.
pub async fn execute<DB>(
    conn: &mut DB::Connection,
    statement: &Statement,
) -> Result<ResultSet, StoreError>
where
    DB: SqlDriver,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    for<'q> i64: Encode<'q, DB> + Decode<'q, DB> + Type<DB>,
    for<'q> String: Encode<'q, DB> + Decode<'q, DB> + Type<DB>,
    for<'q> DateTime<Utc>: Encode<'q, DB> + Decode<'q, DB> + Type<DB>,
    for<'n> &'n str: ColumnIndex<DB::Row>,
{
    let (sql, args) = arguments::<DB>(statement)?;
    let query = sqlx::query_with::<DB, _>(&sql, args);

    if statement.returning_columns().is_empty() {
        let done = query.execute(&mut *conn).await.map_err(StoreError::query)?;
        return Ok(ResultSet::new(Vec::new(), DB::rows_affected(&done)));
    }

    let rows = query
        .fetch_all(&mut *conn)
        .await
        .map_err(StoreError::query)?
        .iter()
        .map(|row| decode_row::<DB>(row, statement.returning_columns()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ResultSet::from_rows(rows))
}

/// Stream every row of `table`.
pub async fn read_table<DB>(
    conn: &mut DB::Connection,
    table: &str,
    columns: &[ColumnSpec],
) -> Result<Vec<Row>, StoreError>
where
    DB: SqlDriver,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    for<'r> i64: Decode<'r, DB> + Type<DB>,
    for<'r> String: Decode<'r, DB> + Type<DB>,
    for<'r> DateTime<Utc>: Decode<'r, DB> + Type<DB>,
    for<'n> &'n str: ColumnIndex<DB::Row>,
{
    let sql = select_all(table, columns)?;
    let mut stream = sqlx::query::<DB>(&sql).fetch(&mut *conn);
    let mut rows = Vec::new();
    while let Some(row) = stream.try_next().await.map_err(StoreError::query)? {
        rows.push(decode_row::<DB>(&row, columns)?);
    }
    Ok(rows)
}
