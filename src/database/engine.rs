//! DuckDB-backed data source
//!
//! Serves keyset fetches from a single DuckDB table. Identifiers are quoted
//! and every value is bound as a parameter.

use crate::error::{Error, Result};
use crate::source::{DataSource, FindManyArgs};
use crate::types::{Filter, JsonObject, JsonValue, Projection, SortOrder};
use async_trait::async_trait;
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::{params_from_iter, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Largest LIMIT/OFFSET DuckDB accepts
const MAX_ROWS: usize = i64::MAX as usize;

/// Data source over one DuckDB table
#[derive(Clone)]
pub struct DuckDbSource {
    /// Shared DuckDB connection
    conn: Arc<Mutex<Connection>>,
    /// Table name
    table: String,
    /// Column names in table order
    columns: Vec<String>,
}

impl std::fmt::Debug for DuckDbSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbSource")
            .field("table", &self.table)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

/// SQL text plus bound parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    /// Statement text
    pub sql: String,
    /// Positional parameters
    pub params: Vec<DuckValue>,
}

impl DuckDbSource {
    /// Open a database file and serve `table`
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let conn = Connection::open(path)
            .map_err(|e| Error::config(format!("Failed to open DuckDB database: {e}")))?;
        Self::from_connection(conn, table)
    }

    /// Serve `table` from an existing connection
    pub fn from_connection(conn: Connection, table: &str) -> Result<Self> {
        Self::from_shared(Arc::new(Mutex::new(conn)), table)
    }

    /// Serve `table` from a connection shared with other sources
    pub fn from_shared(conn: Arc<Mutex<Connection>>, table: &str) -> Result<Self> {
        let columns = {
            let guard = lock(&conn)?;
            let mut stmt = guard.prepare(
                "SELECT column_name FROM information_schema.columns
                 WHERE table_name = ?
                 ORDER BY ordinal_position",
            )?;
            let columns: Vec<String> = stmt
                .query_map([table], |row| row.get(0))?
                .collect::<std::result::Result<_, _>>()?;
            columns
        };

        if columns.is_empty() {
            return Err(Error::config(format!("Table '{table}' not found")));
        }

        tracing::debug!(table, columns = columns.len(), "opened DuckDB table");

        Ok(Self {
            conn,
            table: table.to_string(),
            columns,
        })
    }

    /// Table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Column names in table order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Build the SELECT for a fetch
    pub fn build_find_query(&self, args: &FindManyArgs) -> Result<SqlQuery> {
        let columns = self.projected_columns(args.projection.as_ref())?;
        let select_list = columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");

        let (mut clauses, mut params) = self.filter_clauses(&args.filter)?;

        if let Some(cursor) = &args.cursor {
            let key = cursor.key.as_str();
            self.check_column(key)?;
            let direction = match &args.order_by {
                None => SortOrder::Asc,
                Some(order_by) if order_by.field == key => order_by.order,
                Some(order_by) => {
                    return Err(Error::unsupported(format!(
                        "cursor on '{key}' cannot seek a table ordered by '{}'",
                        order_by.field
                    )))
                }
            };
            let op = match (direction, args.skip > 0) {
                (SortOrder::Asc, true) => ">",
                (SortOrder::Asc, false) => ">=",
                (SortOrder::Desc, true) => "<",
                (SortOrder::Desc, false) => "<=",
            };
            clauses.push(format!("{} {op} ?", quote_ident(key)));
            params.push(json_to_duckdb(&cursor.value)?);
        }

        let mut sql = format!("SELECT {select_list} FROM {}", quote_ident(&self.table));
        if !clauses.is_empty() {
            sql = format!("{sql} WHERE {}", clauses.join(" AND "));
        }

        if let Some(order_by) = &args.order_by {
            self.check_column(&order_by.field)?;
            sql = format!(
                "{sql} ORDER BY {} {}",
                quote_ident(&order_by.field),
                order_by.order.as_sql()
            );
        }

        let offset = if args.cursor.is_some() {
            args.skip.saturating_sub(1)
        } else {
            args.skip
        };

        // LIMIT and OFFSET are BIGINT in DuckDB
        if let Some(take) = args.take {
            sql = format!("{sql} LIMIT {}", take.min(MAX_ROWS));
        }
        if offset > 0 {
            sql = format!("{sql} OFFSET {}", offset.min(MAX_ROWS));
        }

        Ok(SqlQuery { sql, params })
    }

    /// Build the COUNT for a filter
    pub fn build_count_query(&self, filter: &Filter) -> Result<SqlQuery> {
        let (clauses, params) = self.filter_clauses(filter)?;
        let mut sql = format!("SELECT COUNT(*) FROM {}", quote_ident(&self.table));
        if !clauses.is_empty() {
            sql = format!("{sql} WHERE {}", clauses.join(" AND "));
        }
        Ok(SqlQuery { sql, params })
    }

    /// Run a fetch synchronously
    pub fn fetch(&self, args: &FindManyArgs) -> Result<Vec<JsonValue>> {
        let columns = self.projected_columns(args.projection.as_ref())?;
        let query = self.build_find_query(args)?;

        tracing::debug!("Executing query: {}", query.sql);

        let guard = lock(&self.conn)?;
        let mut stmt = guard.prepare(&query.sql)?;
        let rows = stmt
            .query_map(params_from_iter(query.params.iter()), |row| {
                let mut record = JsonObject::new();
                for (i, column) in columns.iter().enumerate() {
                    let value: DuckValue = row.get(i)?;
                    record.insert(column.clone(), duckdb_value_to_json(value));
                }
                Ok(JsonValue::Object(record))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Count synchronously
    pub fn count_matching(&self, filter: &Filter) -> Result<u64> {
        let query = self.build_count_query(filter)?;

        tracing::debug!("Executing query: {}", query.sql);

        let guard = lock(&self.conn)?;
        let count: i64 =
            guard.query_row(&query.sql, params_from_iter(query.params.iter()), |row| {
                row.get(0)
            })?;
        Ok(count.max(0) as u64)
    }

    fn projected_columns(&self, projection: Option<&Projection>) -> Result<Vec<String>> {
        match projection {
            None => Ok(self.columns.clone()),
            Some(Projection::Select(fields)) => {
                for field in fields {
                    self.check_column(field)?;
                }
                Ok(self
                    .columns
                    .iter()
                    .filter(|c| fields.contains(c))
                    .cloned()
                    .collect())
            }
            Some(Projection::Include(_)) => Err(Error::unsupported(
                "relation includes are not available on DuckDB tables",
            )),
        }
    }

    fn filter_clauses(&self, filter: &Filter) -> Result<(Vec<String>, Vec<DuckValue>)> {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        for (field, value) in filter.conditions() {
            self.check_column(field)?;
            if value.is_null() {
                clauses.push(format!("{} IS NULL", quote_ident(field)));
            } else {
                clauses.push(format!("{} = ?", quote_ident(field)));
                params.push(json_to_duckdb(value)?);
            }
        }
        Ok((clauses, params))
    }

    fn check_column(&self, name: &str) -> Result<()> {
        if self.columns.iter().any(|c| c == name) {
            Ok(())
        } else {
            Err(Error::config(format!(
                "Column '{name}' not found in table '{}'",
                self.table
            )))
        }
    }
}

#[async_trait]
impl DataSource for DuckDbSource {
    type Record = JsonValue;

    async fn find_many(&self, args: FindManyArgs) -> Result<Vec<JsonValue>> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.fetch(&args))
            .await
            .map_err(|e| Error::data_source(format!("DuckDB query task failed: {e}")))?
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        let source = self.clone();
        let filter = filter.clone();
        tokio::task::spawn_blocking(move || source.count_matching(&filter))
            .await
            .map_err(|e| Error::data_source(format!("DuckDB count task failed: {e}")))?
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| Error::data_source("DuckDB connection lock poisoned"))
}

/// Quote an identifier for DuckDB
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Convert a JSON scalar to a DuckDB parameter
fn json_to_duckdb(value: &JsonValue) -> Result<DuckValue> {
    match value {
        JsonValue::Null => Ok(DuckValue::Null),
        JsonValue::Bool(b) => Ok(DuckValue::Boolean(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(DuckValue::BigInt(i))
            } else if let Some(u) = n.as_u64() {
                Ok(DuckValue::UBigInt(u))
            } else {
                Ok(DuckValue::Double(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        JsonValue::String(s) => Ok(DuckValue::Text(s.clone())),
        JsonValue::Array(_) | JsonValue::Object(_) => Err(Error::unsupported(
            "only scalar values can be compared against DuckDB columns",
        )),
    }
}

/// Convert DuckDB Value to JSON Value
fn duckdb_value_to_json(value: DuckValue) -> JsonValue {
    match value {
        DuckValue::Null => JsonValue::Null,
        DuckValue::Boolean(b) => JsonValue::Bool(b),
        DuckValue::TinyInt(i) => JsonValue::Number(i.into()),
        DuckValue::SmallInt(i) => JsonValue::Number(i.into()),
        DuckValue::Int(i) => JsonValue::Number(i.into()),
        DuckValue::BigInt(i) => JsonValue::Number(i.into()),
        DuckValue::HugeInt(i) => JsonValue::String(i.to_string()),
        DuckValue::UTinyInt(i) => JsonValue::Number(i.into()),
        DuckValue::USmallInt(i) => JsonValue::Number(i.into()),
        DuckValue::UInt(i) => JsonValue::Number(i.into()),
        DuckValue::UBigInt(i) => JsonValue::Number(i.into()),
        DuckValue::Float(f) => {
            serde_json::Number::from_f64(f64::from(f)).map_or(JsonValue::Null, JsonValue::Number)
        }
        DuckValue::Double(f) => {
            serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
        }
        DuckValue::Text(s) => JsonValue::String(s),
        DuckValue::Blob(b) => JsonValue::String(base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            b,
        )),
        DuckValue::Timestamp(unit, i) => timestamp_to_json(unit, i),
        DuckValue::Date32(d) => {
            // Days since epoch (719163 is the number of days from 1 CE to 1970-01-01)
            chrono::NaiveDate::from_num_days_from_ce_opt(d + 719_163)
                .map(|date| JsonValue::String(date.format("%Y-%m-%d").to_string()))
                .unwrap_or(JsonValue::Number(d.into()))
        }
        _ => JsonValue::String(format!("{value:?}")),
    }
}

/// Render a timestamp in `unit` since the epoch as RFC 3339 UTC
fn timestamp_to_json(unit: TimeUnit, value: i64) -> JsonValue {
    let per_second: i64 = match unit {
        TimeUnit::Second => 1,
        TimeUnit::Millisecond => 1_000,
        TimeUnit::Microsecond => 1_000_000,
        TimeUnit::Nanosecond => 1_000_000_000,
    };
    // Euclidean split keeps the sub-second part non-negative before 1970
    let secs = value.div_euclid(per_second);
    let nanos = value.rem_euclid(per_second) * (1_000_000_000 / per_second);
    chrono::DateTime::from_timestamp(secs, nanos as u32)
        .map(|dt| JsonValue::String(dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()))
        .unwrap_or(JsonValue::Number(value.into()))
}
