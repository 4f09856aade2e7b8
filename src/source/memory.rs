//! In-memory data source
//!
//! Holds JSON objects and answers fetches the way a keyset-capable
//! database would: filter, order, seek, skip, take, then project.

use super::types::{DataSource, FindManyArgs, OrderBy, SeekCursor};
use crate::error::{Error, Result};
use crate::types::{Filter, JsonObject, JsonValue, Projection, SortOrder};
use async_trait::async_trait;
use std::cmp::Ordering;

/// Data source backed by a vector of JSON objects
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<JsonValue>,
}

impl MemorySource {
    /// Create a source from records
    pub fn new(records: Vec<JsonValue>) -> Self {
        Self { records }
    }

    /// Append a record
    pub fn push(&mut self, record: JsonValue) {
        self.records.push(record);
    }

    /// Number of records held (unfiltered)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the source holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Run a fetch synchronously
    pub fn fetch(&self, args: &FindManyArgs) -> Result<Vec<JsonValue>> {
        let mut rows: Vec<&JsonValue> = self
            .records
            .iter()
            .filter(|r| args.filter.matches(r))
            .collect();

        if let Some(order_by) = &args.order_by {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(&order_by.field), b.get(&order_by.field));
                match order_by.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }

        let start = match &args.cursor {
            None => args.skip,
            Some(cursor) => {
                let direction = seek_direction(cursor, args.order_by.as_ref())?;
                let exclusive = args.skip > 0;
                let position = rows
                    .iter()
                    .position(|row| {
                        is_at_or_past(
                            row.get(cursor.key.as_str()),
                            &cursor.value,
                            direction,
                            exclusive,
                        )
                    })
                    .unwrap_or(rows.len());
                position + args.skip.saturating_sub(1)
            }
        };

        let take = args.take.unwrap_or(usize::MAX);

        Ok(rows
            .into_iter()
            .skip(start)
            .take(take)
            .map(|row| project(row, args.projection.as_ref()))
            .collect())
    }

    /// Count synchronously
    pub fn count_matching(&self, filter: &Filter) -> u64 {
        self.records.iter().filter(|r| filter.matches(r)).count() as u64
    }
}

impl FromIterator<JsonValue> for MemorySource {
    fn from_iter<I: IntoIterator<Item = JsonValue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl DataSource for MemorySource {
    type Record = JsonValue;

    async fn find_many(&self, args: FindManyArgs) -> Result<Vec<JsonValue>> {
        let rows = self.fetch(&args)?;
        tracing::trace!(rows = rows.len(), "memory source fetch");
        Ok(rows)
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        Ok(self.count_matching(filter))
    }
}

/// Direction the seek walks in; the cursor key must be the order-by field
fn seek_direction(cursor: &SeekCursor, order_by: Option<&OrderBy>) -> Result<SortOrder> {
    match order_by {
        None => Ok(SortOrder::Asc),
        Some(order_by) if order_by.field == cursor.key.as_str() => Ok(order_by.order),
        Some(order_by) => Err(Error::unsupported(format!(
            "cursor on '{}' cannot seek a collection ordered by '{}'",
            cursor.key, order_by.field
        ))),
    }
}

/// Whether a row sits at (or strictly past, when `exclusive`) the cursor
fn is_at_or_past(
    row_value: Option<&JsonValue>,
    cursor_value: &JsonValue,
    direction: SortOrder,
    exclusive: bool,
) -> bool {
    let ord = compare_values(row_value, Some(cursor_value));
    let ord = match direction {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    };
    if exclusive {
        ord == Ordering::Greater
    } else {
        ord != Ordering::Less
    }
}

/// Total order over JSON values: null < bool < number < string < array < object
pub fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    let a = a.unwrap_or(&JsonValue::Null);
    let b = b.unwrap_or(&JsonValue::Null);

    match (a, b) {
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        (JsonValue::Number(x), JsonValue::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x.cmp(&y)
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x.cmp(&y)
            } else {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        }
        (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &JsonValue) -> u8 {
    match value {
        JsonValue::Null => 0,
        JsonValue::Bool(_) => 1,
        JsonValue::Number(_) => 2,
        JsonValue::String(_) => 3,
        JsonValue::Array(_) => 4,
        JsonValue::Object(_) => 5,
    }
}

/// Relation fields hold objects (or lists of objects)
fn is_relation(value: &JsonValue) -> bool {
    match value {
        JsonValue::Object(_) => true,
        JsonValue::Array(items) => items.iter().any(JsonValue::is_object),
        _ => false,
    }
}

/// Apply a projection to a record
fn project(record: &JsonValue, projection: Option<&Projection>) -> JsonValue {
    let JsonValue::Object(fields) = record else {
        return record.clone();
    };

    let projected: JsonObject = match projection {
        Some(Projection::Select(selected)) => fields
            .iter()
            .filter(|(name, _)| selected.iter().any(|s| s == *name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        Some(Projection::Include(relations)) => fields
            .iter()
            .filter(|(name, value)| !is_relation(value) || relations.iter().any(|r| r == *name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        None => fields
            .iter()
            .filter(|(_, value)| !is_relation(value))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
    };

    JsonValue::Object(projected)
}
