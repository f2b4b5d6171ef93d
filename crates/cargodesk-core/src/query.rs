//! Query façade
//!
//! Pure expression builders consumed by [`crate::store::Store::list`].
//! A query is structural only; the store is the sole interpreter and
//! always evaluates categories in a fixed order: equality filters (ANDed),
//! then one descending sort, then one limit.
//!
//! Field names refer to the serialized (wire) form of a record, e.g.
//! `"driverId"` or `"status"`.

use serde_json::Value;
use std::cmp::Ordering;

/// One query expression
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Keep documents whose `field` equals `value`
    Equal { field: String, value: Value },
    /// Sort by `field`, descending
    OrderDesc { field: String },
    /// Truncate the result to at most `count` documents
    Limit { count: usize },
}

impl Query {
    /// Equality filter on a wire field
    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Equal {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Descending order by a wire field
    pub fn order_desc(field: impl Into<String>) -> Self {
        Query::OrderDesc {
            field: field.into(),
        }
    }

    /// Limit the result set to `count` documents
    pub fn limit(count: usize) -> Self {
        Query::Limit { count }
    }
}

/// Total order over JSON values used by `OrderDesc`
///
/// Null sorts before everything; numbers compare by value; strings
/// lexicographically. Mixed types get a stable arbitrary order by type
/// rank so a sort never panics.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn type_rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
