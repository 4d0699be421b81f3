//! SQL client capability the probe runs against.
//!
//! A [`Connector`] opens [`Session`]s; a session offers the scalar,
//! non-query and reader forms of statement execution plus the session
//! language property. The production implementation lives in
//! [`crate::thin`]; tests substitute a scripted one.

use std::fmt;

use crate::config::Credentials;
use crate::error::{Error, Result};

/// A single column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// NULL value.
    Null,
    /// Character data (VARCHAR2, CHAR, etc.).
    Text(String),
    /// Number value as its decimal text (preserves precision).
    Number(String),
}

impl Value {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Number(s) => Some(s),
            Value::Null => None,
        }
    }

    /// Try to convert to i64.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Number(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Text(s) | Value::Number(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.to_string())
    }
}

/// A row of query results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Create a new row from its values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Get value by column index (0-based).
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Non-NULL string at `index`.
    pub fn get_string(&self, index: usize) -> Result<&str> {
        self.value(index)?
            .as_str()
            .ok_or(Error::NullValue { column: index })
    }

    /// Integer at `index`.
    pub fn get_i64(&self, index: usize) -> Result<i64> {
        match self.value(index)? {
            Value::Null => Err(Error::NullValue { column: index }),
            Value::Number(s) | Value::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::type_conversion(format!("'{}' is not an integer", s))),
        }
    }

    fn value(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or(Error::ColumnIndexOutOfBounds {
            index,
            count: self.values.len(),
        })
    }
}

impl FromIterator<Value> for Row {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// One open connection.
///
/// Binds are positional (`:1`, `:2`, ...).
#[allow(async_fn_in_trait)]
pub trait Session {
    /// First column of the first row, or `None` when no row came back.
    async fn execute_scalar(&mut self, sql: &str, binds: &[Value]) -> Result<Option<Value>>;

    /// Run a statement that returns no rows; yields the affected row count.
    async fn execute_non_query(&mut self, sql: &str, binds: &[Value]) -> Result<u64>;

    /// Run a query and collect its rows.
    async fn execute_reader(&mut self, sql: &str, binds: &[Value]) -> Result<Vec<Row>>;

    /// Language currently in force, if it was set through this session.
    fn session_language(&self) -> Option<&str>;

    /// Force the session's NLS language.
    async fn set_session_language(&mut self, language: &str) -> Result<()>;

    /// Close the connection.
    async fn close(self) -> Result<()>;
}

/// Opens sessions.
#[allow(async_fn_in_trait)]
pub trait Connector {
    type Session: Session;

    async fn connect(&self, credentials: &Credentials) -> Result<Self::Session>;
}
