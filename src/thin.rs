//! Production backend over the pure-Rust `oracle-rs` thin driver.

use oracle_rs::Connection;
use tracing::debug;

use crate::config::Credentials;
use crate::error::Result;
use crate::identity::{quote_literal, validate_identifier};
use crate::session::{Connector, Row, Session, Value};

/// Opens TNS connections directly, no Oracle client libraries needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThinConnector;

impl Connector for ThinConnector {
    type Session = ThinSession;

    async fn connect(&self, credentials: &Credentials) -> Result<ThinSession> {
        let conn_str = credentials.data_source.to_string();
        debug!(data_source = %conn_str, username = %credentials.username, "connecting");

        let conn =
            Connection::connect(&conn_str, &credentials.username, &credentials.password).await?;
        Ok(ThinSession {
            conn,
            language: None,
        })
    }
}

/// An open thin-driver connection.
///
/// Dropping it without [`Session::close`] leaves the driver to release the socket.
pub struct ThinSession {
    conn: Connection,
    language: Option<String>,
}

fn to_driver_binds(binds: &[Value]) -> Vec<oracle_rs::Value> {
    binds
        .iter()
        .map(|v| match v {
            Value::Null => oracle_rs::Value::Null,
            Value::Number(s) => match s.parse::<i64>() {
                Ok(n) => oracle_rs::Value::Integer(n),
                Err(_) => oracle_rs::Value::String(s.clone()),
            },
            Value::Text(s) => oracle_rs::Value::String(s.clone()),
        })
        .collect()
}

fn from_driver_value(value: Option<&oracle_rs::Value>) -> Value {
    use oracle_rs::{LobValue, Value as Driver};

    match value {
        None | Some(Driver::Null) | Some(Driver::Lob(LobValue::Null)) => Value::Null,
        Some(Driver::String(s)) => Value::Text(s.clone()),
        Some(n @ (Driver::Integer(_) | Driver::Float(_) | Driver::Number(_))) => {
            Value::Number(n.to_string())
        }
        Some(other) => Value::Text(other.to_string()),
    }
}

fn from_driver_row(row: &oracle_rs::Row, columns: usize) -> Row {
    (0..columns).map(|i| from_driver_value(row.get(i))).collect()
}

impl Session for ThinSession {
    async fn execute_scalar(&mut self, sql: &str, binds: &[Value]) -> Result<Option<Value>> {
        let rows = self.execute_reader(sql, binds).await?;
        Ok(rows.first().and_then(|row| row.get(0)).cloned())
    }

    async fn execute_non_query(&mut self, sql: &str, binds: &[Value]) -> Result<u64> {
        debug!(sql, "execute");
        let result = self.conn.execute(sql, &to_driver_binds(binds)).await?;
        Ok(result.rows_affected)
    }

    async fn execute_reader(&mut self, sql: &str, binds: &[Value]) -> Result<Vec<Row>> {
        debug!(sql, "query");
        let result = self.conn.query(sql, &to_driver_binds(binds)).await?;
        let columns = result.columns.len();
        Ok(result
            .rows
            .iter()
            .map(|row| from_driver_row(row, columns))
            .collect())
    }

    fn session_language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    async fn set_session_language(&mut self, language: &str) -> Result<()> {
        let language = validate_identifier(language)?;
        let sql = format!("ALTER SESSION SET NLS_LANGUAGE = {}", quote_literal(language));
        self.execute_non_query(&sql, &[]).await?;
        self.language = Some(language.to_string());
        Ok(())
    }

    async fn close(self) -> Result<()> {
        debug!("closing connection");
        self.conn.close().await?;
        Ok(())
    }
}
