//! The username round-trip verification.
//!
//! [`Probe::run`] provisions the test identity over an administrative
//! session, prints the diagnostic reports, connects as the test identity on
//! a fresh session, and finally drops it over a third session. Only one
//! session is open at a time; each is closed before its outcome is
//! propagated.
//!
//! The step functions are public so callers can drive a session themselves:
//!
//! ```no_run
//! use oracle_username_probe::{probe, Connector, Credentials, DataSource, Session, ThinConnector};
//!
//! # async fn example() -> oracle_username_probe::Result<()> {
//! let admin = Credentials::new("system", "manager", DataSource::parse("localhost:1521/FREEPDB1")?);
//! let mut session = ThinConnector.connect(&admin).await?;
//! probe::apply_language(&mut session, "POLISH").await?;
//! let exists = probe::user_exists(&mut session, "ZAŻÓŁĆGĘŚLĄJAŹŃ").await;
//! session.close().await?;
//! println!("exists: {}", exists?);
//! # Ok(())
//! # }
//! ```

use std::io::Write;

use tracing::{debug, info, warn};

use crate::config::{Credentials, ProbeConfig};
use crate::error::{Error, Result};
use crate::identity::validate_identifier;
use crate::report::{self, REPORTS};
use crate::session::{Connector, Session};

const USER_EXISTS_SQL: &str = "SELECT COUNT(1) FROM ALL_USERS WHERE USERNAME = UPPER(:1)";

/// What a completed run observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// The test user was already present when the run started.
    pub user_existed: bool,
    /// The run created the test user.
    pub created: bool,
    /// Logging in as the test user worked.
    pub connected: bool,
    /// The final drop succeeded.
    pub dropped: bool,
}

/// `CREATE USER <name> IDENTIFIED BY <password>`
pub fn create_user_sql(name: &str, password: &str) -> Result<String> {
    Ok(format!(
        "CREATE USER {} IDENTIFIED BY {}",
        validate_identifier(name)?,
        validate_identifier(password)?
    ))
}

/// `GRANT CONNECT TO <name>`
pub fn grant_connect_sql(name: &str) -> Result<String> {
    Ok(format!("GRANT CONNECT TO {}", validate_identifier(name)?))
}

/// `DROP USER <name>`
pub fn drop_user_sql(name: &str) -> Result<String> {
    Ok(format!("DROP USER {}", validate_identifier(name)?))
}

/// Whether a user named `name` (compared upper-cased) is in the catalog.
pub async fn user_exists<S: Session>(session: &mut S, name: &str) -> Result<bool> {
    let count = session
        .execute_scalar(USER_EXISTS_SQL, &[name.into()])
        .await?
        .ok_or_else(|| Error::unexpected("user count query returned no rows"))?;
    let count = count
        .as_str()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .ok_or_else(|| Error::unexpected(format!("user count is not an integer: {}", count)))?;
    Ok(count != 0)
}

pub async fn create_user<S: Session>(session: &mut S, name: &str, password: &str) -> Result<()> {
    let sql = create_user_sql(name, password)?;
    session.execute_non_query(&sql, &[]).await?;
    info!(user = name, "created user");
    Ok(())
}

pub async fn grant_connect<S: Session>(session: &mut S, name: &str) -> Result<()> {
    let sql = grant_connect_sql(name)?;
    session.execute_non_query(&sql, &[]).await?;
    info!(user = name, "granted CONNECT");
    Ok(())
}

/// Drop `name`, reporting failure on `out` instead of returning it.
///
/// Returns whether the drop went through; `Err` only for output failures.
pub async fn drop_user<S: Session, W: Write>(
    session: &mut S,
    name: &str,
    out: &mut W,
) -> Result<bool> {
    let dropped = match drop_user_sql(name) {
        Ok(sql) => session.execute_non_query(&sql, &[]).await.map(|_| ()),
        Err(e) => Err(e),
    };
    match dropped {
        Ok(()) => {
            info!(user = name, "dropped user");
            Ok(true)
        }
        Err(e) => {
            warn!(user = name, error = %e, "drop failed");
            writeln!(out, "DROP USER failed: {}", e)?;
            Ok(false)
        }
    }
}

/// Print every report in [`REPORTS`].
pub async fn print_diagnostics<S: Session, W: Write>(session: &mut S, out: &mut W) -> Result<()> {
    for report in REPORTS {
        report::write_header(out, report.name)?;
        let rows = session.execute_reader(report.sql, &[]).await?;
        for row in &rows {
            report::write_row(out, row)?;
        }
    }
    Ok(())
}

/// Force `language` on `session` and check the session reports it back.
pub async fn apply_language<S: Session>(session: &mut S, language: &str) -> Result<()> {
    session.set_session_language(language).await?;
    match session.session_language() {
        Some(current) if current == language => Ok(()),
        current => Err(Error::unexpected(format!(
            "session language is {:?} after setting {}",
            current, language
        ))),
    }
}

/// Log in as `credentials` on a fresh session and set its language.
///
/// Connection and language failures are printed and yield `Ok(false)`.
pub async fn try_connect<C: Connector, W: Write>(
    connector: &C,
    credentials: &Credentials,
    language: &str,
    out: &mut W,
) -> Result<bool> {
    let mut session = match connector.connect(credentials).await {
        Ok(session) => session,
        Err(e) => {
            warn!(user = %credentials.username, error = %e, "test-user connect failed");
            writeln!(out, "Exception on TryConnect() = {}", e)?;
            return Ok(false);
        }
    };

    let configured = apply_language(&mut session, language).await;
    close_quietly(session).await;

    match configured {
        Ok(()) => Ok(true),
        Err(e) => {
            warn!(user = %credentials.username, error = %e, "test-user session setup failed");
            writeln!(out, "Exception on TryConnect() = {}", e)?;
            Ok(false)
        }
    }
}

async fn close_quietly<S: Session>(session: S) {
    if let Err(e) = session.close().await {
        warn!(error = %e, "closing session failed");
    }
}

/// Close `session`, then hand back `outcome`. The body's error wins over a
/// close error.
async fn finish<S: Session, T>(session: S, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            session.close().await?;
            Ok(value)
        }
        Err(e) => {
            close_quietly(session).await;
            Err(e)
        }
    }
}

/// One verification run writing its report to `W`.
pub struct Probe<C, W> {
    connector: C,
    config: ProbeConfig,
    out: W,
}

impl<C: Connector, W: Write> Probe<C, W> {
    pub fn new(connector: C, config: ProbeConfig, out: W) -> Self {
        Self {
            connector,
            config,
            out,
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Give back the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Administrative session with the session language already forced.
    async fn open_admin(&self) -> Result<C::Session> {
        let mut session = self.connector.connect(&self.config.admin).await?;
        debug!(language = %self.config.session_language, "setting session language");
        match apply_language(&mut session, &self.config.session_language).await {
            Ok(()) => Ok(session),
            Err(e) => {
                close_quietly(session).await;
                Err(e)
            }
        }
    }

    async fn provision(&mut self, session: &mut C::Session) -> Result<(bool, bool)> {
        let name = self.config.identity.username.as_str();
        let exists = user_exists(session, name).await?;
        writeln!(
            self.out,
            "User exists? = {}",
            if exists { "True" } else { "False" }
        )?;

        if !exists {
            create_user(session, name, &self.config.identity.password).await?;
        }
        grant_connect(session, name).await?;
        print_diagnostics(session, &mut self.out).await?;
        Ok((exists, !exists))
    }

    /// Run all steps in order. Any error before the test-user login aborts
    /// the run; the drop step runs whenever the login step was reached.
    pub async fn run(&mut self) -> Result<ProbeOutcome> {
        let mut admin = self.open_admin().await?;
        let provisioned = self.provision(&mut admin).await;
        let (user_existed, created) = finish(admin, provisioned).await?;

        let test_credentials = self.config.test_credentials();
        let connected = try_connect(
            &self.connector,
            &test_credentials,
            &self.config.session_language,
            &mut self.out,
        )
        .await?;
        if connected {
            writeln!(self.out, "OK, connected!")?;
        }

        let mut admin = self.open_admin().await?;
        let dropped = drop_user(&mut admin, &self.config.identity.username, &mut self.out).await;
        let dropped = finish(admin, dropped).await?;

        Ok(ProbeOutcome {
            user_existed,
            created,
            connected,
            dropped,
        })
    }
}
