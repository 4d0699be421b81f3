//! Scripted in-memory stand-in for an Oracle server.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use oracle_username_probe::{
    Connector, Credentials, DataSource, Error, Result, Row, Session, Value,
};

pub const ADMIN_USER: &str = "SYSTEM";
pub const ADMIN_PASSWORD: &str = "manager";

/// Server-side state shared by every session of one [`FakeConnector`].
#[derive(Debug, Default)]
pub struct Catalog {
    /// Upper-cased username -> password.
    pub users: HashMap<String, String>,
    pub grants: HashSet<String>,
    pub nls_parameters: BTreeMap<String, Option<String>>,
    pub banners: Vec<String>,
    pub languages: HashSet<String>,
    /// Every statement in execution order.
    pub statements: Vec<String>,
    /// Statements issued before the session language was set.
    pub unlocalized: Vec<String>,
    pub connects: usize,
    pub failed_connects: usize,
    pub closes: usize,
    pub leaked: usize,
    pub open: usize,
    pub max_open: usize,
    /// Statements containing this text fail with the given error.
    pub fail_on: Option<(String, u32, String)>,
    pub fail_close: bool,
    /// Users whose logins are refused even with the right password.
    pub deny_logins: HashSet<String>,
    /// `ALTER SESSION` succeeds without the language taking effect.
    pub ignore_language: bool,
}

impl Catalog {
    fn fail_if_scripted(&self, sql: &str) -> Result<()> {
        match &self.fail_on {
            Some((needle, code, message)) if sql.contains(needle.as_str()) => {
                Err(Error::oracle(*code, message.clone()))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone)]
pub struct FakeConnector {
    catalog: Arc<Mutex<Catalog>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        let mut catalog = Catalog::default();
        catalog.users.insert(ADMIN_USER.into(), ADMIN_PASSWORD.into());
        catalog.grants.insert(ADMIN_USER.into());
        for lang in ["AMERICAN", "POLISH"] {
            catalog.languages.insert(lang.into());
        }
        for (k, v) in [
            ("NLS_TERRITORY", Some("AMERICA")),
            ("NLS_CHARACTERSET", Some("AL32UTF8")),
            ("NLS_LANGUAGE", Some("AMERICAN")),
            ("NLS_COMP", None),
        ] {
            catalog.nls_parameters.insert(k.into(), v.map(Into::into));
        }
        catalog.banners = vec![
            "Oracle Database 23ai Free Release 23.0.0.0.0 - Develop, Learn, and Run for Free"
                .into(),
        ];
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
        }
    }

    pub fn catalog(&self) -> MutexGuard<'_, Catalog> {
        self.catalog.lock().unwrap()
    }

    pub fn with_user(self, name: &str, password: &str) -> Self {
        self.catalog()
            .users
            .insert(name.to_uppercase(), password.into());
        self
    }

    pub fn fail_on(self, needle: &str, code: u32, message: &str) -> Self {
        self.catalog().fail_on = Some((needle.into(), code, message.into()));
        self
    }
}

pub fn admin_credentials() -> Credentials {
    Credentials::new(
        ADMIN_USER,
        ADMIN_PASSWORD,
        DataSource::new("localhost", 1521, "FREEPDB1"),
    )
}

impl Connector for FakeConnector {
    type Session = FakeSession;

    async fn connect(&self, credentials: &Credentials) -> Result<FakeSession> {
        let mut catalog = self.catalog();
        let user = credentials.username.to_uppercase();
        if catalog.users.get(&user) != Some(&credentials.password)
            || catalog.deny_logins.contains(&user)
        {
            catalog.failed_connects += 1;
            return Err(Error::oracle(
                1017,
                "invalid username/password; logon denied",
            ));
        }
        if !catalog.grants.contains(&user) {
            catalog.failed_connects += 1;
            return Err(Error::oracle(
                1045,
                format!("user {} lacks CREATE SESSION privilege; logon denied", user),
            ));
        }
        catalog.connects += 1;
        catalog.open += 1;
        catalog.max_open = catalog.max_open.max(catalog.open);
        Ok(FakeSession {
            catalog: Arc::clone(&self.catalog),
            user,
            language: None,
            closed: false,
        })
    }
}

pub struct FakeSession {
    catalog: Arc<Mutex<Catalog>>,
    pub user: String,
    language: Option<String>,
    closed: bool,
}

fn last_word(sql: &str) -> String {
    sql.split_whitespace().last().unwrap_or("").to_uppercase()
}

impl FakeSession {
    fn run(&mut self, sql: &str, binds: &[Value]) -> Result<Vec<Row>> {
        let mut catalog = self.catalog.lock().unwrap();
        catalog.statements.push(sql.to_string());
        if self.language.is_none() && !sql.starts_with("ALTER SESSION") {
            catalog.unlocalized.push(sql.to_string());
        }
        catalog.fail_if_scripted(sql)?;

        if sql.starts_with("SELECT COUNT(1) FROM ALL_USERS") {
            let name = binds
                .first()
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_uppercase();
            let count = i64::from(catalog.users.contains_key(&name));
            return Ok(vec![Row::new(vec![Value::from(count)])]);
        }
        if let Some(rest) = sql.strip_prefix("CREATE USER ") {
            let (name, password) = rest
                .split_once(" IDENTIFIED BY ")
                .ok_or_else(|| Error::oracle(922, "missing or invalid option"))?;
            let name = name.to_uppercase();
            if catalog.users.contains_key(&name) {
                return Err(Error::oracle(
                    1920,
                    format!("user name '{}' conflicts with another user or role name", name),
                ));
            }
            catalog.users.insert(name, password.to_string());
            return Ok(Vec::new());
        }
        if sql.starts_with("GRANT CONNECT TO ") {
            let name = last_word(sql);
            if !catalog.users.contains_key(&name) {
                return Err(Error::oracle(
                    1917,
                    format!("user or role '{}' does not exist", name),
                ));
            }
            catalog.grants.insert(name);
            return Ok(Vec::new());
        }
        if sql.starts_with("DROP USER ") {
            let name = last_word(sql);
            if catalog.users.remove(&name).is_none() {
                return Err(Error::oracle(1918, format!("user '{}' does not exist", name)));
            }
            catalog.grants.remove(&name);
            return Ok(Vec::new());
        }
        if sql.contains("FROM NLS_DATABASE_PARAMETERS") {
            return Ok(catalog
                .nls_parameters
                .iter()
                .map(|(k, v)| {
                    Row::new(vec![
                        k.as_str().into(),
                        v.as_deref().map(Value::from).unwrap_or(Value::Null),
                    ])
                })
                .collect());
        }
        if sql.contains("FROM V$VERSION") {
            let mut banners = catalog.banners.clone();
            banners.sort();
            return Ok(banners
                .iter()
                .map(|b| Row::new(vec![b.as_str().into(), " ".into()]))
                .collect());
        }
        Err(Error::oracle(900, "invalid SQL statement"))
    }
}

impl Session for FakeSession {
    async fn execute_scalar(&mut self, sql: &str, binds: &[Value]) -> Result<Option<Value>> {
        let rows = self.run(sql, binds)?;
        Ok(rows.first().and_then(|r| r.get(0)).cloned())
    }

    async fn execute_non_query(&mut self, sql: &str, binds: &[Value]) -> Result<u64> {
        self.run(sql, binds).map(|_| 0)
    }

    async fn execute_reader(&mut self, sql: &str, binds: &[Value]) -> Result<Vec<Row>> {
        self.run(sql, binds)
    }

    fn session_language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    async fn set_session_language(&mut self, language: &str) -> Result<()> {
        let mut catalog = self.catalog.lock().unwrap();
        let sql = format!("ALTER SESSION SET NLS_LANGUAGE = '{}'", language);
        catalog.statements.push(sql.clone());
        catalog.fail_if_scripted(&sql)?;
        if !catalog.languages.contains(language) {
            return Err(Error::oracle(
                12705,
                "Cannot access NLS data files or invalid environment specified",
            ));
        }
        if !catalog.ignore_language {
            self.language = Some(language.to_string());
        }
        Ok(())
    }

    async fn close(mut self) -> Result<()> {
        let mut catalog = self.catalog.lock().unwrap();
        self.closed = true;
        catalog.open -= 1;
        catalog.closes += 1;
        if catalog.fail_close {
            return Err(Error::ConnectionClosed);
        }
        Ok(())
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        if !self.closed {
            if let Ok(mut catalog) = self.catalog.lock() {
                catalog.open -= 1;
                catalog.leaked += 1;
            }
        }
    }
}
