//! Run configuration: administrator credentials and the target address.

use std::fmt;

use crate::error::{Error, Result};
use crate::identity::{TestIdentity, SESSION_LANGUAGE};

/// Address of the target database, handed to the driver unchanged.
///
/// Any form the driver understands is accepted: `host[:port]/service`,
/// `//host:port/service`, `host:port:sid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    address: String,
}

impl DataSource {
    /// EZConnect address `host:port/service_name`.
    pub fn new(host: impl AsRef<str>, port: u16, service_name: impl AsRef<str>) -> Self {
        Self {
            address: format!("{}:{}/{}", host.as_ref(), port, service_name.as_ref()),
        }
    }

    /// Check `address` with the driver's own connect-string parser.
    pub fn parse(address: &str) -> Result<Self> {
        let address = address.trim();
        if address.is_empty() {
            return Err(Error::InvalidConnectString {
                message: "empty database address".to_string(),
            });
        }
        address
            .parse::<oracle_rs::Config>()
            .map_err(|e| Error::InvalidConnectString {
                message: e.to_string(),
            })?;
        Ok(Self {
            address: address.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// Credentials for one connection.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub data_source: DataSource,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        data_source: DataSource,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            data_source,
        }
    }

    /// Same address, different identity.
    pub fn with_identity(&self, username: &str, password: &str) -> Self {
        Self::new(username, password, self.data_source.clone())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("data_source", &self.data_source)
            .finish()
    }
}

/// Everything one probe run needs.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Administrator credentials.
    pub admin: Credentials,
    /// Disposable user created and dropped by the run.
    pub identity: TestIdentity,
    /// Language forced on every session.
    pub session_language: String,
}

impl ProbeConfig {
    /// Configuration with the built-in test identity and session language.
    pub fn new(admin: Credentials) -> Self {
        Self {
            admin,
            identity: TestIdentity::default(),
            session_language: SESSION_LANGUAGE.to_string(),
        }
    }

    /// Credentials of the test identity on the admin's data source.
    pub fn test_credentials(&self) -> Credentials {
        self.admin
            .with_identity(&self.identity.username, &self.identity.password)
    }
}
