//! Oracle non-ASCII username probe
//!
//! Checks that an Oracle database and driver round-trip a username made of
//! Polish diacritics: the probe creates the user over an administrative
//! session, prints the server's NLS parameters and version banner, logs in
//! as the new user, and drops it again. Every session has its NLS language
//! forced to `POLISH` before anything else runs on it.
//!
//! # Example
//!
//! ```no_run
//! use oracle_username_probe::{Credentials, DataSource, Probe, ProbeConfig, Result, ThinConnector};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let admin = Credentials::new(
//!         "system",
//!         "password",
//!         DataSource::parse("localhost:1521/FREEPDB1")?,
//!     );
//!
//!     let mut probe = Probe::new(ThinConnector, ProbeConfig::new(admin), std::io::stdout());
//!     let outcome = probe.run().await?;
//!     println!("connected as test user: {}", outcome.connected);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod probe;
pub mod report;
pub mod session;
pub mod thin;

// Re-export main types
pub use config::{Credentials, DataSource, ProbeConfig};
pub use error::{Error, Result};
pub use identity::{TestIdentity, SESSION_LANGUAGE, TEST_PASSWORD, TEST_USERNAME};
pub use probe::{Probe, ProbeOutcome};
pub use session::{Connector, Row, Session, Value};
pub use thin::{ThinConnector, ThinSession};
