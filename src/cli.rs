//! Command-line surface.

use clap::error::ErrorKind;
use clap::Parser;

use crate::config::{Credentials, DataSource};
use crate::error::Result;

/// Printed on standard output for any malformed invocation.
pub const USAGE: &str = "Usage: oracle-username-probe <username> <password> <db>";

/// Exit status for malformed arguments.
pub const EXIT_USAGE: u8 = 1;

/// Exit status for a run aborted by an error.
pub const EXIT_FATAL: u8 = 2;

/// Verify that an Oracle database round-trips a non-ASCII username.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "oracle-username-probe",
    version,
    override_usage = "oracle-username-probe <username> <password> <db>"
)]
pub struct Args {
    /// Administrator username
    pub username: String,
    /// Administrator password
    #[arg(allow_hyphen_values = true)]
    pub password: String,
    /// Database address, e.g. host[:port]/service_name
    pub database: String,
}

impl Args {
    /// Administrator credentials for the parsed address.
    pub fn credentials(&self) -> Result<Credentials> {
        let data_source = DataSource::parse(&self.database)?;
        Ok(Credentials::new(&self.username, &self.password, data_source))
    }
}

/// What `main` should do with the command line.
#[derive(Debug)]
pub enum Command {
    Run(Args),
    /// Wrong number of arguments or an unknown flag.
    Usage,
    /// `--help` / `--version`; clap prints it.
    Info(clap::Error),
}

pub fn parse<I, T>(args: I) -> Command
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Args::try_parse_from(args) {
        Ok(args) => Command::Run(args),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Command::Info(e)
        }
        Err(_) => Command::Usage,
    }
}
