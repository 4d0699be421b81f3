//! Diagnostic catalog reports printed after provisioning.

use std::io::Write;

use crate::error::Result;
use crate::session::Row;

/// Width the key column is padded to.
pub const KEY_WIDTH: usize = 24;

/// A named two-column catalog query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub name: &'static str,
    pub sql: &'static str,
}

/// Reports in print order. The literal `' '` fills the second column of the
/// version banner listing.
pub const REPORTS: &[Report] = &[
    Report {
        name: "NLS_DATABASE_PARAMETERS",
        sql: "SELECT PARAMETER, VALUE FROM NLS_DATABASE_PARAMETERS ORDER BY PARAMETER ASC",
    },
    Report {
        name: "V$VERSION",
        sql: "SELECT BANNER, ' ' FROM V$VERSION ORDER BY BANNER ASC",
    },
];

/// `### NAME ###`
pub fn write_header<W: Write>(out: &mut W, name: &str) -> Result<()> {
    writeln!(out, "### {} ###", name)?;
    Ok(())
}

/// One `key = value` line. A NULL value prints empty; a NULL key is an error.
pub fn write_row<W: Write>(out: &mut W, row: &Row) -> Result<()> {
    let key = row.get_string(0)?;
    let value = match row.get(1) {
        Some(v) if !v.is_null() => row.get_string(1)?,
        _ => "",
    };
    writeln!(out, "{:<width$} = {}", key, value, width = KEY_WIDTH)?;
    Ok(())
}
