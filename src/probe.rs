//! The version and method-list probe.

use crate::client::{Client, Endpoint};
use crate::error::{Error, ErrorClass};

use log::info;

use std::error;
use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};

/// A probe failed, either talking to the daemon or writing the report.
#[derive(Debug)]
pub enum ProbeError {
    /// A remote call failed.
    Rpc(Error),
    /// The report could not be written.
    Output(io::Error),
}

impl ProbeError {
    /// The class of the remote failure, if the failure was remote.
    pub fn class(&self) -> Option<ErrorClass> {
        match *self {
            ProbeError::Rpc(ref err) => Some(err.class()),
            ProbeError::Output(_) => None,
        }
    }
}

impl From<Error> for ProbeError {
    fn from(e: Error) -> Self {
        ProbeError::Rpc(e)
    }
}

impl From<io::Error> for ProbeError {
    fn from(e: io::Error) -> Self {
        ProbeError::Output(e)
    }
}

impl Display for ProbeError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            ProbeError::Rpc(ref err) => match err.class() {
                ErrorClass::Connection => write!(f, "connection error: {}", err),
                ErrorClass::RemoteCall => write!(f, "remote call error: {}", err),
            },
            ProbeError::Output(ref err) => write!(f, "could not write report: {}", err),
        }
    }
}

impl error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ProbeError::Rpc(ref err) => Some(err),
            ProbeError::Output(ref err) => Some(err),
        }
    }
}

/// Renders method names the way Python prints a list of strings: `['a', 'b']`.
///
/// A name containing `'` but no `"` is wrapped in double quotes; otherwise single quotes are
/// used and embedded `'` escaped. Backslashes and control characters are escaped.
pub fn format_methods(methods: &[String]) -> String {
    let quoted: Vec<String> = methods.iter().map(|m| quote(m)).collect();
    format!("[{}]", quoted.join(", "))
}

fn quote(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c == '\x7f' => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

/// Writes the first report line.
pub fn write_version<W: Write>(out: &mut W, version: &str) -> io::Result<()> {
    writeln!(out, "server version: {}", version)?;
    out.flush()
}

/// Writes the second report line.
pub fn write_methods<W: Write>(out: &mut W, methods: &[String]) -> io::Result<()> {
    writeln!(out, "methods: {}", format_methods(methods))?;
    out.flush()
}

/// Asks the daemon at `endpoint` for its version and methods and reports them to `out`.
///
/// The version line is written as soon as it is known, so if `system.listMethods` fails the
/// version line is the only output.
pub fn run<W: Write>(endpoint: &Endpoint, out: &mut W) -> Result<(), ProbeError> {
    info!("probing {}", endpoint);

    let client = Client::connect(endpoint)?;

    let version = client.get_version()?;
    write_version(out, &version)?;

    let methods = client.list_methods()?;
    write_methods(out, &methods)?;

    Ok(())
}
