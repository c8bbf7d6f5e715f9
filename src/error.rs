//! Error types for calls against the rig-control daemon.

use crate::{Fault, Value};

use xml::common::TextPosition;
use xml::reader::Error as XmlError;

use std::error;
use std::fmt::{self, Display, Formatter};
use std::io;

/// A remote call could not be completed.
///
/// This wraps an [`ErrorKind`]; use [`Error::class`] to tell an unreachable daemon apart from one
/// that answered badly, and [`Error::fault`] to get at a `<fault>` response.
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    /// Returns the `Fault` if the server answered with a `<fault>` response.
    pub fn fault(&self) -> Option<&Fault> {
        match *self.0 {
            ErrorKind::Fault(ref fault) => Some(fault),
            _ => None,
        }
    }

    /// The detailed cause.
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Whether the daemon could not be reached at all, or was reached and the call failed.
    pub fn class(&self) -> ErrorClass {
        match *self.0 {
            ErrorKind::InvalidEndpoint(_) => ErrorClass::Connection,
            ErrorKind::TransportError(ref err) if is_connect_error(&**err) => ErrorClass::Connection,
            _ => ErrorClass::RemoteCall,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(Box::new(kind))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self.0 {
            ErrorKind::TransportError(ref err) => Some(&**err),
            ErrorKind::ParseError(ref err) => Some(err),
            ErrorKind::Fault(ref err) => Some(err),
            ErrorKind::InvalidEndpoint(_) | ErrorKind::UnexpectedType { .. } => None,
        }
    }
}

/// The two ways a probe can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Nothing answered at the endpoint.
    Connection,
    /// The endpoint answered, but the call did not produce a usable result.
    RemoteCall,
}

/// The cause of an [`Error`].
#[derive(Debug)]
pub enum ErrorKind {
    /// The host and port do not form a usable URL.
    InvalidEndpoint(String),

    /// The transport failed to deliver the request or to receive a successful response.
    TransportError(Box<dyn error::Error + Send + Sync>),

    /// The response body is not a valid XML-RPC `methodResponse`.
    ParseError(ParseError),

    /// The server answered with a `<fault>`.
    Fault(Fault),

    /// The call succeeded but returned a value of the wrong type.
    UnexpectedType {
        /// Name of the remote method.
        method: String,
        /// Description of what was expected, eg. `string` or `array of strings`.
        expected: &'static str,
        /// What came back instead.
        found: Value,
    },
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            ErrorKind::InvalidEndpoint(ref url) => write!(f, "invalid endpoint: {}", url),
            ErrorKind::TransportError(ref err) => write!(f, "transport error: {}", err),
            ErrorKind::ParseError(ref err) => write!(f, "parse error: {}", err),
            ErrorKind::Fault(ref fault) => write!(f, "server returned a fault: {}", fault),
            ErrorKind::UnexpectedType { ref method, expected, ref found } => write!(
                f,
                "{} returned {} (expected {})",
                method,
                found.type_name(),
                expected
            ),
        }
    }
}

fn is_connect_error(err: &(dyn error::Error + Send + Sync + 'static)) -> bool {
    #[cfg(feature = "http")]
    {
        if let Some(err) = err.downcast_ref::<reqwest::Error>() {
            return err.is_connect() || err.is_builder();
        }
    }

    match err.downcast_ref::<io::Error>() {
        Some(err) => matches!(
            err.kind(),
            io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::AddrNotAvailable
                | io::ErrorKind::NotConnected
        ),
        None => false,
    }
}

/// A `methodResponse` could not be parsed.
#[derive(Debug)]
pub enum ParseError {
    /// Malformed XML.
    XmlError(XmlError),

    /// The character data is not a valid value of the type its tag names, eg. `<int>AAA</int>`.
    InvalidValue {
        /// The type tag, eg. `int` or `dateTime.iso8601`.
        for_type: &'static str,
        /// The offending text.
        found: String,
        /// Where the value ends in the document.
        position: TextPosition,
    },

    /// Found an element or text where XML-RPC does not allow it.
    UnexpectedXml {
        /// A short description of what was expected.
        expected: String,
        /// Where the unexpected data was found.
        position: TextPosition,
    },
}

impl From<XmlError> for ParseError {
    fn from(e: XmlError) -> Self {
        ParseError::XmlError(e)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            ParseError::XmlError(ref err) => write!(f, "malformed XML: {}", err),
            ParseError::InvalidValue { for_type, ref found, ref position } => {
                write!(f, "invalid value for type '{}' at {}: {}", for_type, position, found)
            }
            ParseError::UnexpectedXml { ref expected, ref position } => {
                write!(f, "unexpected XML at {} (expected {})", position, expected)
            }
        }
    }
}

impl error::Error for ParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ParseError::XmlError(ref err) => Some(err),
            _ => None,
        }
    }
}
