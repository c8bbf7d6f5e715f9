use crate::error::{Error, ErrorKind};
use crate::parser::parse_response;
use crate::transport::Transport;
use crate::utils::escape_xml;
use crate::Value;

use log::debug;

use std::io::{self, Write};

/// A call to a remote procedure.
#[derive(Clone, Debug)]
pub struct Request<'a> {
    name: &'a str,
    args: Vec<Value>,
}

impl<'a> Request<'a> {
    /// Creates a request for the method `name`, without arguments.
    pub fn new(name: &'a str) -> Self {
        Request {
            name,
            args: Vec::new(),
        }
    }

    /// Appends an argument.
    pub fn arg<T: Into<Value>>(mut self, value: T) -> Self {
        self.args.push(value.into());
        self
    }

    /// The remote method name.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Sends the request through `transport` and decodes the response.
    ///
    /// # Errors
    ///
    /// Transport failures are returned as `ErrorKind::TransportError`, malformed responses as
    /// `ErrorKind::ParseError`, and a `<fault>` answer as `ErrorKind::Fault`.
    pub fn call<T: Transport>(&self, transport: T) -> Result<Value, Error> {
        debug!("calling {}", self.name);

        let mut reader = transport.transmit(self).map_err(ErrorKind::TransportError)?;
        let response = parse_response(&mut reader).map_err(ErrorKind::ParseError)?;
        let value = response.map_err(ErrorKind::Fault)?;

        debug!("{} returned {}", self.name, value.type_name());
        Ok(value)
    }

    /// Writes this request as a UTF-8 `methodCall` document.
    ///
    /// # Errors
    ///
    /// Only errors reported by the writer are returned.
    pub fn write_as_xml<W: Write>(&self, fmt: &mut W) -> io::Result<()> {
        write!(fmt, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
        write!(fmt, "<methodCall><methodName>{}</methodName><params>", escape_xml(self.name))?;
        for value in &self.args {
            write!(fmt, "<param>")?;
            value.write_as_xml(fmt)?;
            write!(fmt, "</param>")?;
        }
        write!(fmt, "</params></methodCall>")
    }
}
