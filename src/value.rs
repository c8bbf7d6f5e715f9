//! Values exchanged with an XML-RPC server.

use crate::utils::{escape_xml, format_datetime};

use base64::encode;
use iso8601::DateTime;

use std::collections::BTreeMap;
use std::io::{self, Write};

/// An XML-RPC value, as sent in a request or returned by the daemon.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `<i4>` or `<int>`, 32-bit signed integer.
    Int(i32),
    /// `<i8>`, 64-bit signed integer (an extension; flrig does not send it, others might).
    Int64(i64),
    /// `<boolean>`, `0` or `1`.
    Bool(bool),
    /// `<string>`, or the untyped content of a bare `<value>`.
    String(String),
    /// `<double>`
    Double(f64),
    /// `<dateTime.iso8601>`
    DateTime(DateTime),
    /// `<base64>`, already decoded.
    Base64(Vec<u8>),
    /// `<struct>`, named members.
    Struct(BTreeMap<String, Value>),
    /// `<array>`, heterogeneous values in server order.
    Array(Vec<Value>),
    /// `<nil/>`
    Nil,
}

impl Value {
    /// Returns the contents of a `Value::String`, or `None` for every other kind.
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::String(ref s) => Some(s),
            _ => None,
        }
    }

    /// Returns the `i32` inside a `Value::Int`.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the elements of a `Value::Array`.
    pub fn as_array(&self) -> Option<&[Value]> {
        match *self {
            Value::Array(ref values) => Some(values),
            _ => None,
        }
    }

    /// Returns the members of a `Value::Struct`.
    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match *self {
            Value::Struct(ref map) => Some(map),
            _ => None,
        }
    }

    /// The XML-RPC type tag for this value, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match *self {
            Value::Int(_) => "int",
            Value::Int64(_) => "i8",
            Value::Bool(_) => "boolean",
            Value::String(_) => "string",
            Value::Double(_) => "double",
            Value::DateTime(_) => "dateTime.iso8601",
            Value::Base64(_) => "base64",
            Value::Struct(_) => "struct",
            Value::Array(_) => "array",
            Value::Nil => "nil",
        }
    }

    /// Writes this value as an XML `<value>` element.
    pub fn write_as_xml<W: Write>(&self, fmt: &mut W) -> io::Result<()> {
        write!(fmt, "<value>")?;

        match *self {
            Value::Int(i) => write!(fmt, "<i4>{}</i4>", i)?,
            Value::Int64(i) => write!(fmt, "<i8>{}</i8>", i)?,
            Value::Bool(b) => write!(fmt, "<boolean>{}</boolean>", if b { 1 } else { 0 })?,
            Value::String(ref s) => write!(fmt, "<string>{}</string>", escape_xml(s))?,
            Value::Double(d) => write!(fmt, "<double>{}</double>", d)?,
            Value::DateTime(ref date_time) => {
                write!(fmt, "<dateTime.iso8601>{}</dateTime.iso8601>", format_datetime(date_time))?
            }
            Value::Base64(ref data) => write!(fmt, "<base64>{}</base64>", encode(data))?,
            Value::Struct(ref map) => {
                write!(fmt, "<struct>")?;
                for (name, value) in map {
                    write!(fmt, "<member><name>{}</name>", escape_xml(name))?;
                    value.write_as_xml(fmt)?;
                    write!(fmt, "</member>")?;
                }
                write!(fmt, "</struct>")?;
            }
            Value::Array(ref values) => {
                write!(fmt, "<array><data>")?;
                for value in values {
                    value.write_as_xml(fmt)?;
                }
                write!(fmt, "</data></array>")?;
            }
            Value::Nil => write!(fmt, "<nil/>")?,
        }

        write!(fmt, "</value>")
    }
}

impl From<i32> for Value {
    fn from(other: i32) -> Self {
        Value::Int(other)
    }
}

impl From<i64> for Value {
    fn from(other: i64) -> Self {
        Value::Int64(other)
    }
}

impl From<bool> for Value {
    fn from(other: bool) -> Self {
        Value::Bool(other)
    }
}

impl From<f64> for Value {
    fn from(other: f64) -> Self {
        Value::Double(other)
    }
}

impl From<String> for Value {
    fn from(other: String) -> Self {
        Value::String(other)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(other: &'a str) -> Self {
        Value::String(other.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(other: Vec<Value>) -> Self {
        Value::Array(other)
    }
}
