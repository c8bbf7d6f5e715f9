use crate::Value;

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// A `<fault>` response: the daemon rejected the call.
///
/// flrig answers unknown method names and bad arguments this way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fault {
    code: i32,
    string: String,
}

impl Fault {
    /// Creates a new `Fault` from a code and message.
    pub fn new<S: Into<String>>(code: i32, string: S) -> Fault {
        Fault {
            code,
            string: string.into(),
        }
    }

    /// The `faultCode` sent by the server. Its meaning is server-specific.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// The `faultString` sent by the server.
    pub fn string(&self) -> &str {
        &self.string
    }

    /// Decodes a fault from the struct inside `<fault>`.
    ///
    /// The struct must contain exactly an int `faultCode` and a string `faultString`; anything else
    /// yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_struct()?;
        if map.len() != 2 {
            return None;
        }

        let code = map.get("faultCode")?.as_i32()?;
        let string = map.get("faultString")?.as_str()?;
        Some(Fault::new(code, string))
    }

    /// Turns this `Fault` into the struct `from_value` accepts.
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("faultCode".to_string(), Value::from(self.code));
        map.insert("faultString".to_string(), Value::from(self.string.as_str()));

        Value::Struct(map)
    }
}

impl Display for Fault {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.string, self.code)
    }
}

impl Error for Fault {}
