//! `methodResponse` parser.

use crate::error::ParseError;
use crate::{Fault, Value};

use iso8601::datetime;
use xml::common::Position;
use xml::name::OwnedName;
use xml::reader::{EventReader, XmlEvent};
use xml::ParserConfig;

use std::collections::BTreeMap;
use std::io::Read;

pub type ParseResult<T> = Result<T, ParseError>;

/// A decoded `methodResponse`: the returned value, or the server's fault.
pub type Response = Result<Value, Fault>;

/// Parses a `methodResponse` document.
pub fn parse_response<R: Read>(reader: &mut R) -> ParseResult<Response> {
    Parser::new(reader).parse_response()
}

struct Parser<'a, R: Read + 'a> {
    reader: EventReader<&'a mut R>,
}

fn is(name: &OwnedName, tag: &str) -> bool {
    name.namespace.is_none() && name.prefix.is_none() && name.local_name == tag
}

impl<'a, R: Read> Parser<'a, R> {
    fn new(reader: &'a mut R) -> Self {
        Parser {
            reader: ParserConfig::new()
                .cdata_to_characters(true)
                .create_reader(reader),
        }
    }

    /// Pulls the next event that matters, skipping whitespace between tags, comments and the
    /// prolog.
    fn next(&mut self) -> ParseResult<XmlEvent> {
        self.pull(false)
    }

    /// Pulls the next event, skipping comments and the prolog. Whitespace-only text is returned
    /// as `XmlEvent::Whitespace` when `keep_whitespace` is set, since it may be string content.
    ///
    /// Elements carrying attributes are rejected here; XML-RPC never uses them.
    fn pull(&mut self, keep_whitespace: bool) -> ParseResult<XmlEvent> {
        loop {
            match self.reader.next()? {
                XmlEvent::StartDocument { .. }
                | XmlEvent::Comment(_)
                | XmlEvent::ProcessingInstruction { .. } => continue,
                XmlEvent::Whitespace(_) if !keep_whitespace => continue,
                XmlEvent::StartElement { ref name, ref attributes, .. } if !attributes.is_empty() => {
                    return self.expected(format!("tag <{}> without attributes", name));
                }
                event => return Ok(event),
            }
        }
    }

    fn expected<T, E: ToString>(&self, expected: E) -> ParseResult<T> {
        Err(ParseError::UnexpectedXml {
            expected: expected.to_string(),
            position: self.reader.position(),
        })
    }

    fn invalid_value(&self, for_type: &'static str, found: String) -> ParseError {
        ParseError::InvalidValue {
            for_type,
            found,
            position: self.reader.position(),
        }
    }

    fn expect_open(&mut self, tag: &str) -> ParseResult<()> {
        match self.next()? {
            XmlEvent::StartElement { ref name, .. } if is(name, tag) => Ok(()),
            _ => self.expected(format!("<{}>", tag)),
        }
    }

    fn expect_close(&mut self, tag: &str) -> ParseResult<()> {
        match self.next()? {
            XmlEvent::EndElement { ref name } if is(name, tag) => Ok(()),
            _ => self.expected(format!("</{}>", tag)),
        }
    }

    /// Reads the text of a scalar element up to its closing tag. `<tag/>` and `<tag></tag>` give
    /// an empty string.
    fn text(&mut self, tag: &str) -> ParseResult<String> {
        match self.pull(true)? {
            XmlEvent::Characters(text) | XmlEvent::Whitespace(text) => {
                self.expect_close(tag)?;
                Ok(text)
            }
            XmlEvent::EndElement { ref name } if is(name, tag) => Ok(String::new()),
            _ => self.expected(format!("characters or </{}>", tag)),
        }
    }

    fn parse_response(&mut self) -> ParseResult<Response> {
        self.expect_open("methodResponse")?;

        let response = match self.next()? {
            XmlEvent::StartElement { ref name, .. } if is(name, "params") => {
                self.expect_open("param")?;
                let value = self.parse_value()?;
                self.expect_close("param")?;
                self.expect_close("params")?;
                Ok(value)
            }
            XmlEvent::StartElement { ref name, .. } if is(name, "fault") => {
                let value = self.parse_value()?;
                let fault = match Fault::from_value(&value) {
                    Some(fault) => fault,
                    None => return self.expected("<struct> with int faultCode and string faultString"),
                };
                self.expect_close("fault")?;
                Err(fault)
            }
            _ => return self.expected("<params> or <fault>"),
        };

        self.expect_close("methodResponse")?;
        Ok(response)
    }

    fn parse_value(&mut self) -> ParseResult<Value> {
        self.expect_open("value")?;
        self.parse_value_inner()
    }

    /// Parses the contents of a `<value>` whose opening tag was already consumed, including the
    /// closing `</value>`.
    fn parse_value_inner(&mut self) -> ParseResult<Value> {
        // Whitespace before a type tag is layout; alone inside `<value>` it is the string.
        let event = match self.pull(true)? {
            XmlEvent::Whitespace(space) => match self.next()? {
                XmlEvent::EndElement { ref name } if is(name, "value") => {
                    return Ok(Value::String(space));
                }
                event => event,
            },
            event => event,
        };

        let name = match event {
            XmlEvent::StartElement { name, .. } => name,
            XmlEvent::Characters(text) => {
                self.expect_close("value")?;
                return Ok(Value::String(text));
            }
            XmlEvent::EndElement { ref name } if is(name, "value") => {
                return Ok(Value::String(String::new()));
            }
            _ => return self.expected("type tag or characters"),
        };

        let value = match &*name.local_name {
            _ if name.namespace.is_some() || name.prefix.is_some() => {
                return self.expected("valid type tag or characters");
            }
            "struct" => self.parse_struct()?,
            "array" => self.parse_array()?,
            "nil" => {
                self.expect_close("nil")?;
                Value::Nil
            }
            "string" => Value::String(self.text("string")?),
            "base64" => {
                let data = self.text("base64")?;
                match base64::decode(data.trim()) {
                    Ok(bytes) => Value::Base64(bytes),
                    Err(_) => return Err(self.invalid_value("base64", data)),
                }
            }
            "i4" | "int" => {
                let data = self.text(&name.local_name)?;
                match data.trim().parse::<i32>() {
                    Ok(i) => Value::Int(i),
                    Err(_) => return Err(self.invalid_value("integer", data)),
                }
            }
            "i8" => {
                let data = self.text("i8")?;
                match data.trim().parse::<i64>() {
                    Ok(i) => Value::Int64(i),
                    Err(_) => return Err(self.invalid_value("i8", data)),
                }
            }
            "boolean" => {
                let data = self.text("boolean")?;
                match data.trim() {
                    "0" => Value::Bool(false),
                    "1" => Value::Bool(true),
                    _ => return Err(self.invalid_value("boolean", data)),
                }
            }
            "double" => {
                let data = self.text("double")?;
                match data.trim().parse::<f64>() {
                    Ok(d) => Value::Double(d),
                    Err(_) => return Err(self.invalid_value("double", data)),
                }
            }
            "dateTime.iso8601" => {
                let data = self.text("dateTime.iso8601")?;
                match datetime(data.trim()) {
                    Ok(date_time) => Value::DateTime(date_time),
                    Err(_) => return Err(self.invalid_value("dateTime.iso8601", data)),
                }
            }
            _ => return self.expected("valid type tag or characters"),
        };

        self.expect_close("value")?;
        Ok(value)
    }

    fn parse_struct(&mut self) -> ParseResult<Value> {
        let mut members = BTreeMap::new();
        loop {
            match self.next()? {
                XmlEvent::EndElement { ref name } if is(name, "struct") => break,
                XmlEvent::StartElement { ref name, .. } if is(name, "member") => {
                    self.expect_open("name")?;
                    let member = self.text("name")?;
                    let value = self.parse_value()?;
                    self.expect_close("member")?;

                    members.insert(member, value);
                }
                _ => return self.expected("</struct> or <member>"),
            }
        }

        Ok(Value::Struct(members))
    }

    fn parse_array(&mut self) -> ParseResult<Value> {
        let mut elements = Vec::new();
        self.expect_open("data")?;
        loop {
            match self.next()? {
                XmlEvent::EndElement { ref name } if is(name, "data") => break,
                XmlEvent::StartElement { ref name, .. } if is(name, "value") => {
                    elements.push(self.parse_value_inner()?);
                }
                _ => return self.expected("</data> or <value>"),
            }
        }
        self.expect_close("array")?;

        Ok(Value::Array(elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_response(xml: &str) -> ParseResult<Response> {
        parse_response(&mut xml.as_bytes())
    }

    fn read_value(xml: &str) -> ParseResult<Value> {
        Parser::new(&mut xml.as_bytes()).parse_value()
    }

    fn fault_response(code: &str, string: &str) -> String {
        format!(r##"<?xml version="1.0"?>
<methodResponse>
   <fault>
      <value>
         <struct>
            <member>
               <name>faultCode</name>
               <value>{}</value>
            </member>
            <member>
               <name>faultString</name>
               <value>{}</value>
            </member>
         </struct>
      </value>
   </fault>
</methodResponse>"##, code, string)
    }

    #[test]
    fn parses_version_response() {
        let response = read_response(r##"<?xml version="1.0"?>
<methodResponse>
    <params>
        <param>
            <value>1.4.4</value>
        </param>
    </params>
</methodResponse>
"##).unwrap();

        assert_eq!(response, Ok(Value::String("1.4.4".into())));
    }

    #[test]
    fn parses_method_list_in_order() {
        let response = read_response(r##"<?xml version="1.0"?>
<methodResponse><params><param><value><array><data>
<value>main.get_version</value>
<value><string>system.listMethods</string></value>
<value>rig.get_vfo</value>
</data></array></value></param></params></methodResponse>"##).unwrap();

        assert_eq!(response, Ok(Value::Array(vec![
            Value::from("main.get_version"),
            Value::from("system.listMethods"),
            Value::from("rig.get_vfo"),
        ])));
    }

    #[test]
    fn parses_fault() {
        let response = read_response(&fault_response(
            "<int>-32601</int>",
            "<string>server error. requested method rig.nope does not exist</string>",
        )).unwrap();

        assert_eq!(response, Err(Fault::new(-32601, "server error. requested method rig.nope does not exist")));
    }

    #[test]
    fn rejects_invalid_faults() {
        assert!(read_response(&fault_response("<string>not an int</string>", "<string>x</string>")).is_err());
        assert!(read_response(&fault_response("<int>4</int>", "<base64>AAAA</base64>")).is_err());
    }

    #[test]
    fn parses_scalars() {
        assert_eq!(read_value("<value><i4>-7</i4></value>").unwrap(), Value::Int(-7));
        assert_eq!(read_value("<value><int>+1234</int></value>").unwrap(), Value::Int(1234));
        assert_eq!(read_value("<value><i8>-100100100100</i8></value>").unwrap(), Value::Int64(-100100100100));
        assert_eq!(read_value("<value><boolean>1</boolean></value>").unwrap(), Value::Bool(true));
        assert_eq!(read_value("<value><double>14074000.0</double></value>").unwrap(), Value::Double(14074000.0));
        assert_eq!(read_value("<value><base64>aGk=</base64></value>").unwrap(), Value::Base64(b"hi".to_vec()));
        assert_eq!(read_value("<value><nil/></value>").unwrap(), Value::Nil);
    }

    #[test]
    fn parses_date_values() {
        assert!(read_value("<value><dateTime.iso8601>2015-02-18T23:16:09Z</dateTime.iso8601></value>").is_ok());
        assert!(read_value("<value><dateTime.iso8601>19980717T14:08:55</dateTime.iso8601></value>").is_ok());
        assert!(read_value("<value><dateTime.iso8601>ILLEGAL VALUE :(</dateTime.iso8601></value>").is_err());
    }

    #[test]
    fn parses_structs() {
        let value = read_value(
            "<value><struct><member><name>mode</name><value>USB</value></member></struct></value>",
        ).unwrap();

        assert_eq!(value.as_struct().and_then(|m| m.get("mode")), Some(&Value::from("USB")));
    }

    #[test]
    fn keeps_whitespace_in_strings() {
        assert_eq!(read_value("<value><string>  padded  </string></value>").unwrap(),
            Value::String("  padded  ".into()));
    }

    #[test]
    fn keeps_whitespace_only_strings() {
        assert_eq!(read_value("<value><string>   </string></value>").unwrap(), Value::String("   ".into()));
        assert_eq!(read_value("<value>  </value>").unwrap(), Value::String("  ".into()));
        assert_eq!(read_value("<value>\n  <i4>5</i4>\n</value>").unwrap(), Value::Int(5));
    }

    #[test]
    fn keeps_whitespace_only_version() {
        let response = read_response(
            "<methodResponse>\n<params><param>\n<value><string> </string></value>\n</param></params>\n</methodResponse>",
        ).unwrap();

        assert_eq!(response, Ok(Value::String(" ".into())));
    }

    #[test]
    fn parses_empty_strings() {
        assert_eq!(read_value("<value><string></string></value>").unwrap(), Value::String(String::new()));
        assert_eq!(read_value("<value><string/></value>").unwrap(), Value::String(String::new()));
        assert_eq!(read_value("<value></value>").unwrap(), Value::String(String::new()));
    }

    #[test]
    fn unescapes_values() {
        assert_eq!(read_value("<value><string>abc&lt;abc&amp;abc</string></value>").unwrap(),
            Value::String("abc<abc&abc".into()));
    }

    #[test]
    fn rejects_attributes() {
        assert!(read_value(r#"<value name="ble">text</value>"#).is_err());
        assert!(read_value(r#"<value><int base="16">4</int></value>"#).is_err());
        assert!(read_response(r#"<methodResponse invalid="1"><params><param><value>x</value></param></params></methodResponse>"#).is_err());
    }

    #[test]
    fn rejects_unknown_types_and_bad_values() {
        match read_value("<value><int>bla</int></value>") {
            Err(ParseError::InvalidValue { for_type, ref found, .. }) => {
                assert_eq!(for_type, "integer");
                assert_eq!(found, "bla");
            }
            other => panic!("expected invalid value, got {:?}", other),
        }

        match read_value("<value><SURPRISE></SURPRISE></value>") {
            Err(ParseError::UnexpectedXml { .. }) => {}
            other => panic!("expected unexpected XML, got {:?}", other),
        }
    }

    #[test]
    fn rejects_html_error_pages() {
        assert!(read_response("<html><body>404</body></html>").is_err());
        assert!(read_response("").is_err());
    }
}
