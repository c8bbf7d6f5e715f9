//! Blocking client for a rig-control daemon's XML-RPC interface.

use crate::error::{Error, ErrorKind};
use crate::{Request, Value};

use log::{debug, info};
use reqwest::Url;

use std::fmt::{self, Display, Formatter};

/// Host flrig listens on unless told otherwise.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// flrig's default XML-RPC port. Edit this for daemons configured differently.
pub const DEFAULT_PORT: u16 = 12345;

/// Where the daemon listens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl Endpoint {
    pub fn new<H: Into<String>>(host: H, port: u16) -> Self {
        Endpoint {
            host: host.into(),
            port,
        }
    }

    /// The URL requests are POSTed to.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A client bound to one endpoint.
///
/// XML-RPC over HTTP has no session, so creating a client does not touch the network; an
/// unreachable daemon is reported by the first call.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::blocking::Client,
    url: Url,
}

impl Client {
    /// Binds a client to `http://{host}:{port}`.
    ///
    /// # Errors
    ///
    /// Fails with `ErrorKind::InvalidEndpoint` if host and port do not form a valid URL.
    pub fn connect(endpoint: &Endpoint) -> Result<Self, Error> {
        let url = endpoint.url();
        let url = Url::parse(&url).map_err(|_| ErrorKind::InvalidEndpoint(url))?;
        info!("using XML-RPC endpoint {}", url);

        // The daemon is local; system proxy settings must not reroute the calls.
        let http = reqwest::blocking::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| ErrorKind::TransportError(Box::new(e)))?;

        Ok(Client { http, url })
    }

    /// The URL this client posts to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Calls `method` with `args` and returns the result.
    pub fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, Error> {
        let request = args.into_iter().fold(Request::new(method), Request::arg);
        request.call(self.http.post(self.url.clone()))
    }

    /// Calls a method that takes no arguments and returns a string.
    pub fn call_string(&self, method: &str) -> Result<String, Error> {
        match self.call(method, Vec::new())? {
            Value::String(s) => Ok(s),
            found => Err(unexpected(method, "string", found)),
        }
    }

    /// `main.get_version`: the daemon's version string.
    pub fn get_version(&self) -> Result<String, Error> {
        let version = self.call_string("main.get_version")?;
        debug!("server version {}", version);
        Ok(version)
    }

    /// `system.listMethods`: the method names the daemon advertises, in the order it sent them.
    pub fn list_methods(&self) -> Result<Vec<String>, Error> {
        const METHOD: &str = "system.listMethods";

        let value = self.call(METHOD, Vec::new())?;
        let names = match value {
            Value::Array(ref values) => values
                .iter()
                .map(|v| v.as_str().map(String::from))
                .collect::<Option<Vec<_>>>(),
            _ => None,
        };

        match names {
            Some(names) => {
                debug!("server advertises {} methods", names.len());
                Ok(names)
            }
            None => Err(unexpected(METHOD, "array of strings", value)),
        }
    }
}

fn unexpected(method: &str, expected: &'static str, found: Value) -> Error {
    ErrorKind::UnexpectedType {
        method: method.to_string(),
        expected,
        found,
    }
    .into()
}
