//! Probe for XML-RPC rig-control daemons.
//!
//! `rigprobe` asks a rig-control daemon (for example flrig) for its version and the list of
//! methods it exposes, and prints both. It carries the small client-side [XML-RPC][spec] layer
//! needed to do that: request encoding, response parsing and an HTTP transport.
//!
//! [spec]: http://xmlrpc.scripting.com/spec.html

mod error;
mod fault;
mod parser;
mod request;
mod utils;
mod value;
pub mod transport;

#[cfg(feature = "http")]
pub mod client;
#[cfg(feature = "http")]
pub mod probe;

pub use error::{Error, ErrorClass, ErrorKind, ParseError};
pub use fault::Fault;
pub use parser::{parse_response, Response};
pub use request::Request;
pub use transport::Transport;
pub use value::Value;

#[cfg(feature = "http")]
pub use client::{Client, Endpoint};
#[cfg(feature = "http")]
pub use transport::http;
