use crate::Request;

use std::error::Error;
use std::io::Read;

/// Sends a [`Request`] and hands back the raw response body.
///
/// [`Request::call`] drives a `Transport` and parses what it returns. The HTTP implementation for
/// reqwest's blocking `RequestBuilder` lives in the [`http`] module; tests implement this trait
/// with canned bodies.
pub trait Transport {
    /// The response body.
    type Stream: Read;

    /// Transmits `request` and returns the server's response body, which must be UTF-8 XML.
    ///
    /// # Errors
    ///
    /// Any failure to deliver the request or to obtain a successful response is returned as a
    /// boxed error and surfaces as `ErrorKind::TransportError`.
    fn transmit(self, request: &Request) -> Result<Self::Stream, Box<dyn Error + Send + Sync>>;
}

/// XML-RPC over HTTP POST, using reqwest's blocking client.
///
/// This module is only available with the `http` feature (on by default).
#[cfg(feature = "http")]
pub mod http {
    use crate::{Request, Transport};

    use log::trace;
    use mime::Mime;
    use reqwest::blocking::{RequestBuilder, Response};
    use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};

    use std::error::Error;

    /// Value of the `User-Agent` header sent with every call.
    pub const USER_AGENT_STRING: &str = concat!("rigprobe/", env!("CARGO_PKG_VERSION"));

    /// Adds the headers XML-RPC requires:
    ///
    /// ```notrust
    /// User-Agent: rigprobe/<version>
    /// Content-Type: text/xml; charset=utf-8
    /// Content-Length: $body_len
    /// ```
    ///
    /// `Host` is added by reqwest.
    pub fn build_headers(builder: RequestBuilder, body_len: u64) -> RequestBuilder {
        builder
            .header(USER_AGENT, USER_AGENT_STRING)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header(CONTENT_LENGTH, body_len)
    }

    /// Checks that `response` has a success status and, if it declares a `Content-Type`, that it is
    /// `text/xml`.
    pub fn check_response(response: &Response) -> Result<(), Box<dyn Error + Send + Sync>> {
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(format!("server response indicates error: {}", status).into());
        }

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let mime: Mime = content_type.to_str()?.parse()?;
            if mime.type_() != mime::TEXT || mime.subtype() != mime::XML {
                return Err(format!("expected Content-Type 'text/xml', got '{}'", mime).into());
            }
        }

        Ok(())
    }

    /// POSTs the request body with the headers from [`build_headers`] and checks the response
    /// with [`check_response`].
    impl Transport for RequestBuilder {
        type Stream = Response;

        fn transmit(self, request: &Request) -> Result<Self::Stream, Box<dyn Error + Send + Sync>> {
            let mut body = Vec::new();
            request.write_as_xml(&mut body)?;
            trace!("request body: {}", String::from_utf8_lossy(&body));

            let response = build_headers(self, body.len() as u64)
                .body(body)
                .send()?;

            check_response(&response)?;

            Ok(response)
        }
    }
}
