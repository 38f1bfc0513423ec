//! Connect request construction and validation.

use http::{HeaderName, HeaderValue, header};
use tokio_tungstenite::tungstenite::{client::IntoClientRequest, handshake::client::Request};

use crate::error::InvalidRequest;

/// Parameters for a single outbound connection attempt.
///
/// Immutable once built; consumed by the launcher. The `Origin` header is
/// carried separately from the extra headers because every upgrade request
/// in a browser-equivalent test sends one.
///
/// # Examples
///
/// ```
/// use wsprobe::ConnectRequest;
///
/// let request = ConnectRequest::new("wss://echo.example/socket")
///     .origin("http://test.local")
///     .header("Authorization", "Bearer token");
/// assert_eq!(request.url(), "wss://echo.example/socket");
/// ```
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    url: String,
    origin: String,
    headers: Vec<(String, String)>,
}

impl ConnectRequest {
    /// Create a request targeting `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            origin: String::new(),
            headers: Vec::new(),
        }
    }

    /// Set the `Origin` header sent during the handshake.
    ///
    /// An empty origin omits the header entirely.
    #[must_use]
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Add an extra header for the handshake.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The target URL.
    #[must_use]
    pub fn url(&self) -> &str { &self.url }

    /// Convert the request into a handshake request for the transport.
    ///
    /// Validation is complete once this returns: a malformed URL, a
    /// non-WebSocket scheme, a missing host, or an invalid header all fail
    /// here, before any network I/O.
    pub(crate) fn into_handshake(self) -> Result<Request, InvalidRequest> {
        let mut request =
            self.url
                .as_str()
                .into_client_request()
                .map_err(|source| InvalidRequest::Url {
                    url: self.url.clone(),
                    source,
                })?;

        match request.uri().scheme_str() {
            Some("ws" | "wss") => {}
            _ => return Err(InvalidRequest::Scheme { url: self.url }),
        }

        let headers = request.headers_mut();
        if !self.origin.is_empty() {
            headers.insert(header::ORIGIN, header_value("Origin", &self.origin)?);
        }
        for (name, value) in &self.headers {
            let header_name =
                HeaderName::try_from(name.as_str()).map_err(|source| InvalidRequest::Header {
                    name: name.clone(),
                    source: source.into(),
                })?;
            headers.insert(header_name, header_value(name, value)?);
        }

        Ok(request)
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, InvalidRequest> {
    HeaderValue::try_from(value).map_err(|source| InvalidRequest::Header {
        name: name.to_owned(),
        source: source.into(),
    })
}
