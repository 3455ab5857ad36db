//! Blocking transport primitives executing the engine's HTTP requests.
//!
//! The [`Transport`] trait is the engine's only dependency on an HTTP stack. Every call
//! suspends the caller until the response arrives; connect/read timeouts belong to the
//! transport implementation, not to this crate.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError, signer::HttpMethod};

/// Single `Name: value` header line.
///
/// Header blocks preserve their construction order; the flows emit `Accept`,
/// `User-Agent`, `Authorization`, `Content-Type` in that order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderLine {
	/// Header name.
	pub name: &'static str,
	/// Header value.
	pub value: String,
}
impl HeaderLine {
	/// Creates a new header line.
	pub fn new(name: &'static str, value: impl Into<String>) -> Self {
		Self { name, value: value.into() }
	}
}
impl Display for HeaderLine {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}: {}", self.name, self.value)
	}
}

/// Outbound request handed to the transport.
#[derive(Clone, Debug)]
pub struct TransportRequest<'a> {
	/// HTTP method to execute.
	pub method: HttpMethod,
	/// Full request URL, query string included.
	pub url: &'a str,
	/// Ordered header block.
	pub headers: &'a [HeaderLine],
	/// Form-encoded body, for POST requests.
	pub body: Option<&'a str>,
}

/// Status code and raw body returned by the transport.
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body, uninterpreted.
	pub body: String,
}
impl TransportResponse {
	/// Returns true for 2xx status codes.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over blocking HTTP stacks capable of executing the engine's requests.
///
/// Implementations return the status code and body verbatim; interpreting either is the
/// engine's job. Failures surface as [`TransportError`] and are never retried here.
pub trait Transport
where
	Self: 'static + Send + Sync,
{
	/// Executes the request and returns status and body without interpreting either.
	fn execute(&self, request: TransportRequest<'_>) -> Result<TransportResponse, TransportError>;
}

/// Thin wrapper around reqwest's blocking client so shared HTTP behavior lives in one
/// place. Token endpoints return results directly instead of delegating to another URI,
/// so configure any custom client to disable redirect following.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing blocking [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestTransport {
	fn execute(&self, request: TransportRequest<'_>) -> Result<TransportResponse, TransportError> {
		let mut builder = match request.method {
			HttpMethod::Get => self.0.get(request.url),
			HttpMethod::Post => self.0.post(request.url),
		};

		for line in request.headers {
			builder = builder.header(line.name, line.value.as_str());
		}
		if let Some(body) = request.body {
			builder = builder.body(body.to_owned());
		}

		let response = builder.send().map_err(TransportError::from)?;
		let status = response.status().as_u16();
		let body = response.text().map_err(TransportError::from)?;

		Ok(TransportResponse { status, body })
	}
}
