//! Engine-level error types shared across the signer, flows, and facade.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical engine error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// A token-acquisition endpoint rejected or aborted the handshake.
	#[error(transparent)]
	Authorization(#[from] AuthorizationError),
	/// Transport failure (DNS, TCP, TLS); propagated uninterpreted.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// A resource request was signed before any token was issued.
	#[error("No token has been issued; complete an authorization flow before signing requests.")]
	SigningPrecondition,
}

/// Configuration and validation failures raised while wiring the engine.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Consumer key or secret was missing or empty.
	#[error("Consumer {field} must not be empty.")]
	MissingConsumerField {
		/// Which half of the credential failed validation.
		field: &'static str,
	},
	/// Pre-supplied token material is incomplete or of the wrong variant.
	#[error("Pre-issued token is malformed: {reason}.")]
	MalformedToken {
		/// Human-readable validation failure.
		reason: &'static str,
	},
	/// An endpoint required by the selected auth mode was not configured.
	#[error("The {endpoint} endpoint is required for the {mode} auth mode.")]
	MissingEndpoint {
		/// Endpoint label (request-token, access-token, ...).
		endpoint: &'static str,
		/// Auth mode label.
		mode: &'static str,
	},
	/// An operation was invoked on a client built for the other auth mode.
	#[error("The {operation} operation is not available in the {mode} auth mode.")]
	UnsupportedMode {
		/// Operation label.
		operation: &'static str,
		/// Auth mode label the client was built with.
		mode: &'static str,
	},
	/// Endpoint URL failed the HTTPS requirement.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A resource path could not be joined onto the API base URL.
	#[error("Resource path cannot be resolved against the API base URL.")]
	InvalidResourcePath {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Hard failures reported by the token-acquisition endpoints.
///
/// Every variant is terminal for the current handshake attempt; the engine never retries and
/// never materializes a half-parsed token.
#[derive(Debug, ThisError)]
pub enum AuthorizationError {
	/// The endpoint returned an API-level error payload.
	#[error("Authorization failed: {reason}.")]
	Denied {
		/// Message carried by the first entry of the error payload.
		reason: String,
	},
	/// A token-exchange response was missing a required field.
	#[error("Token response is missing the `{field}` field.")]
	MissingField {
		/// Field name absent from the response.
		field: &'static str,
	},
	/// A token exchange finished with a non-success HTTP status.
	#[error("Token exchange returned HTTP status {status}.")]
	UnexpectedStatus {
		/// Status code reported by the transport.
		status: u16,
		/// Raw response body, for caller-side diagnosis.
		body: String,
	},
	/// The bearer exchange reported a token type other than `bearer`.
	#[error("Bearer exchange returned unsupported token type `{token_type}`.")]
	UnsupportedTokenType {
		/// Token type string returned by the endpoint.
		token_type: String,
	},
	/// The bearer endpoint returned malformed JSON.
	#[error("Bearer endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while executing the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while executing the request.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
	fn from(e: reqwest::Error) -> Self {
		Self::network(e)
	}
}
