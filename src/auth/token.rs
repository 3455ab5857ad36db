//! Issued token variants and the redacting secret wrapper.

// self
use crate::{_prelude::*, error::ConfigError};

/// Redacted secret string keeping issued token material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Credential issued by a successful authorization.
///
/// Constructed exactly once per handshake and immutable thereafter. The flow that created
/// the token owns it; the facade only ever sees clones or references.
#[derive(Clone, PartialEq, Eq)]
pub enum Token {
	/// Access-token/token-secret pair issued by the three-legged flow.
	Pair {
		/// Public token half, sent as `oauth_token` with every signed request.
		public: String,
		/// Secret half, mixed into the signing key and never transmitted.
		secret: TokenSecret,
	},
	/// Opaque bearer string issued by the app-only flow.
	Bearer(TokenSecret),
}
impl Token {
	/// Builds a three-legged token pair, rejecting empty halves.
	pub fn pair(
		public: impl Into<String>,
		secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let public = public.into();
		let secret = secret.into();

		if public.is_empty() {
			return Err(ConfigError::MalformedToken { reason: "access token must not be empty" });
		}
		if secret.is_empty() {
			return Err(ConfigError::MalformedToken { reason: "token secret must not be empty" });
		}

		Ok(Self::Pair { public, secret: TokenSecret::new(secret) })
	}

	/// Builds an app-only bearer token, rejecting empty values.
	pub fn bearer(value: impl Into<String>) -> Result<Self, ConfigError> {
		let value = value.into();

		if value.is_empty() {
			return Err(ConfigError::MalformedToken { reason: "bearer token must not be empty" });
		}

		Ok(Self::Bearer(TokenSecret::new(value)))
	}

	/// Returns the public half of a token pair.
	pub fn public(&self) -> Option<&str> {
		match self {
			Self::Pair { public, .. } => Some(public),
			Self::Bearer(_) => None,
		}
	}

	/// Returns the secret half of a token pair, the half that feeds the signing key.
	pub fn secret(&self) -> Option<&str> {
		match self {
			Self::Pair { secret, .. } => Some(secret.expose()),
			Self::Bearer(_) => None,
		}
	}

	/// Returns the bearer value of an app-only token.
	pub fn bearer_value(&self) -> Option<&str> {
		match self {
			Self::Pair { .. } => None,
			Self::Bearer(value) => Some(value.expose()),
		}
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Pair { public, .. } => f
				.debug_struct("Token::Pair")
				.field("public", public)
				.field("secret", &"<redacted>")
				.finish(),
			Self::Bearer(_) => f.debug_tuple("Token::Bearer").field(&"<redacted>").finish(),
		}
	}
}
