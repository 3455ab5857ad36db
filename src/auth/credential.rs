//! Immutable consumer key/secret pair identifying the calling application.

// self
use crate::{_prelude::*, error::ConfigError};

/// Consumer credential issued when the application was registered with the API.
///
/// Created once at startup from caller-supplied configuration, never mutated, and shared
/// read-only by both auth flows.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	key: String,
	secret: String,
}
impl Credential {
	/// Validates and wraps a consumer key/secret pair.
	pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self, ConfigError> {
		let key = key.into();
		let secret = secret.into();

		if key.is_empty() {
			return Err(ConfigError::MissingConsumerField { field: "key" });
		}
		if secret.is_empty() {
			return Err(ConfigError::MissingConsumerField { field: "secret" });
		}

		Ok(Self { key, secret })
	}

	/// Returns the consumer key.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the consumer secret. Callers must avoid logging this string.
	pub fn secret(&self) -> &str {
		&self.secret
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("key", &self.key)
			.field("secret", &"<redacted>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_halves_are_rejected() {
		assert!(matches!(
			Credential::new("", "secret"),
			Err(ConfigError::MissingConsumerField { field: "key" })
		));
		assert!(matches!(
			Credential::new("key", ""),
			Err(ConfigError::MissingConsumerField { field: "secret" })
		));
	}

	#[test]
	fn debug_redacts_the_secret() {
		let credential =
			Credential::new("CK", "CS").expect("Credential fixture should be valid.");

		assert_eq!(format!("{credential:?}"), "Credential { key: \"CK\", secret: \"<redacted>\" }");
	}
}
