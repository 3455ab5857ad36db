//! Token-acquisition state machines and the authenticator dispatch that selects between
//! them.

pub mod common;
pub mod three_legged;
pub mod two_legged;

pub use common::split_form_response;
pub use three_legged::*;
pub use two_legged::*;

// self
use crate::{
	_prelude::*,
	auth::Token,
	http::{HeaderLine, Transport},
	signer::{HttpMethod, ParameterSet},
};

/// Authentication mode, fixed when the client is constructed and never switched at
/// runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
	/// Three-legged, user-delegated OAuth 1.0a.
	ThreeLegged,
	/// Two-legged, application-only bearer tokens.
	AppOnly,
}
impl AuthMode {
	/// Returns a stable label for diagnostics and error messages.
	pub fn as_str(self) -> &'static str {
		match self {
			AuthMode::ThreeLegged => "three_legged",
			AuthMode::AppOnly => "app_only",
		}
	}
}
impl Display for AuthMode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Selected auth flow behind the common authorize/build-header/current-token capability.
///
/// No state is shared between the variants beyond the credential and transport handles
/// passed in at construction.
#[derive(Debug)]
pub enum Authenticator<T> {
	/// User-delegated OAuth 1.0a flow.
	ThreeLegged(ThreeLeggedOAuth<T>),
	/// Application-only bearer flow.
	AppOnly(TwoLeggedOAuth<T>),
}
impl<T> Authenticator<T> {
	/// Returns the mode this authenticator was constructed for.
	pub fn mode(&self) -> AuthMode {
		match self {
			Authenticator::ThreeLegged(_) => AuthMode::ThreeLegged,
			Authenticator::AppOnly(_) => AuthMode::AppOnly,
		}
	}
}
impl<T> Authenticator<T>
where
	T: Transport,
{
	/// Returns the issued token once the selected flow has authorized.
	pub fn current_token(&self) -> Option<Token> {
		match self {
			Authenticator::ThreeLegged(flow) => flow.current_token(),
			Authenticator::AppOnly(flow) => flow.current_token(),
		}
	}

	/// Signs a resource request and returns its header block.
	///
	/// Three-legged clients sign `parameters` into the OAuth header; app-only clients
	/// attach the bearer token and ignore the parameter set.
	pub fn build_header(
		&self,
		method: HttpMethod,
		base_url: &str,
		parameters: &ParameterSet,
	) -> Result<Vec<HeaderLine>> {
		match self {
			Authenticator::ThreeLegged(flow) => flow.build_header(method, base_url, parameters),
			Authenticator::AppOnly(flow) => flow.build_header(true),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn mode_labels_are_stable() {
		assert_eq!(AuthMode::ThreeLegged.as_str(), "three_legged");
		assert_eq!(AuthMode::AppOnly.as_str(), "app_only");
	}

	#[test]
	fn mode_serializes_snake_case() {
		assert_eq!(
			serde_json::to_string(&AuthMode::AppOnly).expect("AuthMode should serialize."),
			"\"app_only\""
		);
		assert_eq!(
			serde_json::from_str::<AuthMode>("\"three_legged\"")
				.expect("AuthMode should deserialize."),
			AuthMode::ThreeLegged
		);
	}
}
