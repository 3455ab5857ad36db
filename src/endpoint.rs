//! Endpoint table consumed by the flows, with the endpoint class as a first-class enum.
//!
//! The signing rules differ between the token-acquisition endpoints and every other
//! resource endpoint, so the distinction is carried explicitly instead of being inferred
//! from URL string comparisons.

// self
use crate::{_prelude::*, error::ConfigError};

/// Endpoint classes with distinct signing-key composition and signature-encoding rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndpointClass {
	/// Request-token, access-token, and bearer-token exchanges.
	///
	/// These sign with an empty token-secret component even when a token exists mid-flow,
	/// and the computed signature is percent-encoded once more before transmission.
	TokenAcquisition,
	/// Every other API call made with an issued token.
	Resource,
}

/// Validated endpoint table for one API.
///
/// `api_base` is always required; the OAuth 1.0a trio is required only for the
/// three-legged mode and the bearer endpoint only for the app-only mode. Which set is
/// present is checked when the corresponding flow is constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
	/// Base URL resource paths are joined onto; must end with `/` for relative joins.
	pub api_base: Url,
	/// OAuth 1.0a request-token endpoint.
	pub request_token: Option<Url>,
	/// User-facing authorize endpoint used as the redirect target.
	pub authorize: Option<Url>,
	/// OAuth 1.0a access-token endpoint.
	pub access_token: Option<Url>,
	/// OAuth 2.0 bearer-token endpoint.
	pub bearer_token: Option<Url>,
}
impl Endpoints {
	/// Creates a new builder rooted at the provided API base URL.
	pub fn builder(api_base: Url) -> EndpointsBuilder {
		EndpointsBuilder::new(api_base)
	}

	/// Resolves a resource path against the API base URL.
	pub fn resource_url(&self, path: &str) -> Result<Url, ConfigError> {
		self.api_base
			.join(path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidResourcePath { source })
	}

	pub(crate) fn require(
		endpoint: Option<&Url>,
		name: &'static str,
		mode: &'static str,
	) -> Result<Url, ConfigError> {
		endpoint.cloned().ok_or(ConfigError::MissingEndpoint { endpoint: name, mode })
	}
}

/// Builder for [`Endpoints`] values.
#[derive(Debug)]
pub struct EndpointsBuilder {
	api_base: Url,
	request_token: Option<Url>,
	authorize: Option<Url>,
	access_token: Option<Url>,
	bearer_token: Option<Url>,
}
impl EndpointsBuilder {
	fn new(api_base: Url) -> Self {
		Self {
			api_base,
			request_token: None,
			authorize: None,
			access_token: None,
			bearer_token: None,
		}
	}

	/// Sets the request-token endpoint.
	pub fn request_token(mut self, url: Url) -> Self {
		self.request_token = Some(url);

		self
	}

	/// Sets the authorize endpoint.
	pub fn authorize(mut self, url: Url) -> Self {
		self.authorize = Some(url);

		self
	}

	/// Sets the access-token endpoint.
	pub fn access_token(mut self, url: Url) -> Self {
		self.access_token = Some(url);

		self
	}

	/// Sets the bearer-token endpoint.
	pub fn bearer_token(mut self, url: Url) -> Self {
		self.bearer_token = Some(url);

		self
	}

	/// Consumes the builder and validates every configured URL.
	pub fn build(self) -> Result<Endpoints, ConfigError> {
		let endpoints = Endpoints {
			api_base: self.api_base,
			request_token: self.request_token,
			authorize: self.authorize,
			access_token: self.access_token,
			bearer_token: self.bearer_token,
		};

		validate_endpoint("api-base", &endpoints.api_base)?;

		for (name, url) in [
			("request-token", endpoints.request_token.as_ref()),
			("authorize", endpoints.authorize.as_ref()),
			("access-token", endpoints.access_token.as_ref()),
			("bearer-token", endpoints.bearer_token.as_ref()),
		] {
			if let Some(url) = url {
				validate_endpoint(name, url)?;
			}
		}

		Ok(endpoints)
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	if url.scheme() == "https" || is_loopback_host(url) {
		Ok(())
	} else {
		Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

// Plain HTTP is tolerated for loopback hosts only, so local mock servers work.
fn is_loopback_host(url: &Url) -> bool {
	matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("URL fixture should parse successfully.")
	}

	#[test]
	fn build_validates_https() {
		let err = Endpoints::builder(url("https://api.example.com/1.1/"))
			.request_token(url("http://api.example.com/oauth/request_token"))
			.build()
			.expect_err("Plain HTTP on a public host should be rejected.");

		assert!(matches!(err, ConfigError::InsecureEndpoint { endpoint: "request-token", .. }));
	}

	#[test]
	fn loopback_hosts_skip_the_https_requirement() {
		Endpoints::builder(url("http://127.0.0.1:8080/1.1/"))
			.bearer_token(url("http://127.0.0.1:8080/oauth2/token"))
			.build()
			.expect("Loopback endpoints should be accepted over plain HTTP.");
	}

	#[test]
	fn resource_urls_join_onto_the_base() {
		let endpoints = Endpoints::builder(url("https://api.example.com/1.1/"))
			.build()
			.expect("Endpoint table fixture should build successfully.");
		let resolved = endpoints
			.resource_url("statuses/update.json")
			.expect("Resource path should resolve against the base URL.");

		assert_eq!(resolved.as_str(), "https://api.example.com/1.1/statuses/update.json");

		let slashed = endpoints
			.resource_url("/statuses/update.json")
			.expect("Leading slashes should not escape the base path.");

		assert_eq!(slashed.as_str(), resolved.as_str());
	}

	#[test]
	fn missing_endpoints_are_reported_per_mode() {
		let endpoints = Endpoints::builder(url("https://api.example.com/1.1/"))
			.build()
			.expect("Endpoint table fixture should build successfully.");
		let err = Endpoints::require(endpoints.bearer_token.as_ref(), "bearer-token", "app_only")
			.expect_err("Absent endpoint should be reported.");

		assert!(matches!(
			err,
			ConfigError::MissingEndpoint { endpoint: "bearer-token", mode: "app_only" }
		));
	}
}
