//! Client-side OAuth handshake engine—HMAC-SHA1 request signing, three-legged delegation, and
//! app-only bearer tokens for token-based web APIs.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod signer;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credential,
		client::{Client, ClientConfig},
		endpoint::Endpoints,
		flows::AuthMode,
		http::ReqwestTransport,
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = Client<ReqwestTransport>;

	/// Consumer credential fixture shared across integration tests.
	pub fn test_credential() -> Credential {
		Credential::new("test-consumer-key", "test-consumer-secret")
			.expect("Consumer credential fixture should be valid.")
	}

	/// Builds an endpoint table rooted at a mock server's base URL.
	///
	/// Loopback hosts are exempt from the HTTPS requirement, so plain `httpmock` servers work.
	pub fn test_endpoints(base: &str) -> Endpoints {
		let parse = |path: &str| {
			Url::parse(&format!("{base}{path}")).expect("Mock endpoint URL should parse successfully.")
		};

		Endpoints::builder(parse("/1.1/"))
			.request_token(parse("/oauth/request_token"))
			.authorize(parse("/oauth/authorize"))
			.access_token(parse("/oauth/access_token"))
			.bearer_token(parse("/oauth2/token"))
			.build()
			.expect("Endpoint table fixture should build successfully.")
	}

	/// Constructs a [`Client`] in the requested auth mode against a mock server.
	pub fn build_test_client(base: &str, mode: AuthMode) -> ReqwestTestClient {
		let config = ClientConfig::new(test_credential(), test_endpoints(base), mode);

		Client::with_transport(config, ReqwestTransport::default())
			.expect("Test client should build successfully.")
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")] pub use reqwest::blocking::Client as ReqwestClient;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, oauth_handshake as _};
