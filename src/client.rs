//! Facade wiring the credential, the selected auth flow, and the transport into request
//! verbs.

// self
use crate::{
	_prelude::*,
	auth::{Credential, Token},
	endpoint::Endpoints,
	error::ConfigError,
	flows::{
		AuthMode, Authenticator, AuthorizationRedirect, ThreeLeggedOAuth, TwoLeggedOAuth, common,
	},
	http::{Transport, TransportRequest},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	signer::{HttpMethod, ParameterSet},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

const DEFAULT_APP_NAME: &str = "oauth-handshake";

/// Configuration surface consumed when constructing a [`Client`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Consumer credential identifying the application.
	pub credential: Credential,
	/// Endpoint table for the target API.
	pub endpoints: Endpoints,
	/// Selected authentication mode.
	pub auth_mode: AuthMode,
	/// Pre-issued token matching the mode, skipping the handshake entirely.
	pub token: Option<Token>,
	/// Product string sent as `User-Agent` with every request.
	pub app_name: String,
}
impl ClientConfig {
	/// Creates a configuration with the default app name and no pre-issued token.
	pub fn new(credential: Credential, endpoints: Endpoints, auth_mode: AuthMode) -> Self {
		Self { credential, endpoints, auth_mode, token: None, app_name: DEFAULT_APP_NAME.into() }
	}

	/// Attaches a pre-issued token (an access-token pair or a bearer string).
	pub fn with_token(mut self, token: Token) -> Self {
		self.token = Some(token);

		self
	}

	/// Overrides the `User-Agent` product string.
	pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
		self.app_name = app_name.into();

		self
	}
}

/// Facade over one authenticated API session.
///
/// Holds exactly one [`Authenticator`] variant, fixed at construction. Resource requests
/// ask it for a signed header block and hand method, URL, headers, and body to the
/// transport.
pub struct Client<T> {
	authenticator: Authenticator<T>,
	transport: Arc<T>,
	endpoints: Endpoints,
}
impl<T> Client<T>
where
	T: Transport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
		let transport = Arc::new(transport);
		let ClientConfig { credential, endpoints, auth_mode, token, app_name } = config;
		let authenticator = match auth_mode {
			AuthMode::ThreeLegged => Authenticator::ThreeLegged(match token {
				Some(token) => ThreeLeggedOAuth::with_token(
					credential,
					&endpoints,
					transport.clone(),
					&app_name,
					token,
				)?,
				None =>
					ThreeLeggedOAuth::new(credential, &endpoints, transport.clone(), &app_name)?,
			}),
			AuthMode::AppOnly => Authenticator::AppOnly(match token {
				Some(token) => TwoLeggedOAuth::with_token(
					credential,
					&endpoints,
					transport.clone(),
					&app_name,
					token,
				)?,
				None => TwoLeggedOAuth::new(credential, &endpoints, transport.clone(), &app_name)?,
			}),
		};

		Ok(Self { authenticator, transport, endpoints })
	}

	/// Returns the mode this client was constructed for.
	pub fn auth_mode(&self) -> AuthMode {
		self.authenticator.mode()
	}

	/// Returns the issued token once the selected flow has authorized.
	pub fn current_token(&self) -> Option<Token> {
		self.authenticator.current_token()
	}

	/// Starts the three-legged handshake; see
	/// [`ThreeLeggedOAuth::start_authorization`].
	pub fn start_authorization(&self) -> Result<AuthorizationRedirect> {
		match &self.authenticator {
			Authenticator::ThreeLegged(flow) => flow.start_authorization(),
			Authenticator::AppOnly(_) => Err(ConfigError::UnsupportedMode {
				operation: "start_authorization",
				mode: self.auth_mode().as_str(),
			}
			.into()),
		}
	}

	/// Completes the three-legged handshake with the callback's token and verifier; see
	/// [`ThreeLeggedOAuth::complete_authorization`].
	pub fn complete_authorization(&self, oauth_token: &str, oauth_verifier: &str) -> Result<Token> {
		match &self.authenticator {
			Authenticator::ThreeLegged(flow) =>
				flow.complete_authorization(oauth_token, oauth_verifier),
			Authenticator::AppOnly(_) => Err(ConfigError::UnsupportedMode {
				operation: "complete_authorization",
				mode: self.auth_mode().as_str(),
			}
			.into()),
		}
	}

	/// Obtains an app-only bearer token; see [`TwoLeggedOAuth::obtain_bearer_token`].
	pub fn obtain_bearer_token(&self) -> Result<Token> {
		match &self.authenticator {
			Authenticator::AppOnly(flow) => flow.obtain_bearer_token(),
			Authenticator::ThreeLegged(_) => Err(ConfigError::UnsupportedMode {
				operation: "obtain_bearer_token",
				mode: self.auth_mode().as_str(),
			}
			.into()),
		}
	}

	/// Sends a signed GET request for the given resource path.
	pub fn get(&self, path: &str, parameters: &ParameterSet) -> Result<ApiResponse> {
		self.request(HttpMethod::Get, path, parameters)
	}

	/// Sends a signed POST request for the given resource path.
	pub fn post(&self, path: &str, parameters: &ParameterSet) -> Result<ApiResponse> {
		self.request(HttpMethod::Post, path, parameters)
	}

	/// Signs and dispatches one resource request.
	///
	/// GET parameters travel percent-encoded in the query string, POST parameters
	/// form-encoded in the body. `oauth_token` never reaches either — it travels only
	/// inside the signed Authorization header. `path` must not carry its own query
	/// string.
	pub fn request(
		&self,
		method: HttpMethod,
		path: &str,
		parameters: &ParameterSet,
	) -> Result<ApiResponse> {
		const KIND: FlowKind = FlowKind::Resource;

		let _guard = FlowSpan::new(KIND, "request").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.dispatch(method, path, parameters);

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	fn dispatch(
		&self,
		method: HttpMethod,
		path: &str,
		parameters: &ParameterSet,
	) -> Result<ApiResponse> {
		let mut base_url = self.endpoints.resource_url(path)?;

		base_url.set_query(None);

		// The token travels only in the signed header set.
		let wire_parameters = parameters
			.iter()
			.filter(|(name, _)| *name != "oauth_token")
			.collect::<ParameterSet>();
		let headers = self.authenticator.build_header(method, base_url.as_str(), &wire_parameters)?;
		let encoded = common::form_encode(&wire_parameters);
		let (url, body) = match method {
			HttpMethod::Get if encoded.is_empty() => (base_url.to_string(), None),
			HttpMethod::Get => (format!("{base_url}?{encoded}"), None),
			HttpMethod::Post => (base_url.to_string(), Some(encoded)),
		};
		let response = self.transport.execute(TransportRequest {
			method,
			url: &url,
			headers: &headers,
			body: body.as_deref(),
		})?;

		Ok(ApiResponse { status: response.status, body: response.body })
	}
}
impl<T> Debug for Client<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("auth_mode", &self.authenticator.mode().as_str())
			.field("api_base", &self.endpoints.api_base.as_str())
			.finish()
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Creates a client with the crate's default blocking reqwest transport.
	pub fn new(config: ClientConfig) -> Result<Self> {
		Self::with_transport(config, ReqwestTransport::default())
	}
}

/// Raw status/body pair returned by resource requests.
///
/// Response decoding stays a thin, caller-driven facility: the engine never interprets
/// resource bodies itself.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: String,
}
impl ApiResponse {
	/// Returns true for 2xx status codes.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Decodes the body as JSON, reporting the failing path on mismatch.
	pub fn json<D>(&self) -> Result<D, serde_path_to_error::Error<serde_json::Error>>
	where
		D: for<'de> Deserialize<'de>,
	{
		let mut deserializer = serde_json::Deserializer::from_str(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_responses_decode_json_with_paths() {
		#[derive(Debug, Deserialize, PartialEq)]
		struct Payload {
			id: u64,
		}

		let response = ApiResponse { status: 200, body: "{\"id\":7}".into() };

		assert!(response.is_success());
		assert_eq!(
			response.json::<Payload>().expect("Valid JSON should decode."),
			Payload { id: 7 }
		);

		let broken = ApiResponse { status: 200, body: "{\"id\":\"seven\"}".into() };
		let err = broken.json::<Payload>().expect_err("Type mismatch should fail.");

		assert_eq!(err.path().to_string(), "id");
	}
}
