//! Three-legged OAuth 1.0a flow: request token, user authorization redirect, access token.
//!
//! The flow walks `Unauthorized → AwaitingUserCallback → Authorized`; the two pending
//! states of the handshake exist only for the duration of the corresponding HTTP call.
//! The redirect round trip is not managed here — the caller forwards the user to the
//! returned authorize URL and later supplies the callback's token and verifier as
//! explicit inputs.

// self
use crate::{
	_prelude::*,
	auth::{Credential, Token},
	endpoint::{EndpointClass, Endpoints},
	error::{AuthorizationError, ConfigError},
	flows::common,
	http::{HeaderLine, Transport, TransportRequest},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	signer::{self, HttpMethod, ParameterSet, SigningContext},
};

/// Redirect directive returned once a request token is obtained.
///
/// Control returns to the caller here; the engine does not consume the redirect itself.
#[derive(Clone, Debug)]
pub struct AuthorizationRedirect {
	/// Fully-formed authorize URL the caller should send the user to.
	pub redirect_url: Url,
	/// Request token awaiting user confirmation.
	pub request_token: String,
}

#[derive(Debug)]
enum ThreeLeggedState {
	/// No token material yet.
	Unauthorized,
	/// Request token issued; waiting for the callback's token + verifier.
	AwaitingUserCallback,
	/// Access token issued; the flow is terminal.
	Authorized(Token),
}

/// User-delegated OAuth 1.0a flow and per-request signer.
///
/// The issued token is written exactly once, under a write lock, so requests racing the
/// handshake either observe the finished token or fail with
/// [`Error::SigningPrecondition`] — never a partially constructed one.
pub struct ThreeLeggedOAuth<T> {
	credential: Credential,
	request_token_url: Url,
	authorize_url: Url,
	access_token_url: Url,
	transport: Arc<T>,
	user_agent: String,
	state: RwLock<ThreeLeggedState>,
}
impl<T> ThreeLeggedOAuth<T>
where
	T: Transport,
{
	/// Creates an unauthorized flow, validating that the endpoint trio is configured.
	pub fn new(
		credential: Credential,
		endpoints: &Endpoints,
		transport: Arc<T>,
		user_agent: impl Into<String>,
	) -> Result<Self, ConfigError> {
		const MODE: &str = "three_legged";

		Ok(Self {
			credential,
			request_token_url: Endpoints::require(
				endpoints.request_token.as_ref(),
				"request-token",
				MODE,
			)?,
			authorize_url: Endpoints::require(endpoints.authorize.as_ref(), "authorize", MODE)?,
			access_token_url: Endpoints::require(
				endpoints.access_token.as_ref(),
				"access-token",
				MODE,
			)?,
			transport,
			user_agent: user_agent.into(),
			state: RwLock::new(ThreeLeggedState::Unauthorized),
		})
	}

	/// Creates a flow that is already authorized with a pre-issued token pair.
	pub fn with_token(
		credential: Credential,
		endpoints: &Endpoints,
		transport: Arc<T>,
		user_agent: impl Into<String>,
		token: Token,
	) -> Result<Self, ConfigError> {
		if !matches!(token, Token::Pair { .. }) {
			return Err(ConfigError::MalformedToken {
				reason: "the three-legged flow requires an access-token/token-secret pair",
			});
		}

		let flow = Self::new(credential, endpoints, transport, user_agent)?;

		*flow.state.write() = ThreeLeggedState::Authorized(token);

		Ok(flow)
	}

	/// Obtains a request token and returns the authorize redirect directive.
	///
	/// The signed `oauth_*` set travels as the request-token endpoint's query string.
	/// An API error payload or a response without `oauth_token` is a hard failure.
	pub fn start_authorization(&self) -> Result<AuthorizationRedirect> {
		const KIND: FlowKind = FlowKind::RequestToken;

		let _guard = FlowSpan::new(KIND, "start_authorization").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.obtain_request_token();

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	fn obtain_request_token(&self) -> Result<AuthorizationRedirect> {
		let parameters = signer::oauth_parameter_block(
			self.credential.key(),
			&signer::nonce(),
			signer::timestamp(),
		);
		let ctx = SigningContext {
			method: HttpMethod::Get,
			base_url: self.request_token_url.as_str(),
			parameters: &parameters,
			consumer_secret: self.credential.secret(),
			token_secret: None,
			endpoint_class: EndpointClass::TokenAcquisition,
		};
		let signed = signer::signed_parameters(&ctx);
		// The signature is the only value that needs escaping and arrives pre-encoded, so
		// the query string is assembled from the raw pairs.
		let query = signed
			.iter()
			.map(|(name, value)| format!("{name}={value}"))
			.collect::<Vec<_>>()
			.join("&");
		let url = format!("{}?{}", self.request_token_url, query);
		let response = self.transport.execute(TransportRequest {
			method: HttpMethod::Get,
			url: &url,
			headers: &[],
			body: None,
		})?;

		if let Some(reason) = common::api_error_message(&response.body) {
			return Err(AuthorizationError::Denied { reason }.into());
		}

		let fields = common::split_form_response(&response.body);
		let request_token = fields
			.get("oauth_token")
			.ok_or(AuthorizationError::MissingField { field: "oauth_token" })?
			.clone();
		let mut redirect_url = self.authorize_url.clone();

		redirect_url.query_pairs_mut().append_pair("oauth_token", &request_token);

		*self.state.write() = ThreeLeggedState::AwaitingUserCallback;

		Ok(AuthorizationRedirect { redirect_url, request_token })
	}

	/// Exchanges the callback's token and verifier for an access token.
	///
	/// `oauth_token` joins the signed set; `oauth_verifier` travels only in the POST
	/// body. Any status other than 200 is a hard failure.
	pub fn complete_authorization(&self, oauth_token: &str, oauth_verifier: &str) -> Result<Token> {
		const KIND: FlowKind = FlowKind::AccessToken;

		let _guard = FlowSpan::new(KIND, "complete_authorization").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.obtain_access_token(oauth_token, oauth_verifier);

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	fn obtain_access_token(&self, oauth_token: &str, oauth_verifier: &str) -> Result<Token> {
		let mut parameters = signer::oauth_parameter_block(
			self.credential.key(),
			&signer::nonce(),
			signer::timestamp(),
		);

		parameters.insert("oauth_token", oauth_token);

		let ctx = SigningContext {
			method: HttpMethod::Post,
			base_url: self.access_token_url.as_str(),
			parameters: &parameters,
			consumer_secret: self.credential.secret(),
			// Mid-flow exchanges still sign with the empty token-secret component.
			token_secret: None,
			endpoint_class: EndpointClass::TokenAcquisition,
		};
		let signed = signer::signed_parameters(&ctx);
		let headers = common::standard_headers(
			&self.user_agent,
			oauth_authorization_value(&signed),
			common::CONTENT_TYPE_FORM,
		);
		let body = format!("oauth_verifier={}", signer::percent_encode(oauth_verifier));
		let response = self.transport.execute(TransportRequest {
			method: HttpMethod::Post,
			url: self.access_token_url.as_str(),
			headers: &headers,
			body: Some(&body),
		})?;

		if response.status != 200 {
			return Err(AuthorizationError::UnexpectedStatus {
				status: response.status,
				body: response.body,
			}
			.into());
		}

		let fields = common::split_form_response(&response.body);
		let public = fields
			.get("oauth_token")
			.ok_or(AuthorizationError::MissingField { field: "oauth_token" })?;
		let secret = fields
			.get("oauth_token_secret")
			.ok_or(AuthorizationError::MissingField { field: "oauth_token_secret" })?;
		let token = Token::pair(public, secret)?;

		*self.state.write() = ThreeLeggedState::Authorized(token.clone());

		Ok(token)
	}

	/// Signs a resource request and assembles its header block.
	///
	/// `base_url` must carry no query string; the caller keeps wire parameters separate.
	/// The full signed set — caller parameters, the `oauth_*` block, and the access
	/// token — lands in the `Authorization: OAuth …` line, each value escaped during
	/// header assembly.
	pub fn build_header(
		&self,
		method: HttpMethod,
		base_url: &str,
		parameters: &ParameterSet,
	) -> Result<Vec<HeaderLine>> {
		let state = self.state.read();
		let ThreeLeggedState::Authorized(token) = &*state else {
			return Err(Error::SigningPrecondition);
		};
		let (Some(public), Some(secret)) = (token.public(), token.secret()) else {
			return Err(Error::SigningPrecondition);
		};
		let mut signed_set = parameters.clone();

		signed_set.extend(&signer::oauth_parameter_block(
			self.credential.key(),
			&signer::nonce(),
			signer::timestamp(),
		));
		signed_set.insert("oauth_token", public);

		let ctx = SigningContext {
			method,
			base_url,
			parameters: &signed_set,
			consumer_secret: self.credential.secret(),
			token_secret: Some(secret),
			endpoint_class: EndpointClass::Resource,
		};
		let signed = signer::signed_parameters(&ctx);

		Ok(common::standard_headers(
			&self.user_agent,
			oauth_authorization_value(&signed),
			common::CONTENT_TYPE_FORM,
		))
	}

	/// Returns the issued token once the handshake has completed.
	pub fn current_token(&self) -> Option<Token> {
		match &*self.state.read() {
			ThreeLeggedState::Authorized(token) => Some(token.clone()),
			_ => None,
		}
	}
}
impl<T> Debug for ThreeLeggedOAuth<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ThreeLeggedOAuth")
			.field("credential", &self.credential)
			.field("request_token_url", &self.request_token_url.as_str())
			.field("access_token_url", &self.access_token_url.as_str())
			.finish()
	}
}

/// Renders the signed set as an `OAuth key="value", …` header value.
fn oauth_authorization_value(signed: &ParameterSet) -> String {
	let pairs = signed
		.iter()
		.map(|(name, value)| format!("{name}=\"{}\"", signer::percent_encode(value)))
		.collect::<Vec<_>>()
		.join(", ");

	format!("OAuth {pairs}")
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::VecDeque;
	// crates.io
	use parking_lot::Mutex;
	// self
	use super::*;
	use crate::{error::TransportError, http::TransportResponse};

	#[derive(Debug)]
	struct Recorded {
		method: HttpMethod,
		url: String,
		headers: Vec<HeaderLine>,
		body: Option<String>,
	}

	/// Transport stub that replays scripted responses and records every request.
	struct ScriptedTransport {
		responses: Mutex<VecDeque<TransportResponse>>,
		requests: Mutex<Vec<Recorded>>,
	}
	impl ScriptedTransport {
		fn replying(responses: impl IntoIterator<Item = (u16, &'static str)>) -> Self {
			Self {
				responses: Mutex::new(
					responses
						.into_iter()
						.map(|(status, body)| TransportResponse { status, body: body.into() })
						.collect(),
				),
				requests: Mutex::new(Vec::new()),
			}
		}

		fn recorded(&self) -> Vec<Recorded> {
			std::mem::take(&mut self.requests.lock())
		}
	}
	impl Transport for ScriptedTransport {
		fn execute(
			&self,
			request: TransportRequest<'_>,
		) -> Result<TransportResponse, TransportError> {
			self.requests.lock().push(Recorded {
				method: request.method,
				url: request.url.into(),
				headers: request.headers.to_vec(),
				body: request.body.map(Into::into),
			});

			self.responses
				.lock()
				.pop_front()
				.ok_or_else(|| TransportError::Io(std::io::Error::other("script exhausted")))
		}
	}

	fn fixture_flow(transport: Arc<ScriptedTransport>) -> ThreeLeggedOAuth<ScriptedTransport> {
		let credential =
			Credential::new("CK", "CS").expect("Credential fixture should be valid.");
		let url = |path: &str| {
			Url::parse(&format!("https://api.example.com{path}"))
				.expect("Endpoint fixture should parse successfully.")
		};
		let endpoints = Endpoints::builder(url("/1.1/"))
			.request_token(url("/oauth/request_token"))
			.authorize(url("/oauth/authorize"))
			.access_token(url("/oauth/access_token"))
			.build()
			.expect("Endpoint table fixture should build successfully.");

		ThreeLeggedOAuth::new(credential, &endpoints, transport, "demo-app")
			.expect("Flow fixture should build successfully.")
	}

	#[test]
	fn request_token_step_signs_the_query_string() {
		let transport = Arc::new(ScriptedTransport::replying([(
			200,
			"oauth_token=req-token&oauth_token_secret=req-secret&oauth_callback_confirmed=true",
		)]));
		let flow = fixture_flow(transport.clone());
		let redirect = flow
			.start_authorization()
			.expect("Request-token step should succeed against the scripted transport.");

		assert_eq!(redirect.request_token, "req-token");
		assert_eq!(
			redirect.redirect_url.as_str(),
			"https://api.example.com/oauth/authorize?oauth_token=req-token"
		);

		let recorded = transport.recorded();

		assert_eq!(recorded.len(), 1);
		assert_eq!(recorded[0].method, HttpMethod::Get);
		assert!(recorded[0].url.starts_with("https://api.example.com/oauth/request_token?"));

		for field in [
			"oauth_consumer_key=CK",
			"oauth_nonce=",
			"oauth_signature=",
			"oauth_signature_method=HMAC-SHA1",
			"oauth_timestamp=",
			"oauth_version=1.0",
		] {
			assert!(recorded[0].url.contains(field), "Query should carry `{field}`.");
		}
	}

	#[test]
	fn request_token_step_requires_oauth_token_in_the_response() {
		let transport =
			Arc::new(ScriptedTransport::replying([(200, "oauth_callback_confirmed=false")]));
		let flow = fixture_flow(transport);
		let err = flow
			.start_authorization()
			.expect_err("A response without oauth_token should be a hard failure.");

		assert!(matches!(
			err,
			Error::Authorization(AuthorizationError::MissingField { field: "oauth_token" })
		));
	}

	#[test]
	fn request_token_step_surfaces_api_error_payloads() {
		let transport = Arc::new(ScriptedTransport::replying([(
			200,
			"{\"errors\":[{\"message\":\"Invalid consumer key\",\"code\":32}]}",
		)]));
		let flow = fixture_flow(transport);
		let err = flow.start_authorization().expect_err("Error payloads should be surfaced.");

		assert!(matches!(
			err,
			Error::Authorization(AuthorizationError::Denied { reason }) if reason == "Invalid consumer key"
		));
	}

	#[test]
	fn access_token_step_posts_the_verifier_only_in_the_body() {
		let transport = Arc::new(ScriptedTransport::replying([(
			200,
			"oauth_token=AT&oauth_token_secret=ATS",
		)]));
		let flow = fixture_flow(transport.clone());
		let token = flow
			.complete_authorization("req-token", "the-verifier")
			.expect("Access-token exchange should succeed against the scripted transport.");

		assert_eq!(token.public(), Some("AT"));
		assert_eq!(token.secret(), Some("ATS"));
		assert!(flow.current_token().is_some());

		let recorded = transport.recorded();

		assert_eq!(recorded[0].method, HttpMethod::Post);
		assert_eq!(recorded[0].body.as_deref(), Some("oauth_verifier=the-verifier"));

		let authorization = recorded[0]
			.headers
			.iter()
			.find(|line| line.name == "Authorization")
			.expect("Header block should carry an Authorization line.");

		assert!(authorization.value.starts_with("OAuth "));
		assert!(authorization.value.contains("oauth_token=\"req-token\""));
		assert!(!authorization.value.contains("oauth_verifier"));
	}

	#[test]
	fn access_token_step_fails_on_non_200_statuses() {
		let transport = Arc::new(ScriptedTransport::replying([(401, "unauthorized")]));
		let flow = fixture_flow(transport);
		let err = flow
			.complete_authorization("req-token", "the-verifier")
			.expect_err("Non-200 exchange should be a hard failure.");

		assert!(matches!(
			err,
			Error::Authorization(AuthorizationError::UnexpectedStatus { status: 401, .. })
		));
		assert!(flow.current_token().is_none(), "No half-parsed token may be materialized.");
	}

	#[test]
	fn resource_signing_requires_an_issued_token() {
		let transport = Arc::new(ScriptedTransport::replying([]));
		let flow = fixture_flow(transport);
		let err = flow
			.build_header(HttpMethod::Get, "https://api.example.com/1.1/lookup", &ParameterSet::new())
			.expect_err("Signing before authorization should fail.");

		assert!(matches!(err, Error::SigningPrecondition));
	}

	#[test]
	fn resource_headers_carry_token_and_signature() {
		let transport = Arc::new(ScriptedTransport::replying([]));
		let credential =
			Credential::new("CK", "CS").expect("Credential fixture should be valid.");
		let url = |path: &str| {
			Url::parse(&format!("https://api.example.com{path}"))
				.expect("Endpoint fixture should parse successfully.")
		};
		let endpoints = Endpoints::builder(url("/1.1/"))
			.request_token(url("/oauth/request_token"))
			.authorize(url("/oauth/authorize"))
			.access_token(url("/oauth/access_token"))
			.build()
			.expect("Endpoint table fixture should build successfully.");
		let token = Token::pair("AT", "ATS").expect("Token pair fixture should be valid.");
		let flow =
			ThreeLeggedOAuth::with_token(credential, &endpoints, transport, "demo-app", token)
				.expect("Authorized flow fixture should build successfully.");
		let parameters = ParameterSet::new().with("count", "10");
		let headers = flow
			.build_header(HttpMethod::Get, "https://api.example.com/1.1/lookup", &parameters)
			.expect("Signing with an issued token should succeed.");
		let authorization = headers
			.iter()
			.find(|line| line.name == "Authorization")
			.expect("Header block should carry an Authorization line.");

		assert!(authorization.value.starts_with("OAuth "));
		assert!(authorization.value.contains("oauth_token=\"AT\""));
		assert!(authorization.value.contains("oauth_signature=\""));
		assert!(authorization.value.contains("count=\"10\""));

		let names = headers.iter().map(|line| line.name).collect::<Vec<_>>();

		assert_eq!(names, vec!["Accept", "User-Agent", "Authorization", "Content-Type"]);
	}
}
