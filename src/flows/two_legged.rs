//! Application-only OAuth 2.0 bearer flow.
//!
//! Plain client-credentials: no HMAC signing is involved. The flow walks
//! `Unauthorized → Authorized` with a single POST to the bearer-token endpoint,
//! authenticated by Basic credentials derived from the consumer pair.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
// self
use crate::{
	_prelude::*,
	auth::{Credential, Token},
	endpoint::Endpoints,
	error::{AuthorizationError, ConfigError},
	flows::common,
	http::{HeaderLine, Transport, TransportRequest},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	signer::{HttpMethod, percent_encode},
};

/// Bearer-token endpoint response: `{"token_type": "bearer", "access_token": …}`.
#[derive(Debug, Deserialize)]
struct BearerTokenResponse {
	token_type: String,
	access_token: String,
}

#[derive(Debug)]
enum TwoLeggedState {
	/// No bearer token yet.
	Unauthorized,
	/// Bearer token issued; the flow is terminal.
	Authorized(Token),
}

/// Application-only bearer flow and per-request header builder.
pub struct TwoLeggedOAuth<T> {
	credential: Credential,
	bearer_token_url: Url,
	transport: Arc<T>,
	user_agent: String,
	state: RwLock<TwoLeggedState>,
}
impl<T> TwoLeggedOAuth<T>
where
	T: Transport,
{
	/// Creates an unauthorized flow, validating that the bearer endpoint is configured.
	pub fn new(
		credential: Credential,
		endpoints: &Endpoints,
		transport: Arc<T>,
		user_agent: impl Into<String>,
	) -> Result<Self, ConfigError> {
		Ok(Self {
			credential,
			bearer_token_url: Endpoints::require(
				endpoints.bearer_token.as_ref(),
				"bearer-token",
				"app_only",
			)?,
			transport,
			user_agent: user_agent.into(),
			state: RwLock::new(TwoLeggedState::Unauthorized),
		})
	}

	/// Creates a flow that is already authorized with a pre-issued bearer token.
	pub fn with_token(
		credential: Credential,
		endpoints: &Endpoints,
		transport: Arc<T>,
		user_agent: impl Into<String>,
		token: Token,
	) -> Result<Self, ConfigError> {
		if !matches!(token, Token::Bearer(_)) {
			return Err(ConfigError::MalformedToken {
				reason: "the app-only flow requires a bearer token",
			});
		}

		let flow = Self::new(credential, endpoints, transport, user_agent)?;

		*flow.state.write() = TwoLeggedState::Authorized(token);

		Ok(flow)
	}

	/// Exchanges the consumer credential for a bearer token.
	///
	/// The response must report `token_type == "bearer"`; an API error payload or a
	/// non-200 status is a hard failure.
	pub fn obtain_bearer_token(&self) -> Result<Token> {
		const KIND: FlowKind = FlowKind::BearerToken;

		let _guard = FlowSpan::new(KIND, "obtain_bearer_token").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.exchange_credentials();

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	fn exchange_credentials(&self) -> Result<Token> {
		let headers = common::standard_headers(
			&self.user_agent,
			format!("Basic {}", self.basic_credentials()),
			common::CONTENT_TYPE_FORM_UTF8,
		);
		let response = self.transport.execute(TransportRequest {
			method: HttpMethod::Post,
			url: self.bearer_token_url.as_str(),
			headers: &headers,
			body: Some("grant_type=client_credentials"),
		})?;

		if let Some(reason) = common::api_error_message(&response.body) {
			return Err(AuthorizationError::Denied { reason }.into());
		}
		if response.status != 200 {
			return Err(AuthorizationError::UnexpectedStatus {
				status: response.status,
				body: response.body,
			}
			.into());
		}

		let mut deserializer = serde_json::Deserializer::from_str(&response.body);
		let parsed: BearerTokenResponse = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| AuthorizationError::ResponseParse { source })?;

		if parsed.token_type != "bearer" {
			return Err(
				AuthorizationError::UnsupportedTokenType { token_type: parsed.token_type }.into()
			);
		}

		let token = Token::bearer(parsed.access_token)?;

		*self.state.write() = TwoLeggedState::Authorized(token.clone());

		Ok(token)
	}

	/// Builds the Basic credential string: `base64(enc(key) + ":" + enc(secret))`.
	fn basic_credentials(&self) -> String {
		BASE64.encode(format!(
			"{}:{}",
			percent_encode(self.credential.key()),
			percent_encode(self.credential.secret())
		))
	}

	/// Returns header lines for an authenticated (`Bearer`) or bootstrap (`Basic`)
	/// request.
	pub fn build_header(&self, authenticated: bool) -> Result<Vec<HeaderLine>> {
		let authorization = if authenticated {
			let state = self.state.read();
			let TwoLeggedState::Authorized(token) = &*state else {
				return Err(Error::SigningPrecondition);
			};
			let Some(value) = token.bearer_value() else {
				return Err(Error::SigningPrecondition);
			};

			format!("Bearer {value}")
		} else {
			format!("Basic {}", self.basic_credentials())
		};

		Ok(common::standard_headers(
			&self.user_agent,
			authorization,
			common::CONTENT_TYPE_FORM_UTF8,
		))
	}

	/// Returns the issued token once the exchange has completed.
	pub fn current_token(&self) -> Option<Token> {
		match &*self.state.read() {
			TwoLeggedState::Authorized(token) => Some(token.clone()),
			TwoLeggedState::Unauthorized => None,
		}
	}
}
impl<T> Debug for TwoLeggedOAuth<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TwoLeggedOAuth")
			.field("credential", &self.credential)
			.field("bearer_token_url", &self.bearer_token_url.as_str())
			.finish()
	}
}
