// crates.io
use httpmock::prelude::*;
// self
use oauth_handshake::{
	_preludet::*,
	auth::Token,
	client::{Client, ClientConfig},
	error::AuthorizationError,
	flows::AuthMode,
	http::ReqwestTransport,
};

#[test]
fn request_token_step_returns_the_authorize_redirect() {
	let server = MockServer::start();
	let client = build_test_client(&server.base_url(), AuthMode::ThreeLegged);
	let mock = server.mock(|when, then| {
		when.method(GET)
			.path("/oauth/request_token")
			.query_param("oauth_consumer_key", "test-consumer-key")
			.query_param("oauth_signature_method", "HMAC-SHA1")
			.query_param("oauth_version", "1.0")
			.query_param_exists("oauth_nonce")
			.query_param_exists("oauth_timestamp")
			.query_param_exists("oauth_signature");
		then.status(200)
			.header("content-type", "text/html; charset=utf-8")
			.body("oauth_token=req-token&oauth_token_secret=req-secret&oauth_callback_confirmed=true");
	});
	let redirect = client
		.start_authorization()
		.expect("Request-token step should succeed against the mock endpoint.");

	mock.assert();

	assert_eq!(redirect.request_token, "req-token");
	assert_eq!(
		redirect.redirect_url.as_str(),
		format!("{}/oauth/authorize?oauth_token=req-token", server.base_url())
	);
	assert!(client.current_token().is_none(), "No token is issued before the callback.");
}

#[test]
fn access_token_step_parses_the_issued_pair() {
	let server = MockServer::start();
	let client = build_test_client(&server.base_url(), AuthMode::ThreeLegged);
	let mock = server.mock(|when, then| {
		when.method(POST)
			.path("/oauth/access_token")
			.header("content-type", "application/x-www-form-urlencoded")
			.body("oauth_verifier=the-verifier");
		then.status(200)
			.header("content-type", "text/html; charset=utf-8")
			.body("oauth_token=AT&oauth_token_secret=ATS");
	});
	let token = client
		.complete_authorization("req-token", "the-verifier")
		.expect("Access-token exchange should succeed against the mock endpoint.");

	mock.assert();

	assert_eq!(token.public(), Some("AT"));
	assert_eq!(token.secret(), Some("ATS"));
	assert_eq!(client.current_token(), Some(token));
}

#[test]
fn access_token_step_fails_hard_on_rejection() {
	let server = MockServer::start();
	let client = build_test_client(&server.base_url(), AuthMode::ThreeLegged);
	let mock = server.mock(|when, then| {
		when.method(POST).path("/oauth/access_token");
		then.status(401).body("Invalid verifier");
	});
	let err = client
		.complete_authorization("req-token", "wrong-verifier")
		.expect_err("A rejected exchange should be a hard failure.");

	mock.assert();

	assert!(matches!(
		err,
		Error::Authorization(AuthorizationError::UnexpectedStatus { status: 401, .. })
	));
	assert!(client.current_token().is_none());
}

#[test]
fn pre_issued_pairs_skip_the_handshake() {
	let server = MockServer::start();
	let token = Token::pair("AT", "ATS").expect("Token pair fixture should be valid.");
	let config =
		ClientConfig::new(test_credential(), test_endpoints(&server.base_url()), AuthMode::ThreeLegged)
			.with_token(token.clone());
	let client = Client::with_transport(config, ReqwestTransport::default())
		.expect("Client with a pre-issued token should build successfully.");

	assert_eq!(client.current_token(), Some(token));
}

#[test]
fn bearer_tokens_are_rejected_by_the_three_legged_mode() {
	let server = MockServer::start();
	let token = Token::bearer("AAAA").expect("Bearer fixture should be valid.");
	let config =
		ClientConfig::new(test_credential(), test_endpoints(&server.base_url()), AuthMode::ThreeLegged)
			.with_token(token);

	assert!(Client::with_transport(config, ReqwestTransport::default()).is_err());
}
