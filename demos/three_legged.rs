//! Demonstrates the full three-legged handshake against a local mock provider: request
//! token, user redirect, and the access-token exchange, followed by a signed resource
//! call.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use oauth_handshake::{
	auth::Credential,
	client::{Client, ClientConfig},
	endpoint::Endpoints,
	flows::AuthMode,
	signer::ParameterSet,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start();

	server.mock(|when, then| {
		when.method(GET).path("/oauth/request_token");
		then.status(200)
			.body("oauth_token=demo-request&oauth_token_secret=demo-secret&oauth_callback_confirmed=true");
	});
	server.mock(|when, then| {
		when.method(POST).path("/oauth/access_token");
		then.status(200).body("oauth_token=demo-access&oauth_token_secret=demo-access-secret");
	});
	server.mock(|when, then| {
		when.method(GET).path("/1.1/account/verify_credentials.json");
		then.status(200)
			.header("content-type", "application/json")
			.body("{\"screen_name\":\"demo\"}");
	});

	let base = server.base_url();
	let parse = |path: &str| Url::parse(&format!("{base}{path}"));
	let endpoints = Endpoints::builder(parse("/1.1/")?)
		.request_token(parse("/oauth/request_token")?)
		.authorize(parse("/oauth/authorize")?)
		.access_token(parse("/oauth/access_token")?)
		.build()?;
	let credential = Credential::new("demo-consumer-key", "demo-consumer-secret")?;
	let client = Client::new(
		ClientConfig::new(credential, endpoints, AuthMode::ThreeLegged)
			.with_app_name("handshake-demo"),
	)?;
	let redirect = client.start_authorization()?;

	println!("Send the user to: {}", redirect.redirect_url);

	// In a real deployment the verifier arrives via the callback; the mock provider
	// accepts anything.
	let token = client.complete_authorization(&redirect.request_token, "demo-verifier")?;

	println!("Issued access token: {:?}", token);

	let response = client.get("account/verify_credentials.json", &ParameterSet::new())?;

	println!("Verified credentials: {}", response.body);

	Ok(())
}
