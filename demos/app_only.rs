//! Demonstrates the app-only bearer flow against a local mock provider, then issues an
//! authenticated search request.

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
		when.method(POST).path("/oauth2/token").body("grant_type=client_credentials");
		then.status(200)
			.header("content-type", "application/json")
			.body("{\"token_type\":\"bearer\",\"access_token\":\"demo-bearer\"}");
	});
	server.mock(|when, then| {
		when.method(GET).path("/1.1/search/tweets.json");
		then.status(200).header("content-type", "application/json").body("{\"statuses\":[]}");
	});

	let base = server.base_url();
	let parse = |path: &str| Url::parse(&format!("{base}{path}"));
	let endpoints =
		Endpoints::builder(parse("/1.1/")?).bearer_token(parse("/oauth2/token")?).build()?;
	let credential = Credential::new("demo-consumer-key", "demo-consumer-secret")?;
	let client = Client::new(
		ClientConfig::new(credential, endpoints, AuthMode::AppOnly).with_app_name("handshake-demo"),
	)?;
	let token = client.obtain_bearer_token()?;

	println!("Issued bearer token: {:?}", token);

	let response = client.get("search/tweets.json", &ParameterSet::new().with("q", "rust"))?;

	println!("Search response: {}", response.body);

	Ok(())
}
