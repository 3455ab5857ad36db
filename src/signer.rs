//! HMAC-SHA1 signature engine: canonical parameter normalization, signature-base-string
//! construction, and signing-key composition.
//!
//! Everything here is a pure function of its inputs. The flows generate nonce and
//! timestamp material up front and pass it in via the parameter set, so signing the same
//! context twice yields the same signature.

pub mod encode;
pub mod nonce;

pub use encode::*;
pub use nonce::*;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha1::Sha1;
// self
use crate::{_prelude::*, endpoint::EndpointClass};

type HmacSha1 = Hmac<Sha1>;

/// HTTP methods covered by the signing contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// Parameters travel in the URL query string.
	Get,
	/// Parameters travel form-encoded in the body.
	Post,
}
impl HttpMethod {
	/// Returns the uppercase wire form used in the signature base string.
	pub fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Everything needed to compute one signature. Transient; built fresh per request.
#[derive(Clone, Debug)]
pub struct SigningContext<'a> {
	/// HTTP method of the request being signed.
	pub method: HttpMethod,
	/// Request URL stripped of any query string.
	pub base_url: &'a str,
	/// Parameter set to normalize; must not contain `oauth_signature`.
	pub parameters: &'a ParameterSet,
	/// Consumer secret half of the signing key.
	pub consumer_secret: &'a str,
	/// Token secret half of the signing key; ignored for token-acquisition endpoints.
	pub token_secret: Option<&'a str>,
	/// Endpoint class deciding key composition and signature re-encoding.
	pub endpoint_class: EndpointClass,
}

/// Builds the standard `oauth_*` parameter block, without `oauth_signature`.
pub fn oauth_parameter_block(consumer_key: &str, nonce: &str, timestamp: i64) -> ParameterSet {
	ParameterSet::new()
		.with("oauth_consumer_key", consumer_key)
		.with("oauth_nonce", nonce)
		.with("oauth_signature_method", "HMAC-SHA1")
		.with("oauth_timestamp", timestamp.to_string())
		.with("oauth_version", "1.0")
}

/// Canonical sorted `k=v&…` string with both halves percent-encoded.
fn normalized_parameter_string(parameters: &ParameterSet) -> String {
	parameters
		.sorted()
		.iter()
		.map(|(name, value)| format!("{}={}", percent_encode(name), percent_encode(value)))
		.collect::<Vec<_>>()
		.join("&")
}

/// Builds the signature base string: `METHOD&enc(url)&enc(sorted-params)`.
pub fn signature_base_string(ctx: &SigningContext) -> String {
	format!(
		"{}&{}&{}",
		ctx.method,
		percent_encode(ctx.base_url),
		percent_encode(&normalized_parameter_string(ctx.parameters))
	)
}

/// Composes the HMAC signing key: `enc(consumer_secret)&enc(token_secret-or-empty)`.
///
/// Token-acquisition endpoints always use an empty token-secret component, even when a
/// token is present mid-flow; resource endpoints use the real secret.
pub fn signing_key(
	consumer_secret: &str,
	token_secret: Option<&str>,
	endpoint_class: EndpointClass,
) -> String {
	let token_half = match endpoint_class {
		EndpointClass::TokenAcquisition => String::new(),
		EndpointClass::Resource => percent_encode(token_secret.unwrap_or_default()),
	};

	format!("{}&{}", percent_encode(consumer_secret), token_half)
}

/// Computes the `oauth_signature` value for the context.
///
/// Token-acquisition signatures are percent-encoded once more before being returned,
/// because they are placed directly into a URL query string; resource signatures go into
/// an Authorization header whose assembly escapes each value itself.
pub fn sign(ctx: &SigningContext) -> String {
	let base = signature_base_string(ctx);
	let key = signing_key(ctx.consumer_secret, ctx.token_secret, ctx.endpoint_class);
	let mut mac =
		HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC-SHA1 accepts keys of any length.");

	mac.update(base.as_bytes());

	let signature = BASE64.encode(mac.finalize().into_bytes());

	match ctx.endpoint_class {
		EndpointClass::TokenAcquisition => percent_encode(&signature),
		EndpointClass::Resource => signature,
	}
}

/// Signs the context and returns the transmission-ready parameter set.
///
/// `oauth_signature` is absent while the signature is computed, inserted afterwards, and
/// the whole set re-sorted for transmission.
pub fn signed_parameters(ctx: &SigningContext) -> ParameterSet {
	let signature = sign(ctx);
	let mut parameters = ctx.parameters.clone();

	parameters.insert("oauth_signature", signature);
	parameters.sort();

	parameters
}
