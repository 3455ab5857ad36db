//! Helpers shared by both flows: form-encoded bodies, API error payloads, header blocks.

// self
use crate::{
	_prelude::*,
	http::HeaderLine,
	signer::{ParameterSet, percent_encode},
};

/// Content type attached to three-legged requests.
pub(crate) const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
/// Content type attached to app-only requests.
pub(crate) const CONTENT_TYPE_FORM_UTF8: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// Splits a form-encoded `key=value&…` body into a map, decoding both halves.
///
/// Token-acquisition endpoints answer with form-encoded text rather than JSON.
pub fn split_form_response(body: &str) -> HashMap<String, String> {
	url::form_urlencoded::parse(body.as_bytes()).into_owned().collect()
}

/// JSON error payload reported by the API: `{"errors": [{"message": …, "code": …}]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorPayload {
	pub errors: Vec<ApiErrorDetail>,
}
/// Single entry of an [`ApiErrorPayload`].
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
	pub message: String,
	#[serde(default)]
	#[allow(dead_code)]
	pub code: Option<i64>,
}

/// Returns the first API-level error message when the body carries an error payload.
///
/// Bodies that are not JSON (e.g. form-encoded token responses) yield `None`.
pub(crate) fn api_error_message(body: &str) -> Option<String> {
	serde_json::from_str::<ApiErrorPayload>(body)
		.ok()
		.and_then(|payload| payload.errors.into_iter().next())
		.map(|detail| detail.message)
}

/// Form-encodes parameters for a query string or POST body.
pub(crate) fn form_encode(parameters: &ParameterSet) -> String {
	parameters
		.iter()
		.map(|(name, value)| format!("{}={}", percent_encode(name), percent_encode(value)))
		.collect::<Vec<_>>()
		.join("&")
}

/// Assembles the standard header block, in wire order.
pub(crate) fn standard_headers(
	user_agent: &str,
	authorization: String,
	content_type: &'static str,
) -> Vec<HeaderLine> {
	vec![
		HeaderLine::new("Accept", "application/json"),
		HeaderLine::new("User-Agent", user_agent),
		HeaderLine::new("Authorization", authorization),
		HeaderLine::new("Content-Type", content_type),
	]
}
