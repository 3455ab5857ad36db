//! Nonce and timestamp material for signed requests.

// crates.io
use rand::{Rng, distr::Alphanumeric};
use time::OffsetDateTime;

const NONCE_LEN: usize = 32;

/// Generates a single-use 32-character alphanumeric nonce from the thread RNG.
///
/// The nonce carries no clock component; two requests issued within the same second
/// still receive distinct values.
pub fn nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}

/// Returns the current epoch seconds used as `oauth_timestamp`.
pub fn timestamp() -> i64 {
	OffsetDateTime::now_utc().unix_timestamp()
}
