//! OAuth percent-encoding and canonical parameter ordering.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Reserved-character set for OAuth parameter encoding.
///
/// RFC 3986 unreserved characters (ALPHA, DIGIT, `-`, `.`, `_`, `~`) stay literal;
/// everything else is escaped. Space encodes as `%20`, never `+`.
const PARAMETER_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes `input` per the OAuth reserved-character set.
pub fn percent_encode(input: &str) -> String {
	utf8_percent_encode(input, PARAMETER_ENCODE_SET).to_string()
}

/// Decodes a percent-encoded string, the inverse of [`percent_encode`].
pub fn percent_decode(input: &str) -> String {
	percent_decode_str(input).decode_utf8_lossy().into_owned()
}

/// Ordered name/value pairs carried into the signature base string.
///
/// Entries keep insertion order until [`sort`](Self::sort) is called; the sorted order —
/// byte-wise lexicographic by name, ties broken by value, stable for full duplicates —
/// is an invariant of the signature, not a convenience.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterSet(Vec<(String, String)>);
impl ParameterSet {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a name/value pair.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.0.push((name.into(), value.into()));
	}

	/// Builder-style [`insert`](Self::insert).
	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(name, value);

		self
	}

	/// Returns true when a parameter with the given name is present.
	pub fn contains(&self, name: &str) -> bool {
		self.0.iter().any(|(n, _)| n == name)
	}

	/// Returns the value of the first parameter with the given name.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when no entries are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates entries in their current order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
	}

	/// Sorts entries into canonical byte order (name, then value; stable).
	pub fn sort(&mut self) {
		self.0.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
	}

	/// Returns a sorted copy without touching the original insertion order.
	pub fn sorted(&self) -> Self {
		let mut sorted = self.clone();

		sorted.sort();

		sorted
	}

	/// Appends every entry of `other`.
	pub fn extend(&mut self, other: &ParameterSet) {
		self.0.extend(other.0.iter().cloned());
	}
}
impl<N, V> FromIterator<(N, V)> for ParameterSet
where
	N: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
	}
}
impl IntoIterator for ParameterSet {
	type IntoIter = std::vec::IntoIter<(String, String)>;
	type Item = (String, String);

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unreserved_characters_stay_literal() {
		assert_eq!(percent_encode("test-value_123.txt"), "test-value_123.txt");
		assert_eq!(percent_encode("~tilde"), "~tilde");
	}

	#[test]
	fn space_encodes_as_percent_twenty() {
		assert_eq!(percent_encode("hello world"), "hello%20world");
		assert!(!percent_encode("a b+c").contains('+'));
	}

	#[test]
	fn reserved_characters_are_escaped() {
		assert_eq!(percent_encode("foo=bar&baz"), "foo%3Dbar%26baz");
		assert_eq!(percent_encode("https://api.example.com/"), "https%3A%2F%2Fapi.example.com%2F");
	}

	#[test]
	fn encoding_round_trips() {
		for sample in ["plain", "two words", "key=value&other=1", "émoji ☃", "a+b%20c"] {
			assert_eq!(percent_decode(&percent_encode(sample)), sample);
		}
	}

	#[test]
	fn sort_is_byte_lexicographic_and_stable() {
		let mut params = ParameterSet::new();

		params.insert("b", "2");
		params.insert("a", "1");
		params.insert("a", "0");
		params.insert("Z", "upper");

		params.sort();

		let order = params.iter().collect::<Vec<_>>();

		// ASCII uppercase sorts before lowercase in byte order.
		assert_eq!(order, vec![("Z", "upper"), ("a", "0"), ("a", "1"), ("b", "2")]);
	}

	#[test]
	fn sorted_leaves_the_original_untouched() {
		let params = ParameterSet::new().with("b", "2").with("a", "1");
		let sorted = params.sorted();

		assert_eq!(params.iter().next(), Some(("b", "2")));
		assert_eq!(sorted.iter().next(), Some(("a", "1")));
	}
}
