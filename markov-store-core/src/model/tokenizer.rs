use std::sync::LazyLock;

use regex::Regex;

use super::triple::Triple;

/// Runs of whitespace and ASCII punctuation separate words.
static DELIMITERS: LazyLock<Regex> = LazyLock::new(|| {
	// Constant pattern, cannot fail to compile
	Regex::new(r##"[\s!"#$%&'()*+,\-./:;<=>?\[\\\]^_`{|}~]+"##).unwrap()
});

/// Splits `text` into alternating word / separator tokens.
///
/// The delimiters are kept, so the result always has an odd length:
/// `word, sep, word, ..., word`. A text starting (or ending) with a
/// delimiter yields an empty first (or last) word.
///
/// Example: `"hi, you"` → `["hi", ", ", "you"]`
pub fn split_tokens(text: &str) -> Vec<&str> {
	let mut tokens = Vec::new();
	let mut last = 0;
	for delimiter in DELIMITERS.find_iter(text) {
		tokens.push(&text[last..delimiter.start()]);
		tokens.push(delimiter.as_str());
		last = delimiter.end();
	}
	tokens.push(&text[last..]);
	tokens
}

/// Breaks `text` into overlapping 5-token windows (step 2).
///
/// Two empty tokens are added in front unless the text starts with a
/// delimiter, and two at the back unless it ends with one, so the stream
/// always opens and closes on an empty boundary word.
///
/// - `""` yields no triple
/// - `"a b"` yields `("", "", "a", " ", "b")` and `("a", " ", "b", "", "")`
pub fn tokenize(text: &str) -> Vec<Triple> {
	let mut tokens = split_tokens(text);

	if tokens.first().is_some_and(|first| !first.is_empty()) {
		tokens.insert(0, "");
		tokens.insert(0, "");
	}
	if tokens.last().is_some_and(|last| !last.is_empty()) {
		tokens.extend(["", ""]);
	}

	if tokens.len() < 5 {
		return Vec::new();
	}

	(0..tokens.len() - 4)
		.step_by(2)
		.filter_map(|i| Triple::from_window(&tokens[i..i + 5]))
		.collect()
}

/// Returns the middle words (`w2`) of every triple of `text`, in order.
pub fn middle_words(text: &str) -> Vec<String> {
	tokenize(text).into_iter().map(|triple| triple.w2).collect()
}
