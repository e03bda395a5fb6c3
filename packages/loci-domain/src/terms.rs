use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

/// Lowercases and collapses all whitespace runs to single spaces.
pub fn normalize_text(text: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for word in text.split_whitespace() {
		if !out.is_empty() {
			out.push(' ');
		}

		out.push_str(&word.to_lowercase());
	}

	out
}

/// Lexical terms of at least `min_chars` characters, lowercased, deduplicated,
/// in order of appearance.
pub fn terms(text: &str, min_chars: usize) -> Vec<String> {
	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for word in text.unicode_words() {
		if word.chars().count() < min_chars {
			continue;
		}

		let lowered = word.to_lowercase();

		if seen.insert(lowered.clone()) {
			out.push(lowered);
		}
	}

	out
}

pub fn term_set(text: &str, min_chars: usize) -> HashSet<String> {
	terms(text, min_chars).into_iter().collect()
}

/// Raw word count, duplicates included.
pub fn word_count(text: &str) -> usize {
	text.unicode_words().count()
}

/// `|quote_words ∩ block_words| / |quote_words|`, the fuzzy anchor signal.
pub fn overlap_ratio(quote: &str, block: &str, min_chars: usize) -> f32 {
	let quote_words = terms(quote, min_chars);

	if quote_words.is_empty() {
		return 0.0;
	}

	let block_words = term_set(block, min_chars);
	let matched = quote_words.iter().filter(|word| block_words.contains(word.as_str())).count();

	matched as f32 / quote_words.len() as f32
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalizes_case_and_whitespace() {
		assert_eq!(normalize_text("  Market\n Value:\t£1,950,000 "), "market value: £1,950,000");
	}

	#[test]
	fn terms_respect_minimum_length() {
		let found = terms("as at 30 June the Market Value was", 3);

		assert_eq!(found, vec!["june".to_string(), "the".to_string(), "market".to_string(), "value".to_string(), "was".to_string()]);
	}

	#[test]
	fn overlap_ratio_is_quote_relative() {
		let ratio = overlap_ratio("assessed market value", "the market value was assessed", 3);

		assert!((ratio - 1.0).abs() < f32::EPSILON);
		assert_eq!(overlap_ratio("", "anything", 3), 0.0);
	}
}
