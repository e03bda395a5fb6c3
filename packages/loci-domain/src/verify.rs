use loci_config::Config;

use crate::{numbers, terms, types::Confidence};

const VALUE_KEYWORDS: &[&str] = &["value", "price", "rent", "amount", "worth"];
const VALUATION_LANGUAGE: &[&str] =
	&["assessed value", "market value", "valuation", "appraised"];
const MARKET_NOISE_LANGUAGE: &[&str] =
	&["under offer", "offer received", "rejected offer", "asking price", "offers in excess"];

/// Whether a claimed text fragment is actually supported by a block's content.
#[derive(Clone, Debug)]
pub struct MatchReport {
	pub is_match: bool,
	pub confidence: Confidence,
	pub matched_terms: Vec<String>,
	pub missing_terms: Vec<String>,
	pub numeric_matches: Vec<String>,
}

/// The single place numeric-match safety is enforced: a value-like fact with a
/// specific number must find that exact number in the block, or the match is
/// forced off regardless of lexical overlap.
pub fn verify(cited_text: &str, block_content: &str, cfg: &Config) -> MatchReport {
	let min_chars = cfg.verify.min_term_chars as usize;
	let numeric_matches = numbers::shared_numbers(cited_text, block_content);
	let cited_terms = terms::terms(cited_text, min_chars);
	let block_terms = terms::term_set(block_content, min_chars);
	let mut matched_terms = Vec::new();
	let mut missing_terms = Vec::new();

	for term in cited_terms {
		if block_terms.contains(&term) {
			matched_terms.push(term);
		} else {
			missing_terms.push(term);
		}
	}

	let total_terms = matched_terms.len() + missing_terms.len();
	let term_ratio = if total_terms == 0 {
		0.0
	} else {
		matched_terms.len() as f32 / total_terms as f32
	};

	if has_value_language(cited_text)
		&& let Some(primary) = numbers::largest_number(cited_text)
		&& !numeric_matches.contains(&primary)
	{
		return MatchReport {
			is_match: false,
			confidence: Confidence::Low,
			matched_terms,
			missing_terms,
			numeric_matches,
		};
	}

	let numeric = !numeric_matches.is_empty();
	let strong_lexical = total_terms > 0 && term_ratio >= cfg.verify.strong_term_ratio;
	let confidence = if numeric && strong_lexical {
		Confidence::High
	} else if numeric || strong_lexical {
		Confidence::Medium
	} else {
		Confidence::Low
	};
	let is_match = numeric || (total_terms > 0 && term_ratio >= cfg.verify.min_term_ratio);

	MatchReport { is_match, confidence, matched_terms, missing_terms, numeric_matches }
}

/// The fact talks about a quantity with a value-like keyword. Whole-word
/// comparison; "currently" must not register as "rent".
pub fn has_value_language(text: &str) -> bool {
	terms::terms(text, 1).iter().any(|word| {
		VALUE_KEYWORDS.contains(&word.as_str())
			|| word.strip_suffix('s').is_some_and(|singular| VALUE_KEYWORDS.contains(&singular))
	})
}

/// The block reads like a professional valuation statement.
pub fn is_valuation_block(content: &str) -> bool {
	let lowered = content.to_lowercase();

	VALUATION_LANGUAGE.iter().any(|phrase| lowered.contains(phrase))
}

/// The block reads like a market-activity anecdote (offers, asking prices)
/// rather than an assessed figure.
pub fn is_market_noise_block(content: &str) -> bool {
	let lowered = content.to_lowercase();

	MARKET_NOISE_LANGUAGE.iter().any(|phrase| lowered.contains(phrase))
}
