use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub verify: Verify,
	pub scoring: Scoring,
	pub fuzzy: Fuzzy,
	pub orphan: Orphan,
	pub narrow: Narrow,
	pub repair: Repair,
}

/// Match Verifier thresholds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Verify {
	/// Minimum character length for a lexical term to participate in overlap.
	pub min_term_chars: u32,
	/// Term overlap ratio below which a purely lexical candidate is no match.
	pub min_term_ratio: f32,
	/// Term overlap ratio at which the lexical signal counts as strong.
	pub strong_term_ratio: f32,
}

/// Context/position scoring weights for chunk-scoped and orphan lookup.
///
/// Relative ordering is what matters: an exact substring must outrank any
/// combination of the marginal bonuses. The magnitudes are tunable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Scoring {
	pub exact_substring_bonus: i32,
	pub high_confidence_bonus: i32,
	pub medium_confidence_bonus: i32,
	pub low_confidence_bonus: i32,
	/// Per matched term beyond the second.
	pub extra_term_bonus: i32,
	/// Per missing term beyond the third.
	pub missing_term_penalty: i32,
	/// Per exactly matched normalized number.
	pub numeric_match_bonus: i32,
	/// Applied when a valuation-language fact lands on a valuation block.
	pub valuation_language_bonus: i32,
	/// Applied when a valuation-language fact lands on a market-activity block.
	pub market_noise_penalty: i32,
	/// Minimum score for a chunk-scoped candidate to be accepted.
	pub min_accept_score: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Fuzzy {
	/// Minimum quote-word overlap ratio for the fuzzy anchor lookup.
	pub min_overlap: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Orphan {
	/// Blocks shorter than this many words are skipped as likely headers.
	pub min_block_words: u32,
	/// Minimum score for an orphan candidate to be accepted.
	pub min_accept_score: i32,
	/// A page-0 block must beat the best later-page block by this margin.
	pub page_zero_margin: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Narrow {
	/// Leading characters of the cited text used for the prefix probe.
	pub prefix_chars: u32,
	pub prefix_bonus: i32,
	pub number_bonus: i32,
	pub word_bonus: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Repair {
	/// Characters of preceding context compared when deciding whether a reused
	/// marker number cites distinct facts.
	pub context_window_chars: u32,
}

impl Default for Verify {
	fn default() -> Self {
		Self { min_term_chars: 3, min_term_ratio: 0.3, strong_term_ratio: 0.5 }
	}
}

impl Default for Scoring {
	fn default() -> Self {
		Self {
			exact_substring_bonus: 300,
			high_confidence_bonus: 100,
			medium_confidence_bonus: 50,
			low_confidence_bonus: 10,
			extra_term_bonus: 5,
			missing_term_penalty: 3,
			numeric_match_bonus: 30,
			valuation_language_bonus: 40,
			market_noise_penalty: 60,
			min_accept_score: 40,
		}
	}
}

impl Default for Fuzzy {
	fn default() -> Self {
		Self { min_overlap: 0.4 }
	}
}

impl Default for Orphan {
	fn default() -> Self {
		Self { min_block_words: 20, min_accept_score: 80, page_zero_margin: 150 }
	}
}

impl Default for Narrow {
	fn default() -> Self {
		Self { prefix_chars: 50, prefix_bonus: 100, number_bonus: 50, word_bonus: 10 }
	}
}

impl Default for Repair {
	fn default() -> Self {
		Self { context_window_chars: 50 }
	}
}
