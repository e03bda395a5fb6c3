mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Fuzzy, Narrow, Orphan, Repair, Scoring, Verify};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;

	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::Parse { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.verify.min_term_chars < 2 {
		return Err(Error::Validation {
			message: "verify.min_term_chars must be 2 or greater.".to_string(),
		});
	}

	for (label, ratio) in [
		("verify.min_term_ratio", cfg.verify.min_term_ratio),
		("verify.strong_term_ratio", cfg.verify.strong_term_ratio),
		("fuzzy.min_overlap", cfg.fuzzy.min_overlap),
	] {
		if !ratio.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if !(0.0..=1.0).contains(&ratio) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-1.0."),
			});
		}
	}

	if cfg.verify.strong_term_ratio < cfg.verify.min_term_ratio {
		return Err(Error::Validation {
			message: "verify.strong_term_ratio must be at least verify.min_term_ratio.".to_string(),
		});
	}

	for (label, weight) in [
		("scoring.exact_substring_bonus", cfg.scoring.exact_substring_bonus),
		("scoring.high_confidence_bonus", cfg.scoring.high_confidence_bonus),
		("scoring.medium_confidence_bonus", cfg.scoring.medium_confidence_bonus),
		("scoring.low_confidence_bonus", cfg.scoring.low_confidence_bonus),
		("scoring.extra_term_bonus", cfg.scoring.extra_term_bonus),
		("scoring.missing_term_penalty", cfg.scoring.missing_term_penalty),
		("scoring.numeric_match_bonus", cfg.scoring.numeric_match_bonus),
		("scoring.valuation_language_bonus", cfg.scoring.valuation_language_bonus),
		("scoring.market_noise_penalty", cfg.scoring.market_noise_penalty),
		("orphan.page_zero_margin", cfg.orphan.page_zero_margin),
		("narrow.prefix_bonus", cfg.narrow.prefix_bonus),
		("narrow.number_bonus", cfg.narrow.number_bonus),
		("narrow.word_bonus", cfg.narrow.word_bonus),
	] {
		if weight < 0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	if cfg.scoring.high_confidence_bonus < cfg.scoring.medium_confidence_bonus
		|| cfg.scoring.medium_confidence_bonus < cfg.scoring.low_confidence_bonus
	{
		return Err(Error::Validation {
			message: "scoring confidence bonuses must be ordered high >= medium >= low."
				.to_string(),
		});
	}
	if cfg.scoring.exact_substring_bonus < cfg.scoring.high_confidence_bonus {
		return Err(Error::Validation {
			message: "scoring.exact_substring_bonus must be at least scoring.high_confidence_bonus."
				.to_string(),
		});
	}
	if cfg.orphan.min_block_words == 0 {
		return Err(Error::Validation {
			message: "orphan.min_block_words must be greater than zero.".to_string(),
		});
	}
	if cfg.narrow.prefix_chars == 0 {
		return Err(Error::Validation {
			message: "narrow.prefix_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.repair.context_window_chars == 0 {
		return Err(Error::Validation {
			message: "repair.context_window_chars must be greater than zero.".to_string(),
		});
	}

	Ok(())
}
