use loci_config::Config;

use crate::{numbers, terms, types::BoundingBox};

/// Narrows a multi-line block's bbox to the line best matching the cited text.
/// Lines are assumed to stack evenly from the block top. When no line scores
/// above zero the block bbox is returned unchanged; never an error.
pub fn narrow(content: &str, bbox: BoundingBox, cited_text: &str, cfg: &Config) -> BoundingBox {
	let lines: Vec<&str> = content.lines().collect();

	if lines.len() < 2 {
		return bbox;
	}

	let normalized_cited = terms::normalize_text(cited_text);
	let prefix: String =
		normalized_cited.chars().take(cfg.narrow.prefix_chars as usize).collect();
	let cited_numbers = numbers::extract_numbers(cited_text);
	let cited_words = terms::term_set(cited_text, 3);
	let mut best: Option<(usize, i32)> = None;

	for (index, line) in lines.iter().enumerate() {
		let score = score_line(line, &prefix, &cited_numbers, &cited_words, cfg);

		if score > 0 && best.map(|(_, top)| score > top).unwrap_or(true) {
			best = Some((index, score));
		}
	}

	let Some((index, _)) = best else { return bbox };
	let line_height = bbox.height / lines.len() as f32;

	BoundingBox {
		left: bbox.left,
		top: bbox.top + index as f32 * line_height,
		width: bbox.width,
		height: line_height,
		page: bbox.page,
	}
}

fn score_line(
	line: &str,
	cited_prefix: &str,
	cited_numbers: &[String],
	cited_words: &std::collections::HashSet<String>,
	cfg: &Config,
) -> i32 {
	let normalized_line = terms::normalize_text(line);
	let mut score = 0;

	if !cited_prefix.is_empty() && normalized_line.contains(cited_prefix) {
		score += cfg.narrow.prefix_bonus;
	}

	let line_numbers = numbers::extract_numbers(line);

	for number in cited_numbers {
		if line_numbers.contains(number) {
			score += cfg.narrow.number_bonus;
		}
	}

	for word in terms::terms(line, 3) {
		if cited_words.contains(&word) {
			score += cfg.narrow.word_bonus;
		}
	}

	score
}

#[cfg(test)]
mod tests {
	use super::*;

	fn block_bbox() -> BoundingBox {
		BoundingBox { left: 0.1, top: 0.2, width: 0.8, height: 0.4, page: 3 }
	}

	#[test]
	fn picks_the_line_holding_the_cited_number() {
		let content = "\
Summary of assumptions
Tenure: freehold
Market Value: £1,950,000
Prepared for the lender";
		let narrowed =
			narrow(content, block_bbox(), "Market Value: £1,950,000", &Config::default());

		assert!((narrowed.height - 0.1).abs() < 1e-6);
		assert!((narrowed.top - 0.4).abs() < 1e-6);
		assert_eq!(narrowed.page, 3);
	}

	#[test]
	fn no_scoring_line_keeps_the_block_bbox() {
		let content = "alpha\nbeta\ngamma";
		let narrowed = narrow(content, block_bbox(), "unrelated citation", &Config::default());

		assert_eq!(narrowed, block_bbox());
	}

	#[test]
	fn single_line_blocks_are_returned_unchanged() {
		let narrowed =
			narrow("only one line", block_bbox(), "only one line", &Config::default());

		assert_eq!(narrowed, block_bbox());
	}
}
