use serde::{Deserialize, Serialize};

use crate::{index::EvidenceIndex, markers::CitationMarker};
use loci_config::Config;
use loci_domain::{BoundingBox, Confidence, EvidenceBlock, MatchReport, narrow, terms, verify};

/// How a citation was tied back to its evidence block, ordered from most to
/// least direct.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
	BlockId,
	AnchorExact,
	AnchorFuzzy,
	ChunkScoped,
	OrphanSemantic,
	Unresolved,
}

/// The caller-facing location record for one citation. Location fields are
/// `None` only when `method` is [`Strategy::Unresolved`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ResolvedCitation {
	pub citation_number: u32,
	pub doc_id: Option<String>,
	pub page: Option<u32>,
	pub bbox: Option<BoundingBox>,
	pub block_id: Option<String>,
	pub cited_text: String,
	pub confidence: Confidence,
	pub method: Strategy,
}

/// Runs the strategy chain for one marker. Direct block-id hints are trusted
/// first, then anchor quotes, then chunk-scoped scoring, then a whole-index
/// semantic search. A block-id hit whose anchor quote fails verification is
/// abandoned rather than returned, so a hallucinated id never pins a wrong
/// location.
pub fn resolve_marker(
	index: &EvidenceIndex,
	marker: &CitationMarker,
	cfg: &Config,
) -> ResolvedCitation {
	if index.is_empty() {
		return unresolved(marker);
	}

	if let Some(block_id) = marker.block_id.as_deref()
		&& let Some(block) = index.lookup(marker.doc_id.as_deref(), block_id)
	{
		match marker.anchor_quote.as_deref() {
			None => return cite(marker.number, &marker.cited_text, block, Confidence::High, Strategy::BlockId, cfg),
			Some(quote) => {
				let report = verify::verify(quote, &block.content, cfg);

				if report.is_match {
					return cite(
						marker.number,
						&marker.cited_text,
						block,
						report.confidence,
						Strategy::BlockId,
						cfg,
					);
				}

				tracing::debug!(
					block_id,
					"Hinted block failed quote verification; continuing the chain."
				);
			},
		}
	}

	if let Some(quote) = marker.anchor_quote.as_deref() {
		let normalized_quote = terms::normalize_text(quote);

		if !normalized_quote.is_empty() {
			for block in index.blocks() {
				if terms::normalize_text(&block.content).contains(&normalized_quote) {
					return cite(
						marker.number,
						&marker.cited_text,
						block,
						Confidence::High,
						Strategy::AnchorExact,
						cfg,
					);
				}
			}

			let min_chars = cfg.verify.min_term_chars as usize;
			let mut best: Option<(&EvidenceBlock, f32)> = None;

			for block in index.blocks() {
				let ratio = terms::overlap_ratio(quote, &block.content, min_chars);

				if ratio < cfg.fuzzy.min_overlap
					|| best.map(|(_, top)| ratio <= top).unwrap_or(false)
				{
					continue;
				}

				// Fuzzy candidates still pass through the verifier; overlap
				// alone cannot pin a quote to a block with a different figure.
				if !verify::verify(quote, &block.content, cfg).is_match {
					continue;
				}

				best = Some((block, ratio));
			}

			if let Some((block, _)) = best {
				return cite(
					marker.number,
					&marker.cited_text,
					block,
					Confidence::Low,
					Strategy::AnchorFuzzy,
					cfg,
				);
			}
		}
	}

	if let Some(chunk_id) = marker.chunk_id.as_deref() {
		let mut best: Option<(&EvidenceBlock, i32, MatchReport)> = None;

		for block in index.chunk_blocks(chunk_id) {
			if let Some((score, report)) = context_score(&marker.cited_text, block, cfg)
				&& score >= cfg.scoring.min_accept_score
				&& best.as_ref().map(|(_, top, _)| score > *top).unwrap_or(true)
			{
				best = Some((block, score, report));
			}
		}

		if let Some((block, _, report)) = best {
			return cite(
				marker.number,
				&marker.cited_text,
				block,
				report.confidence,
				Strategy::ChunkScoped,
				cfg,
			);
		}
	}

	if let Some((block, report)) = orphan_search(index, &marker.cited_text, cfg) {
		return cite(
			marker.number,
			&marker.cited_text,
			block,
			report.confidence.min(Confidence::Medium),
			Strategy::OrphanSemantic,
			cfg,
		);
	}

	unresolved(marker)
}

/// Scores one block against a cited fact. `None` means the verifier rejected
/// the pairing outright, which no positional bonus may override.
pub(crate) fn context_score(
	fact: &str,
	block: &EvidenceBlock,
	cfg: &Config,
) -> Option<(i32, MatchReport)> {
	let report = verify::verify(fact, &block.content, cfg);

	if !report.is_match {
		return None;
	}

	let scoring = &cfg.scoring;
	let mut score = match report.confidence {
		Confidence::High => scoring.high_confidence_bonus,
		Confidence::Medium => scoring.medium_confidence_bonus,
		Confidence::Low => scoring.low_confidence_bonus,
	};
	let normalized_fact = terms::normalize_text(fact);

	if !normalized_fact.is_empty()
		&& terms::normalize_text(&block.content).contains(&normalized_fact)
	{
		score += scoring.exact_substring_bonus;
	}

	score += scoring.extra_term_bonus * report.matched_terms.len().saturating_sub(2) as i32;
	score -= scoring.missing_term_penalty * report.missing_terms.len().saturating_sub(3) as i32;
	score += scoring.numeric_match_bonus * report.numeric_matches.len() as i32;

	if verify::has_value_language(fact) {
		if verify::is_valuation_block(&block.content) {
			score += scoring.valuation_language_bonus;
		}
		if verify::is_market_noise_block(&block.content) {
			score -= scoring.market_noise_penalty;
		}
	}

	Some((score, report))
}

/// Whole-index search for a fact with no usable hints. Short and header-like
/// blocks are skipped, and a page-0 block (cover pages, summaries) only wins
/// over a later-page candidate by a clear margin.
pub(crate) fn orphan_search<'a>(
	index: &'a EvidenceIndex,
	fact: &str,
	cfg: &Config,
) -> Option<(&'a EvidenceBlock, MatchReport)> {
	if fact.trim().is_empty() {
		return None;
	}

	let mut best_page_zero: Option<(&EvidenceBlock, i32, MatchReport)> = None;
	let mut best_later: Option<(&EvidenceBlock, i32, MatchReport)> = None;

	for block in index.blocks() {
		if (terms::word_count(&block.content) as u32) < cfg.orphan.min_block_words
			|| is_header_like(&block.content)
		{
			continue;
		}

		let Some((score, report)) = context_score(fact, block, cfg) else { continue };

		if score < cfg.orphan.min_accept_score {
			continue;
		}

		let slot = if block.page == 0 { &mut best_page_zero } else { &mut best_later };

		if slot.as_ref().map(|(_, top, _)| score > *top).unwrap_or(true) {
			*slot = Some((block, score, report));
		}
	}

	match (best_page_zero, best_later) {
		(Some((zero_block, zero_score, zero_report)), Some((block, score, report))) =>
			if zero_score >= score + cfg.orphan.page_zero_margin {
				Some((zero_block, zero_report))
			} else {
				Some((block, report))
			},
		(Some((block, _, report)), None) | (None, Some((block, _, report))) =>
			Some((block, report)),
		(None, None) => None,
	}
}

/// Blocks with no sentence punctuation read as headers or table fragments, not
/// citable prose.
fn is_header_like(content: &str) -> bool {
	!content.contains(['.', '!', '?'])
}

pub(crate) fn cite(
	number: u32,
	fact: &str,
	block: &EvidenceBlock,
	confidence: Confidence,
	method: Strategy,
	cfg: &Config,
) -> ResolvedCitation {
	let bbox = narrow::narrow(&block.content, block.bbox, fact, cfg);

	ResolvedCitation {
		citation_number: number,
		doc_id: Some(block.doc_id.clone()),
		page: Some(bbox.page),
		bbox: Some(bbox),
		block_id: Some(block.block_id.clone()),
		cited_text: fact.to_string(),
		confidence,
		method,
	}
}

fn unresolved(marker: &CitationMarker) -> ResolvedCitation {
	ResolvedCitation {
		citation_number: marker.number,
		doc_id: None,
		page: None,
		bbox: None,
		block_id: None,
		cited_text: marker.cited_text.clone(),
		confidence: Confidence::Low,
		method: Strategy::Unresolved,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::index::{DocumentEvidence, RetrievedBlock};

	fn raw_block(id: &str, chunk_id: Option<&str>, content: &str, page: u32) -> RetrievedBlock {
		RetrievedBlock {
			block_id: id.to_string(),
			chunk_id: chunk_id.map(str::to_string),
			content: Some(content.to_string()),
			page: Some(page),
			bbox: Some(BoundingBox { left: 0.1, top: 0.1, width: 0.8, height: 0.2, page }),
			confidence: 0.9,
		}
	}

	fn index(blocks: Vec<RetrievedBlock>) -> EvidenceIndex {
		let documents = vec![DocumentEvidence { doc_id: "doc-1".to_string(), blocks }];

		EvidenceIndex::build(Some(&documents), true).expect("index should build")
	}

	fn marker(
		number: u32,
		block_id: Option<&str>,
		chunk_id: Option<&str>,
		anchor_quote: Option<&str>,
		cited_text: &str,
	) -> CitationMarker {
		CitationMarker {
			number,
			span: 0..3,
			block_id: block_id.map(str::to_string),
			doc_id: None,
			chunk_id: chunk_id.map(str::to_string),
			anchor_quote: anchor_quote.map(str::to_string),
			cited_text: cited_text.to_string(),
		}
	}

	#[test]
	fn block_id_hint_without_a_quote_is_trusted() {
		let index = index(vec![raw_block("b1", None, "The lease expires in June 2030.", 4)]);
		let resolved = resolve_marker(
			&index,
			&marker(1, Some("b1"), None, None, "lease expiry"),
			&Config::default(),
		);

		assert_eq!(resolved.method, Strategy::BlockId);
		assert_eq!(resolved.confidence, Confidence::High);
		assert_eq!(resolved.page, Some(4));
	}

	#[test]
	fn failed_verification_abandons_the_hinted_block() {
		let index = index(vec![
			raw_block("b1", None, "The asking price was £2,400,000 under offer.", 2),
			raw_block("b2", None, "the assessed Market Value of £1,950,000 as at June.", 7),
		]);
		let resolved = resolve_marker(
			&index,
			&marker(
				1,
				Some("b1"),
				None,
				Some("Market Value of £1,950,000"),
				"Market Value of £1,950,000",
			),
			&Config::default(),
		);

		assert_eq!(resolved.block_id.as_deref(), Some("b2"));
		assert_eq!(resolved.method, Strategy::AnchorExact);
	}

	#[test]
	fn fuzzy_anchor_match_is_low_confidence() {
		let index = index(vec![raw_block(
			"b1",
			None,
			"held under a full repairing and insuring lease until 2030.",
			3,
		)]);
		let resolved = resolve_marker(
			&index,
			&marker(
				1,
				None,
				None,
				Some("repairing and insuring lease agreement running"),
				"the repairing lease",
			),
			&Config::default(),
		);

		assert_eq!(resolved.method, Strategy::AnchorFuzzy);
		assert_eq!(resolved.confidence, Confidence::Low);
	}

	#[test]
	fn fuzzy_candidate_with_the_wrong_amount_is_rejected() {
		let index = index(vec![raw_block(
			"b-wrong",
			None,
			"The Market Value of £2,400,000 was reported by the previous valuer at review.",
			4,
		)]);
		let resolved = resolve_marker(
			&index,
			&marker(
				1,
				None,
				None,
				Some("Market Value of £1,950,000"),
				"Market Value of £1,950,000",
			),
			&Config::default(),
		);

		assert_eq!(resolved.method, Strategy::Unresolved);
		assert!(resolved.bbox.is_none());
		assert_eq!(resolved.confidence, Confidence::Low);
	}

	#[test]
	fn chunk_hint_scopes_the_candidate_set() {
		let index = index(vec![
			raw_block("b1", Some("c1"), "Rent passing of £90,000 per annum was agreed.", 5),
			raw_block("b2", Some("c2"), "Rent passing of £90,000 per annum was agreed.", 9),
		]);
		let resolved = resolve_marker(
			&index,
			&marker(1, None, Some("c2"), None, "rent of £90,000 per annum"),
			&Config::default(),
		);

		assert_eq!(resolved.method, Strategy::ChunkScoped);
		assert_eq!(resolved.block_id.as_deref(), Some("b2"));
	}

	#[test]
	fn orphan_search_prefers_later_pages_over_page_zero() {
		let body = "The assessed Market Value of the freehold interest is £1,950,000 as at the \
		            valuation date, reflecting the agreed rent and covenant strength.";
		let index = index(vec![raw_block("cover", None, body, 0), raw_block("body", None, body, 6)]);
		let found = orphan_search(&index, "Market Value of £1,950,000", &Config::default());

		assert_eq!(found.map(|(block, _)| block.block_id.as_str()), Some("body"));
	}

	#[test]
	fn orphan_search_skips_short_and_header_blocks() {
		let index = index(vec![
			raw_block("h1", None, "Market Value £1,950,000", 3),
			raw_block("h2", None, "VALUATION SUMMARY MARKET VALUE RENT TENURE AREA YIELD DATE PREPARED FOR LENDER PURPOSES FREEHOLD INTEREST £1,950,000 AS AT 30 JUNE REF 2024 051 FINAL", 3),
		]);
		let found = orphan_search(&index, "Market Value of £1,950,000", &Config::default());

		assert!(found.is_none());
	}

	#[test]
	fn empty_index_yields_unresolved() {
		let resolved = resolve_marker(
			&EvidenceIndex::default(),
			&marker(3, Some("b1"), None, None, "anything"),
			&Config::default(),
		);

		assert_eq!(resolved.method, Strategy::Unresolved);
		assert!(resolved.bbox.is_none());
		assert_eq!(resolved.confidence, Confidence::Low);
	}
}
