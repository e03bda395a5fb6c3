use std::ops::Range;

use ahash::AHashMap;
use regex::Regex;

use crate::{
	markers::CitationMarker,
	recorder::{self, CitationRecorder, FactKind},
	strategy::{ResolvedCitation, Strategy},
};
use loci_config::Config;
use loci_domain::terms;

/// What one marker occurrence ultimately stands for. `Entry` is a recorded
/// citation keyed by its canonical marker number; `Own` is an occurrence that
/// split away from its written number and keeps its own resolution.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
enum Identity {
	Entry(u32),
	Own(usize),
}

/// Rewrites marker numbers to a dense `[1]..[k]` sequence in first-occurrence
/// order, repairing degenerate generator output on the way: a single number
/// repeated across distinct facts is fanned back out, a number reused for a
/// different fact is split, and unresolvable markers are removed from the
/// text. Applied to its own output the pass changes nothing.
pub fn renumber_and_repair(
	text: &str,
	markers: &[CitationMarker],
	resolutions: &[ResolvedCitation],
	recorder: &CitationRecorder,
	cfg: &Config,
) -> (String, Vec<ResolvedCitation>) {
	if markers.is_empty() {
		return (text.to_string(), Vec::new());
	}

	let collapsed = is_collapsed(markers, resolutions);

	if collapsed {
		tracing::warn!(
			number = markers[0].number,
			occurrences = markers.len(),
			"One marker number repeated across distinct facts; repairing by position."
		);
	}

	let mut first_by_number: AHashMap<u32, (usize, String)> = AHashMap::new();
	let mut identities: Vec<Option<Identity>> = Vec::with_capacity(markers.len());

	for (position, marker) in markers.iter().enumerate() {
		let identity = if collapsed {
			own_identity(position, resolutions, &identities, recorder)
		} else {
			match first_by_number.get(&marker.number).cloned() {
				None => {
					let context = context_before(text, marker.span.start, cfg);

					first_by_number.insert(marker.number, (position, context));

					match recorder.entry(marker.number) {
						Some(entry) if entry.method != Strategy::Unresolved => Some(
							Identity::Entry(
								recorder.canonical(marker.number).unwrap_or(marker.number),
							),
						),
						_ => own_identity(position, resolutions, &identities, recorder),
					}
				},
				Some((first, first_context)) => {
					let context = context_before(text, marker.span.start, cfg);

					if context == first_context {
						identities[first]
					} else {
						tracing::warn!(
							number = marker.number,
							"Marker number reused for a distinct fact; splitting."
						);

						own_identity(position, resolutions, &identities, recorder)
					}
				},
			}
		};

		identities.push(identity);
	}

	let mut assigned: AHashMap<Identity, u32> = AHashMap::new();
	let mut order: Vec<Identity> = Vec::new();
	let mut edits: Vec<(Range<usize>, String)> = Vec::new();

	for (position, identity) in identities.iter().enumerate() {
		let span = markers[position].span.clone();

		match identity {
			None => {
				// Eat one preceding space so removal leaves no gap.
				let start = if span.start > 0 && text.as_bytes()[span.start - 1] == b' ' {
					span.start - 1
				} else {
					span.start
				};

				edits.push((start..span.end, String::new()));
			},
			Some(identity) => {
				let number = match assigned.get(identity) {
					Some(&number) => number,
					None => {
						let number = order.len() as u32 + 1;

						assigned.insert(*identity, number);
						order.push(*identity);

						number
					},
				};
				let replacement = format!("[{number}]");

				if text[span.clone()] != replacement {
					edits.push((span, replacement));
				}
			},
		}
	}

	let mut repaired = text.to_string();

	edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));

	for (range, replacement) in edits {
		repaired.replace_range(range, &replacement);
	}

	let mut citations = Vec::with_capacity(order.len());

	for (position, identity) in order.iter().enumerate() {
		let Some(entry) = entry_for(*identity, resolutions, recorder) else { continue };
		let mut citation = entry.clone();

		citation.citation_number = position as u32 + 1;
		citations.push(citation);
	}

	(repaired, citations)
}

/// Every marker shows the same number while the per-occurrence facts differ.
fn is_collapsed(markers: &[CitationMarker], resolutions: &[ResolvedCitation]) -> bool {
	if markers.len() < 2 {
		return false;
	}

	let number = markers[0].number;

	if markers.iter().any(|marker| marker.number != number) {
		return false;
	}

	let first_key = recorder::fact_key(&resolutions[0].cited_text);

	resolutions
		.iter()
		.skip(1)
		.any(|resolution| recorder::fact_key(&resolution.cited_text) != first_key)
}

/// An occurrence keeping its own resolution, unless an earlier identity
/// already cites the same fact, or the occurrence is unresolvable.
fn own_identity(
	position: usize,
	resolutions: &[ResolvedCitation],
	identities: &[Option<Identity>],
	recorder: &CitationRecorder,
) -> Option<Identity> {
	let candidate = &resolutions[position];

	if candidate.method == Strategy::Unresolved {
		tracing::warn!(
			number = candidate.citation_number,
			"Citation could not be resolved to evidence; marker removed."
		);

		return None;
	}

	let key = recorder::fact_key(&candidate.cited_text);
	let unmistakable = matches!(key.kind, FactKind::Date | FactKind::Rating | FactKind::Name);

	for identity in identities.iter().flatten() {
		let Some(entry) = entry_for(*identity, resolutions, recorder) else { continue };
		let same_block = entry.block_id.is_some() && entry.block_id == candidate.block_id;

		if recorder::fact_key(&entry.cited_text) == key && (unmistakable || same_block) {
			return Some(*identity);
		}
	}

	Some(Identity::Own(position))
}

fn entry_for<'a>(
	identity: Identity,
	resolutions: &'a [ResolvedCitation],
	recorder: &'a CitationRecorder,
) -> Option<&'a ResolvedCitation> {
	match identity {
		Identity::Entry(number) => recorder.entry(number),
		Identity::Own(position) => resolutions.get(position),
	}
}

/// Normalized preceding context with markers blanked out, so the window reads
/// identically before and after renumbering.
fn context_before(text: &str, at: usize, cfg: &Config) -> String {
	let Ok(pattern) = Regex::new(r"\[\d+\]") else { return String::new() };
	let cleaned = pattern.replace_all(&text[..at], "");
	let normalized = terms::normalize_text(&cleaned);
	let window = cfg.repair.context_window_chars as usize;
	let skip = normalized.chars().count().saturating_sub(window);

	normalized.chars().skip(skip).collect()
}
