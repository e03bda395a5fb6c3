use ahash::AHashMap;
use regex::Regex;

use crate::strategy::ResolvedCitation;
use loci_domain::{numbers, terms, verify};

const MONTHS: &[(&str, u32)] = &[
	("january", 1),
	("february", 2),
	("march", 3),
	("april", 4),
	("may", 5),
	("june", 6),
	("july", 7),
	("august", 8),
	("september", 9),
	("october", 10),
	("november", 11),
	("december", 12),
];

/// Canonical identity of a cited fact, used to detect when two markers cite
/// the same thing in different words.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FactKey {
	pub kind: FactKind,
	pub value: String,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FactKind {
	Date,
	Rating,
	Amount,
	Name,
	Other,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordOutcome {
	Recorded,
	/// The fact was already recorded under another marker number; this number
	/// now aliases the canonical one.
	Duplicate { canonical: u32 },
	/// The number is already bound to a different fact. The occurrence is left
	/// for the repair pass to split.
	Skipped,
}

/// Accumulates resolved citations for one answer, collapsing markers that cite
/// the same fact and remembering which numbers alias which.
#[derive(Debug, Default)]
pub struct CitationRecorder {
	entries: Vec<ResolvedCitation>,
	keys: Vec<FactKey>,
	by_number: AHashMap<u32, usize>,
	aliases: AHashMap<u32, u32>,
}

impl CitationRecorder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&mut self, number: u32, citation: ResolvedCitation) -> RecordOutcome {
		let key = fact_key(&citation.cited_text);

		if let Some(&position) = self.by_number.get(&number) {
			if self.keys[position] == key {
				return RecordOutcome::Duplicate { canonical: number };
			}

			tracing::debug!(number, "Marker number reused for a distinct fact; left for repair.");

			return RecordOutcome::Skipped;
		}

		for (position, existing) in self.keys.iter().enumerate() {
			if *existing != key {
				continue;
			}

			let entry = &self.entries[position];
			let same_block =
				entry.block_id.is_some() && entry.block_id == citation.block_id;
			let unmistakable =
				matches!(key.kind, FactKind::Date | FactKind::Rating | FactKind::Name);

			if same_block || unmistakable {
				let canonical = entry.citation_number;

				self.aliases.insert(number, canonical);

				return RecordOutcome::Duplicate { canonical };
			}
		}

		self.by_number.insert(number, self.entries.len());
		self.entries.push(citation);
		self.keys.push(key);

		RecordOutcome::Recorded
	}

	/// The marker number whose entry this number stands for, following a
	/// duplicate alias when one was recorded.
	pub fn canonical(&self, number: u32) -> Option<u32> {
		if let Some(&canonical) = self.aliases.get(&number) {
			return Some(canonical);
		}

		self.by_number.contains_key(&number).then_some(number)
	}

	pub fn entry(&self, number: u32) -> Option<&ResolvedCitation> {
		let canonical = self.canonical(number)?;
		let position = *self.by_number.get(&canonical)?;

		Some(&self.entries[position])
	}

	pub fn entries(&self) -> &[ResolvedCitation] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Classifies a cited fact by its most identifying feature. A date outranks a
/// rating outranks an amount, so "EPC rating of B issued 3 June 2024" keys on
/// the date.
pub(crate) fn fact_key(text: &str) -> FactKey {
	if let Some(date) = canonical_date(text) {
		return FactKey { kind: FactKind::Date, value: date };
	}

	let lowered = terms::normalize_text(text);

	if (lowered.contains("rating") || lowered.contains("rated"))
		&& let Some(band) = rating_band(&lowered)
	{
		return FactKey { kind: FactKind::Rating, value: band };
	}
	if verify::has_value_language(text)
		&& let Some(amount) = numbers::largest_number(text)
	{
		return FactKey { kind: FactKind::Amount, value: amount };
	}
	if let Some(name) = proper_name(text) {
		return FactKey { kind: FactKind::Name, value: name };
	}

	FactKey { kind: FactKind::Other, value: lowered }
}

/// First recognizable date in `text`, canonicalized to `YYYY-MM-DD`.
fn canonical_date(text: &str) -> Option<String> {
	let iso = Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").ok()?;

	if let Some(caps) = iso.captures(text) {
		return Some(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]));
	}

	let day_first = Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+([A-Za-z]+)\s+(\d{4})\b").ok()?;

	if let Some(caps) = day_first.captures(text)
		&& let Some(month) = month_number(&caps[2])
		&& let Ok(day) = caps[1].parse::<u32>()
	{
		return Some(format!("{}-{month:02}-{day:02}", &caps[3]));
	}

	let month_first = Regex::new(r"(?i)\b([A-Za-z]+)\s+(\d{1,2}),?\s+(\d{4})\b").ok()?;

	if let Some(caps) = month_first.captures(text)
		&& let Some(month) = month_number(&caps[1])
		&& let Ok(day) = caps[2].parse::<u32>()
	{
		return Some(format!("{}-{month:02}-{day:02}", &caps[3]));
	}

	let slashed = Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").ok()?;

	if let Some(caps) = slashed.captures(text)
		&& let (Ok(day), Ok(month)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>())
	{
		return Some(format!("{}-{month:02}-{day:02}", &caps[3]));
	}

	None
}

fn month_number(name: &str) -> Option<u32> {
	let lowered = name.to_lowercase();

	MONTHS
		.iter()
		.find(|(month, _)| *month == lowered)
		.map(|&(_, number)| number)
}

/// The band letter or score attached to rating language, e.g. "EPC rating of
/// B" keys on "B".
fn rating_band(lowered: &str) -> Option<String> {
	let pattern = Regex::new(r"\b(?:rating|rated|band)\s*(?:of\s*)?([a-g]|\d{1,3})\b").ok()?;

	pattern.captures(lowered).map(|caps| caps[1].to_uppercase())
}

/// The longest run of two or more capitalized words, as a lowercase key.
fn proper_name(text: &str) -> Option<String> {
	let mut best: Option<Vec<&str>> = None;
	let mut run: Vec<&str> = Vec::new();

	for raw in text.split_whitespace() {
		let word = raw.trim_matches(|c: char| !c.is_alphanumeric());

		if word.chars().next().is_some_and(|c| c.is_uppercase()) {
			run.push(word);
		} else {
			if run.len() >= 2 && best.as_ref().map(|b| run.len() > b.len()).unwrap_or(true) {
				best = Some(run.clone());
			}

			run.clear();
		}
	}

	if run.len() >= 2 && best.as_ref().map(|b| run.len() > b.len()).unwrap_or(true) {
		best = Some(run);
	}

	best.map(|words| words.join(" ").to_lowercase())
}
