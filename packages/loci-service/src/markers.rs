use std::ops::Range;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Generator output arrives either as raw text carrying `[n]` markers and
/// structured hint tokens, or as alternating text/cite segments.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AnswerInput {
	Text(String),
	Segments(Vec<AnswerSegment>),
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnswerSegment {
	Text {
		content: String,
	},
	Cite {
		anchor_quote: String,
		citation_number: u32,
		#[serde(default)]
		block_id: Option<String>,
		#[serde(default)]
		doc_id: Option<String>,
		#[serde(default)]
		chunk_id: Option<String>,
	},
}

/// One marker occurrence found in the generator's output, with whatever hints
/// it carried. `span` indexes into the normalized text where every marker has
/// been rewritten to plain `[n]` form.
#[derive(Clone, Debug)]
pub struct CitationMarker {
	pub number: u32,
	pub span: Range<usize>,
	pub block_id: Option<String>,
	pub doc_id: Option<String>,
	pub chunk_id: Option<String>,
	pub anchor_quote: Option<String>,
	pub cited_text: String,
}

const MARKER_FORMS: &str =
	r"(?:\[(\d+)\])|(?:(?:\[ID:\s*([^\]]+)\])?\((BLOCK|CHUNK)_CITE_ID_([A-Za-z0-9_.-]+)\))";

/// Normalizes the answer into plain text where every marker is `[n]`, and
/// returns the markers in order of appearance.
pub fn extract(answer: &AnswerInput) -> (String, Vec<CitationMarker>) {
	match answer {
		AnswerInput::Text(text) => extract_from_text(text),
		AnswerInput::Segments(segments) => extract_from_segments(segments),
	}
}

fn extract_from_text(text: &str) -> (String, Vec<CitationMarker>) {
	let Ok(pattern) = Regex::new(MARKER_FORMS) else { return (text.to_string(), Vec::new()) };
	// Hint-form markers carry no written number; they are assigned fresh
	// numbers above the largest explicit one so the repair pass can renumber
	// everything consistently.
	let mut next_synthetic = pattern
		.captures_iter(text)
		.filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()))
		.max()
		.unwrap_or(0)
		+ 1;
	let mut out = String::with_capacity(text.len());
	let mut markers = Vec::new();
	let mut last = 0_usize;

	for caps in pattern.captures_iter(text) {
		let Some(whole) = caps.get(0) else { continue };

		out.push_str(&text[last..whole.start()]);

		last = whole.end();

		let (number, doc_id, block_id, chunk_id) = match caps.get(1) {
			Some(explicit) => (explicit.as_str().parse::<u32>().unwrap_or(0), None, None, None),
			None => {
				let doc_id = caps.get(2).map(|m| m.as_str().trim().to_string());
				let hint_id = caps.get(4).map(|m| m.as_str().to_string());
				let (block_id, chunk_id) = match caps.get(3).map(|m| m.as_str()) {
					Some("BLOCK") => (hint_id, None),
					Some("CHUNK") => (None, hint_id),
					_ => (None, None),
				};
				let number = next_synthetic;

				next_synthetic += 1;

				(number, doc_id, block_id, chunk_id)
			},
		};
		let anchor_quote = trailing_quote(&out);
		let start = out.len();

		out.push_str(&format!("[{number}]"));

		let cited_text = match &anchor_quote {
			Some(quote) => quote.clone(),
			None => preceding_fact(&out[..start]),
		};

		markers.push(CitationMarker {
			number,
			span: start..out.len(),
			block_id,
			doc_id,
			chunk_id,
			anchor_quote,
			cited_text,
		});
	}

	out.push_str(&text[last..]);

	(out, markers)
}

fn extract_from_segments(segments: &[AnswerSegment]) -> (String, Vec<CitationMarker>) {
	let mut out = String::new();
	let mut markers = Vec::new();

	for segment in segments {
		match segment {
			AnswerSegment::Text { content } => out.push_str(content),
			AnswerSegment::Cite { anchor_quote, citation_number, block_id, doc_id, chunk_id } => {
				let start = out.len();

				out.push_str(&format!("[{citation_number}]"));

				let quote = anchor_quote.trim();
				let cited_text = if quote.is_empty() {
					preceding_fact(&out[..start])
				} else {
					quote.to_string()
				};

				markers.push(CitationMarker {
					number: *citation_number,
					span: start..out.len(),
					block_id: block_id.clone(),
					doc_id: doc_id.clone(),
					chunk_id: chunk_id.clone(),
					anchor_quote: (!quote.is_empty()).then(|| quote.to_string()),
					cited_text,
				});
			},
		}
	}

	(out, markers)
}

/// A double-quoted phrase sitting immediately before the marker is the
/// generator's anchor quote.
fn trailing_quote(text: &str) -> Option<String> {
	let trimmed = text.trim_end();
	let closing = trimmed.strip_suffix('"')?;
	let opening = closing.rfind('"')?;
	let quote = closing[opening + 1..].trim();

	if quote.chars().count() < 3 {
		return None;
	}

	Some(quote.to_string())
}

/// The sentence/phrase immediately preceding a marker position; the cited
/// fact when no anchor quote is available.
fn preceding_fact(text: &str) -> String {
	let mut slice = text.trim_end();

	loop {
		if slice.is_empty() {
			return String::new();
		}

		let start = sentence_start(slice);
		let fragment = slice[start..].trim().trim_matches('"').trim();

		if !fragment.is_empty() {
			return fragment.to_string();
		}
		if start == 0 {
			return String::new();
		}

		slice = slice[..start - 1].trim_end();
	}
}

/// Byte offset where the trailing sentence of `slice` begins. A period only
/// terminates a sentence when followed by whitespace, so decimal amounts
/// survive intact.
fn sentence_start(slice: &str) -> usize {
	for (position, ch) in slice.char_indices().rev() {
		match ch {
			'\n' | ']' => return position + 1,
			'.' | '!' | '?' => {
				let after = &slice[position + 1..];

				if after.is_empty()
					|| after.starts_with(|c: char| c.is_whitespace() || c == '"')
				{
					return position + 1;
				}
			},
			_ => {},
		}
	}

	0
}
