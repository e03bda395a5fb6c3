//! Citation resolution for generated answers: every marker the generator
//! emitted is tied back to a document, page, and bounding box, the numbering
//! is repaired and made dense, and duplicate citations are collapsed.

mod error;

pub mod index;
pub mod markers;
pub mod recorder;
pub mod renumber;
pub mod strategy;

pub use self::{
	error::{Error, Result},
	index::{DocumentEvidence, EvidenceIndex, RetrievedBlock},
	markers::{AnswerInput, AnswerSegment, CitationMarker},
	recorder::{CitationRecorder, RecordOutcome},
	strategy::{ResolvedCitation, Strategy},
};

use serde::{Deserialize, Serialize};

use loci_config::Config;

/// One answer to resolve, paired with the evidence retrieval returned for it.
/// `evidence` is `None` when retrieval was skipped entirely.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ResolveRequest {
	pub answer: AnswerInput,
	#[serde(default)]
	pub evidence: Option<Vec<DocumentEvidence>>,
}

/// The repaired answer text and its citation table. Marker numbers in `text`
/// are exactly `[1]..[k]` in order of first appearance, matching
/// `citations[n - 1]`.
#[derive(Clone, Debug, Serialize)]
pub struct Resolution {
	pub text: String,
	pub citations: Vec<ResolvedCitation>,
}

#[derive(Debug)]
pub struct Resolver {
	cfg: Config,
}

impl Resolver {
	pub fn new(cfg: Config) -> Self {
		Self { cfg }
	}

	pub fn resolve(&self, request: &ResolveRequest) -> Result<Resolution> {
		let (text, markers) = markers::extract(&request.answer);
		let index = EvidenceIndex::build(request.evidence.as_deref(), !markers.is_empty())?;
		let mut recorder = CitationRecorder::new();
		let mut resolutions = Vec::with_capacity(markers.len());

		for marker in &markers {
			let resolution = strategy::resolve_marker(&index, marker, &self.cfg);

			recorder.record(marker.number, resolution.clone());
			resolutions.push(resolution);
		}

		tracing::debug!(
			markers = markers.len(),
			blocks = index.len(),
			"Resolved citation markers."
		);

		let (text, citations) =
			renumber::renumber_and_repair(&text, &markers, &resolutions, &recorder, &self.cfg);

		Ok(Resolution { text, citations })
	}
}
