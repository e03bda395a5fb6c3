use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};
use loci_domain::{BoundingBox, EvidenceBlock};

/// Per-document block metadata as it arrives from the retrieval collaborator.
/// Fields that a faithful block must carry are optional here so one malformed
/// block never poisons the table.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DocumentEvidence {
	pub doc_id: String,
	pub blocks: Vec<RetrievedBlock>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RetrievedBlock {
	pub block_id: String,
	#[serde(default)]
	pub chunk_id: Option<String>,
	#[serde(default)]
	pub content: Option<String>,
	#[serde(default)]
	pub page: Option<u32>,
	#[serde(default)]
	pub bbox: Option<BoundingBox>,
	#[serde(default = "default_block_confidence")]
	pub confidence: f32,
}

fn default_block_confidence() -> f32 {
	1.0
}

/// Flat, read-only view over every usable evidence block for one answer
/// cycle, plus the doc/block lookup table the resolution strategies query.
#[derive(Debug, Default)]
pub struct EvidenceIndex {
	blocks: Vec<EvidenceBlock>,
	by_doc: AHashMap<String, AHashMap<String, usize>>,
}

impl EvidenceIndex {
	/// Flattens retrieval metadata into the index. Individual malformed
	/// blocks are excluded with a debug note; the only hard failures are an
	/// absent table while markers exist, or a table where every block is
	/// malformed.
	pub fn build(
		evidence: Option<&[DocumentEvidence]>,
		markers_present: bool,
	) -> Result<Self> {
		let Some(documents) = evidence else {
			if markers_present {
				return Err(Error::MalformedEvidenceTable {
					message: "Evidence table is absent while citation markers are present."
						.to_string(),
				});
			}

			return Ok(Self::default());
		};

		let mut index = Self::default();
		let mut seen_blocks = 0_usize;

		for document in documents {
			for raw in &document.blocks {
				seen_blocks += 1;

				let Some(block) = adapt_block(&document.doc_id, raw) else {
					tracing::debug!(
						doc_id = document.doc_id.as_str(),
						block_id = raw.block_id.as_str(),
						"Evidence block missing content or bbox; excluded from index."
					);

					continue;
				};

				index
					.by_doc
					.entry(block.doc_id.clone())
					.or_default()
					.insert(block.block_id.clone(), index.blocks.len());
				index.blocks.push(block);
			}
		}

		if seen_blocks > 0 && index.blocks.is_empty() {
			return Err(Error::MalformedEvidenceTable {
				message: "Every evidence block is missing required fields.".to_string(),
			});
		}

		Ok(index)
	}

	pub fn is_empty(&self) -> bool {
		self.blocks.is_empty()
	}

	pub fn len(&self) -> usize {
		self.blocks.len()
	}

	pub fn blocks(&self) -> &[EvidenceBlock] {
		&self.blocks
	}

	/// Direct block lookup, scoped to a document when a hint is present,
	/// searching every document otherwise.
	pub fn lookup(&self, doc_id: Option<&str>, block_id: &str) -> Option<&EvidenceBlock> {
		if let Some(doc_id) = doc_id {
			return self
				.by_doc
				.get(doc_id)
				.and_then(|blocks| blocks.get(block_id))
				.map(|&position| &self.blocks[position]);
		}

		self.by_doc
			.values()
			.find_map(|blocks| blocks.get(block_id))
			.map(|&position| &self.blocks[position])
	}

	pub fn chunk_blocks<'a>(
		&'a self,
		chunk_id: &'a str,
	) -> impl Iterator<Item = &'a EvidenceBlock> {
		self.blocks.iter().filter(move |block| block.chunk_id.as_deref() == Some(chunk_id))
	}
}

fn adapt_block(doc_id: &str, raw: &RetrievedBlock) -> Option<EvidenceBlock> {
	let content = raw.content.as_deref()?.trim();

	if content.is_empty() {
		return None;
	}

	let bbox = raw.bbox?;

	Some(EvidenceBlock {
		doc_id: doc_id.to_string(),
		block_id: raw.block_id.clone(),
		chunk_id: raw.chunk_id.clone(),
		content: content.to_string(),
		page: raw.page.unwrap_or(bbox.page),
		bbox,
		confidence: raw.confidence,
	})
}
