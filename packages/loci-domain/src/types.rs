use serde::{Deserialize, Serialize};

/// Page-relative rectangle with coordinates normalized to the 0.0-1.0 range.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct BoundingBox {
	pub left: f32,
	pub top: f32,
	pub width: f32,
	pub height: f32,
	pub page: u32,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
	Low,
	Medium,
	High,
}

/// One unit of source text with a known document, page, and bbox location.
/// Built once per answer cycle from retrieval metadata; never mutated.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EvidenceBlock {
	pub doc_id: String,
	pub block_id: String,
	pub chunk_id: Option<String>,
	pub content: String,
	pub page: u32,
	pub bbox: BoundingBox,
	pub confidence: f32,
}

impl BoundingBox {
	pub fn is_normalized(&self) -> bool {
		[self.left, self.top, self.width, self.height]
			.iter()
			.all(|value| value.is_finite() && (0.0..=1.0).contains(value))
	}
}
