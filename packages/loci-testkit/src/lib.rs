//! Shared fixtures for exercising the resolution pipeline in tests.

use loci_config::Config;
use loci_domain::BoundingBox;
use loci_service::{AnswerInput, DocumentEvidence, ResolveRequest, Resolver, RetrievedBlock};

pub fn resolver() -> Resolver {
	Resolver::new(Config::default())
}

pub fn bbox(page: u32) -> BoundingBox {
	BoundingBox { left: 0.1, top: 0.15, width: 0.8, height: 0.2, page }
}

pub fn block(block_id: &str, content: &str, page: u32) -> RetrievedBlock {
	RetrievedBlock {
		block_id: block_id.to_string(),
		chunk_id: None,
		content: Some(content.to_string()),
		page: Some(page),
		bbox: Some(bbox(page)),
		confidence: 0.9,
	}
}

pub fn chunk_block(
	block_id: &str,
	chunk_id: &str,
	content: &str,
	page: u32,
) -> RetrievedBlock {
	RetrievedBlock { chunk_id: Some(chunk_id.to_string()), ..block(block_id, content, page) }
}

pub fn document(doc_id: &str, blocks: Vec<RetrievedBlock>) -> DocumentEvidence {
	DocumentEvidence { doc_id: doc_id.to_string(), blocks }
}

pub fn text_request(answer: &str, documents: Vec<DocumentEvidence>) -> ResolveRequest {
	ResolveRequest {
		answer: AnswerInput::Text(answer.to_string()),
		evidence: Some(documents),
	}
}
