pub mod narrow;
pub mod numbers;
pub mod terms;
pub mod types;
pub mod verify;

pub use types::{BoundingBox, Confidence, EvidenceBlock};
pub use verify::MatchReport;
