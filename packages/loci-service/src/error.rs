pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Resolution degrades locally on ambiguity; the only hard failure is an
/// evidence table that is structurally unusable.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Malformed evidence table: {message}")]
	MalformedEvidenceTable { message: String },
}
