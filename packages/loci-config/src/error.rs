use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Could not read the configuration at {path:?}.")]
	Read { path: PathBuf, source: std::io::Error },
	#[error("Configuration at {path:?} is not valid TOML.")]
	Parse { path: PathBuf, source: toml::de::Error },
	#[error("Invalid configuration: {message}")]
	Validation { message: String },
}
