use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum AffirmError {
	#[error(transparent)]
	#[diagnostic(code(affirm::io_error))]
	Io(#[from] std::io::Error),

	#[error("file not found in memory store: `{0}`")]
	#[diagnostic(
		code(affirm::file_not_found),
		help("seed the file with `MemoryFiles::insert` before opening it")
	)]
	FileNotFound(String),

	#[error("invalid redaction pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(affirm::invalid_redaction),
		help("redaction patterns use the `regex` crate syntax")
	)]
	InvalidRedaction { pattern: String, reason: String },

	#[error("print_table requires at least one row")]
	#[diagnostic(
		code(affirm::empty_table),
		help("column names come from the first row, so an empty slice cannot be rendered")
	)]
	EmptyTable,
}

pub type AffirmResult<T> = Result<T, AffirmError>;
