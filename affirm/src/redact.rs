use regex::Regex;

use crate::AffirmError;
use crate::AffirmResult;

/// One pattern -> replacement substitution applied to captured output
/// before comparison, used to mask non-deterministic content such as
/// timestamps. Rules run in registration order and never touch the
/// expectation literal.
#[derive(Debug, Clone)]
pub struct Redaction {
	pattern: Regex,
	replacement: String,
}

impl Redaction {
	/// Compile a redaction rule. A malformed pattern is a configuration
	/// error for the whole session, not something to skip.
	pub fn new(pattern: &str, replacement: &str) -> AffirmResult<Self> {
		let compiled = Regex::new(pattern).map_err(|e| {
			AffirmError::InvalidRedaction {
				pattern: pattern.to_string(),
				reason: e.to_string(),
			}
		})?;
		Ok(Self {
			pattern: compiled,
			replacement: replacement.to_string(),
		})
	}

	/// Replace every match in `text`. Capture-group references in the
	/// replacement keep their `regex` crate semantics.
	pub fn apply(&self, text: &str) -> String {
		self.pattern
			.replace_all(text, self.replacement.as_str())
			.into_owned()
	}
}
