use std::borrow::Cow;

/// Strip a leading blank line and the shared leading-whitespace prefix from
/// a multi-line block. Text without a line break is returned unchanged, so
/// single-line expectations are never reflowed.
///
/// The shared prefix is the true minimum leading-whitespace run across all
/// lines, blank lines included: an empty line contributes zero and pins the
/// prefix there, disabling stripping for the whole block. Expectation
/// literals that should dedent must therefore close on an indented line
/// rather than a bare newline.
///
/// Applied identically to captured output and to the expectation literal,
/// which is what lets authors indent expectations to match the surrounding
/// code without affecting the comparison.
pub fn normalize(text: &str) -> Cow<'_, str> {
	if !text.contains('\n') {
		return Cow::Borrowed(text);
	}

	let text = text.strip_prefix('\n').unwrap_or(text);
	let prefix = text.split('\n').map(leading_whitespace).min().unwrap_or(0);
	if prefix == 0 {
		return Cow::Borrowed(text);
	}

	let lines: Vec<&str> = text
		.split('\n')
		.map(|line| strip_chars(line, prefix))
		.collect();
	Cow::Owned(lines.join("\n"))
}

pub(crate) fn is_multiline(text: &str) -> bool {
	text.contains('\n')
}

/// Length of the leading whitespace run, in characters.
fn leading_whitespace(line: &str) -> usize {
	line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Drop the first `count` characters. Counted in characters, not bytes, so
/// a tab and a multi-byte space strip the same way they were measured.
fn strip_chars(line: &str, count: usize) -> &str {
	match line.char_indices().nth(count) {
		Some((idx, _)) => &line[idx..],
		None => "",
	}
}
