//! Lexical splicing of captured output into an empty expectation literal.
//!
//! Deliberately not a parser: the rewrite only runs after the comparison
//! entry point saw an empty expectation, so the call site is known to hold
//! an empty string literal and a line-oriented scan is enough to find and
//! replace it. Anything else on the target line is preserved byte for byte.

/// Name of the comparison entry point. When the empty literal shares its
/// line with the call, scanning skips past the call's opening parenthesis
/// so a quote in earlier code cannot be mistaken for the literal.
const ENTRY_POINT: &str = "expect";

/// Replace the empty string literal at or after the 1-indexed `call_line`
/// with `captured`, returning the rewritten file content. Every untouched
/// line is preserved exactly.
///
/// # Panics
///
/// Panics when no line at or after `call_line` contains a quote, or when
/// the first literal found there is not empty. Both mean the routine was
/// invoked against a call site it cannot safely rewrite, which is a bug in
/// the calling chain rather than a recoverable condition.
pub(crate) fn splice_expectation(source: &str, call_line: u32, captured: &str) -> String {
	let lines: Vec<&str> = source.split('\n').collect();
	let start = (call_line as usize).saturating_sub(1);
	let target = lines
		.iter()
		.enumerate()
		.skip(start)
		.find(|(_, line)| line.contains('"'))
		.map_or_else(
			|| panic!("no string literal found at or after line {call_line}; cannot rewrite"),
			|(idx, _)| idx,
		);

	let mut out = String::with_capacity(source.len() + captured.len() + 16);
	for (idx, line) in lines.iter().enumerate() {
		if idx > 0 {
			out.push('\n');
		}
		if idx == target {
			splice_line(&mut out, line, captured);
		} else {
			out.push_str(line);
		}
	}
	out
}

fn splice_line(out: &mut String, line: &str, captured: &str) {
	let mut rest = line;

	if let Some(call) = rest.find(ENTRY_POINT) {
		if let Some(open) = rest[call..].find('(') {
			let split = call + open + 1;
			out.push_str(&rest[..split]);
			rest = &rest[split..];
		}
	}

	let quote = rest.find('"').map_or_else(
		|| panic!("target line lost its quote during scanning: {line:?}"),
		|idx| idx,
	);
	let (literal_start, literal_end) = empty_literal_bounds(rest, quote);

	// Typically leading whitespace, or an argument prefix when the call
	// spans lines.
	out.push_str(&rest[..literal_start]);
	write_literal(out, captured, leading_tabs(line));
	out.push_str(&rest[literal_end..]);
}

/// Bounds of the empty literal within `rest`, given the byte index of its
/// first quote. Accepts `""` with an optional raw prefix (`r""`, `r#""#`,
/// ...); the prefix and the matching trailing hashes are consumed so the
/// spliced literal fully replaces the old one.
fn empty_literal_bounds(rest: &str, quote: usize) -> (usize, usize) {
	let bytes = rest.as_bytes();
	assert!(
		bytes.get(quote + 1) == Some(&b'"'),
		"expected an empty string literal on the target line, found: {rest:?}",
	);

	let hashes = bytes[..quote].iter().rev().take_while(|b| **b == b'#').count();
	let prefix_start = quote - hashes;
	let has_raw_prefix = prefix_start > 0
		&& bytes[prefix_start - 1] == b'r'
		&& (prefix_start < 2 || !is_ident_byte(bytes[prefix_start - 2]));
	if !has_raw_prefix {
		return (quote, quote + 2);
	}

	let trailing = &bytes[quote + 2..];
	assert!(
		trailing.len() >= hashes && trailing[..hashes].iter().all(|b| *b == b'#'),
		"unbalanced raw string hashes on the target line: {rest:?}",
	);
	(prefix_start - 1, quote + 2 + hashes)
}

fn is_ident_byte(byte: u8) -> bool {
	byte == b'_' || byte.is_ascii_alphanumeric()
}

/// Append `captured` as a single string literal. Single-line text becomes a
/// normal quoted literal via debug escaping. Multi-line text becomes a raw
/// string that opens with a line break and indents every captured line one
/// tab past the call line's depth, so the rewritten block reads aligned in
/// the source and dedents back to the captured text at comparison time.
fn write_literal(out: &mut String, captured: &str, call_depth: usize) {
	use std::fmt::Write as _;

	if !captured.contains('\n') {
		let _ = write!(out, "{captured:?}");
		return;
	}

	let hashes = raw_hashes_for(captured);
	out.push('r');
	out.push_str(&"#".repeat(hashes));
	out.push('"');
	let indent = "\t".repeat(call_depth + 1);
	for line in captured.split('\n') {
		out.push('\n');
		out.push_str(&indent);
		out.push_str(line);
	}
	out.push('"');
	out.push_str(&"#".repeat(hashes));
}

/// Smallest hash count that lets a raw string contain `captured`: one more
/// than the longest `#` run following any quote, or zero when the text has
/// no quotes at all.
fn raw_hashes_for(captured: &str) -> usize {
	let bytes = captured.as_bytes();
	let mut max_run = None;
	let mut idx = 0;
	while idx < bytes.len() {
		if bytes[idx] == b'"' {
			let run = bytes[idx + 1..].iter().take_while(|b| **b == b'#').count();
			max_run = Some(max_run.map_or(run, |max: usize| max.max(run)));
			idx += run + 1;
		} else {
			idx += 1;
		}
	}
	max_run.map_or(0, |max| max + 1)
}

/// Leading-tab depth of the call line; rewritten multi-line literals indent
/// one level deeper.
fn leading_tabs(line: &str) -> usize {
	line.bytes().take_while(|b| *b == b'\t').count()
}
