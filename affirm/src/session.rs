use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use similar::TextDiff;

use crate::fields::Fields;
use crate::file_access::MemoryFiles;
use crate::gate::UpdateGate;
use crate::normalize::is_multiline;
use crate::normalize::normalize;
use crate::redact::Redaction;
use crate::report::PanicReporter;
use crate::report::RecordingReporter;
use crate::report::Reporter;
use crate::table::render_table;
use crate::update::CallSite;
use crate::update::OverrideSignal;
use crate::update::UPDATE_DISABLED_MESSAGE;
use crate::update::Updater;

/// Lines of context shown around each change in a mismatch diff.
const DIFF_CONTEXT: usize = 3;

const SEPARATOR_WIDTH: usize = 80;

/// One approval-testing session: a capture buffer, the redactions that
/// clean it, and the collaborators that report mismatches and accept new
/// output. Owned by one test; never shared across concurrently running
/// tests (the update gate is the only cross-session state, and it manages
/// its own synchronization).
///
/// `Session` implements [`std::fmt::Write`], so `write!`/`writeln!` work
/// directly on it alongside the print helpers.
pub struct Session {
	reporter: Box<dyn Reporter>,
	buffer: String,
	redactions: Vec<Redaction>,
	updater: Updater,
}

impl Session {
	/// Session wired for a real test run: mismatches panic, and accepted
	/// output rewrites the real source file behind the process-wide update
	/// gate.
	pub fn new() -> Self {
		Self {
			reporter: Box::new(PanicReporter::default()),
			buffer: String::new(),
			redactions: Vec::new(),
			updater: Updater::from_environment(),
		}
	}

	/// Fully observable session for testing failure handling itself:
	/// nothing panics and nothing touches the real filesystem. Returns the
	/// session plus handles to the recorded report, the isolated update
	/// gate, and the overridable opt-in signal.
	pub fn nullable(
		files: MemoryFiles,
	) -> (Self, RecordingReporter, UpdateGate, Arc<OverrideSignal>) {
		let reporter = RecordingReporter::new();
		let (updater, gate, signal) = Updater::nullable(files);
		let session = Self {
			reporter: Box::new(reporter.clone()),
			buffer: String::new(),
			redactions: Vec::new(),
			updater,
		};
		(session, reporter, gate, signal)
	}

	/// Append a value to the capture buffer.
	pub fn print(&mut self, value: impl fmt::Display) {
		let _ = write!(self.buffer, "{value}");
	}

	/// Append a value and a line break.
	pub fn println(&mut self, value: impl fmt::Display) {
		let _ = writeln!(self.buffer, "{value}");
	}

	/// Append `name: value` using the value's debug rendering.
	pub fn print_value(&mut self, name: &str, value: &impl fmt::Debug) {
		let _ = writeln!(self.buffer, "{name}: {value:?}");
	}

	/// Append one `Label.name: text` line per visible field of `value`.
	pub fn print_fields(&mut self, value: &impl Fields) {
		let label = value.label();
		for (name, text) in value.fields() {
			if label.is_empty() {
				let _ = writeln!(self.buffer, "{name}: {text}");
			} else {
				let _ = writeln!(self.buffer, "{label}.{name}: {text}");
			}
		}
	}

	/// Append a table of rows. Column names come from the first row, so an
	/// empty slice fails the session.
	pub fn print_table(&mut self, rows: &[impl Fields]) {
		match render_table(rows) {
			Ok(table) => self.buffer.push_str(&table),
			Err(e) => {
				self.reporter.log(&format!("affirm: print_table: {e}"));
				self.reporter.fail_now();
			}
		}
	}

	/// Append a line of dashes, for visually separating sections of
	/// captured output.
	pub fn print_separator(&mut self) {
		let _ = writeln!(self.buffer, "{}", "-".repeat(SEPARATOR_WIDTH));
	}

	/// Register a pattern -> replacement rule applied to captured output
	/// before every comparison, for masking non-deterministic content. A
	/// malformed pattern fails the session immediately.
	pub fn redact(&mut self, pattern: &str, replacement: &str) {
		match Redaction::new(pattern, replacement) {
			Ok(rule) => self.redactions.push(rule),
			Err(e) => {
				self.reporter.log(&format!("affirm: {e}"));
				self.reporter.fail_now();
			}
		}
	}

	/// Drop every registered redaction.
	pub fn clear_redactions(&mut self) {
		self.redactions.clear();
	}

	/// Compare everything captured since the last comparison against
	/// `want`, failing the test immediately on mismatch. Both sides are
	/// normalized identically (leading blank line and shared indentation
	/// stripped), so the expectation can be indented to match the
	/// surrounding code.
	///
	/// An empty `want` asks the library to accept the captured output by
	/// rewriting this call's literal in place when updating is enabled
	/// (see [`UPDATE_ENV_VAR`](crate::UPDATE_ENV_VAR) and
	/// [`UPDATE_FLAG`](crate::UPDATE_FLAG)); the test still fails this run
	/// either way, because the accepted output is unverified until rerun.
	#[track_caller]
	pub fn expect(&mut self, want: &str) {
		if !self.check_and_log(want) {
			self.reporter.fail_now();
		}
	}

	/// Like [`Session::expect`], except the test keeps running after a
	/// failure.
	#[track_caller]
	pub fn expect_and_continue(&mut self, want: &str) {
		if !self.check_and_log(want) {
			self.reporter.fail();
		}
	}

	/// Shared comparison flow: normalize, redact, compare, report, and
	/// always drain the buffer so the next assertion starts clean.
	#[track_caller]
	fn check_and_log(&mut self, want: &str) -> bool {
		let call_site = CallSite::capture();
		let mut got = normalize(&self.buffer).into_owned();
		for redaction in &self.redactions {
			got = redaction.apply(&got);
		}
		let matched = self.log_diff_if_different(want, &got);
		self.buffer.clear();

		if want.is_empty() {
			// An empty expectation is a request to accept the captured
			// output, never a passing assertion: the spliced-in literal is
			// unverified until the next run.
			if self.updater.enabled() {
				let Self {
					updater, reporter, ..
				} = self;
				updater.update(reporter.as_mut(), call_site, &got);
			} else {
				self.reporter.log(UPDATE_DISABLED_MESSAGE);
			}
			return false;
		}
		matched
	}

	fn log_diff_if_different(&mut self, want: &str, got: &str) -> bool {
		// The diff-vs-got/want decision looks at the raw expectation, so an
		// expectation written as an indented block diffs as a block even
		// when it normalizes to a single line.
		let want_is_multiline = is_multiline(want);
		let want = normalize(want);
		let matched = got == want.as_ref();
		if matched {
			return true;
		}

		if want_is_multiline || is_multiline(got) {
			let diff = TextDiff::from_lines(got, want.as_ref());
			let message = format!(
				"\n{}",
				diff.unified_diff()
					.context_radius(DIFF_CONTEXT)
					.header("got", "want")
			);
			self.reporter.log(&message);
		} else {
			self.reporter
				.log(&format!("\n got: {got:?}\nwant: {:?}", want.as_ref()));
		}
		false
	}
}

impl Default for Session {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Write for Session {
	fn write_str(&mut self, s: &str) -> fmt::Result {
		self.buffer.push_str(s);
		Ok(())
	}
}
