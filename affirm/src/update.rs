use std::panic::Location;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tracing::debug;

use crate::file_access::FileAccess;
use crate::file_access::MemoryFiles;
use crate::file_access::OsFiles;
use crate::gate::UpdateGate;
use crate::patch::splice_expectation;
use crate::report::Reporter;

/// Environment variable whose presence (any value) opts in to rewriting
/// test files.
pub const UPDATE_ENV_VAR: &str = "AFFIRM_UPDATE";

/// Process argument that opts in to rewriting test files.
pub const UPDATE_FLAG: &str = "--affirm-update";

pub(crate) const UPDATE_DISABLED_MESSAGE: &str = "affirm: update is disabled. enable with the \
                                                  --affirm-update flag or set the AFFIRM_UPDATE \
                                                  env var to anything";
const ALREADY_UPDATED_MESSAGE: &str =
	"affirm: already updated a test file. skipping update. rerun tests to try again";
const UPDATING_MESSAGE: &str = "affirm: updating test file. rerun tests to verify";

/// Where a comparison entry point was invoked: the file and line that get
/// rewritten when an empty expectation is accepted.
///
/// Captured with [`Location::caller`], so every function between the public
/// entry point and [`CallSite::capture`] must be `#[track_caller]`. That
/// chain is the one load-bearing contract of the update flow; a dedicated
/// test asserts the captured location matches `file!()`/`line!()` and fails
/// loudly if the chain breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
	pub file: &'static str,
	pub line: u32,
}

impl CallSite {
	/// Resolve the immediate caller's location.
	#[track_caller]
	pub(crate) fn capture() -> Self {
		let location = Location::caller();
		Self {
			file: location.file(),
			line: location.line(),
		}
	}
}

/// Update opt-in signal: read from the host environment in production,
/// pinned by a test through [`OverrideSignal`].
enum UpdateSignal {
	Environment,
	Overridden(Arc<OverrideSignal>),
}

/// Test double for the update opt-in. The flag and env contributions can
/// be flipped independently and combine with OR, like the real signal.
#[derive(Debug, Default)]
pub struct OverrideSignal {
	flag_enabled: AtomicBool,
	env_enabled: AtomicBool,
}

impl OverrideSignal {
	pub fn set_flag(&self, enabled: bool) {
		self.flag_enabled.store(enabled, Ordering::SeqCst);
	}

	pub fn set_env(&self, enabled: bool) {
		self.env_enabled.store(enabled, Ordering::SeqCst);
	}
}

/// Owns one rewrite attempt end to end: gate, file access, and splicing.
pub(crate) struct Updater {
	gate: UpdateGate,
	files: Box<dyn FileAccess>,
	signal: UpdateSignal,
}

impl Updater {
	/// Production wiring: process-wide gate, real filesystem, opt-in from
	/// the host environment.
	pub(crate) fn from_environment() -> Self {
		Self {
			gate: UpdateGate::global(),
			files: Box::new(OsFiles),
			signal: UpdateSignal::Environment,
		}
	}

	/// Test wiring: isolated gate, in-memory files, overridable opt-in.
	/// Returns the collaborator handles alongside the updater.
	pub(crate) fn nullable(files: MemoryFiles) -> (Self, UpdateGate, Arc<OverrideSignal>) {
		let gate = UpdateGate::isolated();
		let signal = Arc::new(OverrideSignal::default());
		let updater = Self {
			gate: gate.clone(),
			files: Box::new(files),
			signal: UpdateSignal::Overridden(signal.clone()),
		};
		(updater, gate, signal)
	}

	/// Whether the external opt-in signal is present.
	pub(crate) fn enabled(&self) -> bool {
		match &self.signal {
			UpdateSignal::Environment => {
				std::env::var_os(UPDATE_ENV_VAR).is_some()
					|| std::env::args().any(|arg| arg == UPDATE_FLAG)
			}
			UpdateSignal::Overridden(signal) => {
				signal.flag_enabled.load(Ordering::SeqCst)
					|| signal.env_enabled.load(Ordering::SeqCst)
			}
		}
	}

	/// Splice `captured` into the empty expectation literal at `call_site`
	/// and rewrite the file in one write. At most one update succeeds per
	/// gate lifetime; losers are told the gate is spent. An open or write
	/// failure aborts the test with no partial mutation. The test that
	/// triggered the update still fails this run, since the new expectation
	/// is unverified until the next one.
	pub(crate) fn update(&self, reporter: &mut dyn Reporter, call_site: CallSite, captured: &str) {
		if !self.gate.acquire() {
			reporter.log(ALREADY_UPDATED_MESSAGE);
			return;
		}

		debug!(
			file = call_site.file,
			line = call_site.line,
			"rewriting expectation at call site"
		);

		let mut handle = match self.files.open_for_rewrite(Path::new(call_site.file)) {
			Ok(handle) => handle,
			Err(e) => {
				reporter.log(&format!("affirm: failed to open test source for update: {e}"));
				reporter.fail_now();
				return;
			}
		};

		let rewritten = splice_expectation(handle.content(), call_site.line, captured);

		reporter.log(UPDATING_MESSAGE);
		if let Err(e) = handle.rewrite(&rewritten) {
			reporter.log(&format!("affirm: failed to write updated test source: {e}"));
			reporter.fail_now();
		}
	}
}
