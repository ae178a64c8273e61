use std::sync::Arc;
use std::sync::Mutex;

/// The parts of a test context the library calls: log a line, mark the
/// test failed, or abort it. The library only invokes these capabilities;
/// it never inspects their results.
///
/// `fail_now` is expected to end the test. [`PanicReporter`] panics;
/// [`RecordingReporter`] records the abort and returns, so callers must
/// treat a return from `fail_now` as "stop further work", not "the failure
/// was cancelled".
pub trait Reporter {
	/// Emit one human-readable message.
	fn log(&mut self, message: &str);

	/// Mark the test failed and keep running.
	fn fail(&mut self);

	/// Mark the test failed and abort it.
	fn fail_now(&mut self);
}

/// Default reporter for real test runs: logs to stderr and panics on
/// `fail_now`. Failures from `fail` are deferred until drop so the rest of
/// the test body still runs, then surface as a single panic.
#[derive(Debug, Default)]
pub struct PanicReporter {
	failures: usize,
}

impl Reporter for PanicReporter {
	fn log(&mut self, message: &str) {
		eprintln!("{message}");
	}

	fn fail(&mut self) {
		self.failures += 1;
	}

	fn fail_now(&mut self) {
		panic!("affirm: expectation failed");
	}
}

impl Drop for PanicReporter {
	fn drop(&mut self) {
		if self.failures > 0 && !std::thread::panicking() {
			panic!("affirm: {} deferred expectation failure(s)", self.failures);
		}
	}
}

/// Everything a [`RecordingReporter`] observed.
#[derive(Debug, Default, Clone)]
pub struct RecordedReport {
	/// Whether `fail` or `fail_now` was called.
	pub failed: bool,
	/// Whether `fail_now` was called.
	pub exited: bool,
	/// Every logged message, in order.
	pub messages: Vec<String>,
}

/// Reporter that records instead of panicking, for verifying how failures
/// are reported. Clones share one underlying report, so a test can keep a
/// handle while the session owns another.
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
	state: Arc<Mutex<RecordedReport>>,
}

impl RecordingReporter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of everything recorded so far.
	pub fn report(&self) -> RecordedReport {
		self.state.lock().expect("reporter state lock").clone()
	}

	/// Clear recorded state between assertions.
	pub fn reset(&self) {
		*self.state.lock().expect("reporter state lock") = RecordedReport::default();
	}
}

impl Reporter for RecordingReporter {
	fn log(&mut self, message: &str) {
		self.state
			.lock()
			.expect("reporter state lock")
			.messages
			.push(message.to_string());
	}

	fn fail(&mut self) {
		self.state.lock().expect("reporter state lock").failed = true;
	}

	fn fail_now(&mut self) {
		let mut state = self.state.lock().expect("reporter state lock");
		state.failed = true;
		state.exited = true;
	}
}
