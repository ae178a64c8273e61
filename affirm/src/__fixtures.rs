use std::sync::Arc;

use crate::Fields;
use crate::MemoryFiles;
use crate::OverrideSignal;
use crate::RecordingReporter;
use crate::Session;
use crate::UpdateGate;

/// A session wired to nullable collaborators, with every handle a test
/// needs to observe what happened.
pub(crate) struct NullableSession {
	pub(crate) session: Session,
	pub(crate) reporter: RecordingReporter,
	pub(crate) gate: UpdateGate,
	pub(crate) signal: Arc<OverrideSignal>,
	pub(crate) files: MemoryFiles,
}

/// Build a nullable session whose in-memory store holds a fake copy of the
/// calling test file: enough numbered `expect("")` lines that any later
/// call line in the test resolves to a rewritable line, mirroring how a
/// real update resolves the caller's own source.
#[track_caller]
pub(crate) fn nullable_session() -> NullableSession {
	let location = std::panic::Location::caller();
	let files = MemoryFiles::new();
	files.insert(location.file(), fake_source(location.line() + 100));
	let (session, reporter, gate, signal) = Session::nullable(files.clone());
	NullableSession {
		session,
		reporter,
		gate,
		signal,
		files,
	}
}

/// A file of numbered `expect("")` lines, one per line.
pub(crate) fn fake_source(lines: u32) -> String {
	let mut source = String::new();
	for number in 1..=lines {
		source.push_str(&format!("line {number}: expect(\"\")\n"));
	}
	source
}

/// Row type used by the table and field-printing tests.
pub(crate) struct Case {
	pub(crate) name: &'static str,
	pub(crate) have: i64,
	pub(crate) want: i64,
}

impl Fields for Case {
	fn fields(&self) -> Vec<(&'static str, String)> {
		vec![
			("name", format!("{:?}", self.name)),
			("have", self.have.to_string()),
			("want", self.want.to_string()),
		]
	}
}
