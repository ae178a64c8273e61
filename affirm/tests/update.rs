//! End-to-end update flow through the public surface, against an
//! in-memory source tree.

use affirm::MemoryFiles;
use affirm::Session;

/// A fake copy of this test file: numbered `expect("")` lines, enough that
/// any call line below resolves to a rewritable line.
fn seeded_files() -> MemoryFiles {
	let files = MemoryFiles::new();
	let source: String = (1..=200)
		.map(|number| format!("line {number}: expect(\"\")\n"))
		.collect();
	files.insert(file!(), source);
	files
}

#[test]
fn accepting_output_rewrites_the_callers_source_line() {
	let files = seeded_files();
	let (mut session, reporter, gate, signal) = Session::nullable(files.clone());
	signal.set_env(true);

	session.print("accepted output");
	let call_line = line!() + 1;
	session.expect("");

	assert!(gate.is_set());
	assert!(reporter.report().failed);

	let content = files.get(file!()).expect("seeded source present");
	let lines: Vec<&str> = content.split('\n').collect();
	assert_eq!(
		lines[call_line as usize - 1],
		format!("line {call_line}: expect(\"accepted output\")")
	);
	// Every other line is untouched.
	assert_eq!(
		lines[call_line as usize - 2],
		format!("line {}: expect(\"\")", call_line - 1)
	);
	assert_eq!(
		lines[call_line as usize],
		format!("line {}: expect(\"\")", call_line + 1)
	);
}

#[test]
fn only_one_acceptance_wins_per_gate() {
	let files = seeded_files();
	let (mut session, reporter, gate, signal) = Session::nullable(files);
	signal.set_flag(true);

	session.print("first acceptance");
	session.expect("");
	assert!(gate.is_set());

	reporter.reset();
	session.print("second acceptance");
	session.expect("");

	let report = reporter.report();
	assert!(report.failed);
	assert!(
		report
			.messages
			.iter()
			.any(|message| message.contains("already updated a test file"))
	);
}

#[test]
#[ignore = "example of accepting new output: run with AFFIRM_UPDATE set to fill in the literal"]
fn accepting_example() {
	let mut session = Session::new();
	session.print_value("answer", &42);
	session.expect("");
}
