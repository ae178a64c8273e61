//! End-to-end behavior of the default session: real reporter, real panics.

use std::fmt::Write as _;

use affirm::Fields;
use affirm::Session;

struct TestCase {
	name: &'static str,
	have: i64,
	want: i64,
}

impl Fields for TestCase {
	fn fields(&self) -> Vec<(&'static str, String)> {
		vec![
			("name", format!("{:?}", self.name)),
			("have", self.have.to_string()),
			("want", self.want.to_string()),
		]
	}
}

#[test]
fn walkthrough_captures_and_matches_structured_output() {
	let mut session = Session::new();

	writeln!(session, "You can write to the session directly").expect("session write");
	session.print_value("print_value", &"labels a single value");
	session.print_fields(&TestCase {
		name: "Adding 1 + 2",
		have: 3,
		want: 3,
	});
	session.print_separator();
	session.println("Sections read better with separators");

	session.redact(r"\d{4}-\d{2}-\d{2}", "1970-01-01");
	session.println("Dates like 2029-03-17 are masked before comparison");

	session.expect(
		r#"
You can write to the session directly
print_value: "labels a single value"
TestCase.name: "Adding 1 + 2"
TestCase.have: 3
TestCase.want: 3
--------------------------------------------------------------------------------
Sections read better with separators
Dates like 1970-01-01 are masked before comparison
"#,
	);
}

#[test]
fn comparisons_reset_the_capture_between_expectations() {
	let mut session = Session::new();

	session.print("first");
	session.expect("first");

	session.print("second");
	session.expect("second");
}

#[test]
fn indented_expectations_match_flat_output() {
	let mut session = Session::new();
	session.println("alpha");
	session.println("beta");
	session.expect(
		"
		alpha
		beta
		",
	);
}

#[test]
#[should_panic(expected = "affirm: expectation failed")]
fn mismatch_panics_immediately() {
	let mut session = Session::new();
	session.print("got");
	session.expect("want");
}

#[test]
#[should_panic(expected = "deferred expectation failure")]
fn continued_mismatch_panics_when_the_session_drops() {
	let mut session = Session::new();
	session.print("got");
	session.expect_and_continue("want");

	// The session keeps working after a continued failure.
	session.print("more");
	session.expect_and_continue("also wrong");
}
