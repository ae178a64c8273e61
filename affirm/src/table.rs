use std::fmt::Write as _;

use crate::AffirmError;
use crate::AffirmResult;
use crate::fields::Fields;

/// Render rows as a bordered, numbered table. Column names come from the
/// first row's field names; every column is padded to its widest cell and
/// a separator row follows the header and each data row, so the output is
/// stable under reordering-free changes and easy to eyeball in a diff.
///
/// An empty slice cannot be rendered (there is no row to take the column
/// names from) and returns [`AffirmError::EmptyTable`].
///
/// # Panics
///
/// Panics when a row reports a different number of fields than the header,
/// which indicates a broken [`Fields`] implementation.
pub fn render_table<T: Fields>(rows: &[T]) -> AffirmResult<String> {
	let first = rows.first().ok_or(AffirmError::EmptyTable)?;
	let headers: Vec<&'static str> = first.fields().into_iter().map(|(name, _)| name).collect();

	let cells: Vec<Vec<String>> = rows
		.iter()
		.map(|row| row.fields().into_iter().map(|(_, text)| text).collect())
		.collect();

	let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
	for (idx, row) in cells.iter().enumerate() {
		assert!(
			row.len() == headers.len(),
			"row {idx} has {} field(s), header has {}",
			row.len(),
			headers.len(),
		);
		for (col, cell) in row.iter().enumerate() {
			if cell.len() > widths[col] {
				widths[col] = cell.len();
			}
		}
	}

	let mut out = String::new();
	out.push_str("   |");
	for (header, width) in headers.iter().zip(&widths) {
		column(&mut out, header, *width);
	}
	out.push('\n');
	separator_row(&mut out, &widths);
	for (idx, row) in cells.iter().enumerate() {
		let line_no = idx + 1;
		if line_no < 100 {
			let _ = write!(out, "{line_no:>2} |");
		} else {
			let _ = write!(out, "{:03}|", line_no % 1000);
		}
		for (cell, width) in row.iter().zip(&widths) {
			column(&mut out, cell, *width);
		}
		out.push('\n');
		separator_row(&mut out, &widths);
	}
	Ok(out)
}

fn column(out: &mut String, text: &str, width: usize) {
	let _ = write!(out, " {text:<width$} |");
}

fn separator_row(out: &mut String, widths: &[usize]) {
	out.push_str("---+");
	for width in widths {
		out.push('-');
		out.push_str(&"-".repeat(*width));
		out.push_str("-+");
	}
	out.push('\n');
}
