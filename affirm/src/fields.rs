/// Ordered `(name, rendered text)` pairs for a value's visible fields.
///
/// This is the structural-introspection seam behind
/// [`print_fields`](crate::Session::print_fields) and
/// [`print_table`](crate::Session::print_table): implementors choose which
/// fields are visible and how each one renders. Debug formatting is the
/// usual choice for strings, so the rendered text keeps its quotes.
///
/// ```
/// use affirm::Fields;
///
/// struct Case {
/// 	name: &'static str,
/// 	have: i64,
/// 	want: i64,
/// }
///
/// impl Fields for Case {
/// 	fn fields(&self) -> Vec<(&'static str, String)> {
/// 		vec![
/// 			("name", format!("{:?}", self.name)),
/// 			("have", self.have.to_string()),
/// 			("want", self.want.to_string()),
/// 		]
/// 	}
/// }
/// ```
pub trait Fields {
	/// The visible fields, in declaration order.
	fn fields(&self) -> Vec<(&'static str, String)>;

	/// Prefix used by [`print_fields`](crate::Session::print_fields).
	/// Defaults to the short type name; return an empty string to drop the
	/// prefix entirely.
	fn label(&self) -> &'static str
	where
		Self: Sized,
	{
		short_type_name::<Self>()
	}
}

/// Last segment of a type's path, matching how the type is written at its
/// use site.
fn short_type_name<T>() -> &'static str {
	let full = std::any::type_name::<T>();
	full.rsplit("::").next().unwrap_or(full)
}
