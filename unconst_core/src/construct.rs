/// Default number of spaces per indentation level.
pub const DEFAULT_INDENT: usize = 2;

/// Indentation used when rendering moved code.
///
/// Declarations left in place are written at one level, the setup block
/// opener and closer at one level, and assignments inside the setup block
/// at two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
	/// Spaces per indentation level.
	pub indent: usize,
}

impl Default for Layout {
	fn default() -> Self {
		Self {
			indent: DEFAULT_INDENT,
		}
	}
}

impl Layout {
	pub fn new(indent: usize) -> Self {
		Self { indent }
	}

	/// A single indentation level as whitespace.
	pub fn unit(&self) -> String {
		" ".repeat(self.indent)
	}

	/// The opening line of a synthesized `beforeEach` block.
	pub fn setup_opener(&self, line_ending: &str) -> String {
		format!("{}beforeEach(() => {{{line_ending}", self.unit())
	}

	/// The closing line of a synthesized `beforeEach` block.
	pub fn setup_closer(&self, line_ending: &str) -> String {
		format!("{}}});{line_ending}", self.unit())
	}

	/// Prefix a raw body line with one indentation level. Whitespace-only
	/// lines collapse to their line ending.
	fn indent_line(&self, line: &str) -> String {
		if line.trim().is_empty() {
			line_ending(line).to_string()
		} else {
			format!("{}{line}", self.unit())
		}
	}
}

/// A `const` declaration that becomes a `let` declaration plus an
/// assignment inside `beforeEach`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
	pub name: String,
	/// Right-hand side lines. The first line starts right after the `=`.
	pub body: Vec<String>,
	/// The annotation between `:` and `=`, when present.
	pub type_annotation: Option<String>,
}

/// A statement whose leading identifier was declared earlier in the file,
/// e.g. `fooService.bar.and.returnValue(...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
	pub name: String,
	pub body: Vec<String>,
}

/// Anything the editor can relocate into the setup block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Construct {
	Declaration(Declaration),
	Statement(Statement),
}

impl Construct {
	pub fn name(&self) -> &str {
		match self {
			Self::Declaration(declaration) => &declaration.name,
			Self::Statement(statement) => &statement.name,
		}
	}

	pub fn body(&self) -> &[String] {
		match self {
			Self::Declaration(declaration) => &declaration.body,
			Self::Statement(statement) => &statement.body,
		}
	}

	/// Number of source lines this construct occupies.
	pub fn span(&self) -> usize {
		self.body().len()
	}

	/// The single line left at the original position, if this construct has
	/// one. Statements are removed outright.
	pub fn standalone(&self, layout: &Layout, line_ending: &str) -> Option<String> {
		let Self::Declaration(declaration) = self else {
			return None;
		};

		let rendered = match &declaration.type_annotation {
			Some(annotation) => {
				format!(
					"{}let {}: {annotation};{line_ending}",
					layout.unit(),
					declaration.name
				)
			}
			None => format!("{}let {};{line_ending}", layout.unit(), declaration.name),
		};

		Some(rendered)
	}

	/// The lines inserted inside the setup block.
	pub fn setup_lines(&self, layout: &Layout) -> Vec<String> {
		match self {
			Self::Declaration(declaration) => {
				let mut lines = Vec::with_capacity(declaration.body.len());
				if let Some((first, rest)) = declaration.body.split_first() {
					let value = first.trim();
					let separator = if value.is_empty() { " =" } else { " = " };
					lines.push(format!(
						"{}{}{}{separator}{value}{}",
						layout.unit(),
						layout.unit(),
						declaration.name,
						line_ending(first)
					));
					lines.extend(rest.iter().map(|line| layout.indent_line(line)));
				}
				lines
			}
			Self::Statement(statement) => {
				statement
					.body
					.iter()
					.map(|line| layout.indent_line(line))
					.collect()
			}
		}
	}
}

/// The trailing line terminator of `line`: `"\r\n"`, `"\n"` or `""`.
pub fn line_ending(line: &str) -> &str {
	if line.ends_with("\r\n") {
		"\r\n"
	} else if line.ends_with('\n') {
		"\n"
	} else {
		""
	}
}

/// Split `content` into lines, keeping each line's terminator so that
/// concatenating the result reproduces `content` exactly.
pub fn split_lines(content: &str) -> Vec<String> {
	content.split_inclusive('\n').map(str::to_string).collect()
}
