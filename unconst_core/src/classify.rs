use std::collections::HashSet;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::LazyLock;

use derive_more::Deref;
use regex::Regex;

use crate::Declaration;
use crate::Statement;
use crate::UnconstError;
use crate::UnconstResult;

static CONST_MARKER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\bconst\s").expect("valid const marker"));
static LET_MARKER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\blet\s").expect("valid let marker"));

/// `const name: Type = value`. The annotation may contain `=>`; the
/// assignment `=` is the first one not followed by `=` or `>`.
static CONST_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^\s*(?:export\s+)?const\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?::(?P<type>(?:[^=]|=>)+?))?\s*(?P<assign>=)(?:[^=>]|$)",
	)
	.expect("valid const declaration pattern")
});
static LET_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\s*(?:export\s+)?let\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?:[:;=,]|$)")
		.expect("valid let declaration pattern")
});

/// Identifiers declared so far in the current file.
#[derive(Debug, Default, Clone, Deref)]
pub struct KnownNames(HashSet<String>);

impl KnownNames {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record `name`. Names are never forgotten during a pass.
	pub fn register(&mut self, name: impl Into<String>) {
		self.0.insert(name.into());
	}

	pub fn is_known(&self, name: &str) -> bool {
		self.0.contains(name)
	}
}

/// What starts at a given line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
	/// A `const` declaration to move into the setup block.
	Constant(Declaration),
	/// A `let` declaration. Already in the desired shape; only its name is
	/// recorded.
	Mutable { name: String },
	/// A statement that starts with a previously declared name.
	KnownStatement(Statement),
	/// Anything else.
	Plain,
}

/// Classify the line at `cursor`.
///
/// Only `lines` (everything above the setup block) is ever read, so a body
/// can never swallow the block itself. Declarations win over known names.
pub fn classify_line(
	lines: &[String],
	cursor: usize,
	known: &KnownNames,
	file: &str,
) -> UnconstResult<Classification> {
	let Some(line) = lines.get(cursor) else {
		return Ok(Classification::Plain);
	};

	if is_comment(line) {
		return Ok(Classification::Plain);
	}

	if CONST_MARKER.is_match(line) {
		return parse_const_declaration(lines, cursor, file).map(Classification::Constant);
	}

	if LET_MARKER.is_match(line) {
		let captures = LET_DECLARATION
			.captures(line)
			.ok_or_else(|| unparseable_declaration(line, cursor, file))?;
		return Ok(Classification::Mutable {
			name: captures["name"].to_string(),
		});
	}

	if let Some(name) = leading_identifier(line) {
		if known.is_known(name) {
			let body = extract_body(lines, cursor, 0, file)?;
			return Ok(Classification::KnownStatement(Statement {
				name: name.to_string(),
				body,
			}));
		}
	}

	Ok(Classification::Plain)
}

fn parse_const_declaration(
	lines: &[String],
	cursor: usize,
	file: &str,
) -> UnconstResult<Declaration> {
	let line = &lines[cursor];
	let captures = CONST_DECLARATION
		.captures(line)
		.ok_or_else(|| unparseable_declaration(line, cursor, file))?;

	let name = captures["name"].to_string();
	let type_annotation = captures
		.name("type")
		.map(|annotation| annotation.as_str().trim().to_string())
		.filter(|annotation| !annotation.is_empty());
	let Some(assign) = captures.name("assign") else {
		return Err(unparseable_declaration(line, cursor, file));
	};
	let body = extract_body(lines, cursor, assign.end(), file)?;

	Ok(Declaration {
		name,
		body,
		type_annotation,
	})
}

fn unparseable_declaration(line: &str, cursor: usize, file: &str) -> UnconstError {
	UnconstError::UnparseableDeclaration {
		file: file.to_string(),
		line: cursor + 1,
		text: line.trim().to_string(),
	}
}

/// The text before the first `.`, `=` or `(`, trimmed. `None` when the line
/// has none of them.
pub fn leading_identifier(line: &str) -> Option<&str> {
	let trimmed = line.trim();
	let end = trimmed.find(['.', '=', '('])?;
	Some(trimmed[..end].trim())
}

fn is_comment(line: &str) -> bool {
	let trimmed = line.trim_start();
	trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')
}

/// Collect the lines of the statement starting at `start` (first line cut
/// at `column`) up to and including the line that ends it.
///
/// A line ends the statement when its trimmed text ends with `;` and every
/// bracket opened by the statement has been closed again. Running out of
/// lines is a [`UnconstError::RunawayBody`].
pub fn extract_body(
	lines: &[String],
	start: usize,
	column: usize,
	file: &str,
) -> UnconstResult<Vec<String>> {
	let mut body = Vec::new();
	let mut depth = BracketDepth::default();

	for (offset, line) in lines.iter().enumerate().skip(start) {
		let text = if offset == start {
			line.get(column..).unwrap_or_default()
		} else {
			line.as_str()
		};

		depth.feed(text);
		body.push(text.to_string());

		if text.trim_end().ends_with(';') && depth.is_balanced() {
			return Ok(body);
		}
	}

	Err(UnconstError::RunawayBody {
		file: file.to_string(),
		line: start + 1,
	})
}

/// Running `()[]{}` nesting depth across the lines of one statement, ignoring
/// brackets inside string, template and regex literals and comments.
#[derive(Debug, Default)]
struct BracketDepth {
	depth: i64,
	/// A template literal left open at the end of the previous line.
	in_template: bool,
	/// A `/* ... */` comment left open at the end of the previous line.
	in_block_comment: bool,
}

impl BracketDepth {
	fn feed(&mut self, text: &str) {
		let mut quote = if self.in_template { Some('`') } else { None };
		let mut chars = text.chars().peekable();
		// Last significant character outside literals and comments.
		let mut previous: Option<char> = None;

		while let Some(ch) = chars.next() {
			if self.in_block_comment {
				if ch == '*' && chars.peek() == Some(&'/') {
					chars.next();
					self.in_block_comment = false;
				}
				continue;
			}

			if let Some(open) = quote {
				if ch == '\\' {
					chars.next();
				} else if ch == open {
					quote = None;
				}
				continue;
			}

			match ch {
				'\'' | '"' | '`' => quote = Some(ch),
				'/' if chars.peek() == Some(&'/') => break,
				'/' if chars.peek() == Some(&'*') => {
					chars.next();
					self.in_block_comment = true;
					continue;
				}
				'/' if opens_regex(previous) => skip_regex(&mut chars),
				'(' | '[' | '{' => self.depth += 1,
				')' | ']' | '}' => self.depth -= 1,
				_ => {}
			}

			if !ch.is_whitespace() {
				previous = Some(ch);
			}
		}

		// Only template literals and block comments may span lines.
		self.in_template = quote == Some('`');
	}

	fn is_balanced(&self) -> bool {
		self.depth <= 0 && !self.in_template && !self.in_block_comment
	}
}

/// A `/` starts a regex literal at the start of a line or after a character
/// that cannot end an operand.
fn opens_regex(previous: Option<char>) -> bool {
	previous.is_none_or(|ch| {
		matches!(
			ch,
			'=' | '(' | ',' | ':' | '[' | '!' | '&' | '|' | '?' | '{' | ';'
		)
	})
}

/// Consume a regex literal up to its closing `/`, skipping escapes and
/// character classes.
fn skip_regex(chars: &mut Peekable<Chars<'_>>) {
	let mut in_class = false;

	while let Some(ch) = chars.next() {
		match ch {
			'\\' => {
				chars.next();
			}
			'[' => in_class = true,
			']' => in_class = false,
			'/' if !in_class => return,
			_ => {}
		}
	}
}
