use std::ops::Range;

use crate::Construct;
use crate::Layout;
use crate::SetupBlock;
use crate::line_ending;

/// A single change to the file, addressed in source line numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
	/// Overwrite one source line.
	Replace { line: usize, text: String },
	/// Drop a range of source lines.
	Delete { lines: Range<usize> },
	/// Append lines inside the setup block, after everything inserted so far.
	Insert { lines: Vec<String> },
}

/// Cursor over the lines above the setup block plus the log of edits made
/// while walking them.
///
/// The source is never mutated. The cursor is a source line number, and
/// the two offsets track how far the setup block has moved up (lines
/// deleted above it) and how much it has grown (lines inserted into it), so
/// that positions in the rewritten file can be reported at any point.
/// [`Editor::finish`] replays the edit log to build the output.
#[derive(Debug)]
pub struct Editor<'a> {
	source: &'a [String],
	setup: SetupBlock,
	layout: Layout,
	cursor: usize,
	above_offset: isize,
	below_offset: usize,
	edits: Vec<Edit>,
}

impl<'a> Editor<'a> {
	pub fn new(source: &'a [String], setup: SetupBlock, layout: Layout) -> Self {
		Self {
			source,
			setup,
			layout,
			cursor: 0,
			above_offset: 0,
			below_offset: 0,
			edits: Vec::new(),
		}
	}

	/// The source line under the cursor.
	pub fn cursor(&self) -> usize {
		self.cursor
	}

	/// Lines before the setup block, the only ones the classifier may read.
	pub fn above(&self) -> &'a [String] {
		&self.source[..self.setup.line]
	}

	pub fn next_line(&mut self) {
		self.cursor += 1;
	}

	pub fn reached_setup(&self) -> bool {
		self.cursor >= self.setup.line
	}

	/// Net line count change above the setup block. Never positive.
	pub fn above_offset(&self) -> isize {
		self.above_offset
	}

	/// Lines inserted into the setup block so far.
	pub fn below_offset(&self) -> usize {
		self.below_offset
	}

	/// Current index of the setup block's opening line in the output.
	pub fn setup_position(&self) -> usize {
		self.setup.line.saturating_add_signed(self.above_offset)
	}

	/// Output index where the next inserted line lands.
	pub fn insertion_point(&self) -> usize {
		self.setup_position() + 1 + self.below_offset
	}

	pub fn edits(&self) -> &[Edit] {
		&self.edits
	}

	/// Append the construct's setup block form after everything inserted so
	/// far.
	pub fn insert_below(&mut self, construct: &Construct) {
		let lines = construct.setup_lines(&self.layout);
		tracing::trace!(
			name = construct.name(),
			at = self.insertion_point(),
			count = lines.len(),
			"inserting into beforeEach"
		);
		self.below_offset += lines.len();
		self.edits.push(Edit::Insert { lines });
	}

	/// Collapse the construct at the cursor: declarations shrink to a single
	/// `let` line, statements disappear. The cursor is left on the last
	/// line the construct occupied.
	pub fn replace_above(&mut self, construct: &Construct) {
		let start = self.cursor;
		let span = construct.span().max(1);
		let ending = line_ending(&self.source[start]);

		let trailing = match construct.standalone(&self.layout, ending) {
			Some(text) => {
				self.edits.push(Edit::Replace { line: start, text });
				start + 1..start + span
			}
			None => start..start + span,
		};

		if !trailing.is_empty() {
			self.above_offset -= trailing.len() as isize;
			self.edits.push(Edit::Delete { lines: trailing });
		}

		self.cursor = start + span - 1;
		tracing::trace!(
			name = construct.name(),
			above = self.above_offset,
			below = self.below_offset,
			setup = self.setup_position(),
			"collapsed original lines"
		);
	}

	/// Build the rewritten file.
	pub fn finish(self) -> Vec<String> {
		let middle = self.setup.line;
		let mut above: Vec<Option<String>> = self.source[..middle]
			.iter()
			.cloned()
			.map(Some)
			.collect();
		let mut inserted = Vec::with_capacity(self.below_offset);

		for edit in self.edits {
			match edit {
				Edit::Replace { line, text } => above[line] = Some(text),
				Edit::Delete { lines } => above[lines].fill(None),
				Edit::Insert { lines } => inserted.extend(lines),
			}
		}

		let mut output = Vec::with_capacity(self.source.len() + inserted.len() + 3);
		output.extend(above.into_iter().flatten());

		if self.setup.is_synthesized() {
			let ending = self
				.source
				.get(middle)
				.map(|line| line_ending(line))
				.filter(|ending| !ending.is_empty())
				.unwrap_or("\n");
			output.push(self.layout.setup_opener(ending));
			output.extend(inserted);
			output.push(self.layout.setup_closer(ending));
			output.push(ending.to_string());
			output.extend(self.source[middle..].iter().cloned());
		} else {
			output.push(self.source[middle].clone());
			output.extend(inserted);
			output.extend(self.source[middle + 1..].iter().cloned());
		}

		output
	}
}
