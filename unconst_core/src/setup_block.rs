use std::sync::LazyLock;

use regex::Regex;

use crate::UnconstError;
use crate::UnconstResult;

static DESCRIBE_OPENER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\b[fx]?describe\(").expect("valid describe pattern"));
static TEST_CASE_OPENER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\b[fx]?it\(").expect("valid test case pattern"));
static SETUP_OPENER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\bbeforeEach\(").expect("valid beforeEach pattern"));

/// Where the setup block came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOrigin {
	/// A `beforeEach(` line already present in the file.
	Existing,
	/// No `beforeEach(` preceded the first nested `describe(` or `it(`, so
	/// an empty block is inserted in front of that line.
	Synthesized,
}

/// The setup block that receives relocated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupBlock {
	/// Index of the opening line. For a synthesized block this is the index
	/// of the trigger line, which the new opener is inserted in front of.
	pub line: usize,
	pub origin: SetupOrigin,
}

impl SetupBlock {
	pub fn existing(line: usize) -> Self {
		Self {
			line,
			origin: SetupOrigin::Existing,
		}
	}

	pub fn synthesized(line: usize) -> Self {
		Self {
			line,
			origin: SetupOrigin::Synthesized,
		}
	}

	pub fn is_synthesized(&self) -> bool {
		self.origin == SetupOrigin::Synthesized
	}
}

/// Find the `beforeEach(` block that owns the file's fixtures.
///
/// Scanning stops at the first `beforeEach(`. A second `describe(` or any
/// `it(` seen before that means the outer suite has no setup block, and one
/// is synthesized at that line instead.
pub fn locate_setup_block(lines: &[String], file: &str) -> UnconstResult<SetupBlock> {
	let mut describe_count = 0;

	for (index, line) in lines.iter().enumerate() {
		if DESCRIBE_OPENER.is_match(line) {
			describe_count += 1;
		}

		if describe_count > 1 || TEST_CASE_OPENER.is_match(line) {
			tracing::debug!(file, line = index + 1, "synthesizing beforeEach block");
			return Ok(SetupBlock::synthesized(index));
		}

		if SETUP_OPENER.is_match(line) {
			tracing::trace!(file, line = index + 1, "found beforeEach block");
			return Ok(SetupBlock::existing(index));
		}
	}

	Err(UnconstError::MissingSetupBlock {
		file: file.to_string(),
	})
}
