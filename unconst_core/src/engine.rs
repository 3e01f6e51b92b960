use std::path::PathBuf;

use crate::Classification;
use crate::Construct;
use crate::Editor;
use crate::KnownNames;
use crate::Layout;
use crate::SetupBlock;
use crate::UnconstError;
use crate::UnconstResult;
use crate::classify_line;
use crate::locate_setup_block;
use crate::split_lines;

/// The rewritten form of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
	/// Output lines, each with its original terminator.
	pub lines: Vec<String>,
	/// Number of declarations and statements moved into the setup block.
	pub relocated: usize,
	/// The setup block the code was moved into.
	pub setup: SetupBlock,
}

impl Rewrite {
	/// The rewritten file as a single string.
	pub fn content(&self) -> String {
		self.lines.concat()
	}
}

/// Move every `const` declaration above the setup block into it.
///
/// `file` only identifies the input in error messages. Either the whole
/// rewrite succeeds or an error is returned; there is no partial output.
pub fn rewrite_lines(file: &str, lines: &[String], layout: Layout) -> UnconstResult<Rewrite> {
	let setup = locate_setup_block(lines, file)?;
	let mut editor = Editor::new(lines, setup, layout);
	let mut known = KnownNames::new();
	let mut relocated = 0;

	while !editor.reached_setup() {
		let cursor = editor.cursor();

		match classify_line(editor.above(), cursor, &known, file)? {
			Classification::Constant(declaration) => {
				tracing::debug!(file, line = cursor + 1, name = %declaration.name, "moving const");
				known.register(declaration.name.clone());
				let construct = Construct::Declaration(declaration);
				editor.insert_below(&construct);
				editor.replace_above(&construct);
				trace_offsets(&editor);
				relocated += 1;
			}
			Classification::Mutable { name } => {
				tracing::trace!(file, line = cursor + 1, name = %name, "registered let");
				known.register(name);
			}
			Classification::KnownStatement(statement) => {
				tracing::debug!(file, line = cursor + 1, name = %statement.name, "moving statement");
				let construct = Construct::Statement(statement);
				editor.insert_below(&construct);
				editor.replace_above(&construct);
				trace_offsets(&editor);
				relocated += 1;
			}
			Classification::Plain => {}
		}

		editor.next_line();
	}

	Ok(Rewrite {
		lines: editor.finish(),
		relocated,
		setup,
	})
}

fn trace_offsets(editor: &Editor<'_>) {
	tracing::trace!(
		above_offset = editor.above_offset(),
		below_offset = editor.below_offset(),
		setup = editor.setup_position(),
		"edit pair applied"
	);
}

/// [`rewrite_lines`] over a whole file's text.
pub fn rewrite_source(file: &str, content: &str, layout: Layout) -> UnconstResult<Rewrite> {
	rewrite_lines(file, &split_lines(content), layout)
}

/// A file whose content changes when rewritten.
#[derive(Debug, Clone)]
pub struct FileRewrite {
	pub path: PathBuf,
	/// Content currently on disk.
	pub original: String,
	/// Content after the rewrite.
	pub rewritten: String,
	/// Number of declarations and statements moved.
	pub relocated: usize,
	/// Whether a `beforeEach` block had to be created.
	pub synthesized_setup: bool,
}

/// A file that could not be rewritten. Nothing is written for it.
#[derive(Debug)]
pub struct FileFailure {
	pub path: PathBuf,
	pub error: UnconstError,
}

/// Outcome of rewriting a batch of files.
#[derive(Debug, Default)]
pub struct RewriteResult {
	/// Files whose content would change, in input order.
	pub changed: Vec<FileRewrite>,
	/// Files already in the desired shape.
	pub unchanged: Vec<PathBuf>,
	/// Files that failed to read or parse. Collected so one bad file does
	/// not hide problems in the rest.
	pub failures: Vec<FileFailure>,
}

impl RewriteResult {
	/// Returns true if nothing needs rewriting and nothing failed.
	pub fn is_ok(&self) -> bool {
		self.changed.is_empty() && self.failures.is_empty()
	}

	pub fn has_failures(&self) -> bool {
		!self.failures.is_empty()
	}

	/// Total constructs moved across all changed files.
	pub fn relocated_count(&self) -> usize {
		self.changed.iter().map(|rewrite| rewrite.relocated).sum()
	}
}

/// Compute the rewrite of every file in `paths` without touching the disk.
pub fn compute_rewrites(paths: &[PathBuf], layout: Layout) -> RewriteResult {
	let mut result = RewriteResult::default();

	for path in paths {
		let file = path.display().to_string();
		let original = match std::fs::read_to_string(path) {
			Ok(content) => content,
			Err(e) => {
				tracing::warn!(file, error = %e, "could not read file");
				result.failures.push(FileFailure {
					path: path.clone(),
					error: UnconstError::FileRead {
						path: file,
						reason: e.to_string(),
					},
				});
				continue;
			}
		};

		match rewrite_source(&file, &original, layout) {
			Ok(rewrite) => {
				let rewritten = rewrite.content();
				if rewritten == original {
					result.unchanged.push(path.clone());
				} else {
					result.changed.push(FileRewrite {
						path: path.clone(),
						original,
						rewritten,
						relocated: rewrite.relocated,
						synthesized_setup: rewrite.setup.is_synthesized(),
					});
				}
			}
			Err(error) => {
				tracing::debug!(file, error = %error, "rewrite failed");
				result.failures.push(FileFailure {
					path: path.clone(),
					error,
				});
			}
		}
	}

	result
}

/// Write every changed file back to disk. Failed files are left untouched.
///
/// A file that cannot be written moves from `changed` to `failures` and the
/// remaining files are still written.
pub fn write_rewrites(result: &mut RewriteResult) {
	for rewrite in std::mem::take(&mut result.changed) {
		match std::fs::write(&rewrite.path, &rewrite.rewritten) {
			Ok(()) => result.changed.push(rewrite),
			Err(e) => {
				let file = rewrite.path.display().to_string();
				tracing::warn!(file, error = %e, "could not write file");
				result.failures.push(FileFailure {
					path: rewrite.path,
					error: UnconstError::FileWrite {
						path: file,
						reason: e.to_string(),
					},
				});
			}
		}
	}
}
