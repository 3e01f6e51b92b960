use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum UnconstError {
	#[error(transparent)]
	#[diagnostic(code(unconst::io_error))]
	Io(#[from] std::io::Error),

	#[error("missing `beforeEach` block in {file}")]
	#[diagnostic(
		code(unconst::missing_setup_block),
		help(
			"add a `beforeEach(() => {{ ... }});` block, or a nested `describe(` / `it(` so one \
			 can be inserted before it"
		)
	)]
	MissingSetupBlock { file: String },

	#[error("runaway statement starting at {file}:{line}: no terminating `;` before `beforeEach`")]
	#[diagnostic(
		code(unconst::runaway_body),
		help("statements moved into `beforeEach` must end with a line terminated by `;`")
	)]
	RunawayBody { file: String, line: usize },

	#[error("unparseable declaration at {file}:{line}: `{text}`")]
	#[diagnostic(
		code(unconst::unparseable_declaration),
		help("only single-name `const` and `let` declarations can be moved")
	)]
	UnparseableDeclaration {
		file: String,
		line: usize,
		text: String,
	},

	#[error("failed to read `{path}`: {reason}")]
	#[diagnostic(code(unconst::file_read))]
	FileRead { path: String, reason: String },

	#[error("failed to write `{path}`: {reason}")]
	#[diagnostic(code(unconst::file_write))]
	FileWrite { path: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(unconst::config_parse),
		help("check that unconst.toml is valid TOML with an `indent` key and/or a [files] section")
	)]
	ConfigParse(String),
}

pub type UnconstResult<T> = Result<T, UnconstError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
