use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Move shared spec fixtures out of describe scope and into beforeEach.",
	long_about = "unconst rewrites Jasmine-style spec files so that fixtures declared with `const` \
	              above the first `beforeEach` become `let` declarations assigned inside \
	              `beforeEach`.\n\nSpecs that share a `const` object also share its mutations, \
	              which breaks as soon as specs run in random order.\n\nQuick start:\n  ag -l \
	              'const.*mock' --file-search-regex spec.ts | unconst update\n  unconst check \
	              --discover --diff\n  unconst update src/app/foo.spec.ts"
)]
pub struct UnconstCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Project root. Relative file paths resolve against it and the config
	/// file is looked up in it.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Spaces per indentation level in generated code. Overrides `indent` in
	/// unconst.toml.
	#[arg(long, global = true)]
	pub indent: Option<usize>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

/// Which files to process.
#[derive(Debug, Clone, clap::Args)]
pub struct FileArgs {
	/// Spec files to process. When empty, paths are read from standard
	/// input, one per line.
	pub files: Vec<PathBuf>,

	/// Walk the project root for files matching the `[files]` patterns in
	/// unconst.toml (default `**/*.spec.ts` and `**/*.spec.js`) instead of
	/// reading paths.
	#[arg(long, default_value_t = false, conflicts_with = "files")]
	pub discover: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Report spec files that still declare shared fixtures.
	///
	/// Runs the rewrite in memory and lists every file whose content would
	/// change. Exits with a non-zero status code if any would, which makes it
	/// suitable for CI.
	Check {
		#[command(flatten)]
		files: FileArgs,

		/// Show a unified diff of each file that would change.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results. Use `text` for human-readable
		/// output, `json` for programmatic consumption, or `github` for
		/// GitHub Actions annotations.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Rewrite spec files in place.
	///
	/// Every `const` above the setup block becomes a `let`, and its value,
	/// together with any following statements on the same name, moves into
	/// `beforeEach`. A `beforeEach` block is created when the suite has none.
	/// Files that fail to parse are left untouched.
	Update {
		#[command(flatten)]
		files: FileArgs,

		/// Preview changes without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
	/// GitHub Actions annotation format. Emits `::warning` and `::error`
	/// annotations that appear inline on pull request diffs.
	Github,
}
