use std::io::IsTerminal;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;
use unconst_cli::Commands;
use unconst_cli::FileArgs;
use unconst_cli::OutputFormat;
use unconst_cli::UnconstCli;
use unconst_core::FileFailure;
use unconst_core::Layout;
use unconst_core::RewriteResult;
use unconst_core::compute_rewrites;
use unconst_core::config::UnconstConfig;
use unconst_core::project::discover_files;
use unconst_core::project::parse_path_list;
use unconst_core::project::resolve_path;
use unconst_core::write_rewrites;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = UnconstCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Check {
			files,
			diff,
			format,
		}) => run_check(&args, files, *diff, *format),
		Some(Commands::Update { files, dry_run }) => run_update(&args, files, *dry_run),
		None => {
			eprintln!("No subcommand specified. Run `unconst --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<unconst_core::UnconstError>() {
			Ok(unconst_err) => {
				let report: miette::Report = (*unconst_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.with_target(false)
		.init();
}

fn resolve_root(args: &UnconstCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn resolve_layout(
	args: &UnconstCli,
	config: &UnconstConfig,
) -> Result<Layout, Box<dyn std::error::Error>> {
	match args.indent {
		Some(0) => Err("`--indent` must be at least 1".into()),
		Some(indent) => Ok(Layout::new(indent)),
		None => Ok(config.layout()),
	}
}

/// Collect the files named on the command line, read from stdin, or
/// discovered under the root.
fn collect_paths(
	root: &Path,
	config: &UnconstConfig,
	files: &FileArgs,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
	if files.discover {
		return Ok(discover_files(root, &config.files)?);
	}

	if !files.files.is_empty() {
		return Ok(files
			.files
			.iter()
			.map(|path| resolve_path(root, path))
			.collect());
	}

	let stdin = std::io::stdin();
	if stdin.is_terminal() {
		return Err("no files given: pass paths as arguments, pipe them on stdin, or use \
		            `--discover`"
			.into());
	}

	let list = std::io::read_to_string(stdin)?;
	Ok(parse_path_list(root, &list))
}

/// Shared setup for both subcommands: load config, gather paths and compute
/// every rewrite in memory.
fn prepare(
	args: &UnconstCli,
	files: &FileArgs,
) -> Result<Option<RewriteResult>, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = UnconstConfig::load_or_default(&root)?;
	let layout = resolve_layout(args, &config)?;
	let paths = collect_paths(&root, &config, files)?;

	if paths.is_empty() {
		println!("No files to process.");
		return Ok(None);
	}

	tracing::debug!(count = paths.len(), indent = layout.indent, "processing files");
	Ok(Some(compute_rewrites(&paths, layout)))
}

fn run_check(
	args: &UnconstCli,
	files: &FileArgs,
	show_diff: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let Some(mut result) = prepare(args, files)? else {
		return Ok(());
	};
	let root = resolve_root(args);
	let failures = std::mem::take(&mut result.failures);
	let failed = !failures.is_empty();

	if result.changed.is_empty() && !failed {
		match format {
			OutputFormat::Json => {
				println!("{{\"ok\":true,\"changed\":[],\"errors\":[]}}");
			}
			OutputFormat::Github => {
				println!("No shared fixtures found.");
			}
			OutputFormat::Text => {
				println!(
					"Check passed: {} file(s) have no shared fixtures.",
					result.unchanged.len()
				);
			}
		}
		return Ok(());
	}

	match format {
		OutputFormat::Json => {
			let changed: Vec<serde_json::Value> = result
				.changed
				.iter()
				.map(|rewrite| {
					serde_json::json!({
						"file": make_relative(&rewrite.path, &root),
						"relocated": rewrite.relocated,
						"synthesized_setup": rewrite.synthesized_setup,
					})
				})
				.collect();
			let errors: Vec<serde_json::Value> = failures
				.iter()
				.map(|failure| {
					serde_json::json!({
						"file": make_relative(&failure.path, &root),
						"message": failure.error.to_string(),
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": false,
				"changed": changed,
				"errors": errors,
			});
			println!("{output}");
		}
		OutputFormat::Github => {
			for failure in &failures {
				let rel = make_relative(&failure.path, &root);
				println!("::error file={rel}::{}", failure.error);
			}
			for rewrite in &result.changed {
				let rel = make_relative(&rewrite.path, &root);
				println!(
					"::warning file={rel}::{} shared fixture(s) should move into beforeEach",
					rewrite.relocated
				);
			}
			eprintln!("{}", check_summary(result.changed.len(), failures.len()));
		}
		OutputFormat::Text => {
			eprintln!("Check failed.");

			if !result.changed.is_empty() {
				eprintln!();
				eprintln!("Files with shared fixtures:");
				for rewrite in &result.changed {
					let rel = make_relative(&rewrite.path, &root);
					let note = if rewrite.synthesized_setup {
						", adds beforeEach"
					} else {
						""
					};
					eprintln!("  {rel} ({} to move{note})", rewrite.relocated);

					if show_diff {
						print_diff(&rewrite.original, &rewrite.rewritten);
					}
				}
			}

			let failure_count = failures.len();
			print_failures(failures, &root);
			eprintln!();
			eprintln!("{}", check_summary(result.changed.len(), failure_count));
		}
	}

	process::exit(if failed { 2 } else { 1 });
}

fn check_summary(changed_count: usize, failure_count: usize) -> String {
	let mut parts = Vec::new();
	if failure_count > 0 {
		parts.push(format!("{failure_count} file(s) could not be processed"));
	}
	if changed_count > 0 {
		parts.push(format!("{changed_count} file(s) need rewriting"));
	}
	format!("{}. Run `unconst update` to fix.", parts.join(" and "))
}

fn run_update(
	args: &UnconstCli,
	files: &FileArgs,
	dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let Some(mut result) = prepare(args, files)? else {
		return Ok(());
	};
	let root = resolve_root(args);
	if !dry_run {
		write_rewrites(&mut result);
	}
	let failures = std::mem::take(&mut result.failures);
	let failed = !failures.is_empty();

	if result.changed.is_empty() {
		if !failed {
			println!("All files are already up to date.");
		}
	} else if dry_run {
		println!(
			"Dry run: would move {} declaration(s) in {} file(s):",
			result.relocated_count(),
			result.changed.len()
		);
		for rewrite in &result.changed {
			println!("  {}", make_relative(&rewrite.path, &root));
		}
	} else {
		println!(
			"Moved {} declaration(s) in {} file(s).",
			result.relocated_count(),
			result.changed.len()
		);

		if args.verbose {
			for rewrite in &result.changed {
				println!("  {}", colored!(make_relative(&rewrite.path, &root), green));
			}
		}
	}

	if failed {
		print_failures(failures, &root);
		process::exit(2);
	}

	Ok(())
}

/// Render every failure through miette.
fn print_failures(failures: Vec<FileFailure>, root: &Path) {
	if failures.is_empty() {
		return;
	}

	eprintln!();
	eprintln!("{}", colored!("Files left untouched:", bold));
	for failure in failures {
		eprintln!("  {}", make_relative(&failure.path, root));
		let report: miette::Report = failure.error.into();
		eprintln!("{report:?}");
	}
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
