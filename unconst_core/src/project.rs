//! Locating the spec files to rewrite.

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::UnconstError;
use crate::UnconstResult;
use crate::config::FilesConfig;

/// Collect every file under `root` matching the configured patterns, sorted.
///
/// Hidden directories, `node_modules` and `target` are never entered.
/// `.gitignore` rules apply unless disabled, and `exclude` patterns (gitignore
/// syntax) always apply on top.
pub fn discover_files(root: &Path, config: &FilesConfig) -> UnconstResult<Vec<PathBuf>> {
	let include_set = build_glob_set(&config.patterns)?;
	let gitignore = if config.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let exclude = build_exclude_matcher(root, &config.exclude)?;

	let mut walker = Walker {
		root,
		include_set: &include_set,
		gitignore: &gitignore,
		exclude: &exclude,
		visited_dirs: HashSet::new(),
		files: Vec::new(),
	};
	walker.walk(root)?;

	let mut files = walker.files;
	files.sort();
	tracing::debug!(root = %root.display(), count = files.len(), "discovered files");
	Ok(files)
}

/// Turn a newline separated list of paths (as produced by `ag -l` or
/// `git ls-files`) into paths resolved against `root`. Blank lines are
/// skipped.
pub fn parse_path_list(root: &Path, list: &str) -> Vec<PathBuf> {
	list.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(|line| resolve_path(root, Path::new(line)))
		.collect()
}

/// Resolve `path` against `root` unless it is already absolute.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
	if path.is_absolute() {
		path.to_path_buf()
	} else {
		root.join(path)
	}
}

struct Walker<'a> {
	root: &'a Path,
	include_set: &'a GlobSet,
	gitignore: &'a Gitignore,
	exclude: &'a Gitignore,
	visited_dirs: HashSet<PathBuf>,
	files: Vec<PathBuf>,
}

impl Walker<'_> {
	fn walk(&mut self, dir: &Path) -> UnconstResult<()> {
		// Symlinked directories can loop back on themselves.
		let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
		if !self.visited_dirs.insert(canonical) {
			return Ok(());
		}

		for entry in std::fs::read_dir(dir)? {
			let path = entry?.path();

			if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
				if is_ignored_directory_name(name) {
					continue;
				}
			}

			let is_dir = path.is_dir();
			if self.gitignore.matched(&path, is_dir).is_ignore()
				|| self.exclude.matched(&path, is_dir).is_ignore()
			{
				continue;
			}

			if is_dir {
				self.walk(&path)?;
			} else if let Ok(rel_path) = path.strip_prefix(self.root) {
				if self.include_set.is_match(rel_path) {
					self.files.push(path);
				}
			}
		}

		Ok(())
	}
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn build_glob_set(patterns: &[String]) -> UnconstResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			UnconstError::ConfigParse(format!("invalid file pattern `{pattern}`: {e}"))
		})?;
		builder.add(glob);
	}
	builder
		.build()
		.map_err(|e| UnconstError::ConfigParse(format!("failed to build file patterns: {e}")))
}

fn build_exclude_matcher(root: &Path, patterns: &[String]) -> UnconstResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			UnconstError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| UnconstError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}
