use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::Layout;
use crate::UnconstError;
use crate::UnconstResult;
use crate::construct::DEFAULT_INDENT;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["unconst.toml", ".unconst.toml", ".config/unconst.toml"];

/// Default glob patterns for spec files picked up by discovery.
pub const DEFAULT_FILE_PATTERNS: [&str; 2] = ["**/*.spec.ts", "**/*.spec.js"];

/// Configuration loaded from an `unconst.toml` file.
///
/// ```toml
/// indent = 4
///
/// [files]
/// patterns = ["src/**/*.spec.ts"]
/// exclude = ["legacy/"]
/// disable_gitignore = false
/// ```
#[derive(Debug, Deserialize)]
pub struct UnconstConfig {
	/// Spaces per indentation level in generated code.
	#[serde(default = "default_indent")]
	pub indent: usize,
	/// Which files `--discover` picks up.
	#[serde(default)]
	pub files: FilesConfig,
}

impl Default for UnconstConfig {
	fn default() -> Self {
		Self {
			indent: DEFAULT_INDENT,
			files: FilesConfig::default(),
		}
	}
}

fn default_indent() -> usize {
	DEFAULT_INDENT
}

/// File discovery configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
	/// Glob patterns, relative to the project root, for files to rewrite.
	#[serde(default = "default_file_patterns")]
	pub patterns: Vec<String>,
	/// Gitignore-style patterns for files and directories to skip.
	#[serde(default)]
	pub exclude: Vec<String>,
	/// When true, `.gitignore` rules are not applied.
	#[serde(default)]
	pub disable_gitignore: bool,
}

impl Default for FilesConfig {
	fn default() -> Self {
		Self {
			patterns: default_file_patterns(),
			exclude: Vec::new(),
			disable_gitignore: false,
		}
	}
}

fn default_file_patterns() -> Vec<String> {
	DEFAULT_FILE_PATTERNS.iter().map(ToString::to_string).collect()
}

impl UnconstConfig {
	/// Resolve the first config file that exists under `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is none.
	pub fn load(root: &Path) -> UnconstResult<Option<UnconstConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: UnconstConfig =
			toml::from_str(&content).map_err(|e| UnconstError::ConfigParse(e.to_string()))?;

		if config.indent == 0 {
			return Err(UnconstError::ConfigParse(
				"`indent` must be at least 1".to_string(),
			));
		}

		tracing::debug!(path = %config_path.display(), "loaded config");
		Ok(Some(config))
	}

	/// Load the config at `root`, falling back to defaults.
	pub fn load_or_default(root: &Path) -> UnconstResult<UnconstConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	pub fn layout(&self) -> Layout {
		Layout::new(self.indent)
	}
}
