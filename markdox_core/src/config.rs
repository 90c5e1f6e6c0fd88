use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::MarkdoxError;
use crate::MarkdoxResult;
use crate::SourceLanguage;

/// Default number of columns a tab advances to.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["markdox.toml", ".markdox.toml", ".config/markdox.toml"];

/// Configuration loaded from a `markdox.toml` file.
///
/// ```toml
/// tab_width = 4
/// markdown_enabled = true
/// main_page_file_name = "README.md"
/// strip_from_path = ["docs/"]
/// image_paths = ["images"]
///
/// [extension_mapping]
/// inc = "cpp"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MarkdownConfig {
	/// Columns a tab expands to. Tabs advance to the next multiple of this
	/// value.
	#[serde(default = "default_tab_width")]
	pub tab_width: usize,
	/// When false, documentation comments are returned untouched. Standalone
	/// markdown pages are always processed.
	#[serde(default = "default_markdown_enabled")]
	pub markdown_enabled: bool,
	/// A markdown file which should become the main page instead of a regular
	/// page. Matched against the file name or the full path.
	#[serde(default)]
	pub main_page_file_name: Option<String>,
	/// Path prefixes removed from file names before a page id is synthesized.
	#[serde(default)]
	pub strip_from_path: Vec<PathBuf>,
	/// Directories searched for images referenced with `![alt](name)`.
	#[serde(default)]
	pub image_paths: Vec<PathBuf>,
	/// Extra file extension to language mappings, e.g. `inc = "cpp"`.
	#[serde(default)]
	pub extension_mapping: HashMap<String, String>,
}

impl Default for MarkdownConfig {
	fn default() -> Self {
		Self {
			tab_width: DEFAULT_TAB_WIDTH,
			markdown_enabled: true,
			main_page_file_name: None,
			strip_from_path: Vec::new(),
			image_paths: Vec::new(),
			extension_mapping: HashMap::new(),
		}
	}
}

fn default_tab_width() -> usize {
	DEFAULT_TAB_WIDTH
}

fn default_markdown_enabled() -> bool {
	true
}

impl MarkdownConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> MarkdoxResult<Option<MarkdownConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded markdox config");

		Ok(Some(config))
	}

	/// Parse and validate a config from TOML source.
	pub fn from_toml(content: &str) -> MarkdoxResult<MarkdownConfig> {
		let config: MarkdownConfig =
			toml::from_str(content).map_err(|e| MarkdoxError::ConfigParse(e.to_string()))?;
		config.validate()?;

		Ok(config)
	}

	/// Check the values that serde cannot check on its own.
	pub fn validate(&self) -> MarkdoxResult<()> {
		if self.tab_width == 0 {
			return Err(MarkdoxError::InvalidTabWidth(self.tab_width));
		}

		self.language_mapping()?;

		Ok(())
	}

	/// Resolve `extension_mapping` into typed languages. Extensions are
	/// normalized to lowercase without a leading dot.
	pub fn language_mapping(&self) -> MarkdoxResult<HashMap<String, SourceLanguage>> {
		let mut mapping = HashMap::with_capacity(self.extension_mapping.len());

		for (extension, language) in &self.extension_mapping {
			let parsed = language.parse::<SourceLanguage>().map_err(|()| {
				MarkdoxError::UnknownLanguage {
					extension: extension.clone(),
					language: language.clone(),
				}
			})?;
			let key = extension.trim_start_matches('.').to_ascii_lowercase();
			mapping.insert(key, parsed);
		}

		Ok(mapping)
	}

	/// Returns `true` when `file_name` refers to the configured main page,
	/// either by bare file name or by full path.
	pub fn is_main_page(&self, file_name: &str) -> bool {
		let Some(main_page) = self.main_page_file_name.as_deref() else {
			return false;
		};

		if main_page.is_empty() {
			return false;
		}

		let path = Path::new(file_name);
		let bare_name = path.file_name().and_then(|name| name.to_str());

		bare_name == Some(main_page) || path == Path::new(main_page)
	}
}
