//! Interfaces to everything the transformer consults but does not own, along
//! with small in-memory implementations used by the CLI and tests.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::MarkdoxResult;
use crate::section::SectionInfo;
use crate::section::SectionStore;

/// The documentation node a comment belongs to.
pub trait EntryHandle {
	/// Record a labelled section defined inside this entry's documentation.
	fn record_anchor(&mut self, section: &SectionInfo);

	/// Mark the entry as wanting a generated table of contents (`[TOC]`).
	fn request_toc(&mut self);
}

/// A plain [`EntryHandle`] which keeps whatever the transformer reports.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocEntry {
	pub anchors: Vec<SectionInfo>,
	pub toc: bool,
}

impl EntryHandle for DocEntry {
	fn record_anchor(&mut self, section: &SectionInfo) {
		self.anchors.push(section.clone());
	}

	fn request_toc(&mut self) {
		self.toc = true;
	}
}

/// A local image matched by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMatch {
	pub path: PathBuf,
	/// More than one image carries the requested name.
	pub ambiguous: bool,
}

/// Lookup of images that live next to the documentation.
pub trait ImageLookup {
	fn find_image(&self, name: &str) -> Option<ImageMatch>;
}

/// Image files discovered under the configured image directories, indexed by
/// file name.
#[derive(Debug, Default)]
pub struct ImageIndex {
	by_name: HashMap<String, Vec<PathBuf>>,
}

impl ImageIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Walk every directory and index the files found. Ignore files are
	/// respected the same way `git` would.
	pub fn scan(dirs: &[PathBuf]) -> MarkdoxResult<Self> {
		let mut index = Self::new();

		for dir in dirs {
			for entry in ignore::WalkBuilder::new(dir).build() {
				let entry = entry?;
				if entry.file_type().is_some_and(|file_type| file_type.is_file()) {
					index.insert(entry.into_path());
				}
			}
		}

		tracing::debug!(images = index.len(), "indexed image directories");
		Ok(index)
	}

	/// Add a single image path to the index.
	pub fn insert(&mut self, path: impl Into<PathBuf>) {
		let path = path.into();
		let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
			return;
		};

		self.by_name.entry(name.to_string()).or_default().push(path);
	}

	/// Number of indexed files.
	pub fn len(&self) -> usize {
		self.by_name.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.by_name.is_empty()
	}
}

impl ImageLookup for ImageIndex {
	fn find_image(&self, name: &str) -> Option<ImageMatch> {
		let requested = Path::new(name);
		let file_name = requested.file_name()?.to_str()?;
		let candidates = self.by_name.get(file_name)?;

		let matching: Vec<&PathBuf> = if requested.parent().is_some_and(|p| !p.as_os_str().is_empty()) {
			candidates.iter().filter(|path| path.ends_with(requested)).collect()
		} else {
			candidates.iter().collect()
		};

		let first = matching.first()?;
		Some(ImageMatch {
			path: (*first).clone(),
			ambiguous: matching.len() > 1,
		})
	}
}

/// Languages the documentation tool knows how to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum SourceLanguage {
	#[default]
	Unknown,
	Markdown,
	C,
	Cpp,
	CSharp,
	D,
	Fortran,
	Java,
	JavaScript,
	ObjectiveC,
	Php,
	Python,
	Rust,
	Tcl,
	Vhdl,
}

impl FromStr for SourceLanguage {
	type Err = ();

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		let language = match value.trim().to_ascii_lowercase().as_str() {
			"markdown" | "md" => Self::Markdown,
			"c" => Self::C,
			"cpp" | "c++" => Self::Cpp,
			"csharp" | "c#" => Self::CSharp,
			"d" => Self::D,
			"fortran" => Self::Fortran,
			"java" => Self::Java,
			"javascript" | "js" => Self::JavaScript,
			"objective-c" | "objc" => Self::ObjectiveC,
			"php" => Self::Php,
			"python" => Self::Python,
			"rust" => Self::Rust,
			"tcl" => Self::Tcl,
			"vhdl" => Self::Vhdl,
			_ => return Err(()),
		};

		Ok(language)
	}
}

/// Detects the language of a file from its name.
pub trait LanguageDetector {
	fn detect(&self, file_name: &str) -> SourceLanguage;
}

const DEFAULT_EXTENSIONS: &[(&str, SourceLanguage)] = &[
	("md", SourceLanguage::Markdown),
	("markdown", SourceLanguage::Markdown),
	("c", SourceLanguage::C),
	("h", SourceLanguage::C),
	("cc", SourceLanguage::Cpp),
	("cpp", SourceLanguage::Cpp),
	("cxx", SourceLanguage::Cpp),
	("c++", SourceLanguage::Cpp),
	("hh", SourceLanguage::Cpp),
	("hpp", SourceLanguage::Cpp),
	("hxx", SourceLanguage::Cpp),
	("ipp", SourceLanguage::Cpp),
	("inl", SourceLanguage::Cpp),
	("cs", SourceLanguage::CSharp),
	("d", SourceLanguage::D),
	("f", SourceLanguage::Fortran),
	("for", SourceLanguage::Fortran),
	("f90", SourceLanguage::Fortran),
	("f95", SourceLanguage::Fortran),
	("java", SourceLanguage::Java),
	("js", SourceLanguage::JavaScript),
	("m", SourceLanguage::ObjectiveC),
	("mm", SourceLanguage::ObjectiveC),
	("php", SourceLanguage::Php),
	("php5", SourceLanguage::Php),
	("inc", SourceLanguage::Php),
	("py", SourceLanguage::Python),
	("pyw", SourceLanguage::Python),
	("rs", SourceLanguage::Rust),
	("tcl", SourceLanguage::Tcl),
	("vhd", SourceLanguage::Vhdl),
	("vhdl", SourceLanguage::Vhdl),
];

/// Extension based [`LanguageDetector`].
#[derive(Debug, Clone)]
pub struct ExtensionLanguages {
	mapping: HashMap<String, SourceLanguage>,
}

impl Default for ExtensionLanguages {
	fn default() -> Self {
		let mapping = DEFAULT_EXTENSIONS
			.iter()
			.map(|(extension, language)| ((*extension).to_string(), *language))
			.collect();

		Self { mapping }
	}
}

impl ExtensionLanguages {
	/// The default table extended (and overridden) by `extra`.
	pub fn with_mapping(extra: HashMap<String, SourceLanguage>) -> Self {
		let mut languages = Self::default();
		languages.mapping.extend(extra);
		languages
	}
}

impl LanguageDetector for ExtensionLanguages {
	fn detect(&self, file_name: &str) -> SourceLanguage {
		let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
		let Some((_, extension)) = name.rsplit_once('.') else {
			return SourceLanguage::Unknown;
		};

		self.mapping
			.get(&extension.to_ascii_lowercase())
			.copied()
			.unwrap_or_default()
	}
}

/// Receives the non-fatal problems found while transforming.
pub trait DiagnosticSink {
	fn warn(&mut self, file: &str, line: usize, message: &str);
}

/// A warning reported through [`DiagnosticSink::warn`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
	pub file: String,
	pub line: usize,
	pub message: String,
}

impl fmt::Display for Warning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}: {}", self.file, self.line, self.message)
	}
}

/// Collects warnings and forwards them to `tracing`.
#[derive(Debug, Default)]
pub struct Diagnostics {
	warnings: Vec<Warning>,
}

impl Diagnostics {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn warnings(&self) -> &[Warning] {
		&self.warnings
	}

	/// Remove and return every collected warning.
	pub fn take(&mut self) -> Vec<Warning> {
		std::mem::take(&mut self.warnings)
	}
}

impl DiagnosticSink for Diagnostics {
	fn warn(&mut self, file: &str, line: usize, message: &str) {
		tracing::warn!(target: "markdox_core::diagnostics", file, line, "{message}");
		self.warnings.push(Warning {
			file: file.to_string(),
			line,
			message: message.to_string(),
		});
	}
}

/// Everything a single transform call consults besides its own input.
pub struct Collaborators<'a> {
	pub sections: &'a mut dyn SectionStore,
	pub images: &'a dyn ImageLookup,
	pub languages: &'a dyn LanguageDetector,
	pub diagnostics: &'a mut dyn DiagnosticSink,
}
