use std::path::Path;

use crate::Collaborators;
use crate::Diagnostics;
use crate::EntryHandle;
use crate::ExtensionLanguages;
use crate::ImageIndex;
use crate::MarkdownConfig;
use crate::MarkdoxError;
use crate::MarkdoxResult;
use crate::Page;
use crate::SectionDict;
use crate::Warning;
use crate::engine::transform;
use crate::page::transform_page;

/// The default collaborators for a run over many documents, together with
/// the pages transformed so far.
///
/// Every document shares one section dictionary, so a label defined twice
/// anywhere in the set is reported.
#[derive(Debug)]
pub struct DocumentSet {
	config: MarkdownConfig,
	sections: SectionDict,
	images: ImageIndex,
	languages: ExtensionLanguages,
	diagnostics: Diagnostics,
	pages: Vec<Page>,
}

impl DocumentSet {
	/// Validate `config`, resolve its extension mapping and index the
	/// configured image directories.
	pub fn from_config(config: MarkdownConfig) -> MarkdoxResult<Self> {
		config.validate()?;
		let languages = ExtensionLanguages::with_mapping(config.language_mapping()?);
		let images = ImageIndex::scan(&config.image_paths)?;

		Ok(Self {
			config,
			sections: SectionDict::new(),
			images,
			languages,
			diagnostics: Diagnostics::new(),
			pages: Vec::new(),
		})
	}

	pub fn config(&self) -> &MarkdownConfig {
		&self.config
	}

	/// Transform a documentation comment which starts at `line` of
	/// `file_name`.
	pub fn transform_comment(
		&mut self,
		file_name: &str,
		line: usize,
		entry: Option<&mut dyn EntryHandle>,
		input: &[u8],
	) -> Vec<u8> {
		let collaborators = Collaborators {
			sections: &mut self.sections,
			images: &self.images,
			languages: &self.languages,
			diagnostics: &mut self.diagnostics,
		};

		transform(file_name, line, entry, input, &self.config, collaborators)
	}

	/// Transform a standalone document and keep the resulting page.
	pub fn add_page(&mut self, file_name: &str, input: &[u8]) -> &Page {
		let collaborators = Collaborators {
			sections: &mut self.sections,
			images: &self.images,
			languages: &self.languages,
			diagnostics: &mut self.diagnostics,
		};
		let page = transform_page(file_name, input, &self.config, collaborators);
		self.pages.push(page);

		&self.pages[self.pages.len() - 1]
	}

	/// Read a markdown file from disk and add it as a page. The file must be
	/// UTF-8.
	pub fn read_page(&mut self, path: &Path) -> MarkdoxResult<&Page> {
		let content = read_utf8(path)?;
		let file_name = path.to_string_lossy().into_owned();

		Ok(self.add_page(&file_name, content.as_bytes()))
	}

	pub fn pages(&self) -> &[Page] {
		&self.pages
	}

	pub fn sections(&self) -> &SectionDict {
		&self.sections
	}

	pub fn warnings(&self) -> &[Warning] {
		self.diagnostics.warnings()
	}

	/// Remove and return the warnings collected so far.
	pub fn take_warnings(&mut self) -> Vec<Warning> {
		self.diagnostics.take()
	}
}

/// Read a documentation file, rejecting content which is not UTF-8.
pub fn read_utf8(path: &Path) -> MarkdoxResult<String> {
	let bytes = std::fs::read(path)?;

	String::from_utf8(bytes).map_err(|_| {
		MarkdoxError::InvalidUtf8 {
			path: path.display().to_string(),
		}
	})
}
