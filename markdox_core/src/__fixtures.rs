use crate::Collaborators;
use crate::Diagnostics;
use crate::DocEntry;
use crate::ExtensionLanguages;
use crate::ImageIndex;
use crate::MarkdownConfig;
use crate::Page;
use crate::SectionDict;
use crate::page::transform_page;
use crate::transform;

pub const FILE_NAME: &str = "test.md";

/// Default collaborators for driving a transform in tests.
#[derive(Debug, Default)]
pub struct Harness {
	pub config: MarkdownConfig,
	pub sections: SectionDict,
	pub images: ImageIndex,
	pub languages: ExtensionLanguages,
	pub diagnostics: Diagnostics,
	pub entry: DocEntry,
}

impl Harness {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(config: MarkdownConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	pub fn with_images(images: ImageIndex) -> Self {
		Self {
			images,
			..Self::default()
		}
	}

	/// Transform `input` as a comment starting on line 1 of [`FILE_NAME`].
	pub fn comment(&mut self, input: &str) -> String {
		let collaborators = Collaborators {
			sections: &mut self.sections,
			images: &self.images,
			languages: &self.languages,
			diagnostics: &mut self.diagnostics,
		};
		let output = transform(
			FILE_NAME,
			1,
			Some(&mut self.entry),
			input.as_bytes(),
			&self.config,
			collaborators,
		);

		String::from_utf8(output).unwrap()
	}

	pub fn page(&mut self, file_name: &str, input: &str) -> Page {
		let collaborators = Collaborators {
			sections: &mut self.sections,
			images: &self.images,
			languages: &self.languages,
			diagnostics: &mut self.diagnostics,
		};

		transform_page(file_name, input.as_bytes(), &self.config, collaborators)
	}
}

/// Transform a comment with fresh default collaborators.
pub fn markdown(input: &str) -> String {
	Harness::new().comment(input)
}
