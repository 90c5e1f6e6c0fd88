use std::collections::HashMap;

use derive_more::Deref;
use serde::Serialize;

/// The kind of anchor a header turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
	Section,
	Subsection,
	Subsubsection,
	Paragraph,
	Anchor,
}

impl SectionKind {
	/// The section kind for a header of the given level. Levels above four
	/// have no section command and become plain anchors.
	pub fn from_level(level: usize) -> Self {
		match level {
			1 => Self::Section,
			2 => Self::Subsection,
			3 => Self::Subsubsection,
			4 => Self::Paragraph,
			_ => Self::Anchor,
		}
	}

	/// The native command which introduces this kind of section, if any.
	pub fn command(self) -> Option<&'static str> {
		match self {
			Self::Section => Some("@section"),
			Self::Subsection => Some("@subsection"),
			Self::Subsubsection => Some("@subsubsection"),
			Self::Paragraph => Some("@paragraph"),
			Self::Anchor => None,
		}
	}
}

/// A labelled section registered by a header carrying an explicit id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionInfo {
	/// File in which the label was defined.
	pub file: String,
	/// Line of the definition, when known.
	pub line: Option<usize>,
	/// The label itself, e.g. `install` for `# Install {#install}`.
	pub id: String,
	/// The header text without the id suffix.
	pub title: String,
	pub kind: SectionKind,
	pub level: usize,
}

/// Storage for section labels shared by every document of a run.
///
/// The transformer only ever reads an entry or inserts a new one. It never
/// replaces an existing label.
pub trait SectionStore {
	/// Look up a previously registered label.
	fn find(&self, id: &str) -> Option<&SectionInfo>;

	/// Register a new label. Callers check [`SectionStore::find`] first.
	fn insert(&mut self, section: SectionInfo);
}

/// In-memory [`SectionStore`] keyed by label.
#[derive(Debug, Default, Deref)]
pub struct SectionDict(HashMap<String, SectionInfo>);

impl SectionDict {
	pub fn new() -> Self {
		Self::default()
	}
}

impl SectionStore for SectionDict {
	fn find(&self, id: &str) -> Option<&SectionInfo> {
		self.0.get(id)
	}

	fn insert(&mut self, section: SectionInfo) {
		self.0.entry(section.id.clone()).or_insert(section);
	}
}
