use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::Collaborators;
use crate::DocEntry;
use crate::MarkdownConfig;
use crate::engine::Context;
use crate::engine::run_pipeline;
use crate::headers::atx_header;
use crate::headers::extract_title_id;
use crate::headers::header_line_level;
use crate::section::SectionInfo;

/// Whether a standalone document became the main page or a regular page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
	MainPage,
	Page,
}

/// A transformed standalone markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
	pub file: String,
	pub id: String,
	pub title: String,
	pub kind: PageKind,
	/// Sections defined by headers with an explicit id.
	pub anchors: Vec<SectionInfo>,
	/// The page contains a `[TOC]` marker.
	pub toc: bool,
	/// The native markup, page command included.
	pub output: String,
}

/// The title found at the top of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTitle {
	pub title: String,
	pub id: Option<String>,
	/// The document with the title removed.
	pub body: Vec<u8>,
}

/// Take the title off the first non-blank line of `docs`.
///
/// A line followed by a Setext underline is replaced by as many newlines as
/// the title and the blank lines before it occupied. A first-line ATX header
/// is dropped. Any other document is returned whole with an empty title.
pub fn extract_page_title(docs: &[u8]) -> PageTitle {
	let size = docs.len();
	let mut i = 0;
	let mut blank_lines = 0;
	while i < size && matches!(docs[i], b' ' | b'\n') {
		if docs[i] == b'\n' {
			blank_lines += 1;
		}
		i += 1;
	}

	if i >= size {
		return PageTitle {
			body: docs.to_vec(),
			..PageTitle::default()
		};
	}

	let mut first_end = i + 1;
	while first_end < size && docs[first_end - 1] != b'\n' {
		first_end += 1;
	}

	if first_end < size && header_line_level(&docs[first_end..]) > 0 {
		let mut second_end = first_end + 1;
		while second_end < size && docs[second_end - 1] != b'\n' {
			second_end += 1;
		}

		let (title, id) = extract_title_id(&docs[i..first_end - 1]);
		let mut body = vec![b'\n'; blank_lines + 1];
		body.extend_from_slice(&docs[second_end..]);

		return PageTitle {
			title: String::from_utf8_lossy(title).trim().to_string(),
			id: id.map(|id| String::from_utf8_lossy(id).into_owned()),
			body,
		};
	}

	if let Some(header) = atx_header(&docs[i..first_end]) {
		let mut body = vec![b'\n'; blank_lines];
		body.extend_from_slice(&docs[first_end..]);

		return PageTitle {
			title: String::from_utf8_lossy(header.title).trim().to_string(),
			id: header.id.map(|id| String::from_utf8_lossy(id).into_owned()),
			body,
		};
	}

	PageTitle {
		body: docs.to_vec(),
		..PageTitle::default()
	}
}

/// Anchor id for a page without an explicit `{#id}`.
///
/// ```
/// use markdox_core::page_id_from_file_name;
///
/// assert_eq!(page_id_from_file_name("docs/getting started.md", &[]), "md_docs_getting_started");
/// ```
pub fn page_id_from_file_name(file_name: &str, strip_from_path: &[PathBuf]) -> String {
	let path = Path::new(file_name);
	let stripped = strip_from_path
		.iter()
		.find_map(|prefix| path.strip_prefix(prefix).ok())
		.unwrap_or(path);

	let mut name = stripped.to_string_lossy().into_owned();
	let base_start = name.rfind(['/', '\\']).map_or(0, |index| index + 1);
	if let Some(dot) = name[base_start..].rfind('.') {
		name.truncate(base_start + dot);
	}

	let name: String = name
		.chars()
		.map(|c| if matches!(c, '/' | '\\' | ' ') { '_' } else { c })
		.collect();

	format!("md_{name}")
}

/// The file name up to its first `.`.
fn base_title(file_name: &str) -> String {
	let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
	name.split('.').next().unwrap_or(name).to_string()
}

/// Transform a standalone markdown document into a page.
///
/// The page command is prepended before the markdown is processed. Markdown
/// processing happens even when it is disabled for comments.
pub fn transform_page(
	file_name: &str,
	input: &[u8],
	config: &MarkdownConfig,
	collaborators: Collaborators<'_>,
) -> Page {
	let extracted = extract_page_title(input);
	let id = extracted
		.id
		.unwrap_or_else(|| page_id_from_file_name(file_name, &config.strip_from_path));
	let title = if extracted.title.is_empty() {
		base_title(file_name)
	} else {
		extracted.title
	};

	let (kind, command) = if config.is_main_page(file_name) {
		(PageKind::MainPage, "@mainpage\n".to_string())
	} else if id == "mainpage" || id == "index" {
		(PageKind::MainPage, format!("@mainpage {title}\n"))
	} else {
		(PageKind::Page, format!("@page {id} {title}\n"))
	};
	tracing::debug!(file = file_name, id = %id, ?kind, "extracted page title");

	let mut docs = command.into_bytes();
	docs.extend_from_slice(&extracted.body);

	let mut entry = DocEntry::default();
	let output = {
		let mut ctx = Context::new(file_name, 1, Some(&mut entry), collaborators);
		run_pipeline(&mut ctx, &docs, config.tab_width)
	};

	Page {
		file: file_name.to_string(),
		id,
		title,
		kind,
		anchors: entry.anchors,
		toc: entry.toc,
		output: String::from_utf8_lossy(&output).into_owned(),
	}
}
