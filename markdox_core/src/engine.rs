use crate::Collaborators;
use crate::EntryHandle;
use crate::MarkdownConfig;
use crate::blocks;
use crate::detab::detab;
use crate::inline::process_inline;
use crate::link_refs::LinkRefTable;
use crate::quotes;

/// State shared by every stage of one transform call.
pub(crate) struct Context<'c, 'e> {
	pub file_name: String,
	pub line: usize,
	pub link_refs: LinkRefTable,
	pub entry: Option<&'e mut dyn EntryHandle>,
	pub collaborators: Collaborators<'c>,
}

impl<'c, 'e> Context<'c, 'e> {
	pub fn new(
		file_name: &str,
		line: usize,
		entry: Option<&'e mut dyn EntryHandle>,
		collaborators: Collaborators<'c>,
	) -> Self {
		Self {
			file_name: file_name.to_string(),
			line,
			link_refs: LinkRefTable::new(),
			entry,
			collaborators,
		}
	}
}

/// Convert a markdown documentation comment into native command markup.
///
/// `line` is the line the comment starts on and is used for registered
/// sections and diagnostics. Sections defined by headers with an explicit id
/// are recorded on `entry` and in the section store. A `[TOC]` marker flags
/// `entry` as wanting a table of contents.
///
/// The transform never fails: input that matches no construct is copied
/// through.
///
/// ```
/// use markdox_core::Collaborators;
/// use markdox_core::Diagnostics;
/// use markdox_core::ExtensionLanguages;
/// use markdox_core::ImageIndex;
/// use markdox_core::MarkdownConfig;
/// use markdox_core::SectionDict;
/// use markdox_core::transform;
///
/// let mut sections = SectionDict::new();
/// let mut diagnostics = Diagnostics::new();
/// let images = ImageIndex::new();
/// let languages = ExtensionLanguages::default();
/// let collaborators = Collaborators {
/// 	sections: &mut sections,
/// 	images: &images,
/// 	languages: &languages,
/// 	diagnostics: &mut diagnostics,
/// };
///
/// let output = transform(
/// 	"lib.h",
/// 	1,
/// 	None,
/// 	b"Some *emphasis* here",
/// 	&MarkdownConfig::default(),
/// 	collaborators,
/// );
/// assert_eq!(output, b"Some <em>emphasis</em> here");
/// ```
pub fn transform(
	file_name: &str,
	line: usize,
	entry: Option<&mut dyn EntryHandle>,
	input: &[u8],
	config: &MarkdownConfig,
	collaborators: Collaborators<'_>,
) -> Vec<u8> {
	if input.is_empty() {
		return Vec::new();
	}

	if !config.markdown_enabled {
		tracing::trace!(file = file_name, "markdown disabled, comment left untouched");
		return input.to_vec();
	}

	let mut ctx = Context::new(file_name, line, entry, collaborators);
	run_pipeline(&mut ctx, input, config.tab_width)
}

pub(crate) fn run_pipeline(ctx: &mut Context<'_, '_>, input: &[u8], tab_width: usize) -> Vec<u8> {
	let detabbed = detab(input, tab_width);
	tracing::trace!(
		file = ctx.file_name.as_str(),
		ref_indent = detabbed.ref_indent,
		"expanded tabs"
	);

	let quoted = quotes::process(&detabbed.text, detabbed.ref_indent);
	let structured = blocks::process(ctx, &quoted, detabbed.ref_indent);

	let mut out = Vec::with_capacity(structured.len() + structured.len() / 4);
	process_inline(ctx, &mut out, &structured);

	tracing::debug!(
		file = ctx.file_name.as_str(),
		line = ctx.line,
		input = input.len(),
		output = out.len(),
		"transformed markdown"
	);
	out
}
