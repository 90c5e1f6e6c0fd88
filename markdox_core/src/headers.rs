use std::sync::LazyLock;

use regex::bytes::Regex;

use crate::engine::Context;
use crate::quotes::leading_spaces;
use crate::section::SectionInfo;
use crate::section::SectionKind;

static TITLE_ID: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\{#[a-zA-Z_][a-zA-Z0-9_\-]*\}").expect("title id pattern is valid")
});

/// Split an explicit `{#id}` off the end of a header title.
///
/// Only the first `{#...}` in the title is considered and it must be followed
/// by nothing but whitespace.
pub fn extract_title_id(title: &[u8]) -> (&[u8], Option<&[u8]>) {
	let Some(found) = TITLE_ID.find(title) else {
		return (title, None);
	};

	if !title[found.end()..].iter().all(u8::is_ascii_whitespace) {
		return (title, None);
	}

	(&title[..found.start()], Some(&title[found.start() + 2..found.end() - 1]))
}

/// Level of a Setext underline: `1` for `===`, `2` for `---`, `0` when the
/// line is not an underline.
pub fn header_line_level(data: &[u8]) -> usize {
	let size = data.len();
	let mut i = leading_spaces(data);
	let level = match data.get(i) {
		Some(b'=') => 1,
		Some(b'-') => 2,
		_ => return 0,
	};

	let marker = data[i];
	let start = i;
	while i < size && data[i] == marker {
		i += 1;
	}
	let run = i - start;
	i += leading_spaces(&data[i..]);

	if run > 1 && (i >= size || data[i] == b'\n') {
		level
	} else {
		0
	}
}

/// A line of at least three `*`, `-` or `_` characters, optionally spaced.
pub fn is_horizontal_rule(line: &[u8]) -> bool {
	let line = line.strip_suffix(b"\n").unwrap_or(line);
	let i = leading_spaces(line);
	let Some(&marker) = line.get(i) else {
		return false;
	};
	if !matches!(marker, b'*' | b'-' | b'_') {
		return false;
	}

	let mut count = 0;
	for &c in &line[i..] {
		if c == marker {
			count += 1;
		} else if c != b' ' {
			return false;
		}
	}

	count >= 3
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtxHeader<'a> {
	pub level: usize,
	pub title: &'a [u8],
	pub id: Option<&'a [u8]>,
}

/// Parse a `# Title {#id}` line.
///
/// A single `#` must be followed by a space so that `#name` stays a plain
/// word. Deeper headers may omit it.
pub fn atx_header(line: &[u8]) -> Option<AtxHeader<'_>> {
	let size = line.len();
	let mut i = leading_spaces(line);
	if line.get(i) != Some(&b'#') {
		return None;
	}

	let mut level = 0;
	while i < size && level < 6 && line[i] == b'#' {
		i += 1;
		level += 1;
	}

	let blanks = leading_spaces(&line[i..]);
	if level == 1 && blanks == 0 {
		return None;
	}
	i += blanks;

	let mut end = i;
	while end < size && line[end] != b'\n' {
		end += 1;
	}
	while end > i && matches!(line[end - 1], b'#' | b' ') {
		end -= 1;
	}

	let (mut title, id) = extract_title_id(&line[i..end]);
	if id.is_some() {
		while let [rest @ .., b'#' | b' '] = title {
			title = rest;
		}
	}

	Some(AtxHeader { level, title, id })
}

/// Write a single line, turning a horizontal rule or ATX header into markup
/// and copying anything else as is.
pub(crate) fn write_one_line_header_or_ruler(ctx: &mut Context<'_, '_>, out: &mut Vec<u8>, line: &[u8]) {
	if is_horizontal_rule(line) {
		out.extend_from_slice(b"<hr>\n");
		return;
	}

	let Some(header) = atx_header(line) else {
		out.extend_from_slice(line);
		return;
	};

	let kind = SectionKind::from_level(header.level);
	match (header.id, kind.command()) {
		(Some(id), Some(command)) => {
			out.extend_from_slice(command.as_bytes());
			out.push(b' ');
			out.extend_from_slice(id);
			out.push(b' ');
			out.extend_from_slice(header.title);
			out.push(b'\n');
			register_section(ctx, id, header.title, header.level);
		}
		(id, _) => {
			if let Some(id) = id {
				out.extend_from_slice(b"\\anchor ");
				out.extend_from_slice(id);
				out.push(b'\n');
			}

			let tag = format!("h{}", header.level);
			out.push(b'<');
			out.extend_from_slice(tag.as_bytes());
			out.push(b'>');
			out.extend_from_slice(header.title);
			out.extend_from_slice(b"</");
			out.extend_from_slice(tag.as_bytes());
			out.extend_from_slice(b">\n");
		}
	}
}

/// Register a labelled header with the section store. An id that is already
/// taken is reported to the diagnostic sink and left untouched.
pub(crate) fn register_section(ctx: &mut Context<'_, '_>, id: &[u8], title: &[u8], level: usize) {
	let id = String::from_utf8_lossy(id).into_owned();

	if let Some(existing) = ctx.collaborators.sections.find(&id) {
		let message = match existing.line {
			Some(line) => {
				format!(
					"multiple use of section label '{id}', (first occurrence: {}, line {line})",
					existing.file
				)
			}
			None => format!("multiple use of section label '{id}', (first occurrence: {})", existing.file),
		};
		ctx.collaborators.diagnostics.warn(&ctx.file_name, ctx.line, &message);
		return;
	}

	let section = SectionInfo {
		file: ctx.file_name.clone(),
		line: Some(ctx.line),
		id,
		title: String::from_utf8_lossy(title).into_owned(),
		kind: SectionKind::from_level(level),
		level,
	};
	tracing::debug!(id = %section.id, level, file = ctx.file_name.as_str(), "registered section");

	if let Some(entry) = ctx.entry.as_deref_mut() {
		entry.record_anchor(&section);
	}
	ctx.collaborators.sections.insert(section);
}
