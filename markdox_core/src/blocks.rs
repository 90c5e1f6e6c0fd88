use crate::engine::Context;
use crate::headers::extract_title_id;
use crate::headers::header_line_level;
use crate::headers::register_section;
use crate::headers::write_one_line_header_or_ruler;
use crate::line_window::LineWindow;
use crate::link_refs::parse_definition;
use crate::quotes::CODE_BLOCK_INDENT;
use crate::quotes::fenced_block;
use crate::quotes::leading_spaces;
use crate::quotes::line_end;
use crate::quotes::write_fenced_block;
use crate::table::is_table_block;
use crate::table::write_table_block;

/// Rewrite block level constructs: headers, link reference definitions, code
/// blocks, tables and horizontal rules. Inline markup is left for the next
/// stage.
pub(crate) fn process(ctx: &mut Context<'_, '_>, data: &[u8], ref_indent: usize) -> Vec<u8> {
	let mut out = Vec::with_capacity(data.len() + data.len() / 4);
	let mut window = LineWindow::new(data.len());

	while window.has_more() {
		window.advance(&mut out, data);

		if let Some(line) = window.pending_line() {
			let pending = line.start;
			let (start, end) = (window.start, window.end);

			let level = header_line_level(&data[start..]);
			if level > 0 {
				write_setext_header(ctx, &mut out, &data[line], level);
				window.restart(end);
				continue;
			}

			if let Some(definition) = parse_definition(&data[pending..]) {
				ctx.link_refs.insert(&definition.id, definition.link_ref);
				window.restart(pending + definition.end);
				window.commit();
				continue;
			}

			if let Some(block) = fenced_block(&data[pending..], ref_indent) {
				write_fenced_block(&mut out, &data[pending..], &block);
				window.restart(pending + block.end);
				continue;
			}

			if let Some(indent) = code_block_indent(data, start, end, ref_indent) {
				// the pending line is blank and is dropped
				let written = write_code_block(&mut out, &data[start..], indent);
				window.restart(start + written);
				continue;
			}

			if is_table_block(&data[pending..]) {
				let written = write_table_block(&mut out, &data[pending..]);
				window.restart(pending + written);
				continue;
			}

			write_one_line_header_or_ruler(ctx, &mut out, &data[line]);
		}

		window.commit();
	}

	if let Some(pending) = window.pending.filter(|&pending| pending < data.len()) {
		let last = &data[pending..];
		if let Some(definition) = parse_definition(last) {
			ctx.link_refs.insert(&definition.id, definition.link_ref);
		} else {
			write_one_line_header_or_ruler(ctx, &mut out, last);
		}
	}

	tracing::trace!(link_refs = ctx.link_refs.len(), len = out.len(), "structured blocks");
	out
}

/// `line` is the title line (newline included) of a Setext header.
fn write_setext_header(ctx: &mut Context<'_, '_>, out: &mut Vec<u8>, line: &[u8], level: usize) {
	let text = &line[leading_spaces(line)..];
	let text = text.strip_suffix(b"\n").unwrap_or(text);
	let (title, id) = extract_title_id(text);
	let title = title.trim_ascii_end();

	if title.is_empty() {
		out.extend_from_slice(b"<hr>\n");
		return;
	}

	match id {
		Some(id) => {
			out.extend_from_slice(if level == 1 { b"@section " } else { b"@subsection " });
			out.extend_from_slice(id);
			out.push(b' ');
			out.extend_from_slice(title);
			out.extend_from_slice(b"\n\n");
			register_section(ctx, id, title, level);
		}
		None => {
			out.extend_from_slice(if level == 1 { b"<h1>" } else { b"<h2>" });
			out.extend_from_slice(title);
			out.extend_from_slice(if level == 1 { b"\n</h1>\n" } else { b"\n</h2>\n" });
		}
	}
}

/// A line with nothing but spaces before its newline.
pub(crate) fn is_empty_line(line: &[u8]) -> bool {
	line.iter().take_while(|&&c| c != b'\n').all(|&c| c == b' ')
}

/// When the line `[start, end)` opens an indented code block, the indent that
/// the block is measured against.
///
/// The line above must be blank. With two or more lines of history the
/// indent of the line two above (ignoring one list marker) is the baseline,
/// otherwise the reference indent is.
fn code_block_indent(data: &[u8], start: usize, end: usize, ref_indent: usize) -> Option<usize> {
	let line = &data[start..end];
	let indent = leading_spaces(line);
	if indent < CODE_BLOCK_INDENT || indent >= line.len() || line[indent] == b'\n' {
		return None;
	}

	let mut line_starts = Vec::with_capacity(3);
	let mut i = start;
	while i > 0 && line_starts.len() < 3 {
		if data[i - 1] == b'\n' {
			line_starts.push(i);
		}
		i -= 1;
	}
	if i == 0 && line_starts.len() == 2 {
		line_starts.push(0);
	}

	if let &[current, previous, before] = line_starts.as_slice() {
		if !is_empty_line(&data[previous..current - 1]) {
			return None;
		}
		let baseline = indent_excluding_list_markers(&data[before..previous]);
		return (indent >= baseline + CODE_BLOCK_INDENT).then_some(baseline);
	}

	if line_starts.len() == 1 && !is_empty_line(&data[..start - 1]) {
		return None;
	}

	(indent >= ref_indent + CODE_BLOCK_INDENT).then_some(ref_indent)
}

fn is_li_tag(line: &[u8], i: usize) -> bool {
	line[i] == b'<'
		&& line[i + 1].eq_ignore_ascii_case(&b'l')
		&& line[i + 2].eq_ignore_ascii_case(&b'i')
		&& line[i + 3] == b'>'
}

/// Indentation of `line`, counting one leading list marker (`-`, `+`, `*`,
/// `-#`, `1.` or `<li>`) as indentation.
pub(crate) fn indent_excluding_list_markers(line: &[u8]) -> usize {
	let size = line.len();
	let mut i = 0;
	let mut indent = 0;
	let mut marker_skipped = false;

	while i < size {
		let c = line[i];
		let is_digit = !marker_skipped && (b'1'..=b'9').contains(&c);
		let is_li = !marker_skipped && i + 3 < size && is_li_tag(line, i);
		let is_marker = !marker_skipped
			&& (matches!(c, b'+' | b'-' | b'*') || (c == b'#' && i > 0 && line[i - 1] == b'-') || is_digit || is_li);

		if c != b' ' && !is_marker {
			break;
		}

		if is_digit {
			let mut j = i + 1;
			while j < size && (line[j].is_ascii_digit() || line[j] == b'.') {
				if line[j] == b'.' {
					if j + 1 < size && line[j + 1] == b' ' {
						marker_skipped = true;
						indent += j + 1 - i;
						i = j + 1;
					}
					break;
				}
				j += 1;
			}
		} else if is_li {
			i += 3;
			indent += 3;
			marker_skipped = true;
		} else if c == b'-' && i + 2 < size && line[i + 1] == b'#' && line[i + 2] == b' ' {
			marker_skipped = true;
			i += 1;
			indent += 1;
		} else if c != b' ' && i + 1 < size && line[i + 1] == b' ' {
			marker_skipped = true;
		}

		if line[i] != b' ' && !marker_skipped {
			break;
		}
		indent += 1;
		i += 1;
	}

	indent
}

/// Wrap the indented lines at the start of `data` in a verbatim command,
/// stripping `indent + 4` columns from each. Blank lines inside the block are
/// kept. Blank lines after it are written after the closing command. Returns
/// the number of bytes consumed.
fn write_code_block(out: &mut Vec<u8>, data: &[u8], indent: usize) -> usize {
	let strip = indent + CODE_BLOCK_INDENT;
	let mut i = 0;
	let mut blank_lines = 0;

	out.extend_from_slice(b"@verbatim\n");

	while i < data.len() {
		let end = line_end(data, i);
		let spaces = leading_spaces(&data[i..end]);

		if i + spaces == end || data[i + spaces] == b'\n' {
			blank_lines += 1;
			i = end;
		} else if spaces >= strip {
			for _ in 0..blank_lines {
				out.push(b'\n');
			}
			blank_lines = 0;
			out.extend_from_slice(&data[i + strip..end]);
			i = end;
		} else {
			break;
		}
	}

	if out.last() != Some(&b'\n') {
		out.push(b'\n');
	}
	out.extend_from_slice(b"@endverbatim\n");
	for _ in 0..blank_lines {
		out.push(b'\n');
	}

	i
}
