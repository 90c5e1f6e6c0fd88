use std::ops::Range;

use crate::line_window::LineWindow;

/// Columns of indentation, beyond the reference indent, that turn a line into
/// code.
pub(crate) const CODE_BLOCK_INDENT: usize = 4;

/// A fenced code block found at the start of a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
	/// Language tag after the opening fence, without braces.
	pub lang: String,
	/// The code, from the newline ending the opening fence up to the newline
	/// before the closing fence.
	pub content: Range<usize>,
	/// Offset just past the closing fence and its trailing spaces.
	pub end: usize,
}

/// Detect a fenced code block (`~~~` or three backticks) at the start of
/// `data`.
///
/// The closing fence must use the same character, be at least as long as the
/// opening one and sit alone on its line.
pub fn fenced_block(data: &[u8], ref_indent: usize) -> Option<FencedBlock> {
	let size = data.len();
	let mut i = leading_spaces(data);
	if i >= ref_indent + CODE_BLOCK_INDENT {
		return None;
	}

	let fence = *data.get(i)?;
	if fence != b'~' && fence != b'`' {
		return None;
	}

	let open_start = i;
	while i < size && data[i] == fence {
		i += 1;
	}
	let open_len = i - open_start;
	if open_len < 3 {
		return None;
	}

	if i < size && data[i] == b'{' {
		i += 1;
	}
	let lang_start = i;
	while i < size && !matches!(data[i], b'\n' | b'}' | b' ') {
		i += 1;
	}
	let lang = String::from_utf8_lossy(&data[lang_start..i]).into_owned();

	while i < size && data[i] != b'\n' {
		i += 1;
	}
	if i >= size {
		return None;
	}
	let content_start = i;

	while i < size {
		// `i` is always at a newline here
		let line_start = i + 1;
		let mut j = line_start;
		while j < size && data[j] == b' ' {
			j += 1;
		}

		let run_start = j;
		while j < size && data[j] == fence {
			j += 1;
		}

		if j - run_start >= open_len {
			while j < size && data[j] == b' ' {
				j += 1;
			}

			if j == size || data[j] == b'\n' {
				return Some(FencedBlock {
					lang,
					content: content_start..i,
					end: j,
				});
			}
		}

		i = line_start;
		while i < size && data[i] != b'\n' {
			i += 1;
		}
	}

	None
}

/// Emit a fenced block as a native code command.
pub fn write_fenced_block(out: &mut Vec<u8>, data: &[u8], block: &FencedBlock) {
	let lang = block.lang.strip_prefix('.').unwrap_or(&block.lang);

	out.extend_from_slice(b"@code");
	if !lang.is_empty() {
		out.push(b'{');
		out.extend_from_slice(lang.as_bytes());
		out.push(b'}');
	}
	out.extend_from_slice(&data[block.content.clone()]);
	out.extend_from_slice(b"\n@endcode");
}

/// Resolve fenced code blocks and block quotes. Every other line is copied
/// unchanged.
pub fn process(data: &[u8], ref_indent: usize) -> Vec<u8> {
	let mut out = Vec::with_capacity(data.len() + data.len() / 8);
	let mut window = LineWindow::new(data.len());

	while window.has_more() {
		window.advance(&mut out, data);

		if let Some(line) = window.pending_line() {
			let pending = line.start;

			if let Some(block) = fenced_block(&data[pending..], ref_indent) {
				write_fenced_block(&mut out, &data[pending..], &block);
				window.restart(pending + block.end);
				continue;
			}

			if is_block_quote(&data[line.clone()], ref_indent) {
				let consumed = write_block_quote(&mut out, &data[pending..]);
				window.restart(pending + consumed);
				continue;
			}

			out.extend_from_slice(&data[line]);
		}

		window.commit();
	}

	if let Some(pending) = window.pending.filter(|&pending| pending < data.len()) {
		let last = &data[pending..];
		if is_block_quote(last, ref_indent) {
			write_block_quote(&mut out, last);
		} else {
			out.extend_from_slice(last);
		}
	}

	tracing::trace!(ref_indent, len = out.len(), "resolved quotes and fences");
	out
}

/// A line made of `>` markers (and spaces) followed by a space or newline,
/// indented less than a code block would be.
pub(crate) fn is_block_quote(line: &[u8], ref_indent: usize) -> bool {
	let mut i = leading_spaces(line);
	if i >= ref_indent + CODE_BLOCK_INDENT {
		return false;
	}

	let mut level = 0;
	while i < line.len() && matches!(line[i], b'>' | b' ') {
		if line[i] == b'>' {
			level += 1;
		}
		i += 1;
	}

	level > 0 && i < line.len() && (line[i - 1] == b' ' || line[i] == b'\n')
}

/// Write the quote starting at `data` with one wrapper per nesting level and
/// the markers stripped. Returns the number of bytes consumed.
fn write_block_quote(out: &mut Vec<u8>, data: &[u8]) -> usize {
	let size = data.len();
	let mut i = 0;
	let mut current = 0;

	while i < size {
		let end = line_end(data, i);
		let mut j = i;
		let mut level = 0;
		let mut indent = i;

		while j < end && matches!(data[j], b' ' | b'>') {
			if data[j] == b'>' {
				level += 1;
				indent = j + 1;
			} else if j > 0 && data[j - 1] == b'>' {
				indent = j + 1;
			}
			j += 1;
		}

		// a final `>` glued to the text is kept as content
		if j > 0 && data[j - 1] == b'>' && !(j == size || data[j] == b'\n') {
			indent -= 1;
		}

		for _ in current..level {
			out.extend_from_slice(b"<blockquote>\n");
		}
		for _ in level..current {
			out.extend_from_slice(b"</blockquote>\n");
		}
		current = level;

		if level == 0 {
			break;
		}

		out.extend_from_slice(&data[indent..end]);
		i = end;
	}

	for _ in 0..current {
		out.extend_from_slice(b"</blockquote>\n");
	}

	i
}

/// Offset just past the newline ending the line at `from`, or the buffer
/// size.
pub(crate) fn line_end(data: &[u8], from: usize) -> usize {
	data[from..]
		.iter()
		.position(|&c| c == b'\n')
		.map_or(data.len(), |offset| from + offset + 1)
}

pub(crate) fn leading_spaces(data: &[u8]) -> usize {
	data.iter().take_while(|&&c| c == b' ').count()
}
