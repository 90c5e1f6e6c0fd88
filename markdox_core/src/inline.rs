use crate::SourceLanguage;
use crate::engine::Context;
use crate::line_window::block_command_end;
use crate::line_window::opaque_block_len;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InlineAction {
	Copy,
	Emphasis,
	CodeSpan,
	SpecialCommand,
	Link,
	HtmlTag,
	Dash,
	Quoted,
}

const fn action_for(c: u8) -> InlineAction {
	match c {
		b'_' | b'*' => InlineAction::Emphasis,
		b'`' => InlineAction::CodeSpan,
		b'\\' | b'@' => InlineAction::SpecialCommand,
		b'[' | b'!' => InlineAction::Link,
		b'<' => InlineAction::HtmlTag,
		b'-' => InlineAction::Dash,
		b'"' => InlineAction::Quoted,
		_ => InlineAction::Copy,
	}
}

const ACTIONS: [InlineAction; 256] = {
	let mut table = [InlineAction::Copy; 256];
	let mut i = 0;
	while i < 256 {
		table[i] = action_for(i as u8);
		i += 1;
	}
	table
};

fn is_id_char(c: u8) -> bool {
	c.is_ascii_alphanumeric()
}

/// Characters allowed directly before an opening emphasis marker.
fn is_open_emph_char(c: u8) -> bool {
	matches!(c, b'\n' | b' ' | b'\'' | b'<' | b'{' | b'(' | b'[' | b',' | b':' | b';')
}

/// A marker directly after one of these never closes an emphasis, as in
/// `*see (*.txt) here*`.
fn is_ignored_close_emph_char(c: u8) -> bool {
	matches!(c, b'(' | b'{' | b'[' | b'<' | b'=' | b'+' | b'-' | b'\\' | b'@')
}

/// Resolve inline markup in `data`, appending the result to `out`.
///
/// Bytes without a handler are copied in runs. A handler either consumes
/// input and writes markup or declines, in which case the trigger byte is
/// copied and scanning resumes after it.
pub(crate) fn process_inline(ctx: &mut Context<'_, '_>, out: &mut Vec<u8>, data: &[u8]) {
	let size = data.len();
	let mut i = 0;
	let mut end = 0;

	while i < size {
		while end < size && ACTIONS[data[end] as usize] == InlineAction::Copy {
			end += 1;
		}
		out.extend_from_slice(&data[i..end]);
		if end >= size {
			break;
		}

		i = end;
		let consumed = dispatch(ctx, out, data, i);
		if consumed == 0 {
			end = i + 1;
		} else {
			i += consumed;
			end = i;
		}
	}
}

fn dispatch(ctx: &mut Context<'_, '_>, out: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
	match ACTIONS[data[pos] as usize] {
		InlineAction::Copy => 0,
		InlineAction::Emphasis => emphasis(ctx, out, data, pos),
		InlineAction::CodeSpan => code_span(out, data, pos),
		InlineAction::SpecialCommand => special_command(out, data, pos),
		InlineAction::Link => link(ctx, out, data, pos),
		InlineAction::HtmlTag => html_tag(out, data, pos),
		InlineAction::Dash => dash(out, data, pos),
		InlineAction::Quoted => quoted(out, data, pos),
	}
}

fn emphasis(ctx: &mut Context<'_, '_>, out: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
	if pos > 0 && !is_open_emph_char(data[pos - 1]) {
		return 0;
	}

	let rest = &data[pos..];
	let marker = rest[0];
	let run = rest.iter().take_while(|&&c| c == marker).count();
	if run > 3 || rest.len() <= run + 1 || !is_id_char(rest[run]) {
		return 0;
	}

	let consumed = match run {
		1 => emphasis1(ctx, out, data, pos + 1, marker),
		2 => emphasis2(ctx, out, data, pos + 2, marker),
		_ => emphasis3(ctx, out, data, pos + 3, marker),
	};

	if consumed == 0 { 0 } else { consumed + run }
}

/// Offset of the next closing run of `marker` in `data`, skipping code spans
/// and opaque blocks. Returns 0 at a paragraph break or when nothing closes.
///
/// A `size` of 3 accepts closing runs of one to three markers so that a
/// triple opener can hand over to a shorter closer.
fn find_emphasis_char(data: &[u8], marker: u8, size: usize) -> usize {
	let len = data.len();
	let mut i = 1;

	while i < len {
		while i < len && data[i] != marker && !matches!(data[i], b'`' | b'\\' | b'@' | b'\n') {
			i += 1;
		}
		if i >= len {
			break;
		}

		if is_ignored_close_emph_char(data[i - 1]) {
			i += 1;
			continue;
		}

		let run = data[i..].iter().take_while(|&&c| c == marker).count();
		if run > 0 {
			let fits = if size == 3 { run <= 3 } else { run == size };
			if !fits || (i + run < len && is_id_char(data[i + run])) {
				i += run;
				continue;
			}
			return i;
		}

		match data[i] {
			b'`' => {
				let mut opening = 0;
				while i < len && data[i] == b'`' {
					opening += 1;
					i += 1;
				}

				let mut closing = 0;
				while i < len && closing < opening {
					if data[i] == b'`' {
						closing += 1;
					}
					if opening == 1 && data[i] == b'\'' {
						break;
					}
					i += 1;
				}
			}
			b'\\' | b'@' => {
				if let Some(block_len) = opaque_block_len(data, i) {
					i += block_len;
				} else if block_command_end(data, i).is_some() {
					i += 1;
				} else if i + 1 < len && is_id_char(data[i + 1]) {
					// a command such as `@param` ends the search
					return 0;
				} else {
					i += 1;
				}
			}
			_ => {
				i += 1;
				while i < len && data[i] == b' ' {
					i += 1;
				}
				if i >= len || data[i] == b'\n' {
					return 0;
				}
			}
		}
	}

	0
}

/// `<em>` over the span starting at `begin`.
fn emphasis1(ctx: &mut Context<'_, '_>, out: &mut Vec<u8>, data: &[u8], begin: usize, marker: u8) -> usize {
	let span = &data[begin..];
	let size = span.len();
	let mut i = 0;

	// coming from a triple marker with a double closer
	if size > 1 && span[0] == marker && span[1] == marker {
		i = 1;
	}

	while i < size {
		let len = find_emphasis_char(&span[i..], marker, 1);
		if len == 0 {
			return 0;
		}
		i += len;
		if i >= size {
			return 0;
		}

		if i + 1 < size && span[i + 1] == marker {
			i += 1;
			continue;
		}

		if span[i] == marker && !matches!(span[i - 1], b' ' | b'\n') {
			out.extend_from_slice(b"<em>");
			process_inline(ctx, out, &span[..i]);
			out.extend_from_slice(b"</em>");
			return i + 1;
		}
	}

	0
}

/// `<strong>` over the span starting at `begin`.
fn emphasis2(ctx: &mut Context<'_, '_>, out: &mut Vec<u8>, data: &[u8], begin: usize, marker: u8) -> usize {
	let span = &data[begin..];
	let size = span.len();
	let mut i = 0;

	while i < size {
		let len = find_emphasis_char(&span[i..], marker, 2);
		if len == 0 {
			return 0;
		}
		i += len;

		if i + 1 < size
			&& span[i] == marker
			&& span[i + 1] == marker
			&& !matches!(span[i - 1], b' ' | b'\n')
		{
			out.extend_from_slice(b"<strong>");
			process_inline(ctx, out, &span[..i]);
			out.extend_from_slice(b"</strong>");
			return i + 2;
		}
		i += 1;
	}

	0
}

/// `<em><strong>` over the span starting at `begin`. A shorter closer hands
/// the span back to [`emphasis1`] or [`emphasis2`], starting inside the
/// opening run.
fn emphasis3(ctx: &mut Context<'_, '_>, out: &mut Vec<u8>, data: &[u8], begin: usize, marker: u8) -> usize {
	let span = &data[begin..];
	let size = span.len();
	let mut i = 0;

	while i < size {
		let len = find_emphasis_char(&span[i..], marker, 3);
		if len == 0 {
			return 0;
		}
		i += len;

		if span[i] != marker || matches!(span[i - 1], b' ' | b'\n') {
			continue;
		}

		if i + 2 < size && span[i + 1] == marker && span[i + 2] == marker {
			out.extend_from_slice(b"<em><strong>");
			process_inline(ctx, out, &span[..i]);
			out.extend_from_slice(b"</strong></em>");
			return i + 3;
		}

		let handed_over = if i + 1 < size && span[i + 1] == marker {
			// `**` closes first: the outer `*` becomes the emphasis
			emphasis1(ctx, out, data, begin - 2, marker).checked_sub(2)
		} else {
			emphasis2(ctx, out, data, begin - 1, marker).checked_sub(1)
		};

		match handed_over {
			Some(consumed) if consumed > 0 => return consumed,
			_ => {}
		}
	}

	0
}

fn escape_special_chars(out: &mut Vec<u8>, text: &[u8]) {
	for &c in text {
		match c {
			b'<' | b'>' | b'\\' | b'@' => {
				out.push(b'\\');
				out.push(c);
			}
			_ => out.push(c),
		}
	}
}

fn code_span(out: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
	let span = &data[pos..];
	let size = span.len();
	let ticks = span.iter().take_while(|&&c| c == b'`').count();

	let mut closing = 0;
	let mut newlines = 0;
	let mut end = ticks;
	while end < size && closing < ticks && newlines < 2 {
		match span[end] {
			b'`' => closing += 1,
			b'\n' => {
				closing = 0;
				newlines += 1;
			}
			_ => closing = 0,
		}
		end += 1;
	}
	if closing < ticks || newlines >= 2 {
		return 0;
	}

	let mut content_start = ticks;
	while content_start < end && span[content_start] == b' ' {
		content_start += 1;
	}
	let mut content_end = end - ticks;
	while content_end > ticks && span[content_end - 1] == b' ' {
		content_end -= 1;
	}

	// `some word' is prose quoting, `it's` is code
	if ticks == 1 {
		for i in content_start..content_end.saturating_sub(1) {
			if span[i] == b'\'' && !is_id_char(span[i + 1]) {
				return 0;
			}
		}
	}

	if content_start < content_end {
		out.extend_from_slice(b"<tt>");
		escape_special_chars(out, &span[content_start..content_end]);
		out.extend_from_slice(b"</tt>");
	}

	end
}

fn special_command(out: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
	if let Some(len) = opaque_block_len(data, pos) {
		out.extend_from_slice(&data[pos..pos + len]);
		return len;
	}

	let rest = &data[pos..];
	if rest.len() < 2 || rest[0] != b'\\' {
		return 0;
	}

	let escaped = rest[1];
	if !matches!(escaped, b'[' | b']' | b'*' | b'+' | b'-' | b'!' | b'(' | b')' | b'.' | b'`' | b'_') {
		return 0;
	}

	if rest.starts_with(b"\\---") {
		out.extend_from_slice(b"---");
		4
	} else if rest.starts_with(b"\\--") {
		out.extend_from_slice(b"--");
		3
	} else {
		out.push(escaped);
		2
	}
}

fn dash(out: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
	let run = data[pos..].iter().take_while(|&&c| c == b'-').count();

	match run {
		2 if !(pos >= 8 && &data[pos - 8..pos] == b"operator") => {
			out.extend_from_slice(b"&ndash;");
			2
		}
		3 => {
			out.extend_from_slice(b"&mdash;");
			3
		}
		// longer runs stay as they are
		4.. => {
			out.extend_from_slice(&data[pos..pos + run]);
			run
		}
		_ => 0,
	}
}

/// `"..."` with at most one embedded newline, copied unchanged so that its
/// contents are not interpreted.
fn quoted(out: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
	let rest = &data[pos..];
	let mut i = 1;
	let mut newlines = 0;

	while i < rest.len() && rest[i] != b'"' && newlines < 2 {
		if rest[i] == b'\n' {
			newlines += 1;
		}
		i += 1;
	}

	if i < rest.len() && rest[i] == b'"' && newlines < 2 {
		out.extend_from_slice(&rest[..=i]);
		i + 1
	} else {
		0
	}
}

/// Length of a `<pre>...</pre>` section at the start of `data`. Quoted
/// strings inside it are skipped when looking for the closing tag.
pub(crate) fn pre_block_len(data: &[u8]) -> Option<usize> {
	let size = data.len();
	let name_len = data.get(1..)?.iter().take_while(|&&c| is_id_char(c)).count();
	if !data[1..1 + name_len].eq_ignore_ascii_case(b"pre") {
		return None;
	}

	let mut i = 1 + name_len;
	let mut inside_string = false;
	while i + 6 <= size {
		let c = data[i];
		if !inside_string && c == b'<' {
			if data[i + 1] == b'/' && data[i + 2..i + 5].eq_ignore_ascii_case(b"pre") && data[i + 5] == b'>' {
				return Some(i + 6);
			}
		} else if inside_string && c == b'"' {
			if data[i - 1] != b'\\' {
				inside_string = false;
			}
		} else if c == b'"' {
			inside_string = true;
		}
		i += 1;
	}

	None
}

fn html_tag(out: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
	if pos > 0 && data[pos - 1] == b'\\' {
		return 0;
	}

	let rest = &data[pos..];
	if let Some(len) = pre_block_len(rest) {
		out.extend_from_slice(&rest[..len]);
		return len;
	}

	let size = rest.len();
	let name_len = rest[1..].iter().take_while(|&&c| is_id_char(c)).count();
	let mut i = 1 + name_len;
	if name_len == 0 || i >= size || rest[1..i].eq_ignore_ascii_case(b"pre") {
		return 0;
	}

	let tag_len = match rest[i] {
		b'/' if i + 1 < size && rest[i + 1] == b'>' => i + 2,
		b'>' => i + 1,
		b' ' => {
			i += 1;
			let mut inside_attr = false;
			loop {
				if i >= size {
					return 0;
				}
				if !inside_attr && rest[i] == b'"' {
					inside_attr = true;
				} else if rest[i] == b'"' && rest[i - 1] != b'\\' {
					inside_attr = false;
				} else if !inside_attr && rest[i] == b'>' {
					break i + 1;
				}
				i += 1;
			}
		}
		_ => return 0,
	};

	out.extend_from_slice(&rest[..tag_len]);
	tag_len
}

/// Offset of a `@ref ` or `\ref ` marker in a link target.
fn ref_marker(link: &str) -> Option<usize> {
	link.find("@ref ").or_else(|| link.find("\\ref "))
}

fn simplify(text: &str) -> String {
	text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

fn write_title_attribute(out: &mut Vec<u8>, title: Option<&str>) {
	if let Some(title) = title {
		out.extend_from_slice(b" title=\"");
		out.extend_from_slice(simplify(title).replace('"', "&quot;").as_bytes());
		out.push(b'"');
	}
}

fn skip_spaces(data: &[u8], from: usize) -> usize {
	from + data[from.min(data.len())..].iter().take_while(|&&c| c == b' ').count()
}

fn link(ctx: &mut Context<'_, '_>, out: &mut Vec<u8>, data: &[u8], pos: usize) -> usize {
	let d = &data[pos..];
	let size = d.len();
	let is_image = d[0] == b'!';
	let mut i = 1;

	if is_image {
		if size < 2 || d[1] != b'[' {
			return 0;
		}
		i += 1;
	}

	let content_start = i;
	let mut depth = 1;
	let mut newlines = 0;
	while i < size {
		if d[i - 1] == b'\\' {
			// escaped
		} else if d[i] == b'[' {
			depth += 1;
		} else if d[i] == b']' {
			depth -= 1;
			if depth == 0 {
				break;
			}
		} else if d[i] == b'\n' {
			newlines += 1;
			if newlines > 1 {
				return 0;
			}
		}
		i += 1;
	}
	if i >= size {
		return 0;
	}

	let content_end = i;
	let content = String::from_utf8_lossy(&d[content_start..content_end]).into_owned();
	if !is_image && content.is_empty() {
		return 0;
	}

	i = skip_spaces(d, i + 1);
	if i < size && d[i] == b'\n' {
		i = skip_spaces(d, i + 1);
	}

	let mut explicit_title = false;
	let mut is_toc = false;
	let mut link = String::new();
	let mut title: Option<String> = None;

	if i < size && d[i] == b'(' {
		i = skip_spaces(d, i + 1);
		if i < size && d[i] == b'<' {
			i += 1;
		}

		let link_start = i;
		newlines = 0;
		while i < size && !matches!(d[i], b'\'' | b'"' | b')') {
			if d[i] == b'\n' {
				newlines += 1;
				if newlines > 1 {
					return 0;
				}
			}
			i += 1;
		}
		if i >= size || d[i] == b'\n' {
			return 0;
		}

		let raw = String::from_utf8_lossy(&d[link_start..i]);
		let trimmed = raw.trim();
		link = trimmed.strip_suffix('>').unwrap_or(trimmed).to_string();
		if trimmed.is_empty() {
			return 0;
		}

		if matches!(d[i], b'\'' | b'"') {
			let quote = d[i];
			i += 1;
			let title_start = i;
			newlines = 0;
			while i < size && d[i] != b')' {
				if d[i] == b'\n' {
					if newlines > 1 {
						return 0;
					}
					newlines += 1;
				}
				i += 1;
			}
			if i >= size {
				return 0;
			}

			let mut title_end = i - 1;
			while title_end > title_start && d[title_end] == b' ' {
				title_end -= 1;
			}
			if d[title_end] != quote {
				return 0;
			}
			title = d
				.get(title_start..title_end)
				.filter(|text| !text.is_empty())
				.map(|text| String::from_utf8_lossy(text).into_owned());
		}
		i += 1;
	} else if i < size && d[i] == b'[' {
		i += 1;
		let id_start = i;
		newlines = 0;
		while i < size && d[i] != b']' {
			if d[i] == b'\n' {
				newlines += 1;
				if newlines > 1 {
					return 0;
				}
			}
			i += 1;
		}
		if i >= size {
			return 0;
		}

		let raw = String::from_utf8_lossy(&d[id_start..i]);
		let id = match raw.trim() {
			"" => content.as_str(),
			id => id,
		};
		let Some(link_ref) = ctx.link_refs.get(id) else {
			return 0;
		};
		link.clone_from(&link_ref.link);
		title.clone_from(&link_ref.title);
		i += 1;
	} else if (i >= size || d[i] != b':') && !content.is_empty() {
		if let Some(link_ref) = ctx.link_refs.get(&content) {
			link.clone_from(&link_ref.link);
			title.clone_from(&link_ref.title);
			explicit_title = true;
		} else if content == "TOC" {
			is_toc = true;
		} else {
			return 0;
		}
		i = content_end + 1;
	} else {
		return 0;
	}

	let title = title.filter(|title| !title.is_empty());

	if is_toc {
		tracing::trace!(file = ctx.file_name.as_str(), "table of contents requested");
		if let Some(entry) = ctx.entry.as_deref_mut() {
			entry.request_toc();
		}
	} else if is_image {
		write_image(ctx, out, &link, &content, title.as_deref(), explicit_title);
	} else {
		let marker = ref_marker(&link);
		if marker.is_some() || ctx.collaborators.languages.detect(&link) == SourceLanguage::Markdown {
			if marker.is_none() {
				out.extend_from_slice(b"@ref ");
			}
			out.extend_from_slice(link.as_bytes());
			out.extend_from_slice(b" \"");
			match title.as_deref() {
				Some(title) if explicit_title => out.extend_from_slice(title.as_bytes()),
				_ => out.extend_from_slice(content.as_bytes()),
			}
			out.push(b'"');
		} else if link.contains(['/', '.', '#']) {
			out.extend_from_slice(b"<a href=\"");
			out.extend_from_slice(link.as_bytes());
			out.push(b'"');
			write_title_attribute(out, title.as_deref());
			out.push(b'>');
			out.extend_from_slice(simplify(&content).as_bytes());
			out.extend_from_slice(b"</a>");
		} else {
			// something like `F[x](y)`
			return 0;
		}
	}

	i
}

fn write_image(
	ctx: &mut Context<'_, '_>,
	out: &mut Vec<u8>,
	link: &str,
	content: &str,
	title: Option<&str>,
	explicit_title: bool,
) {
	let marker = ref_marker(link);
	let local = if marker.is_none() {
		ctx.collaborators.images.find_image(link)
	} else {
		None
	};

	if let Some(image) = local.as_ref().filter(|image| image.ambiguous) {
		tracing::debug!(name = link, path = %image.path.display(), "image name is ambiguous");
	}

	if marker.is_none() && local.is_none() {
		out.extend_from_slice(b"<img src=\"");
		out.extend_from_slice(link.as_bytes());
		out.extend_from_slice(b"\" alt=\"");
		out.extend_from_slice(content.as_bytes());
		out.push(b'"');
		write_title_attribute(out, title);
		out.extend_from_slice(b"/>");
		return;
	}

	out.extend_from_slice(b"@image html ");
	out.extend_from_slice(link[marker.map_or(0, |at| at + 5)..].as_bytes());

	let caption = if !explicit_title && !content.is_empty() {
		Some(content)
	} else if content.is_empty() || explicit_title {
		title
	} else {
		None
	};

	if let Some(caption) = caption {
		out.extend_from_slice(b" \"");
		out.extend_from_slice(caption.as_bytes());
		out.push(b'"');
	}
}
