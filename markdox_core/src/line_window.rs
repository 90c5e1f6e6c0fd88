use std::ops::Range;

use crate::inline::pre_block_len;

pub(crate) fn is_command_prefix(c: u8) -> bool {
	c == b'\\' || c == b'@'
}

/// The closing command name for an opaque block whose command prefix (`\` or
/// `@`) sits at `pos`, or `None` when no opaque block starts there.
///
/// A prefix preceded by another prefix is escaped. `{@code` closes with `}`.
pub fn block_command_end(data: &[u8], pos: usize) -> Option<&'static str> {
	let before = pos.checked_sub(1).map(|p| data[p]);
	if before.is_some_and(is_command_prefix) {
		return None;
	}

	let name_start = pos + 1;
	let name_len = data
		.get(name_start..)
		.unwrap_or_default()
		.iter()
		.take_while(|c| c.is_ascii_lowercase())
		.count();
	let name_end = name_start + name_len;

	let closer = match &data[name_start.min(data.len())..name_end.min(data.len())] {
		b"code" if before == Some(b'{') => "}",
		b"dot" => "enddot",
		b"code" => "endcode",
		b"msc" => "endmsc",
		b"verbatim" => "endverbatim",
		b"latexonly" => "endlatexonly",
		b"htmlonly" => "endhtmlonly",
		b"xmlonly" => "endxmlonly",
		b"rtfonly" => "endrtfonly",
		b"manonly" => "endmanonly",
		b"docbookonly" => "enddocbookonly",
		b"startuml" => "enduml",
		b"f" => {
			match data.get(name_end) {
				Some(b'$') => "f$",
				Some(b'[') => "f]",
				Some(b'{') => "f}",
				_ => return None,
			}
		}
		_ => return None,
	};

	Some(closer)
}

/// Position of the first unescaped command prefix at or after `from` which is
/// directly followed by `closer`.
pub(crate) fn find_block_end(data: &[u8], from: usize, closer: &str) -> Option<usize> {
	let closer = closer.as_bytes();
	let mut i = from.max(1);

	while i + closer.len() < data.len() {
		if is_command_prefix(data[i])
			&& !is_command_prefix(data[i - 1])
			&& data[i + 1..].starts_with(closer)
		{
			return Some(i);
		}
		i += 1;
	}

	None
}

/// Length of the opaque block starting at `pos`, closing command included.
pub(crate) fn opaque_block_len(data: &[u8], pos: usize) -> Option<usize> {
	let closer = block_command_end(data, pos)?;
	let end = find_block_end(data, pos + 1, closer)?;

	Some(end + 1 + closer.len() - pos)
}

/// Cursor over a buffer that yields one logical line at a time while keeping
/// the previous line around for look-behind.
///
/// `[start, end)` is the line being scanned. `pending` is the start of the
/// line before it, which always ends at `start`. The invariant
/// `pending <= start <= end <= size` holds after every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWindow {
	pub pending: Option<usize>,
	pub start: usize,
	pub end: usize,
	size: usize,
}

impl LineWindow {
	pub fn new(size: usize) -> Self {
		Self {
			pending: None,
			start: 0,
			end: 0,
			size,
		}
	}

	/// More input remains to be scanned.
	pub fn has_more(&self) -> bool {
		self.start < self.size
	}

	/// The previous line, if one is buffered.
	pub fn pending_line(&self) -> Option<Range<usize>> {
		self.pending.map(|pending| pending..self.start)
	}

	/// Move `end` to the end of the line starting at `start`.
	///
	/// Opaque command blocks and `<pre>` sections met on the way are copied to
	/// `out` whole, after the pending line. The window then continues right
	/// after the copied block with nothing pending.
	pub fn advance(&mut self, out: &mut Vec<u8>, data: &[u8]) {
		let size = self.size;
		let mut ticks = 0;
		self.end = self.start + 1;

		while self.end <= size && data[self.end - 1] != b'\n' {
			let cur = self.end - 1;
			let c = data[cur];
			let escaped = cur > 0 && is_command_prefix(data[cur - 1]);

			if is_command_prefix(c) && !escaped {
				self.end += 1;
				if let Some(len) = opaque_block_len(data, cur) {
					self.flush_pending(out, data);
					out.extend_from_slice(&data[self.start..cur + len]);
					self.skip_to(cur + len);
				}
			} else if ticks == 0 && c == b'<' && !escaped && cur + 7 < size && is_pre_open(&data[cur + 1..]) {
				if let Some(len) = pre_block_len(&data[cur..]) {
					self.flush_pending(out, data);
					out.extend_from_slice(&data[self.start..cur + len]);
					self.skip_to(cur + len);
				} else {
					self.end += 1;
				}
			} else if c == b'`' {
				let mut run = 0;
				while self.end <= size && data[self.end - 1] == b'`' {
					self.end += 1;
					run += 1;
				}

				if ticks == 0 {
					ticks = run;
				} else if run == ticks {
					ticks = 0;
				}
			} else {
				self.end += 1;
			}
		}

		self.end = self.end.min(size);
	}

	/// Make the scanned line the pending one and step past it.
	pub fn commit(&mut self) {
		self.pending = Some(self.start);
		self.start = self.end;
	}

	/// Drop the pending line and continue scanning at `pos`.
	pub fn restart(&mut self, pos: usize) {
		self.pending = None;
		self.start = pos.min(self.size);
		self.end = (pos + 1).min(self.size);
	}

	fn skip_to(&mut self, pos: usize) {
		self.pending = None;
		self.start = pos;
		self.end = pos + 1;
	}

	fn flush_pending(&self, out: &mut Vec<u8>, data: &[u8]) {
		if let Some(range) = self.pending_line() {
			out.extend_from_slice(&data[range]);
		}
	}
}

fn is_pre_open(rest: &[u8]) -> bool {
	rest.len() >= 4 && rest[..3].eq_ignore_ascii_case(b"pre") && rest[3] == b'>'
}
