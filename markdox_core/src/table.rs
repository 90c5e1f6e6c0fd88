/// Column alignment taken from the separator row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
	#[default]
	None,
	Left,
	Center,
	Right,
}

impl Alignment {
	fn from_markers(left: bool, right: bool) -> Self {
		match (left, right) {
			(true, true) => Self::Center,
			(true, false) => Self::Left,
			(false, true) => Self::Right,
			(false, false) => Self::None,
		}
	}

	fn attribute(self) -> &'static [u8] {
		match self {
			Self::None => b"",
			Self::Left => b" align=\"left\"",
			Self::Center => b" align=\"center\"",
			Self::Right => b" align=\"right\"",
		}
	}
}

/// The cell area of one table row, relative to the row start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TableRow {
	/// First content byte, after an optional leading `|`.
	start: usize,
	/// End of the content, before trailing spaces and an optional trailing `|`.
	end: usize,
	columns: usize,
	/// Offset of the next row.
	next: usize,
}

fn is_unescaped_pipe(data: &[u8], i: usize) -> bool {
	data[i] == b'|' && (i == 0 || data[i - 1] != b'\\')
}

fn table_row(data: &[u8]) -> TableRow {
	let size = data.len();
	let mut i = 0;
	let mut outer_pipes = 0;

	while i < size && data[i] == b' ' {
		i += 1;
	}
	if i < size && data[i] == b'|' {
		i += 1;
		outer_pipes += 1;
	}
	let start = i;

	while i < size && data[i] != b'\n' {
		i += 1;
	}
	let next = (i + 1).min(size);

	let mut end = i;
	while end > 1 && data[end - 1] == b' ' {
		end -= 1;
	}
	if end > 1 && data[end - 2] != b'\\' && data[end - 1] == b'|' {
		end -= 1;
		outer_pipes += 1;
	}

	let mut columns = 0;
	if end > start + 1 {
		for j in start..end {
			if is_unescaped_pipe(data, j) {
				columns += 1;
			}
			// a single `|` already separates two columns
			if columns == 1 {
				columns += 1;
			}
		}
	}
	if outer_pipes == 2 && columns == 0 {
		columns = 1;
	}

	TableRow {
		start,
		end: end.max(start),
		columns,
		next,
	}
}

/// A header row, a separator row with the same number of columns and a first
/// data row.
pub fn is_table_block(data: &[u8]) -> bool {
	let header = table_row(data);
	if header.next >= data.len() || header.columns < 1 {
		return false;
	}

	let separator_data = &data[header.next..];
	let separator = table_row(separator_data);
	let cells = &separator_data[separator.start..separator.end];
	if !cells.iter().all(|c| matches!(c, b':' | b'-' | b'|' | b' ')) {
		return false;
	}
	if separator.columns != header.columns {
		return false;
	}

	let first_row = table_row(&separator_data[separator.next..]);
	first_row.columns == separator.columns
}

fn alignments(row: &[u8], columns: usize) -> Vec<Alignment> {
	let mut result = vec![Alignment::None; columns];
	let mut column = 0;
	let mut left = false;
	let mut right = false;
	let mut started = false;

	for (j, &c) in row.iter().enumerate() {
		if !started && matches!(c, b':' | b'-') {
			left = c == b':';
			started = true;
		}

		match c {
			b'-' => right = false,
			b':' => right = true,
			_ => {}
		}

		if is_unescaped_pipe(row, j) {
			if column < columns {
				result[column] = Alignment::from_markers(left, right);
				left = false;
				right = false;
				started = false;
			}
			column += 1;
		}
	}

	if column < columns {
		result[column] = Alignment::from_markers(left, right);
	}

	result
}

/// Write the table starting at `data` and return the number of bytes
/// consumed. Rows are taken until one has a different number of columns.
pub fn write_table_block(out: &mut Vec<u8>, data: &[u8]) -> usize {
	let header = table_row(data);
	let columns = header.columns;

	let separator_data = &data[header.next..];
	let separator = table_row(separator_data);
	let aligns = alignments(&separator_data[separator.start..separator.end], columns);

	out.extend_from_slice(b"<table><tr>");

	let header_cells = &data[header.start..header.end];
	let mut m = 0;
	for align in &aligns {
		out.extend_from_slice(b"<th");
		out.extend_from_slice(align.attribute());
		out.push(b'>');
		while m < header_cells.len() && !is_unescaped_pipe(header_cells, m) {
			out.push(header_cells[m]);
			m += 1;
		}
		m += 1;
	}
	out.extend_from_slice(b"\n</th>\n");

	let mut i = header.next + separator.next;
	while i < data.len() {
		let row_data = &data[i..];
		let row = table_row(row_data);
		if row.columns != columns {
			break;
		}

		out.extend_from_slice(b"<tr>");
		let cells = &row_data[row.start..row.end];
		let mut column = 0;
		let mut column_start = 0;
		for (j, &c) in cells.iter().enumerate() {
			if j == column_start {
				out.extend_from_slice(b"<td");
				out.extend_from_slice(aligns.get(column).copied().unwrap_or_default().attribute());
				out.push(b'>');
			}

			if is_unescaped_pipe(cells, j) {
				column_start = j + 1;
				column += 1;
			} else {
				out.push(c);
			}
		}
		out.push(b'\n');

		i += row.next;
	}

	out.extend_from_slice(b"</table> ");
	i
}
