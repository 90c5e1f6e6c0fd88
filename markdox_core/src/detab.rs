/// Text with every tab expanded, plus the smallest indent found on any line
/// that has content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detabbed {
	pub text: Vec<u8>,
	pub ref_indent: usize,
}

/// Expand tabs to the next multiple of `tab_width` and compute the reference
/// indent of the document.
///
/// Multi-byte UTF-8 sequences are copied as a unit and advance the column by
/// one. A line made only of spaces does not contribute to the indent.
pub fn detab(input: &[u8], tab_width: usize) -> Detabbed {
	let tab_width = tab_width.max(1);
	let mut text = Vec::with_capacity(input.len());
	let mut col = 0;
	let mut min_indent: Option<usize> = None;
	let mut i = 0;

	while i < input.len() {
		let c = input[i];
		i += 1;

		match c {
			b'\t' => {
				let stop = tab_width - col % tab_width;
				text.resize(text.len() + stop, b' ');
				col += stop;
			}
			b'\n' => {
				text.push(c);
				col = 0;
			}
			b' ' => {
				text.push(c);
				col += 1;
			}
			_ => {
				text.push(c);

				if c >= 0x80 && i < input.len() {
					text.push(input[i]);
					i += 1;

					if c & 0xE0 == 0xE0 && i < input.len() {
						text.push(input[i]);
						i += 1;
					}

					if c & 0xF0 == 0xF0 && i < input.len() {
						text.push(input[i]);
						i += 1;
					}
				}

				min_indent = Some(min_indent.map_or(col, |indent| indent.min(col)));
				col += 1;
			}
		}
	}

	Detabbed {
		text,
		ref_indent: min_indent.unwrap_or(0),
	}
}
