use std::collections::HashMap;

const MAX_DEFINITION_INDENT: usize = 3;

/// The target of a `[id]: url "title"` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
	pub link: String,
	pub title: Option<String>,
}

/// Link reference definitions of a single document, keyed by lowercase id.
#[derive(Debug, Default)]
pub struct LinkRefTable {
	refs: HashMap<String, LinkRef>,
}

impl LinkRefTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record a definition. A later definition of the same id replaces the
	/// earlier one.
	pub fn insert(&mut self, id: &str, link_ref: LinkRef) {
		let key = id.to_lowercase();
		tracing::trace!(id = %key, link = %link_ref.link, "link reference defined");

		if let Some(previous) = self.refs.insert(key, link_ref) {
			tracing::debug!(id, previous = %previous.link, "link reference redefined");
		}
	}

	/// Case-insensitive lookup.
	pub fn get(&self, id: &str) -> Option<&LinkRef> {
		self.refs.get(&id.to_lowercase())
	}

	pub fn len(&self) -> usize {
		self.refs.len()
	}
}

/// A parsed link reference definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRefDefinition {
	pub id: String,
	pub link_ref: LinkRef,
	/// Offset of the newline that ends the definition, or the buffer size.
	pub end: usize,
}

/// Parse `[id]: url "title"` at the start of `data`.
///
/// The definition may be indented by up to three spaces. The url may be
/// wrapped in `<...>` and the title quoted with `'`, `"` or `(...)`. Both may
/// move to the next line.
pub fn parse_definition(data: &[u8]) -> Option<LinkRefDefinition> {
	let size = data.len();
	let mut i = skip_spaces(data, 0);
	if i > MAX_DEFINITION_INDENT || data.get(i) != Some(&b'[') {
		return None;
	}
	i += 1;

	let id_start = i;
	while i < size && data[i] != b'\n' && data[i] != b']' {
		i += 1;
	}
	if i >= size || data[i] != b']' || i == id_start {
		return None;
	}
	let id = lossy(&data[id_start..i]);
	i += 1;

	if data.get(i) != Some(&b':') {
		return None;
	}
	i = skip_spaces(data, i + 1);
	if i < size && data[i] == b'\n' {
		i = skip_spaces(data, i + 1);
	}
	if i >= size {
		return None;
	}

	let angled = data[i] == b'<';
	if angled {
		i += 1;
	}
	let link_start = i;
	while i < size && data[i] != b' ' && data[i] != b'\n' && !(angled && data[i] == b'>') {
		i += 1;
	}
	if i == link_start {
		return None;
	}
	let mut link = lossy(&data[link_start..i]);
	if angled && i < size && data[i] == b'>' {
		i += 1;
	}

	if link == "@ref" || link == "\\ref" {
		let arg_start = i;
		while i < size && data[i] != b'\n' && data[i] != b'"' {
			i += 1;
		}
		link.push_str(&lossy(&data[arg_start..i]));
	}

	let mut eol = None;
	i = skip_spaces(data, i);
	if i < size && data[i] == b'\n' {
		eol = Some(i);
		i = skip_spaces(data, i + 1);
	}
	if i >= size {
		return Some(definition(id, link, None, i));
	}

	let mut title = None;
	let closer = match data[i] {
		b'(' => Some(b')'),
		c @ (b'\'' | b'"') => Some(c),
		_ => None,
	};

	if let Some(closer) = closer {
		i += 1;
		let title_start = i;
		while i < size && data[i] != b'\n' {
			i += 1;
		}
		eol = Some(i);

		let mut end = i.saturating_sub(1);
		while end > title_start && data[end] != closer {
			end -= 1;
		}
		if end > title_start {
			title = Some(lossy(&data[title_start..end]));
		}
	}

	i = skip_spaces(data, i);
	if i >= size {
		Some(definition(id, link, title, i))
	} else {
		eol.map(|eol| definition(id, link, title, eol))
	}
}

fn definition(id: String, link: String, title: Option<String>, end: usize) -> LinkRefDefinition {
	LinkRefDefinition {
		id,
		link_ref: LinkRef { link, title },
		end,
	}
}

fn skip_spaces(data: &[u8], from: usize) -> usize {
	from + data.get(from..).unwrap_or_default().iter().take_while(|&&c| c == b' ').count()
}

fn lossy(bytes: &[u8]) -> String {
	String::from_utf8_lossy(bytes).into_owned()
}
