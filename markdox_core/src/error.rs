use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MarkdoxError {
	#[error(transparent)]
	#[diagnostic(code(markdox::io_error))]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	#[diagnostic(
		code(markdox::walk),
		help("check that every entry in `image_paths` is a readable directory")
	)]
	Walk(#[from] ignore::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(markdox::config_parse),
		help("check that markdox.toml is valid TOML with top-level settings and an optional [extension_mapping] table")
	)]
	ConfigParse(String),

	#[error("invalid tab width: {0}")]
	#[diagnostic(
		code(markdox::invalid_tab_width),
		help("`tab_width` must be at least 1")
	)]
	InvalidTabWidth(usize),

	#[error("unknown language `{language}` mapped for extension `{extension}`")]
	#[diagnostic(
		code(markdox::unknown_language),
		help(
			"supported languages: markdown, c, cpp, csharp, d, fortran, java, javascript, \
			 objective-c, php, python, rust, tcl, vhdl"
		)
	)]
	UnknownLanguage { extension: String, language: String },

	#[error("`{path}` is not valid UTF-8")]
	#[diagnostic(
		code(markdox::invalid_utf8),
		help("markdox reads documentation files as UTF-8 text")
	)]
	InvalidUtf8 { path: String },
}

pub type MarkdoxResult<T> = Result<T, MarkdoxError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
