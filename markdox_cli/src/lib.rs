use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Convert markdown documentation into native documentation command markup.",
	long_about = "markdox converts extended markdown, either standalone pages or markdown \
	              written inside documentation comments, into the section, anchor, verbatim and \
	              inline HTML markup understood by doxygen style documentation tools.\n\nQuick \
	              start:\n  markdox comment src/lib.h.txt   Convert one comment\n  markdox page \
	              README.md docs/*.md   Convert standalone pages"
)]
pub struct MarkdoxCli {
	#[command(subcommand)]
	pub command: Commands,

	/// Path to the project root directory. The config file is looked up here
	/// and relative image paths are resolved against it.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Override the configured tab width.
	#[arg(long, global = true)]
	pub tab_width: Option<usize>,

	/// Exit with a non-zero status when any warning was reported.
	#[arg(long, global = true, default_value_t = false)]
	pub deny_warnings: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Transform a file holding the text of one documentation comment.
	///
	/// The whole file is treated as a comment fragment and the resulting
	/// markup is printed to stdout. Markdown support can be switched off with
	/// `markdown_enabled = false`, in which case the text is printed as is.
	Comment {
		/// File containing the comment text.
		file: PathBuf,

		/// Line the comment starts on, used in section records and warnings.
		#[arg(long, default_value_t = 1)]
		line: usize,
	},
	/// Transform standalone markdown pages.
	///
	/// Each file becomes a `@page` (or the `@mainpage`) with its title taken
	/// from the first line. All pages share one section dictionary, so a
	/// label used in two pages is reported.
	Page {
		/// The markdown files to transform.
		#[arg(required = true)]
		files: Vec<PathBuf>,

		/// Output format. Use `text` for the markup of each page or `json`
		/// for one record per page with its id, title, anchors and markup.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// The generated markup.
	Text,
	/// JSON records for programmatic consumption.
	Json,
}
