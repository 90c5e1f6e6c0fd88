use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use markdox_cli::Commands;
use markdox_cli::MarkdoxCli;
use markdox_cli::OutputFormat;
use markdox_core::AnyError;
use markdox_core::DocEntry;
use markdox_core::DocumentSet;
use markdox_core::MarkdownConfig;
use markdox_core::Warning;
use markdox_core::read_utf8;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,dimmed) => {
		if color_enabled() {
			format!("{}", $text.dimmed())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = MarkdoxCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Commands::Comment { file, line } => run_comment(&args, file, *line),
		Commands::Page { files, format } => run_page(&args, files, *format),
	};

	match result {
		Ok(warnings) => {
			for warning in &warnings {
				eprintln!("{} {warning}", colored!("warning:", yellow));
			}

			if args.deny_warnings && !warnings.is_empty() {
				eprintln!(
					"\n{} warning(s) reported and --deny-warnings is set.",
					warnings.len()
				);
				process::exit(1);
			}
		}
		Err(e) => {
			// Try to render through miette for rich diagnostics with help text
			// and error codes.
			match e.downcast::<markdox_core::MarkdoxError>() {
				Ok(markdox_err) => {
					let report: miette::Report = (*markdox_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// Diagnostics are printed by the CLI itself, so their log events stay quiet
/// unless verbose output is requested.
fn init_tracing(verbose: bool, use_color: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| EnvFilter::new("warn,markdox_core::diagnostics=off"))
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.try_init()
		.ok();
}

fn resolve_root(args: &MarkdoxCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Load `markdox.toml` from the project root and apply command line
/// overrides.
fn load_config(args: &MarkdoxCli) -> Result<MarkdownConfig, AnyError> {
	let root = resolve_root(args);
	let mut config = MarkdownConfig::load(&root)?.unwrap_or_default();

	if let Some(tab_width) = args.tab_width {
		config.tab_width = tab_width;
	}
	config.image_paths = config
		.image_paths
		.iter()
		.map(|path| root.join(path))
		.collect();

	if args.verbose {
		eprintln!(
			"{}",
			colored!(
				format!(
					"tab width {}, markdown {}, {} image path(s)",
					config.tab_width,
					if config.markdown_enabled { "enabled" } else { "disabled" },
					config.image_paths.len()
				),
				dimmed
			)
		);
	}

	Ok(config)
}

/// Name a file relative to the project root when it lives below it.
fn display_name(root: &Path, path: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.to_string_lossy()
		.into_owned()
}

fn run_comment(args: &MarkdoxCli, file: &Path, line: usize) -> Result<Vec<Warning>, AnyError> {
	let root = resolve_root(args);
	let mut documents = DocumentSet::from_config(load_config(args)?)?;
	let content = read_utf8(file)?;
	let mut entry = DocEntry::default();

	let output = documents.transform_comment(
		&display_name(&root, file),
		line,
		Some(&mut entry),
		content.as_bytes(),
	);
	print!("{}", String::from_utf8_lossy(&output));

	if args.verbose {
		for anchor in &entry.anchors {
			eprintln!(
				"{}",
				colored!(format!("anchor `{}` ({:?})", anchor.id, anchor.kind), dimmed)
			);
		}
		if entry.toc {
			eprintln!("{}", colored!("table of contents requested", dimmed));
		}
	}

	Ok(documents.take_warnings())
}

fn run_page(
	args: &MarkdoxCli,
	files: &[PathBuf],
	format: OutputFormat,
) -> Result<Vec<Warning>, AnyError> {
	let root = resolve_root(args);
	let mut documents = DocumentSet::from_config(load_config(args)?)?;

	for file in files {
		let content = read_utf8(file)?;
		let page = documents.add_page(&display_name(&root, file), content.as_bytes());
		tracing::debug!(file = %page.file, id = %page.id, "transformed page");
	}

	match format {
		OutputFormat::Text => {
			for (index, page) in documents.pages().iter().enumerate() {
				if index > 0 {
					println!();
				}
				print!("{}", page.output);
			}
		}
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(documents.pages())?);
		}
	}

	Ok(documents.take_warnings())
}
