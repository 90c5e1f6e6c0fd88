mod common;

use clap::Parser;
use markdox_cli::Commands;
use markdox_cli::MarkdoxCli;
use markdox_cli::OutputFormat;
use markdox_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use rstest::rstest;
use serde_json::Value;

const ALPHA: &str = "Alpha\n=====\n\n## Setup {#setup}\n\nRun *it*.\n";
const BETA: &str = "Beta\n====\n\n## Setup again {#setup}\n\nMore.\n";

#[test]
fn comment_prints_markup() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("comment.txt");
	std::fs::write(&file, "Some *emphasis* and `code` here\n")?;

	let mut cmd = common::markdox_cmd();
	let _ = cmd
		.arg("comment")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("<em>emphasis</em>"))
		.stdout(predicates::str::contains("<tt>code</tt>"));

	Ok(())
}

#[test]
fn comment_is_unchanged_when_markdown_disabled() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("markdox.toml"), "markdown_enabled = false\n")?;
	let file = tmp.path().join("comment.txt");
	std::fs::write(&file, "Some *emphasis* here\n")?;

	let mut cmd = common::markdox_cmd();
	let _ = cmd
		.arg("comment")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("Some *emphasis* here\n");

	Ok(())
}

#[test]
fn page_text_output_starts_with_page_command() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("guide.md");
	std::fs::write(&file, ALPHA)?;

	let mut cmd = common::markdox_cmd();
	let _ = cmd
		.arg("page")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::starts_with("@page md_guide Alpha\n"))
		.stdout(predicates::str::contains("@subsection setup Setup"))
		.stdout(predicates::str::contains("Run <em>it</em>."));

	Ok(())
}

#[test]
fn index_page_becomes_main_page() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("index.md");
	std::fs::write(&file, "Overview\n========\n\nWelcome\n")?;

	let mut cmd = common::markdox_cmd();
	let _ = cmd
		.arg("page")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::starts_with("@mainpage Overview\n"));

	Ok(())
}

#[test]
fn page_json_output_lists_every_page() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.md"), ALPHA)?;
	std::fs::write(tmp.path().join("b.md"), "Beta\n====\n\nMore.\n")?;

	let mut cmd = common::markdox_cmd();
	let output = cmd
		.arg("page")
		.arg(tmp.path().join("a.md"))
		.arg(tmp.path().join("b.md"))
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let pages: Value = serde_json::from_slice(&output.stdout)?;
	let pages = pages.as_array().ok_or("expected an array of pages")?;
	assert_eq!(pages.len(), 2);
	assert_eq!(pages[0]["id"], "md_a");
	assert_eq!(pages[0]["title"], "Alpha");
	assert_eq!(pages[0]["kind"], "page");
	assert_eq!(pages[0]["file"], "a.md");
	assert_eq!(pages[0]["anchors"][0]["id"], "setup");
	assert_eq!(pages[0]["anchors"][0]["kind"], "subsection");
	assert_eq!(pages[1]["id"], "md_b");
	assert_eq!(pages[1]["anchors"], Value::Array(vec![]));

	Ok(())
}

#[test]
fn duplicate_section_label_is_reported() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.md"), ALPHA)?;
	std::fs::write(tmp.path().join("b.md"), BETA)?;

	let mut cmd = common::markdox_cmd();
	let _ = cmd
		.arg("page")
		.arg(tmp.path().join("a.md"))
		.arg(tmp.path().join("b.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("warning: b.md:"))
		.stderr(predicates::str::contains(
			"multiple use of section label 'setup'",
		));

	Ok(())
}

#[test]
fn deny_warnings_fails_on_duplicate_label() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.md"), ALPHA)?;
	std::fs::write(tmp.path().join("b.md"), BETA)?;

	let mut cmd = common::markdox_cmd();
	let _ = cmd
		.arg("page")
		.arg(tmp.path().join("a.md"))
		.arg(tmp.path().join("b.md"))
		.arg("--path")
		.arg(tmp.path())
		.arg("--deny-warnings")
		.assert()
		.code(1)
		.stderr(predicates::str::contains("--deny-warnings"));

	Ok(())
}

#[test]
fn deny_warnings_passes_without_warnings() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.md"), ALPHA)?;

	let mut cmd = common::markdox_cmd();
	let _ = cmd
		.arg("page")
		.arg(tmp.path().join("a.md"))
		.arg("--path")
		.arg(tmp.path())
		.arg("--deny-warnings")
		.assert()
		.success()
		.stderr(predicates::str::contains("warning:").not());

	Ok(())
}

#[test]
fn missing_file_exits_with_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = common::markdox_cmd();
	let _ = cmd
		.arg("comment")
		.arg(tmp.path().join("missing.txt"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2);

	Ok(())
}

#[test]
fn invalid_tab_width_is_rejected() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("markdox.toml"), "tab_width = 0\n")?;
	let file = tmp.path().join("comment.txt");
	std::fs::write(&file, "text\n")?;

	let mut cmd = common::markdox_cmd();
	let _ = cmd
		.arg("comment")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid tab width"));

	Ok(())
}

#[test]
fn tab_width_flag_overrides_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("markdox.toml"), "tab_width = 8\n")?;
	let file = tmp.path().join("comment.txt");
	std::fs::write(&file, "text\n")?;

	let mut cmd = common::markdox_cmd();
	let _ = cmd
		.arg("comment")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.arg("--tab-width")
		.arg("0")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid tab width"));

	Ok(())
}

#[test]
fn invalid_utf8_page_is_rejected() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("broken.md");
	std::fs::write(&file, [b'T', b'i', 0xff, b'\n'])?;

	let mut cmd = common::markdox_cmd();
	let _ = cmd
		.arg("page")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("UTF-8"));

	Ok(())
}

#[rstest]
#[case::comment(&["markdox", "comment", "doc.txt"], true)]
#[case::comment_with_line(&["markdox", "comment", "doc.txt", "--line", "12"], true)]
#[case::page(&["markdox", "page", "a.md", "b.md"], true)]
#[case::page_json(&["markdox", "page", "a.md", "--format", "json"], true)]
#[case::page_without_files(&["markdox", "page"], false)]
#[case::unknown_format(&["markdox", "page", "a.md", "--format", "yaml"], false)]
#[case::global_flags_after_command(&["markdox", "comment", "doc.txt", "-v", "--deny-warnings"], true)]
fn parses_arguments(#[case] args: &[&str], #[case] valid: bool) {
	assert_eq!(MarkdoxCli::try_parse_from(args).is_ok(), valid);
}

#[test]
fn parses_page_options() {
	let cli = MarkdoxCli::parse_from(["markdox", "page", "a.md", "--format", "json", "-p", "docs"]);

	assert_eq!(cli.path.as_deref(), Some(std::path::Path::new("docs")));
	match cli.command {
		Commands::Page { files, format } => {
			similar_asserts::assert_eq!(files, vec![std::path::PathBuf::from("a.md")]);
			assert_eq!(format, OutputFormat::Json);
		}
		Commands::Comment { .. } => panic!("expected the page command"),
	}
}

#[test]
fn comment_line_defaults_to_one() {
	let cli = MarkdoxCli::parse_from(["markdox", "comment", "doc.txt", "--tab-width", "2"]);

	assert_eq!(cli.tab_width, Some(2));
	assert!(matches!(cli.command, Commands::Comment { line: 1, .. }));
}
