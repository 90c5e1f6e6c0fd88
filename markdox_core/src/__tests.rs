use std::path::PathBuf;

use miette::Diagnostic;
use rstest::rstest;
use similar_asserts::assert_eq;
use tracing_test::traced_test;

use super::__fixtures::*;
use super::*;
use crate::blocks::indent_excluding_list_markers;
use crate::detab::detab;
use crate::headers::atx_header;
use crate::headers::extract_title_id;
use crate::headers::header_line_level;
use crate::headers::is_horizontal_rule;
use crate::line_window::LineWindow;
use crate::line_window::block_command_end;
use crate::link_refs::LinkRef;
use crate::link_refs::LinkRefTable;
use crate::link_refs::parse_definition;
use crate::quotes::fenced_block;
use crate::table::is_table_block;

#[rstest]
#[case::plain_text("Plain words only.\nSecond line here.\n", "Plain words only.\nSecond line here.\n")]
#[case::emphasis("Some *emphasis* here", "Some <em>emphasis</em> here")]
#[case::underscore_emphasis("_word_", "<em>word</em>")]
#[case::strong("a **bold** b", "a <strong>bold</strong> b")]
#[case::strong_emphasis("***word***", "<em><strong>word</strong></em>")]
#[case::nested_handover("***bold** it*", "<em><strong>bold</strong> it</em>")]
#[case::snake_case("snake_case_name", "snake_case_name")]
#[case::code_span("use `x < y` here", "use <tt>x \\< y</tt> here")]
#[case::code_span_apostrophe("`it's`", "<tt>it's</tt>")]
#[case::quoted_prose("`don' t`", "`don' t`")]
#[case::en_dash("a -- b", "a &ndash; b")]
#[case::em_dash("a --- b", "a &mdash; b")]
#[case::operator("operator-- x", "operator-- x")]
#[case::escaped_markers("\\*not emphasis\\*", "*not emphasis*")]
#[case::quoted_string("say \"*not*\" now", "say \"*not*\" now")]
#[case::html_tag("<b>bold</b>", "<b>bold</b>")]
#[case::tab("\tindented", "    indented")]
fn inline_markup(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(markdown(input), expected);
}

#[rstest]
#[case::with_title(
	"[text](http://x.com \"T\")",
	"<a href=\"http://x.com\" title=\"T\">text</a>"
)]
#[case::markdown_target("[guide](docs/guide.md)", "@ref docs/guide.md \"guide\"")]
#[case::ref_target("[API](@ref api_page)", "@ref api_page \"API\"")]
#[case::no_target_shape("F[x](y)", "F[x](y)")]
#[case::image("![alt](pic.png)", "<img src=\"pic.png\" alt=\"alt\"/>")]
#[case::image_with_title(
	"![alt](pic.png \"Caption\")",
	"<img src=\"pic.png\" alt=\"alt\" title=\"Caption\"/>"
)]
#[case::undefined_reference("[text][missing]", "[text][missing]")]
#[case::implicit_reference(
	"[Docs][]\n\n[docs]: http://d.org/\n",
	"<a href=\"http://d.org/\">Docs</a>\n\n"
)]
fn inline_links(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(markdown(input), expected);
}

#[test]
fn empty_input_produces_empty_output() {
	assert_eq!(markdown(""), "");
}

#[test]
fn disabled_markdown_returns_the_input() {
	let config = MarkdownConfig {
		markdown_enabled: false,
		..MarkdownConfig::default()
	};
	let mut harness = Harness::with_config(config);

	assert_eq!(harness.comment("*kept*\tas is"), "*kept*\tas is");
}

#[test]
fn reference_links_resolve_case_insensitively() {
	let output = markdown("[site][Ref]\n\n[ref]: http://example.com\n");

	assert_eq!(output, "<a href=\"http://example.com\">site</a>\n\n");
}

#[test]
fn reference_link_titles_become_attributes() {
	let output = markdown("[x][a]\n\n[a]: http://a.org/ \"Home\"\n");

	assert_eq!(output, "<a href=\"http://a.org/\" title=\"Home\">x</a>\n\n");
}

#[rstest]
#[case::four_spaces("Para\n    [a]: http://x.org\n\n[y][a]\n")]
#[case::list_continuation("- item\n      [a]: http://x.org\n\n[y][a]\n")]
fn deeply_indented_definitions_are_text(#[case] input: &str) {
	assert_eq!(markdown(input), input);
}

#[test]
fn definitions_allow_three_spaces_of_indent() {
	let output = markdown("[y][a]\n\n   [a]: http://x.org\n");

	assert_eq!(output, "<a href=\"http://x.org\">y</a>\n\n");
}

#[test]
fn ref_definitions_keep_the_reference_argument() {
	let output = markdown("[see][api]\n\n[api]: @ref api_page \"API docs\"\n");

	assert!(output.starts_with("@ref api_page"));
	assert!(output.contains("\"see\""));
	assert!(!output.contains("[api]"));
}

#[test]
fn later_link_definition_wins() {
	let output = markdown("[x][a]\n\n[a]: http://one.org/\n[a]: http://two.org/\n");

	assert!(output.contains("<a href=\"http://two.org/\">x</a>"));
	assert!(!output.contains("one.org"));
}

#[test]
fn table_with_alignment() {
	let input = "| Left | Right |\n|:-----|------:|\n| a    | b     |\n";
	let expected = "<table><tr><th align=\"left\"> Left <th align=\"right\"> Right \n</th>\n<tr><td \
	                align=\"left\"> a    <td align=\"right\"> b     \n</table> ";

	assert_eq!(markdown(input), expected);
}

#[test]
fn indented_code_becomes_verbatim() {
	let output = markdown("Text\n\n    code line\n    more\n\nAfter\n");

	insta::assert_snapshot!(output, @r"
	Text
	@verbatim
	code line
	more
	@endverbatim

	After
	");
}

#[test]
fn fenced_code_becomes_code_command() {
	let output = markdown("Intro\n\n~~~{.c}\nint x;\n~~~\nDone\n");

	assert_eq!(output, "Intro\n\n@code{c}\nint x;\n@endcode\nDone\n");
}

#[test]
fn opaque_blocks_are_left_alone() {
	let input = "before\n\\code\n*x*\n\\endcode\nafter\n";

	assert_eq!(markdown(input), input);
}

#[test]
fn block_quotes_are_wrapped() {
	let output = markdown("> quoted\n> more\n");

	assert_eq!(output, "<blockquote>\nquoted\nmore\n</blockquote>\n");
}

#[rstest]
#[case::jump_in(
	"> a\n> > > b\nc\n",
	"<blockquote>\na\n<blockquote>\n<blockquote>\nb\n</blockquote>\n</blockquote>\n</blockquote>\nc\n"
)]
#[case::step_out(
	"> > a\n> b\n",
	"<blockquote>\n<blockquote>\na\n</blockquote>\nb\n</blockquote>\n"
)]
fn quote_depth_changes_per_line(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(markdown(input), expected);
}

#[rstest]
#[case::dash_list("- item\n\n      code\n", "- item\n@verbatim\ncode\n@endverbatim\n")]
#[case::dash_list_too_shallow("- item\n\n     text\n", "- item\n\n     text\n")]
#[case::numbered_list("1. item\n\n       code\n", "1. item\n@verbatim\ncode\n@endverbatim\n")]
#[case::paragraph("Para\n\n     text\n", "Para\n@verbatim\n text\n@endverbatim\n")]
fn code_blocks_measure_against_list_items(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(markdown(input), expected);
}

#[rstest]
#[case::dash("- item\n", 2)]
#[case::dash_hash("-# item\n", 3)]
#[case::numbered("1. item\n", 3)]
#[case::li_tag("<li> item\n", 5)]
#[case::plain("Para\n", 0)]
#[case::indented("  text\n", 2)]
fn list_marker_indent(#[case] line: &str, #[case] expected: usize) {
	assert_eq!(indent_excluding_list_markers(line.as_bytes()), expected);
}

#[test]
fn pre_sections_are_left_alone() {
	let output = markdown("Text\n<pre>\n# not a header\n*x*\n</pre>\nAfter *y*\n");

	assert_eq!(output, "Text\n<pre>\n# not a header\n*x*\n</pre>\nAfter <em>y</em>\n");
}

#[test]
fn quoted_angle_brackets_stay_inside_html_tags() {
	let input = "<a title=\"x > *y*\">z</a>";

	assert_eq!(markdown(input), input);
}

#[test]
fn formulas_hide_header_markers() {
	let input = "Before\n\\f$\n# x\n\\f$\nAfter\n";

	assert_eq!(markdown(input), input);
}

#[rstest]
#[case::one_newline("`a\nb`", "<tt>a\nb</tt>")]
#[case::two_newlines("`a\nb\nc`", "`a\nb\nc`")]
fn code_spans_cross_at_most_one_line(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(markdown(input), expected);
}

#[rstest]
#[case::code_span("*a `*` b*", "<em>a <tt>*</tt> b</em>")]
#[case::opaque_block("*a \\code *x* \\endcode b*", "<em>a \\code *x* \\endcode b</em>")]
fn emphasis_skips_code(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(markdown(input), expected);
}

#[rstest]
#[case::atx_with_id("# Install {#install}\n", "@section install Install\n")]
#[case::atx_without_id("### Deep\n", "<h3>Deep</h3>\n")]
#[case::atx_deep_with_id("##### Five {#five}\n", "\\anchor five\n<h5>Five</h5>\n")]
#[case::setext("Title\n=====\n", "<h1>Title\n</h1>\n")]
#[case::setext_with_id("Title {#intro}\n=====\n", "@section intro Title\n\n")]
#[case::ruler("* * *\n", "<hr>\n")]
fn headers(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(markdown(input), expected);
}

#[test]
fn labelled_headers_are_registered() {
	let mut harness = Harness::new();
	harness.comment("# Install {#install}\n");

	let section = harness.sections.find("install").unwrap();
	assert_eq!(section.title, "Install");
	assert_eq!(section.kind, SectionKind::Section);
	assert_eq!(section.file, FILE_NAME);
	assert_eq!(section.line, Some(1));
	assert_eq!(harness.entry.anchors.len(), 1);
}

#[test]
fn setext_titles_drop_spaces_before_the_id() {
	let mut harness = Harness::new();
	harness.comment("Title {#intro}\n-----\n");

	let section = harness.sections.find("intro").unwrap();
	assert_eq!(section.title, "Title");
	assert_eq!(section.kind, SectionKind::Subsection);
}

#[test]
#[traced_test]
fn duplicate_labels_warn_once() {
	let mut harness = Harness::new();
	harness.comment("# A {#dup}\n\n# B {#dup}\n");

	let warnings = harness.diagnostics.warnings();
	assert_eq!(warnings.len(), 1);
	assert_eq!(
		warnings[0].message,
		"multiple use of section label 'dup', (first occurrence: test.md, line 1)"
	);
	assert_eq!(harness.sections.len(), 1);
	assert_eq!(harness.sections.find("dup").unwrap().title, "A");
	assert!(logs_contain("multiple use of section label 'dup'"));
}

#[test]
fn toc_marker_is_reported_to_the_entry() {
	let mut harness = Harness::new();
	let output = harness.comment("[TOC]\n");

	assert_eq!(output, "\n");
	assert!(harness.entry.toc);
}

#[test]
fn local_images_use_the_image_command() {
	let mut images = ImageIndex::new();
	images.insert("images/logo.png");
	let mut harness = Harness::with_images(images);

	assert_eq!(harness.comment("![Logo](logo.png)"), "@image html logo.png \"Logo\"");
}

#[test]
fn image_lookup_reports_ambiguous_names() {
	let mut images = ImageIndex::new();
	images.insert("a/logo.png");
	images.insert("b/logo.png");

	let found = images.find_image("logo.png").unwrap();
	assert!(found.ambiguous);

	let found = images.find_image("b/logo.png").unwrap();
	assert!(!found.ambiguous);
	assert_eq!(found.path, PathBuf::from("b/logo.png"));
	assert!(images.find_image("missing.png").is_none());
}

#[test]
fn image_index_scans_directories() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let dir = tmp.path().join("images");
	std::fs::create_dir_all(dir.join("nested"))?;
	std::fs::write(dir.join("logo.png"), b"png")?;
	std::fs::write(dir.join("nested/chart.svg"), b"svg")?;

	let index = ImageIndex::scan(&[dir])?;
	assert_eq!(index.len(), 2);
	assert!(index.find_image("chart.svg").is_some());

	Ok(())
}

#[test]
fn image_index_reports_walk_errors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let result = ImageIndex::scan(&[tmp.path().join("missing")]);

	let Err(error) = result else {
		panic!("scanning a missing directory should fail");
	};
	assert!(matches!(error, MarkdoxError::Walk(_)));
	assert_eq!(error.code().map(|code| code.to_string()), Some("markdox::walk".to_string()));

	Ok(())
}

#[test]
fn detab_expands_to_tab_stops() {
	let detabbed = detab(b"\tx\n  y\n", 4);
	assert_eq!(detabbed.text, b"    x\n  y\n".to_vec());
	assert_eq!(detabbed.ref_indent, 2);

	assert_eq!(detab(b"ab\tc", 4).text, b"ab  c".to_vec());
	assert_eq!(detab("é\tx".as_bytes(), 4).text, "é   x".as_bytes().to_vec());
	assert_eq!(detab(b"   \n", 4).ref_indent, 0);
}

#[test]
fn line_window_swallows_opaque_blocks() {
	let data = b"before\n\\code\nx\n\\endcode\nafter\n";
	let mut out = Vec::new();
	let mut window = LineWindow::new(data.len());

	window.advance(&mut out, data);
	assert!(out.is_empty());
	assert_eq!(window.end, 7);
	window.commit();

	window.advance(&mut out, data);
	assert_eq!(out, b"before\n\\code\nx\n\\endcode".to_vec());
	assert_eq!(window.pending, None);
	assert_eq!(window.start, 23);
	assert_eq!(window.end, 24);
}

#[rstest]
#[case::code("\\code", Some("endcode"))]
#[case::javadoc_code("{@code", Some("}"))]
#[case::formula("\\f$", Some("f$"))]
#[case::formula_env("\\f{", Some("f}"))]
#[case::uml("@startuml", Some("enduml"))]
#[case::escaped("\\\\code", None)]
#[case::other_command("\\param", None)]
fn opaque_block_closers(#[case] input: &str, #[case] expected: Option<&str>) {
	let data = input.as_bytes();
	let pos = data.iter().rposition(|&c| c == b'\\' || c == b'@').unwrap();

	assert_eq!(block_command_end(data, pos), expected);
}

#[test]
fn line_window_swallows_pre_sections() {
	let data = b"a\n<pre>\n# x\n</pre>\nb\n";
	let mut out = Vec::new();
	let mut window = LineWindow::new(data.len());

	window.advance(&mut out, data);
	window.commit();
	window.advance(&mut out, data);

	assert_eq!(out, b"a\n<pre>\n# x\n</pre>".to_vec());
	assert_eq!(window.pending, None);
	assert_eq!(window.start, 18);
	assert_eq!(window.end, 19);
}

#[test]
fn fenced_block_accounts_for_every_byte() {
	let data = b"```rust\nfn main() {}\n```\n";
	let block = fenced_block(data, 0).unwrap();

	assert_eq!(block.lang, "rust");
	assert_eq!(block.content, 7..20);
	assert_eq!(&data[block.content.clone()], b"\nfn main() {}");
	assert_eq!(block.end, 24);
	// opener, content, newline and closer cover the whole match
	assert_eq!(block.content.start + block.content.len() + 1 + 3, block.end);
}

#[test]
fn fenced_block_needs_a_long_enough_closer() {
	assert!(fenced_block(b"~~~~\ncode\n~~~\n", 0).is_none());
	assert!(fenced_block(b"~~\ncode\n~~\n", 0).is_none());
	assert!(fenced_block(b"        ~~~\ncode\n~~~\n", 0).is_none());
}

#[test]
fn table_detection() {
	assert!(is_table_block(b"a | b\n--|--\n1 | 2\n"));
	assert!(!is_table_block(b"a | b\nplain\n"));
	assert!(!is_table_block(b"a | b\n--|--|--\n1 | 2\n"));
}

#[test]
fn link_definitions_parse() {
	let definition = parse_definition(b"[Id]: <http://x.org> 'Title'\n").unwrap();

	assert_eq!(definition.id, "Id");
	assert_eq!(
		definition.link_ref,
		LinkRef {
			link: "http://x.org".to_string(),
			title: Some("Title".to_string()),
		}
	);
	assert_eq!(definition.end, 28);

	assert!(parse_definition(b"[text][other]\n").is_none());
	assert!(parse_definition(b"plain\n").is_none());
	assert!(parse_definition(b"    [a]: http://x.org\n").is_none());
}

#[test]
fn ref_link_definitions_absorb_their_argument() {
	let definition = parse_definition(b"[api]: @ref api_page \"API docs\"\n").unwrap();
	assert_eq!(definition.link_ref.link, "@ref api_page ");
	assert_eq!(definition.link_ref.title.as_deref(), Some("API docs"));
	assert_eq!(definition.end, 31);

	let definition = parse_definition(b"[x]: \\ref sec\n").unwrap();
	assert_eq!(definition.link_ref.link, "\\ref sec");
	assert_eq!(definition.link_ref.title, None);
}

#[test]
fn link_definition_titles_may_follow_on_the_next_line() {
	let definition = parse_definition(b"[id]: http://x.org\n  \"Next line\"\nrest\n").unwrap();

	assert_eq!(definition.link_ref.link, "http://x.org");
	assert_eq!(definition.link_ref.title.as_deref(), Some("Next line"));
	assert_eq!(definition.end, 32);
}

#[test]
fn link_table_is_case_insensitive() {
	let mut table = LinkRefTable::new();
	table.insert(
		"Id",
		LinkRef {
			link: "a".to_string(),
			title: None,
		},
	);

	assert_eq!(table.get("ID").map(|r| r.link.as_str()), Some("a"));
	assert_eq!(table.len(), 1);
}

#[test]
fn title_ids() {
	assert_eq!(
		extract_title_id(b"Intro {#intro}"),
		(&b"Intro "[..], Some(&b"intro"[..]))
	);
	assert_eq!(extract_title_id(b"Use {#x} here"), (&b"Use {#x} here"[..], None));

	let header = atx_header(b"## Setup {#setup} ##\n").unwrap();
	assert_eq!(header.level, 2);
	assert_eq!(header.title, b"Setup");
	assert_eq!(header.id, Some(&b"setup"[..]));
	assert!(atx_header(b"#hashtag\n").is_none());
}

#[rstest]
#[case::equals("===\n", 1)]
#[case::dashes("---", 2)]
#[case::list_item("- item\n", 0)]
#[case::single("=\n", 0)]
fn underline_levels(#[case] input: &str, #[case] expected: usize) {
	assert_eq!(header_line_level(input.as_bytes()), expected);
}

#[rstest]
#[case::stars("* * *", true)]
#[case::underscores("___\n", true)]
#[case::short("--", false)]
#[case::text("-- x", false)]
fn horizontal_rules(#[case] input: &str, #[case] expected: bool) {
	assert_eq!(is_horizontal_rule(input.as_bytes()), expected);
}

#[rstest]
#[case::bare("README.md", &[], "md_README")]
#[case::nested("docs/getting started.md", &[], "md_docs_getting_started")]
#[case::stripped("docs/a b.md", &["docs"], "md_a_b")]
#[case::dotted_dir("dir.v2/file", &[], "md_dir.v2_file")]
fn page_ids(#[case] file_name: &str, #[case] strip: &[&str], #[case] expected: &str) {
	let strip: Vec<PathBuf> = strip.iter().map(PathBuf::from).collect();

	assert_eq!(page_id_from_file_name(file_name, &strip), expected);
}

#[test]
fn page_with_setext_title() {
	let mut harness = Harness::new();
	let page = harness.page("docs/guide.md", "Guide\n=====\n\nText\n");

	assert_eq!(page.id, "md_docs_guide");
	assert_eq!(page.title, "Guide");
	assert_eq!(page.kind, PageKind::Page);
	insta::assert_snapshot!(page.output, @r"
	@page md_docs_guide Guide


	Text
	");
}

#[test]
fn page_with_atx_title_and_id() {
	let mut harness = Harness::new();
	let page = harness.page("INSTALL.md", "# Install {#install}\nRun it.\n");

	assert_eq!(page.id, "install");
	assert_eq!(page.title, "Install");
	assert_eq!(page.output, "@page install Install\nRun it.\n");
}

#[test]
fn index_id_becomes_main_page() {
	let mut harness = Harness::new();
	let page = harness.page("overview.md", "# Overview {#index}\nWelcome\n");

	assert_eq!(page.kind, PageKind::MainPage);
	assert_eq!(page.output, "@mainpage Overview\nWelcome\n");
}

#[test]
fn configured_main_page() {
	let config = MarkdownConfig {
		main_page_file_name: Some("README.md".to_string()),
		..MarkdownConfig::default()
	};
	let mut harness = Harness::with_config(config);
	let page = harness.page("README.md", "Hello\n");

	assert_eq!(page.kind, PageKind::MainPage);
	assert_eq!(page.title, "README");
	assert_eq!(page.output, "@mainpage\nHello\n");
}

#[test]
fn pages_ignore_disabled_markdown() {
	let config = MarkdownConfig {
		markdown_enabled: false,
		..MarkdownConfig::default()
	};
	let mut harness = Harness::with_config(config);
	let page = harness.page("notes.md", "Some *words*\n");

	assert_eq!(page.output, "@page md_notes notes\nSome <em>words</em>\n");
}

#[test]
fn page_toc_and_anchors() {
	let mut harness = Harness::new();
	let page = harness.page("a.md", "Intro\n\n[TOC]\n\n## Setup {#setup}\n");

	assert!(page.toc);
	assert_eq!(page.anchors.len(), 1);
	assert_eq!(page.anchors[0].id, "setup");
	assert_eq!(page.anchors[0].kind, SectionKind::Subsection);
}

#[test]
fn document_set_shares_sections_between_pages() -> AnyEmptyResult {
	let mut documents = DocumentSet::from_config(MarkdownConfig::default())?;
	documents.add_page("a.md", b"Intro\n\n## Setup {#setup}\n");
	documents.add_page("b.md", b"Other\n\n## Setup {#setup}\n");

	assert_eq!(documents.pages().len(), 2);
	assert_eq!(documents.sections().len(), 1);

	let warnings = documents.take_warnings();
	assert_eq!(warnings.len(), 1);
	assert_eq!(
		warnings[0].to_string(),
		"b.md:1: multiple use of section label 'setup', (first occurrence: a.md, line 1)"
	);
	assert!(documents.warnings().is_empty());

	Ok(())
}

#[test]
fn document_set_rejects_invalid_utf8() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("broken.md");
	std::fs::write(&path, [0xff, 0xfe, b'\n'])?;

	let mut documents = DocumentSet::from_config(MarkdownConfig::default())?;
	let result = documents.read_page(&path);
	assert!(matches!(result, Err(MarkdoxError::InvalidUtf8 { .. })));

	Ok(())
}

#[test]
fn config_from_toml() -> AnyEmptyResult {
	let config = MarkdownConfig::from_toml(
		"tab_width = 2\nmain_page_file_name = \"README.md\"\nstrip_from_path = \
		 [\"docs/\"]\n\n[extension_mapping]\n\".inc\" = \"cpp\"\n",
	)?;

	assert_eq!(config.tab_width, 2);
	assert!(config.markdown_enabled);
	assert!(config.is_main_page("docs/README.md"));
	assert!(!config.is_main_page("docs/GUIDE.md"));
	assert_eq!(config.strip_from_path, vec![PathBuf::from("docs/")]);
	assert_eq!(
		config.language_mapping()?.get("inc"),
		Some(&SourceLanguage::Cpp)
	);

	Ok(())
}

#[rstest]
#[case::zero_tab_width("tab_width = 0\n")]
#[case::unknown_language("[extension_mapping]\nxyz = \"cobol\"\n")]
#[case::not_toml("tab_width = \n")]
fn invalid_config(#[case] content: &str) {
	assert!(MarkdownConfig::from_toml(content).is_err());
}

#[test]
fn config_discovery() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	assert!(MarkdownConfig::load(tmp.path())?.is_none());

	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(tmp.path().join(".config/markdox.toml"), "tab_width = 8\n")?;
	let config = MarkdownConfig::load(tmp.path())?.unwrap();
	assert_eq!(config.tab_width, 8);

	std::fs::write(tmp.path().join("markdox.toml"), "tab_width = 3\n")?;
	let config = MarkdownConfig::load(tmp.path())?.unwrap();
	assert_eq!(config.tab_width, 3);

	Ok(())
}

#[rstest]
#[case::markdown("notes.MD", SourceLanguage::Markdown)]
#[case::header("include/lib.h", SourceLanguage::C)]
#[case::unknown("Makefile", SourceLanguage::Unknown)]
#[case::php_include("defs.inc", SourceLanguage::Php)]
fn language_detection(#[case] file_name: &str, #[case] expected: SourceLanguage) {
	let languages = ExtensionLanguages::default();

	assert_eq!(languages.detect(file_name), expected);
}

#[test]
fn extension_mapping_overrides_defaults() {
	let languages =
		ExtensionLanguages::with_mapping([("h".to_string(), SourceLanguage::Cpp)].into());

	assert_eq!(languages.detect("lib.h"), SourceLanguage::Cpp);
	assert_eq!(languages.detect("lib.c"), SourceLanguage::C);
}
