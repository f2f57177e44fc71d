use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rstest::rstest;
use serde_json::json;
use similar_asserts::assert_eq;

use super::__fixtures::*;
use super::*;
use crate::converter::classify_input;
use crate::image;
use crate::table::format_row;
use crate::table::format_table;

#[test]
fn header_is_the_fixed_nine_line_block() {
	let options = ConvertOptions::default().with_user("tester");
	let converter = NotebookConverter::new(SchemaVariant::Legacy, options);
	let out = converter.finish_header("title");

	assert_eq!(
		out,
		lines(&[
			"---",
			"title: title",
			"author(s): tester",
			"tags: ",
			"created_at: N/A",
			"updated_at: N/A",
			"tldr: ",
			"thumbnail: ",
			"---",
		])
	);
}

#[rstest]
#[case::bare_md("%md", &[])]
#[case::md_with_body("%md text", &["text"])]
#[case::md_with_padding(" %md   text", &["text"])]
#[case::no_directive(" sample text", &["```scala", "sample text", "```"])]
#[case::percent_inside_token("s%ample", &["```scala", "s%ample", "```"])]
#[case::bare_code_directive("%spark", &["```spark", "```"])]
#[case::code_with_body("%sql select 1", &["```sql", "select 1", "```"])]
fn classify_paragraph_input(#[case] input: &str, #[case] expected: &[&str]) {
	let mut out = Vec::new();
	classify_input(input, &mut out);
	assert_eq!(out, lines(expected));
}

#[test]
fn multiline_code_keeps_interior_newlines() {
	let mut out = Vec::new();
	classify_input("%spark\nval x = 1\nval y = 2", &mut out);
	assert_eq!(out, lines(&["```spark", "val x = 1\nval y = 2", "```"]));
}

#[rstest]
#[case::empty("", None)]
#[case::blank("   ", None)]
#[case::single_column("test", Some("test"))]
#[case::two_columns("test\ttest2", Some("|test|test2|"))]
#[case::empty_middle_column("test\t\ttest2", Some("|test||test2|"))]
#[case::trailing_tab("a\t", Some("|a||"))]
fn format_body_row(#[case] input: &str, #[case] expected: Option<&str>) {
	assert_eq!(format_row(input, false), expected.map(str::to_string));
}

#[test]
fn header_row_carries_its_separator_in_one_entry() {
	assert_eq!(
		format_row("test\ttest2", true),
		Some("|test|test2|\n|-|-|".to_string())
	);
}

#[test]
fn blank_rows_skip_even_as_header() {
	assert_eq!(format_row("", true), None);
}

#[test]
fn table_treats_first_row_as_header() {
	let mut out = Vec::new();
	format_table("h1\th2\na\tb\n\nc\td", &mut out);
	assert_eq!(out, lines(&["|h1|h2|\n|-|-|", "|a|b|", "|c|d|"]));
}

#[test]
fn created_date_keeps_the_earliest_instant() {
	let mut range = DateRange::new();
	range.record_created("Feb 28, 2017 3:44:54 PM").unwrap();
	range.record_created("Feb 28, 2017 4:44:54 PM").unwrap();
	assert_eq!(range.created_display(), "2017-02-28 15:44:54");
}

#[test]
fn updated_date_keeps_the_latest_instant() {
	let mut range = DateRange::new();
	range.record_updated("Feb 28, 2017 3:44:54 PM").unwrap();
	range.record_updated("Feb 28, 2017 4:44:54 PM").unwrap();
	assert_eq!(range.updated_display(), "2017-02-28 16:44:54");
}

#[test]
fn iso_timestamps_with_numeric_offset_parse() {
	let mut range = DateRange::new();
	range.record_created("2015-07-03T01:43:40+0000").unwrap();
	range.record_created("2015-07-04T01:43:40+0000").unwrap();
	range.record_updated("2015-07-03T01:43:40+0000").unwrap();
	range.record_updated("2015-07-04T01:43:40+0000").unwrap();
	assert_eq!(range.created_display(), "2015-07-03 01:43:40");
	assert_eq!(range.updated_display(), "2015-07-04 01:43:40");
}

#[test]
fn untracked_dates_render_the_sentinel() {
	let range = DateRange::new();
	assert_eq!(range.created_display(), DATE_SENTINEL);
	assert_eq!(range.updated_display(), DATE_SENTINEL);
}

#[test]
fn malformed_timestamps_are_fatal() {
	let err = parse_timestamp("yesterday").unwrap_err();
	assert!(matches!(err, ZmdError::MalformedTimestamp(text) if text == "yesterday"));
}

#[rstest]
#[case("HTML", OutputType::Html)]
#[case("TEXT", OutputType::Text)]
#[case("TABLE", OutputType::Table)]
fn known_output_types_parse(#[case] kind: &str, #[case] expected: OutputType) {
	assert_eq!(OutputType::parse(Some(kind)).unwrap(), expected);
}

#[test]
fn unknown_output_types_are_fatal() {
	let err = OutputType::parse(Some("UNKNOWN")).unwrap_err();
	assert!(matches!(err, ZmdError::UnsupportedOutputType(kind) if kind == "UNKNOWN"));
}

#[rstest]
#[case::nested_path(Some("ace/mode/scala"), Some("scala"))]
#[case::bare_mode(Some("markdown"), Some("markdown"))]
#[case::absent(None, None)]
fn editor_mode_is_the_last_path_segment(
	#[case] editor_mode: Option<&str>,
	#[case] expected: Option<&str>,
) {
	let config = ParagraphConfig {
		editor_mode: editor_mode.map(str::to_string),
	};
	assert_eq!(config.mode(), expected);
}

#[test]
fn schema_variant_detected_from_first_paragraph() {
	let legacy = notebook(LEGACY_NOTEBOOK);
	assert_eq!(SchemaVariant::detect(&legacy), SchemaVariant::Legacy);
	assert_eq!(SchemaVariant::detect(&legacy).zeppelin_version(), "0.6.2");

	let new = notebook(NEW_NOTEBOOK);
	assert_eq!(SchemaVariant::detect(&new), SchemaVariant::New);
	assert_eq!(SchemaVariant::detect(&new).zeppelin_version(), "0.7.1");
}

#[test]
fn missing_required_fields_fail_parsing() {
	assert!(Notebook::from_json(r#"{"paragraphs":[]}"#).is_err());
	assert!(Notebook::from_json(r#"{"name":"T"}"#).is_err());
	assert!(Notebook::from_json("not json").is_err());
}

#[test]
fn legacy_notebook_converts_end_to_end() {
	let markdown = convert_notebook(&notebook(LEGACY_NOTEBOOK), ConvertOptions::default()).unwrap();
	let expected = [
		"---",
		"title: T",
		"author(s): anonymous",
		"tags: ",
		"created_at: N/A",
		"updated_at: N/A",
		"tldr: ",
		"thumbnail: ",
		"---",
		"hello",
		"world",
	]
	.join("\n");
	assert_eq!(markdown, expected);
}

#[test]
fn new_notebook_converts_end_to_end() {
	let markdown = convert_notebook(&notebook(NEW_NOTEBOOK), ConvertOptions::default()).unwrap();
	let expected = [
		"---",
		"title: New",
		"author(s): tester",
		"tags: ",
		"created_at: 2015-07-03 01:43:40",
		"updated_at: 2015-07-04 01:43:40",
		"tldr: ",
		"thumbnail: ",
		"---",
		"|h1|h2|\n|-|-|",
		"|a|b|",
	]
	.join("\n");
	assert_eq!(markdown, expected);
}

#[test]
fn paragraph_titles_render_as_heading_lines() {
	let raw = r#"{"name":"T","paragraphs":[{"title":"Overview","text":"%md body"}]}"#;
	let markdown = convert_notebook(&notebook(raw), ConvertOptions::default()).unwrap();
	assert!(markdown.contains("#### Overview\nbody"));
}

#[test]
fn empty_legacy_message_produces_no_output() {
	let raw = r#"{"name":"T","paragraphs":[{"result":{"type":"TEXT","msg":""}}]}"#;
	let markdown = convert_notebook(&notebook(raw), ConvertOptions::default()).unwrap();
	assert!(markdown.ends_with("---"));
}

#[test]
fn unknown_result_type_aborts_the_conversion() {
	let raw = r#"{"name":"T","paragraphs":[{"result":{"type":"UNKNOWN","msg":"x"}}]}"#;
	let err = convert_notebook(&notebook(raw), ConvertOptions::default()).unwrap_err();
	assert!(matches!(err, ZmdError::UnsupportedOutputType(_)));
}

#[rstest]
#[case::text_mode("ace/mode/text")]
#[case::markdown_mode("ace/mode/markdown")]
fn text_and_markdown_modes_suppress_result_output(#[case] editor_mode: &str) {
	let value = json!({
		"name": "T",
		"paragraphs": [{
			"config": { "editorMode": editor_mode },
			"results": { "msg": [{ "type": "TEXT", "data": "hidden" }] }
		}]
	});
	let parsed: Notebook = serde_json::from_value(value).unwrap();
	let markdown = convert_notebook(&parsed, ConvertOptions::default()).unwrap();
	assert!(!markdown.contains("hidden"));
}

#[test]
fn missing_editor_mode_suppresses_result_output() {
	let value = json!({
		"name": "T",
		"paragraphs": [{
			"results": { "msg": [{ "type": "TEXT", "data": "hidden" }] }
		}]
	});
	let parsed: Notebook = serde_json::from_value(value).unwrap();
	let markdown = convert_notebook(&parsed, ConvertOptions::default()).unwrap();
	assert!(!markdown.contains("hidden"));
}

#[test]
fn only_the_first_new_message_renders() {
	let value = json!({
		"name": "T",
		"paragraphs": [{
			"config": { "editorMode": "ace/mode/scala" },
			"results": { "msg": [
				{ "type": "TEXT", "data": "first" },
				{ "type": "TEXT", "data": "second" }
			] }
		}]
	});
	let parsed: Notebook = serde_json::from_value(value).unwrap();
	let markdown = convert_notebook(&parsed, ConvertOptions::default()).unwrap();
	assert!(markdown.contains("first"));
	assert!(!markdown.contains("second"));
}

#[rstest]
#[case::present(r#"<img src="data:image/png;base64,aGVsbG8=" />"#, Some("aGVsbG8="))]
#[case::absent("<div>plain html</div>", None)]
fn base64_payload_extraction(#[case] data: &str, #[case] expected: Option<&str>) {
	assert_eq!(image::extract_base64_payload(data), expected);
}

#[test]
fn svg_payload_requires_the_xml_prolog() {
	assert_eq!(image::svg_payload("nothing here"), None);
	let svg = r#"<?xml version="1.0" encoding="utf-8"?><svg/>"#;
	assert_eq!(image::svg_payload(svg), Some(svg));
}

#[test]
fn new_variant_materializes_base64_images() {
	let tmp = tempfile::tempdir().unwrap();
	let payload = STANDARD.encode(b"not really a png");
	let value = json!({
		"name": "T",
		"paragraphs": [{
			"config": { "editorMode": "ace/mode/scala" },
			"results": { "msg": [{
				"type": "HTML",
				"data": format!("<img src=\"data:image/png;base64,{payload}\" />")
			}] }
		}]
	});
	let parsed: Notebook = serde_json::from_value(value).unwrap();
	let markdown = convert_notebook(&parsed, ConvertOptions::new(tmp.path())).unwrap();

	let written = std::fs::read(tmp.path().join("images").join("output_1.png")).unwrap();
	assert_eq!(written, b"not really a png");
	assert!(markdown.contains("![png](images/output_1.png)"));
}

#[test]
fn image_filenames_are_sequential_per_run() {
	let tmp = tempfile::tempdir().unwrap();
	let payload = STANDARD.encode(b"bytes");
	let data = format!("<img src=\"data:image/png;base64,{payload}\" />");
	let value = json!({
		"name": "T",
		"paragraphs": [
			{
				"config": { "editorMode": "ace/mode/scala" },
				"results": { "msg": [{ "type": "HTML", "data": data }] }
			},
			{
				"config": { "editorMode": "ace/mode/scala" },
				"results": { "msg": [{ "type": "HTML", "data": data }] }
			}
		]
	});
	let parsed: Notebook = serde_json::from_value(value).unwrap();
	let markdown = convert_notebook(&parsed, ConvertOptions::new(tmp.path())).unwrap();

	assert!(tmp.path().join("images").join("output_1.png").is_file());
	assert!(tmp.path().join("images").join("output_2.png").is_file());
	assert!(markdown.contains("![png](images/output_2.png)"));
}

#[test]
fn unmatched_image_payload_is_a_silent_skip() {
	let tmp = tempfile::tempdir().unwrap();
	let value = json!({
		"name": "T",
		"paragraphs": [{
			"config": { "editorMode": "ace/mode/scala" },
			"results": { "msg": [{ "type": "HTML", "data": "<div>no image</div>" }] }
		}]
	});
	let parsed: Notebook = serde_json::from_value(value).unwrap();
	let markdown = convert_notebook(&parsed, ConvertOptions::new(tmp.path())).unwrap();

	assert!(!tmp.path().join("images").exists());
	assert!(!markdown.contains("![png]"));
}

#[test]
fn invalid_base64_payload_is_fatal() {
	let tmp = tempfile::tempdir().unwrap();
	let value = json!({
		"name": "T",
		"paragraphs": [{
			"config": { "editorMode": "ace/mode/scala" },
			"results": { "msg": [{
				"type": "HTML",
				"data": "<img src=\"data:image/png;base64,!!not base64!!\" />"
			}] }
		}]
	});
	let parsed: Notebook = serde_json::from_value(value).unwrap();
	let err = convert_notebook(&parsed, ConvertOptions::new(tmp.path())).unwrap_err();
	assert!(matches!(err, ZmdError::ImageDecode(_)));
}

#[test]
fn legacy_svg_rasterizes_to_png() {
	let tmp = tempfile::tempdir().unwrap();
	let svg = r##"<?xml version="1.0" encoding="utf-8"?><svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect width="4" height="4" fill="#ff0000"/></svg>"##;
	let value = json!({
		"name": "T",
		"paragraphs": [{ "result": { "type": "HTML", "msg": svg } }]
	});
	let parsed: Notebook = serde_json::from_value(value).unwrap();
	let markdown = convert_notebook(&parsed, ConvertOptions::new(tmp.path())).unwrap();

	let written = std::fs::read(tmp.path().join("images").join("output_1.png")).unwrap();
	assert_eq!(&written[..4], b"\x89PNG");
	assert!(markdown.contains("![png](images/output_1.png)"));
}

#[test]
fn legacy_html_without_svg_is_a_silent_skip() {
	let tmp = tempfile::tempdir().unwrap();
	let value = json!({
		"name": "T",
		"paragraphs": [{ "result": { "type": "HTML", "msg": "nothing here" } }]
	});
	let parsed: Notebook = serde_json::from_value(value).unwrap();
	let markdown = convert_notebook(&parsed, ConvertOptions::new(tmp.path())).unwrap();

	assert!(!tmp.path().join("images").exists());
	assert!(!markdown.contains("![png]"));
}

#[test]
fn config_loads_from_zmd_toml() {
	let tmp = tempfile::tempdir().unwrap();
	std::fs::write(
		tmp.path().join("zmd.toml"),
		"[convert]\nuser = \"docs-bot\"\n\n[executor]\nurl = \"zeppelin:8080\"\npoll_interval_secs = 3\ntimeout_secs = 600\n",
	)
	.unwrap();

	let config = ZmdConfig::load(tmp.path()).unwrap().unwrap();
	assert_eq!(config.default_user(), "docs-bot");
	assert_eq!(config.zeppelin_url(), "zeppelin:8080");
	assert_eq!(config.poll_interval(), std::time::Duration::from_secs(3));
	assert_eq!(config.timeout(), Some(std::time::Duration::from_secs(600)));
}

#[test]
fn absent_config_resolves_to_none() {
	let tmp = tempfile::tempdir().unwrap();
	assert!(ZmdConfig::load(tmp.path()).unwrap().is_none());
}

#[test]
fn invalid_config_is_a_parse_error() {
	let tmp = tempfile::tempdir().unwrap();
	std::fs::write(tmp.path().join("zmd.toml"), "not = [valid").unwrap();
	let err = ZmdConfig::load(tmp.path()).unwrap_err();
	assert!(matches!(err, ZmdError::ConfigParse(_)));
}

#[test]
fn config_defaults_match_the_built_ins() {
	let config = ZmdConfig::default();
	assert_eq!(config.default_user(), DEFAULT_USER);
	assert_eq!(config.zeppelin_url(), DEFAULT_ZEPPELIN_URL);
	assert_eq!(
		config.poll_interval(),
		std::time::Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)
	);
	assert_eq!(config.timeout(), None);
}

#[test]
fn paragraph_errors_collected_from_executed_body() {
	let body = json!({
		"paragraphs": [
			{ "results": { "code": "SUCCESS", "msg": [{ "type": "TEXT", "data": "fine" }] } },
			{ "results": { "code": "ERROR", "msg": [{ "type": "TEXT", "data": "boom" }] } },
			{ "text": "%md no results at all" }
		]
	});
	assert_eq!(collect_paragraph_errors(&body), vec!["boom".to_string()]);
}

#[test]
fn executor_config_defaults_preserve_unbounded_polling() {
	let config = ExecutorConfig::default();
	assert_eq!(config.zeppelin_url, DEFAULT_ZEPPELIN_URL);
	assert_eq!(
		config.poll_interval,
		std::time::Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)
	);
	assert!(config.timeout.is_none());
}
