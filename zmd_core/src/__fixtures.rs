use crate::Notebook;

/// The two-paragraph legacy (0.6.2) notebook from the conversion docs: one
/// markdown paragraph, one TEXT result.
pub(crate) const LEGACY_NOTEBOOK: &str = r#"{
	"name": "T",
	"paragraphs": [
		{ "text": "%md hello" },
		{ "result": { "type": "TEXT", "msg": "world" } }
	]
}"#;

/// A new-schema (0.7.1) notebook with author, timestamps, and a TABLE
/// result behind a scala editor mode.
pub(crate) const NEW_NOTEBOOK: &str = r#"{
	"name": "New",
	"paragraphs": [
		{
			"user": "tester",
			"dateCreated": "2015-07-03T01:43:40+0000",
			"dateUpdated": "2015-07-04T01:43:40+0000",
			"config": { "editorMode": "ace/mode/scala" },
			"results": {
				"code": "SUCCESS",
				"msg": [{ "type": "TABLE", "data": "h1\th2\na\tb" }]
			}
		}
	]
}"#;

pub(crate) fn notebook(raw: &str) -> Notebook {
	Notebook::from_json(raw).expect("fixture notebook parses")
}

pub(crate) fn lines(entries: &[&str]) -> Vec<String> {
	entries.iter().map(|entry| (*entry).to_string()).collect()
}
