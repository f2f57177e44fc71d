use serde::Deserialize;

use crate::ZmdError;
use crate::ZmdResult;

/// A Zeppelin notebook export: ordered paragraphs plus metadata.
///
/// The document is parsed once per conversion and never mutated. Exports
/// missing the `name` or `paragraphs` fields fail deserialization, which the
/// caller surfaces as an invalid-input error before any output is written.
#[derive(Debug, Clone, Deserialize)]
pub struct Notebook {
	/// Server-assigned notebook id. Only present on notebooks exported from a
	/// running Zeppelin instance; required for remote execution.
	#[serde(default)]
	pub id: Option<String>,
	pub name: String,
	pub paragraphs: Vec<Paragraph>,
}

impl Notebook {
	/// Parse a notebook from raw JSON text.
	pub fn from_json(raw: &str) -> ZmdResult<Self> {
		Ok(serde_json::from_str(raw)?)
	}
}

/// One notebook cell: input text, optional result envelope, optional
/// metadata. Every field is optional; which result key is populated depends
/// on the notebook's [`SchemaVariant`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
	#[serde(default)]
	pub user: Option<String>,
	#[serde(default)]
	pub date_created: Option<String>,
	#[serde(default)]
	pub date_updated: Option<String>,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub text: Option<String>,
	#[serde(default)]
	pub config: ParagraphConfig,
	/// Legacy (0.6.2) result envelope.
	#[serde(default)]
	pub result: Option<LegacyResult>,
	/// New (0.7.1) result envelope.
	#[serde(default)]
	pub results: Option<NewResults>,
}

/// Per-paragraph configuration. Only the editor mode matters for
/// conversion; everything else in the export is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphConfig {
	#[serde(default)]
	pub editor_mode: Option<String>,
}

impl ParagraphConfig {
	/// The last path segment of the editor mode string, e.g.
	/// `"ace/mode/scala"` yields `"scala"`. `None` when no mode is declared.
	pub fn mode(&self) -> Option<&str> {
		let editor_mode = self.editor_mode.as_deref()?;
		Some(editor_mode.rsplit('/').next().unwrap_or(editor_mode))
	}
}

/// Result envelope used by Zeppelin 0.6.2: a single message string plus its
/// declared output type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyResult {
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	#[serde(default)]
	pub msg: Option<String>,
	#[serde(default)]
	pub code: Option<String>,
}

/// Result envelope used by Zeppelin 0.7.1: a sequence of typed messages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewResults {
	#[serde(default)]
	pub code: Option<String>,
	#[serde(default)]
	pub msg: Vec<ResultMessage>,
}

/// One output message inside a [`NewResults`] envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultMessage {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub data: String,
}

/// The two known notebook schema generations. Selected once per notebook
/// and threaded through the whole conversion; a notebook never mixes
/// variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
	/// Zeppelin 0.6.2: singular `result` key, SVG image payloads.
	Legacy,
	/// Zeppelin 0.7.1: plural `results` key, base64 image payloads, editor
	/// mode suppression.
	New,
}

impl SchemaVariant {
	/// Detect the schema variant from the first paragraph. The plural
	/// `results` key selects [`SchemaVariant::New`]; its absence (including
	/// an empty notebook) selects [`SchemaVariant::Legacy`].
	pub fn detect(notebook: &Notebook) -> Self {
		match notebook.paragraphs.first() {
			Some(paragraph) if paragraph.results.is_some() => Self::New,
			_ => Self::Legacy,
		}
	}

	/// The Zeppelin release this schema generation shipped with.
	pub fn zeppelin_version(self) -> &'static str {
		match self {
			Self::Legacy => "0.6.2",
			Self::New => "0.7.1",
		}
	}
}

/// The closed set of renderable output types. Anything else in an export is
/// a fatal error rather than a silent skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
	Html,
	Text,
	Table,
}

impl OutputType {
	/// Parse a declared result type. A missing type string is reported the
	/// same way as an unknown one.
	pub fn parse(kind: Option<&str>) -> ZmdResult<Self> {
		match kind {
			Some("HTML") => Ok(Self::Html),
			Some("TEXT") => Ok(Self::Text),
			Some("TABLE") => Ok(Self::Table),
			Some(other) => Err(ZmdError::UnsupportedOutputType(other.to_string())),
			None => Err(ZmdError::UnsupportedOutputType("<missing>".to_string())),
		}
	}
}
