use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ZmdError {
	#[error(transparent)]
	#[diagnostic(code(zmd::io_error))]
	Io(#[from] std::io::Error),

	#[error("invalid notebook JSON: {0}")]
	#[diagnostic(
		code(zmd::invalid_json),
		help("the input must be a Zeppelin notebook export with `name` and `paragraphs` fields")
	)]
	Json(#[from] serde_json::Error),

	#[error("unsupported output type: `{0}`")]
	#[diagnostic(
		code(zmd::unsupported_output_type),
		help("supported result types: HTML, TEXT, TABLE")
	)]
	UnsupportedOutputType(String),

	#[error("malformed timestamp: `{0}`")]
	#[diagnostic(
		code(zmd::malformed_timestamp),
		help("accepted formats: `Feb 28, 2017 3:44:54 PM` or `2015-07-03T01:43:40+0000`")
	)]
	MalformedTimestamp(String),

	#[error("failed to rasterize SVG output: {0}")]
	#[diagnostic(code(zmd::svg_render))]
	SvgRender(String),

	#[error("invalid base64 image payload: {0}")]
	#[diagnostic(code(zmd::image_decode))]
	ImageDecode(#[from] base64::DecodeError),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(zmd::config_parse),
		help("check that zmd.toml is valid TOML with [convert] and/or [executor] sections")
	)]
	ConfigParse(String),

	#[error("notebook is missing an `id` field")]
	#[diagnostic(
		code(zmd::missing_notebook_id),
		help("only notebooks exported from a Zeppelin server carry an id and can be re-executed")
	)]
	MissingNotebookId,

	#[error(transparent)]
	#[diagnostic(code(zmd::http))]
	Http(#[from] reqwest::Error),

	#[error("could not fetch executed notebook `{id}`: server returned {status}")]
	#[diagnostic(code(zmd::execution_failed))]
	ExecutionFailed { id: String, status: u16 },

	#[error("notebook `{id}` did not finish within {seconds} second(s)")]
	#[diagnostic(
		code(zmd::execution_timeout),
		help("raise `timeout_secs` in zmd.toml or pass --timeout, or drop it to wait indefinitely")
	)]
	ExecutionTimeout { id: String, seconds: u64 },
}

pub type ZmdResult<T> = Result<T, ZmdError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
