use std::path::PathBuf;

use crate::ZmdResult;
use crate::dates::DateRange;
use crate::image;
use crate::notebook::Notebook;
use crate::notebook::OutputType;
use crate::notebook::Paragraph;
use crate::notebook::SchemaVariant;
use crate::table;

/// Author recorded in the header when no paragraph declares a user.
pub const DEFAULT_USER: &str = "anonymous";

/// Language assumed for paragraph text that carries no `%directive`.
const DEFAULT_LANGUAGE: &str = "scala";

/// Subdirectory of the output directory that materialized images land in.
const IMAGES_DIR: &str = "images";

/// Caller-supplied settings for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
	/// Directory the Markdown file will be written to; the `images`
	/// subdirectory is created under it on demand.
	pub output_dir: PathBuf,
	/// Author used until a paragraph declares its own `user`.
	pub default_user: String,
}

impl ConvertOptions {
	pub fn new(output_dir: impl Into<PathBuf>) -> Self {
		Self {
			output_dir: output_dir.into(),
			default_user: DEFAULT_USER.to_string(),
		}
	}

	pub fn with_user(mut self, user: impl Into<String>) -> Self {
		self.default_user = user.into();
		self
	}
}

impl Default for ConvertOptions {
	fn default() -> Self {
		Self::new(".")
	}
}

/// Mutable accumulator owned by exactly one conversion run: rendered lines,
/// the image filename counter, the last-seen author, and the tracked date
/// range. Created at conversion start, consumed once, discarded after.
#[derive(Debug)]
pub(crate) struct ConversionState {
	pub(crate) out: Vec<String>,
	pub(crate) index: usize,
	pub(crate) user: String,
	pub(crate) dates: DateRange,
}

/// One-shot converter from a parsed [`Notebook`] to a Markdown document.
///
/// The schema variant is selected once and threaded through every paragraph;
/// image files are the only side effect during body construction. Nothing is
/// handed to the caller until the full body and header are assembled, so a
/// fatal render error produces no partial document.
pub struct NotebookConverter {
	variant: SchemaVariant,
	options: ConvertOptions,
	state: ConversionState,
}

impl NotebookConverter {
	pub fn new(variant: SchemaVariant, options: ConvertOptions) -> Self {
		let state = ConversionState {
			out: Vec::new(),
			index: 0,
			user: options.default_user.clone(),
			dates: DateRange::new(),
		};
		Self {
			variant,
			options,
			state,
		}
	}

	/// Convert the notebook: body first, then the header prepended, then the
	/// joined document. Consumes the converter so state cannot leak into a
	/// second run.
	pub fn convert(mut self, notebook: &Notebook) -> ZmdResult<String> {
		for paragraph in &notebook.paragraphs {
			self.process_paragraph(paragraph)?;
		}
		self.build_header(&notebook.name);
		Ok(self.state.out.join("\n"))
	}

	fn process_paragraph(&mut self, paragraph: &Paragraph) -> ZmdResult<()> {
		if let Some(user) = &paragraph.user {
			self.state.user = user.clone();
		}
		if let Some(created) = &paragraph.date_created {
			self.state.dates.record_created(created)?;
		}
		if let Some(updated) = &paragraph.date_updated {
			self.state.dates.record_updated(updated)?;
		}
		if let Some(title) = &paragraph.title {
			self.state.out.push(format!("#### {title}"));
		}
		if let Some(text) = &paragraph.text {
			classify_input(text, &mut self.state.out);
		}
		self.process_results(paragraph)
	}

	/// Route one paragraph's result envelope to the matching renderer.
	fn process_results(&mut self, paragraph: &Paragraph) -> ZmdResult<()> {
		match self.variant {
			SchemaVariant::Legacy => self.process_legacy_result(paragraph),
			SchemaVariant::New => self.process_new_results(paragraph),
		}
	}

	/// Legacy envelopes dispatch directly on the declared type; there is no
	/// editor-mode suppression in this schema generation.
	fn process_legacy_result(&mut self, paragraph: &Paragraph) -> ZmdResult<()> {
		let Some(result) = &paragraph.result else {
			return Ok(());
		};
		let Some(msg) = result.msg.as_deref().filter(|msg| !msg.is_empty()) else {
			return Ok(());
		};
		let kind = OutputType::parse(result.kind.as_deref())?;
		self.render_output(kind, msg)
	}

	/// New envelopes require a declared editor mode and a non-empty message
	/// list; only the first message is rendered. Paragraphs whose mode is
	/// `text` or `markdown` produce no result output at all.
	fn process_new_results(&mut self, paragraph: &Paragraph) -> ZmdResult<()> {
		let Some(mode) = paragraph.config.mode() else {
			return Ok(());
		};
		let Some(results) = &paragraph.results else {
			return Ok(());
		};
		let Some(message) = results.msg.first() else {
			return Ok(());
		};
		if mode == "text" || mode == "markdown" {
			return Ok(());
		}
		let kind = OutputType::parse(Some(message.kind.as_str()))?;
		self.render_output(kind, &message.data)
	}

	fn render_output(&mut self, kind: OutputType, data: &str) -> ZmdResult<()> {
		match kind {
			OutputType::Text => {
				self.state.out.push(data.to_string());
				Ok(())
			}
			OutputType::Table => {
				table::format_table(data, &mut self.state.out);
				Ok(())
			}
			OutputType::Html => self.build_image(data),
		}
	}

	/// Materialize an embedded image to `images/output_<n>.png` and append
	/// its Markdown reference. An HTML result with no recognizable payload
	/// is skipped, not an error: not every HTML-typed result is an image.
	fn build_image(&mut self, data: &str) -> ZmdResult<()> {
		let png = match self.variant {
			SchemaVariant::Legacy => {
				match image::svg_payload(data) {
					Some(svg) => image::svg_to_png(svg)?,
					None => {
						tracing::debug!("HTML result carries no inline SVG document, skipping");
						return Ok(());
					}
				}
			}
			SchemaVariant::New => {
				match image::extract_base64_payload(data) {
					Some(payload) => image::decode_base64_payload(payload)?,
					None => {
						tracing::debug!("HTML result carries no base64 image payload, skipping");
						return Ok(());
					}
				}
			}
		};

		self.state.index += 1;
		let images_dir = self.options.output_dir.join(IMAGES_DIR);
		std::fs::create_dir_all(&images_dir)?;
		let filename = format!("output_{}.png", self.state.index);
		std::fs::write(images_dir.join(&filename), png)?;
		self.state
			.out
			.push(format!("\n![png]({IMAGES_DIR}/{filename})\n"));
		Ok(())
	}

	/// Prepend the fixed 9-line front-matter block. Runs exactly once, after
	/// the body, because it depends on the final user and date state.
	fn build_header(&mut self, title: &str) {
		let mut doc = vec![
			"---".to_string(),
			format!("title: {title}"),
			format!("author(s): {}", self.state.user),
			"tags: ".to_string(),
			format!("created_at: {}", self.state.dates.created_display()),
			format!("updated_at: {}", self.state.dates.updated_display()),
			"tldr: ".to_string(),
			"thumbnail: ".to_string(),
			"---".to_string(),
		];
		doc.append(&mut self.state.out);
		self.state.out = doc;
	}

	#[cfg(test)]
	pub(crate) fn finish_header(mut self, title: &str) -> Vec<String> {
		self.build_header(title);
		self.state.out
	}
}

/// Detect the notebook's schema variant and convert it in one call.
pub fn convert_notebook(notebook: &Notebook, options: ConvertOptions) -> ZmdResult<String> {
	let variant = SchemaVariant::detect(notebook);
	tracing::debug!(
		version = variant.zeppelin_version(),
		"detected notebook schema"
	);
	NotebookConverter::new(variant, options).convert(notebook)
}

/// Classify one paragraph's raw input text and append its rendering.
///
/// The first whitespace-delimited token is the directive candidate. A `%`
/// prefix selects the language tag; `md` bodies pass through verbatim while
/// everything else is fenced. Without a directive the whole trimmed text is
/// fenced as `scala`. A bare `%md` renders nothing; a bare code directive
/// still renders its two fence lines.
pub(crate) fn classify_input(text: &str, out: &mut Vec<String>) {
	let (directive, rest) = split_directive(text);
	match directive.strip_prefix('%') {
		Some(lang) => {
			if lang == "md" {
				if let Some(body) = rest {
					out.push(body.to_string());
				}
			} else {
				push_code(lang, rest, out);
			}
		}
		None => push_code(DEFAULT_LANGUAGE, Some(text.trim()), out),
	}
}

/// Split off the first whitespace-delimited token and the remainder with its
/// leading whitespace stripped. The remainder is `None` when nothing but
/// whitespace follows the token.
fn split_directive(text: &str) -> (&str, Option<&str>) {
	let trimmed = text.trim_start();
	match trimmed.find(char::is_whitespace) {
		Some(end) => {
			let rest = trimmed[end..].trim_start();
			(&trimmed[..end], (!rest.is_empty()).then_some(rest))
		}
		None => (trimmed, None),
	}
}

fn push_code(lang: &str, body: Option<&str>, out: &mut Vec<String>) {
	out.push(format!("```{lang}"));
	if let Some(body) = body {
		out.push(body.to_string());
	}
	out.push("```".to_string());
}
