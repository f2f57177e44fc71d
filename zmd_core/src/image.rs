use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

use crate::ZmdError;
use crate::ZmdResult;

/// Matches the base64 payload new-variant HTML results embed in an
/// `<img src="data:image/png;base64,...">` attribute. The capture runs to
/// the closing quote of the attribute value.
static BASE64_PAYLOAD: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"base64,(.*?)""#).expect("payload pattern is valid"));

/// Extract the base64 image blob from a new-variant HTML result. `None`
/// when the message embeds no recognizable image, which callers tolerate as
/// a silent skip.
pub(crate) fn extract_base64_payload(data: &str) -> Option<&str> {
	BASE64_PAYLOAD
		.captures(data)
		.and_then(|captures| captures.get(1))
		.map(|payload| payload.as_str())
}

/// Decode a base64 image blob into raw PNG bytes. Unlike a missing payload,
/// a payload that fails to decode is a fatal error.
pub(crate) fn decode_base64_payload(payload: &str) -> ZmdResult<Vec<u8>> {
	Ok(STANDARD.decode(payload)?)
}

/// Probe a legacy HTML result for an inline SVG document. Legacy Zeppelin
/// emits the full XML prolog, so the substring test mirrors what the server
/// actually writes. Returns the whole message, which *is* the SVG markup.
pub(crate) fn svg_payload(data: &str) -> Option<&str> {
	if data.contains("xml version") {
		Some(data)
	} else {
		None
	}
}

/// Rasterize SVG markup to PNG bytes at its intrinsic size. Any parse or
/// encode failure propagates as a fatal conversion error.
pub(crate) fn svg_to_png(svg: &str) -> ZmdResult<Vec<u8>> {
	let options = resvg::usvg::Options::default();
	let tree = resvg::usvg::Tree::from_str(svg, &options)
		.map_err(|e| ZmdError::SvgRender(e.to_string()))?;

	let size = tree.size().to_int_size();
	let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
		.ok_or_else(|| ZmdError::SvgRender("SVG has an empty pixel area".to_string()))?;

	resvg::render(
		&tree,
		resvg::tiny_skia::Transform::identity(),
		&mut pixmap.as_mut(),
	);

	pixmap
		.encode_png()
		.map_err(|e| ZmdError::SvgRender(e.to_string()))
}
