use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDateTime;

use crate::ZmdError;
use crate::ZmdResult;

/// Header value used when a notebook never declares a timestamp.
pub const DATE_SENTINEL: &str = "N/A";

/// The human-readable timestamp format Zeppelin 0.6.2 exports use, e.g.
/// `Feb 28, 2017 3:44:54 PM`. Parsed without an offset and assumed UTC.
const HUMAN_FORMAT: &str = "%b %d, %Y %I:%M:%S %p";

/// The ISO-8601-with-offset format newer exports use, e.g.
/// `2015-07-03T01:43:40+0000`.
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Parse a paragraph timestamp in either accepted format. Anything else is a
/// fatal malformed-timestamp error.
pub fn parse_timestamp(text: &str) -> ZmdResult<DateTime<FixedOffset>> {
	if let Ok(instant) = DateTime::parse_from_str(text, ISO_FORMAT) {
		return Ok(instant);
	}

	NaiveDateTime::parse_from_str(text, HUMAN_FORMAT)
		.map(|naive| naive.and_utc().fixed_offset())
		.map_err(|_| ZmdError::MalformedTimestamp(text.to_string()))
}

/// Running (earliest, latest) pair folded from a stream of paragraph
/// timestamps. Both extremes start at an unset sentinel, so the first
/// observation always wins without being compared against anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
	created: Option<DateTime<FixedOffset>>,
	updated: Option<DateTime<FixedOffset>>,
}

impl DateRange {
	pub fn new() -> Self {
		Self::default()
	}

	/// Fold a `dateCreated` observation: keep the earliest instant seen.
	pub fn record_created(&mut self, text: &str) -> ZmdResult<()> {
		let instant = parse_timestamp(text)?;
		match self.created {
			Some(current) if current <= instant => {}
			_ => self.created = Some(instant),
		}
		Ok(())
	}

	/// Fold a `dateUpdated` observation: keep the latest instant seen.
	pub fn record_updated(&mut self, text: &str) -> ZmdResult<()> {
		let instant = parse_timestamp(text)?;
		match self.updated {
			Some(current) if current >= instant => {}
			_ => self.updated = Some(instant),
		}
		Ok(())
	}

	pub fn created(&self) -> Option<DateTime<FixedOffset>> {
		self.created
	}

	pub fn updated(&self) -> Option<DateTime<FixedOffset>> {
		self.updated
	}

	/// The earliest timestamp rendered for the header, or the sentinel.
	pub fn created_display(&self) -> String {
		display(self.created)
	}

	/// The latest timestamp rendered for the header, or the sentinel.
	pub fn updated_display(&self) -> String {
		display(self.updated)
	}
}

fn display(instant: Option<DateTime<FixedOffset>>) -> String {
	match instant {
		Some(instant) => instant.format("%Y-%m-%d %H:%M:%S").to_string(),
		None => DATE_SENTINEL.to_string(),
	}
}
