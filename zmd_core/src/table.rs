/// Translate one tab-delimited row into Markdown. Returns `None` for
/// empty/blank rows, which are skipped entirely. A single-column row is
/// emitted as a plain line without pipes. The header row carries its dash
/// separator joined into the same entry with an embedded newline, so header
/// and separator always travel as one output unit.
pub fn format_row(row: &str, header: bool) -> Option<String> {
	if row.trim().is_empty() {
		return None;
	}

	let cols: Vec<&str> = row.split('\t').collect();
	if cols.len() == 1 {
		return Some(cols[0].to_string());
	}

	let mut line = String::from("|");
	let mut underline = String::from("|");
	for col in &cols {
		line.push_str(col);
		line.push('|');
		underline.push_str("-|");
	}

	if header {
		Some(format!("{line}\n{underline}"))
	} else {
		Some(line)
	}
}

/// Render a whole TABLE payload: newline-delimited rows, tab-delimited
/// columns, first row treated as the header.
pub fn format_table(msg: &str, out: &mut Vec<String>) {
	let mut rows = msg.split('\n');
	if let Some(header_row) = rows.next() {
		if let Some(line) = format_row(header_row, true) {
			out.push(line);
		}
	}
	for row in rows {
		if let Some(line) = format_row(row, false) {
			out.push(line);
		}
	}
}
