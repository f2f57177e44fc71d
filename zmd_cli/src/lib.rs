use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Convert Zeppelin notebooks to Markdown documents.",
	long_about = "zmd converts Apache Zeppelin notebook JSON exports into Markdown documents, \
	              materializing embedded images alongside the output. It understands both the \
	              0.6.2 and 0.7.1 notebook schemas and can also execute a notebook on a running \
	              Zeppelin server before converting its output.\n\nQuick start:\n  zmd convert -i \
	              note.json -o docs/post.md\n  zmd execute -i note.json -u zeppelin-host:8890"
)]
pub struct ZmdCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Convert a Zeppelin notebook JSON export to Markdown.
	///
	/// Reads the export, detects its schema generation from the first
	/// paragraph, renders every paragraph in document order, and writes the
	/// result as one Markdown file. Embedded images are decoded into an
	/// `images/` directory next to the output file. Nothing is written when
	/// the conversion fails.
	Convert {
		/// Zeppelin notebook input file (.json).
		#[arg(long, short)]
		input: PathBuf,

		/// Markdown output file. Defaults to `knowledge.md` in the current
		/// directory; any other extension is replaced with `.md`.
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// Author recorded in the header until a paragraph declares its own
		/// user. Overrides the `[convert] user` config value.
		#[arg(long)]
		user: Option<String>,
	},
	/// Execute a notebook on a Zeppelin server and retrieve its output.
	///
	/// Submits the execution job, polls until every paragraph reaches a
	/// terminal status, then fetches the executed notebook body. Paragraph
	/// errors are reported on stderr and produce a non-zero exit. The body
	/// is saved as `note.json` in the output directory, or printed to
	/// stdout when no directory is given.
	Execute {
		/// Zeppelin notebook input file (.json); must carry the server's
		/// notebook id.
		#[arg(long, short)]
		input: PathBuf,

		/// Directory to save the executed notebook JSON into (optional).
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// Zeppelin server address as host:port. Overrides the
		/// `[executor] url` config value.
		#[arg(long, short)]
		url: Option<String>,

		/// Seconds to wait between execution status polls.
		#[arg(long)]
		poll_interval: Option<u64>,

		/// Overall execution deadline in seconds. Without it the poll loop
		/// waits indefinitely, matching historical behavior.
		#[arg(long)]
		timeout: Option<u64>,
	},
}
