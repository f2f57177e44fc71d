use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use zmd_cli::Commands;
use zmd_cli::ZmdCli;
use zmd_core::AnyEmptyResult;
use zmd_core::AnyResult;
use zmd_core::ConvertOptions;
use zmd_core::ExecutorConfig;
use zmd_core::Notebook;
use zmd_core::NotebookExecutor;
use zmd_core::SchemaVariant;
use zmd_core::ZmdConfig;
use zmd_core::ZmdError;
use zmd_core::convert_notebook;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = ZmdCli::parse();

	// Respect NO_COLOR, the --no-color flag, and non-terminal stderr.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose);

	let result = match &args.command {
		Some(Commands::Convert {
			input,
			output,
			user,
		}) => run_convert(&args, input, output.as_deref(), user.as_deref()),
		Some(Commands::Execute {
			input,
			output,
			url,
			poll_interval,
			timeout,
		}) => {
			run_execute(
				input,
				output.as_deref(),
				url.as_deref(),
				*poll_interval,
				*timeout,
			)
		}
		None => {
			eprintln!("No subcommand specified. Run `zmd --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<ZmdError>() {
			Ok(zmd_err) => {
				let report: miette::Report = (*zmd_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool) {
	let default_filter = if verbose { "zmd_core=debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn load_config() -> AnyResult<ZmdConfig> {
	let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
	Ok(ZmdConfig::load(&root)?.unwrap_or_default())
}

/// Resolve the Markdown output path: `knowledge.md` in the current
/// directory by default, and always a `.md` extension.
fn resolve_output(output: Option<&Path>) -> PathBuf {
	match output {
		Some(path) => path.with_extension("md"),
		None => PathBuf::from("knowledge.md"),
	}
}

fn run_convert(
	args: &ZmdCli,
	input: &Path,
	output: Option<&Path>,
	user: Option<&str>,
) -> AnyEmptyResult {
	let config = load_config()?;
	let raw = std::fs::read_to_string(input)?;
	let notebook = Notebook::from_json(&raw)?;

	let out_path = resolve_output(output);
	let output_dir = match out_path.parent() {
		Some(parent) if parent != Path::new("") => parent.to_path_buf(),
		_ => PathBuf::from("."),
	};

	let default_user = user.map_or_else(|| config.default_user(), str::to_string);
	let options = ConvertOptions::new(&output_dir).with_user(default_user);

	if args.verbose {
		let variant = SchemaVariant::detect(&notebook);
		println!(
			"Detected Zeppelin {} notebook with {} paragraph(s)",
			variant.zeppelin_version(),
			notebook.paragraphs.len()
		);
	}

	let markdown = convert_notebook(&notebook, options)?;
	std::fs::write(&out_path, markdown)?;
	println!("Wrote {}", out_path.display());

	Ok(())
}

fn run_execute(
	input: &Path,
	output: Option<&Path>,
	url: Option<&str>,
	poll_interval: Option<u64>,
	timeout: Option<u64>,
) -> AnyEmptyResult {
	let config = load_config()?;
	let raw = std::fs::read_to_string(input)?;
	let notebook = Notebook::from_json(&raw)?;
	let notebook_id = notebook.id.ok_or(ZmdError::MissingNotebookId)?;

	let executor_config = ExecutorConfig {
		zeppelin_url: url.map_or_else(|| config.zeppelin_url(), str::to_string),
		poll_interval: poll_interval.map_or_else(|| config.poll_interval(), Duration::from_secs),
		timeout: timeout.map(Duration::from_secs).or_else(|| config.timeout()),
	};

	let executor = NotebookExecutor::new(executor_config);
	let outcome = executor.execute_notebook(&notebook_id)?;

	// Paragraph failures abort the command before anything is saved.
	if !outcome.errors.is_empty() {
		for error in &outcome.errors {
			eprintln!("{} {error}", colored!("error:", red));
		}
		process::exit(1);
	}

	let rendered = serde_json::to_string_pretty(&outcome.notebook)?;
	match output {
		Some(directory) => {
			if !directory.is_dir() {
				eprintln!(
					"{} output path is not a directory: {}",
					colored!("warning:", yellow),
					directory.display()
				);
				return Err("output path given is not a valid directory".into());
			}
			let full_path = directory.join("note.json");
			std::fs::write(&full_path, rendered)?;
			println!("Saved executed notebook to {}", full_path.display());
		}
		None => println!("{rendered}"),
	}

	Ok(())
}
