use std::thread;
use std::time::Duration;
use std::time::Instant;

use serde::Deserialize;
use serde_json::Value;

use crate::ZmdError;
use crate::ZmdResult;
use crate::config::DEFAULT_POLL_INTERVAL_SECS;
use crate::config::DEFAULT_ZEPPELIN_URL;

/// Paragraph statuses that end the polling loop.
const TERMINAL_STATUSES: [&str; 2] = ["FINISHED", "ERROR"];

/// Connection settings for a remote Zeppelin server.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
	/// Server address as `host:port`.
	pub zeppelin_url: String,
	/// Delay between status polls.
	pub poll_interval: Duration,
	/// Overall deadline for one execution. `None` polls until every
	/// paragraph reaches a terminal status, however long that takes.
	pub timeout: Option<Duration>,
}

impl Default for ExecutorConfig {
	fn default() -> Self {
		Self {
			zeppelin_url: DEFAULT_ZEPPELIN_URL.to_string(),
			poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
			timeout: None,
		}
	}
}

#[derive(Debug, Deserialize)]
struct JobStatusResponse {
	#[serde(default)]
	body: Vec<ParagraphStatus>,
}

#[derive(Debug, Deserialize)]
struct ParagraphStatus {
	#[serde(default)]
	status: String,
}

/// The executed notebook body plus any paragraph error messages collected
/// from it. Callers decide how to surface the errors; the executor only
/// gathers them.
#[derive(Debug)]
pub struct ExecutionOutcome {
	pub notebook: Value,
	pub errors: Vec<String>,
}

/// Blocking HTTP client that drives a notebook run on a remote Zeppelin
/// server: submit the job, poll until every paragraph is terminal, fetch
/// the executed body. The conversion engine never calls this; it simply
/// renders whatever notebook body an execution returns.
pub struct NotebookExecutor {
	config: ExecutorConfig,
	client: reqwest::blocking::Client,
}

impl NotebookExecutor {
	pub fn new(config: ExecutorConfig) -> Self {
		Self {
			config,
			client: reqwest::blocking::Client::new(),
		}
	}

	fn job_url(&self, notebook_id: &str) -> String {
		format!(
			"http://{}/api/notebook/job/{notebook_id}",
			self.config.zeppelin_url
		)
	}

	fn notebook_url(&self, notebook_id: &str) -> String {
		format!(
			"http://{}/api/notebook/{notebook_id}",
			self.config.zeppelin_url
		)
	}

	/// Submit the execution job for the whole notebook.
	pub fn run_notebook(&self, notebook_id: &str) -> ZmdResult<()> {
		let _ = self.client.post(self.job_url(notebook_id)).send()?;
		Ok(())
	}

	/// Poll the job status until every paragraph reports `FINISHED` or
	/// `ERROR`. With no configured timeout this blocks indefinitely.
	pub fn wait_for_completion(&self, notebook_id: &str) -> ZmdResult<()> {
		let started = Instant::now();
		loop {
			let status: JobStatusResponse = self
				.client
				.get(self.job_url(notebook_id))
				.send()?
				.json()?;

			let done = status
				.body
				.iter()
				.all(|paragraph| TERMINAL_STATUSES.contains(&paragraph.status.as_str()));
			if done {
				return Ok(());
			}

			if let Some(timeout) = self.config.timeout {
				if started.elapsed() >= timeout {
					return Err(ZmdError::ExecutionTimeout {
						id: notebook_id.to_string(),
						seconds: timeout.as_secs(),
					});
				}
			}

			tracing::trace!(notebook_id, "notebook still running, polling again");
			thread::sleep(self.config.poll_interval);
		}
	}

	/// Fetch the executed notebook body. A non-success response is fatal.
	pub fn fetch_notebook(&self, notebook_id: &str) -> ZmdResult<Value> {
		let response = self.client.get(self.notebook_url(notebook_id)).send()?;
		if !response.status().is_success() {
			return Err(ZmdError::ExecutionFailed {
				id: notebook_id.to_string(),
				status: response.status().as_u16(),
			});
		}

		let mut payload: Value = response.json()?;
		Ok(payload
			.get_mut("body")
			.map(Value::take)
			.unwrap_or(Value::Null))
	}

	/// Run the full submit/poll/fetch sequence and collect paragraph errors
	/// from the executed body.
	pub fn execute_notebook(&self, notebook_id: &str) -> ZmdResult<ExecutionOutcome> {
		self.run_notebook(notebook_id)?;
		self.wait_for_completion(notebook_id)?;
		let notebook = self.fetch_notebook(notebook_id)?;
		let errors = collect_paragraph_errors(&notebook);
		Ok(ExecutionOutcome { notebook, errors })
	}
}

/// Pull the first message of every paragraph whose results code is `ERROR`.
/// Operates on the raw JSON body so it works regardless of schema variant.
pub fn collect_paragraph_errors(notebook: &Value) -> Vec<String> {
	let Some(paragraphs) = notebook.get("paragraphs").and_then(Value::as_array) else {
		return Vec::new();
	};

	paragraphs
		.iter()
		.filter(|paragraph| {
			paragraph
				.get("results")
				.and_then(|results| results.get("code"))
				.and_then(Value::as_str)
				== Some("ERROR")
		})
		.filter_map(|paragraph| {
			paragraph
				.get("results")?
				.get("msg")?
				.get(0)?
				.get("data")?
				.as_str()
				.map(str::to_string)
		})
		.collect()
}
