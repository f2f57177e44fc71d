use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::ZmdError;
use crate::ZmdResult;
use crate::converter::DEFAULT_USER;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["zmd.toml", ".zmd.toml"];

/// Default Zeppelin server address for remote execution.
pub const DEFAULT_ZEPPELIN_URL: &str = "localhost:8890";

/// Default delay between execution status polls, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Configuration loaded from a `zmd.toml` file.
///
/// ```toml
/// [convert]
/// user = "anonymous"
///
/// [executor]
/// url = "localhost:8890"
/// poll_interval_secs = 1
/// timeout_secs = 600
/// ```
///
/// Every field is optional; CLI flags override config values, which in turn
/// override the built-in defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ZmdConfig {
	#[serde(default)]
	pub convert: ConvertConfig,
	#[serde(default)]
	pub executor: ExecutorSettings,
}

/// `[convert]` section.
#[derive(Debug, Default, Deserialize)]
pub struct ConvertConfig {
	/// Default author recorded in the header until a paragraph declares its
	/// own `user`.
	#[serde(default)]
	pub user: Option<String>,
}

/// `[executor]` section.
#[derive(Debug, Default, Deserialize)]
pub struct ExecutorSettings {
	/// Zeppelin server address as `host:port`.
	#[serde(default)]
	pub url: Option<String>,
	/// Delay between execution status polls.
	#[serde(default)]
	pub poll_interval_secs: Option<u64>,
	/// Overall execution deadline. Absent means poll forever, which matches
	/// the historical behavior.
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}

impl ZmdConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> ZmdResult<Option<ZmdConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: ZmdConfig =
			toml::from_str(&content).map_err(|e| ZmdError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// The configured default author, falling back to the built-in default.
	pub fn default_user(&self) -> String {
		self.convert
			.user
			.clone()
			.unwrap_or_else(|| DEFAULT_USER.to_string())
	}

	/// The configured server address, falling back to the built-in default.
	pub fn zeppelin_url(&self) -> String {
		self.executor
			.url
			.clone()
			.unwrap_or_else(|| DEFAULT_ZEPPELIN_URL.to_string())
	}

	/// The configured poll interval, falling back to the built-in default.
	pub fn poll_interval(&self) -> Duration {
		Duration::from_secs(
			self.executor
				.poll_interval_secs
				.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
		)
	}

	/// The configured execution deadline, if any.
	pub fn timeout(&self) -> Option<Duration> {
		self.executor.timeout_secs.map(Duration::from_secs)
	}
}
