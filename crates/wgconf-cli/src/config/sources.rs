// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Settings sources: files, environment, CLI, defaults.

use std::path::PathBuf;

use tracing::{debug, trace};

use super::layer::SettingsLayer;
use super::paths::PathsConfig;
use crate::error::ConfigError;

pub const ENV_PREFIX: &str = "WGCONF_";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	UserFile = 30,
	WorkspaceFile = 40,
	ExplicitFile = 45,
	Environment = 50,
	Cli = 60,
}

/// Trait for settings sources.
pub trait ConfigSource: Send + Sync {
	/// Name for logging
	fn name(&self) -> &'static str;

	fn precedence(&self) -> Precedence;

	/// Load a settings layer from this source
	fn load(&self) -> Result<SettingsLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<SettingsLayer, ConfigError> {
		// Defaults are applied when building Settings.
		Ok(SettingsLayer::default())
	}
}

/// File-based settings source (TOML).
pub struct FileSource {
	path: PathBuf,
	precedence: Precedence,
	name: &'static str,
	required: bool,
}

impl FileSource {
	/// User config: ~/.config/wgconf/config.toml
	pub fn user(paths: &PathsConfig) -> Self {
		Self {
			path: paths.user_config_file.clone(),
			precedence: Precedence::UserFile,
			name: "user-config",
			required: false,
		}
	}

	/// Workspace config: .wgconf/config.toml
	pub fn workspace(paths: &PathsConfig) -> Self {
		Self {
			path: paths.workspace_config_file.clone(),
			precedence: Precedence::WorkspaceFile,
			name: "workspace-config",
			required: false,
		}
	}

	/// A file named with `--config`; it must exist.
	pub fn explicit(path: PathBuf) -> Self {
		Self {
			path,
			precedence: Precedence::ExplicitFile,
			name: "explicit-config",
			required: true,
		}
	}
}

impl ConfigSource for FileSource {
	fn name(&self) -> &'static str {
		self.name
	}
	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn load(&self) -> Result<SettingsLayer, ConfigError> {
		if !self.path.exists() {
			if self.required {
				return Err(ConfigError::NotFound(self.path.clone()));
			}
			debug!(path = %self.path.display(), source = self.name, "config file not found, skipping");
			return Ok(SettingsLayer::default());
		}

		debug!(path = %self.path.display(), source = self.name, "loading config file");

		let content = std::fs::read_to_string(&self.path)?;
		let layer: SettingsLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!(source = self.name, "parsed config layer");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Reads `WGCONF_LOG_LEVEL`, `WGCONF_LOG_FORMAT`, `WGCONF_STATE_FILE` and
/// `WGCONF_OUTPUT_DIR`. Empty values are ignored.
pub struct EnvSource {
	vars: Vec<(String, String)>,
}

impl EnvSource {
	/// Snapshot the process environment.
	pub fn from_process() -> Self {
		Self::from_vars(std::env::vars())
	}

	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: vars
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.filter(|(k, _)| k.starts_with(ENV_PREFIX))
				.collect(),
		}
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<SettingsLayer, ConfigError> {
		debug!("loading environment variables");
		let mut layer = SettingsLayer::default();

		for (key, value) in &self.vars {
			let value = value.trim();
			if value.is_empty() {
				continue;
			}

			trace!(key = %key, "processing env var");

			match key.as_str() {
				"WGCONF_LOG_LEVEL" => layer.logging_mut().level = Some(value.to_string()),
				"WGCONF_LOG_FORMAT" => layer.logging_mut().format = Some(value.to_string()),
				"WGCONF_STATE_FILE" => layer.set_state_file(PathBuf::from(value)),
				"WGCONF_OUTPUT_DIR" => layer.set_output_dir(PathBuf::from(value)),
				_ => {
					// Unknown WGCONF_ variable, ignore
				}
			}
		}

		Ok(layer)
	}
}

/// CLI override source.
pub struct CliSource {
	overrides: CliOverrides,
}

/// CLI argument overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub config_file: Option<PathBuf>,
	pub log_level: Option<String>,
	pub log_format: Option<String>,
	pub state_file: Option<PathBuf>,
	pub output_dir: Option<PathBuf>,
}

impl CliSource {
	pub fn new(overrides: CliOverrides) -> Self {
		Self { overrides }
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<SettingsLayer, ConfigError> {
		debug!("loading CLI overrides");
		let mut layer = SettingsLayer::default();

		if let Some(ref level) = self.overrides.log_level {
			layer.logging_mut().level = Some(level.clone());
		}
		if let Some(ref format) = self.overrides.log_format {
			layer.logging_mut().format = Some(format.clone());
		}
		if let Some(ref file) = self.overrides.state_file {
			layer.set_state_file(file.clone());
		}
		if let Some(ref dir) = self.overrides.output_dir {
			layer.set_output_dir(dir.clone());
		}

		Ok(layer)
	}
}
