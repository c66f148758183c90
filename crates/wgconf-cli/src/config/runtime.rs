// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolved settings with defaults applied.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::layer::{LoggingLayer, SettingsLayer};
use crate::error::ConfigError;

pub const DEFAULT_STATE_FILE: &str = "wgconf.state.json";
pub const DEFAULT_OUTPUT_DIR: &str = "wireguard";

/// The final, validated settings for a wgconf run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
	pub logging: LoggingConfig,
	pub state_file: PathBuf,
	pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoggingConfig {
	pub level: LogLevel,
	pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Error,
	#[default]
	Warn,
	Info,
	Debug,
	Trace,
}

impl LogLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			LogLevel::Error => "error",
			LogLevel::Warn => "warn",
			LogLevel::Info => "info",
			LogLevel::Debug => "debug",
			LogLevel::Trace => "trace",
		}
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LogLevel {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"error" => Ok(LogLevel::Error),
			"warn" | "warning" => Ok(LogLevel::Warn),
			"info" => Ok(LogLevel::Info),
			"debug" => Ok(LogLevel::Debug),
			"trace" => Ok(LogLevel::Trace),
			other => Err(ConfigError::invalid_value(
				"logging.level",
				format!("unknown level {other:?}; expected error, warn, info, debug or trace"),
			)),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	Compact,
	Json,
}

impl FromStr for LogFormat {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"pretty" => Ok(LogFormat::Pretty),
			"compact" => Ok(LogFormat::Compact),
			"json" => Ok(LogFormat::Json),
			other => Err(ConfigError::invalid_value(
				"logging.format",
				format!("unknown format {other:?}; expected pretty, compact or json"),
			)),
		}
	}
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			logging: LoggingConfig::default(),
			state_file: PathBuf::from(DEFAULT_STATE_FILE),
			output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
		}
	}
}

impl Settings {
	/// Build settings from a merged layer, rejecting values that do not parse.
	pub fn from_layer(layer: SettingsLayer) -> Result<Self, ConfigError> {
		let defaults = Settings::default();
		let logging = build_logging_config(layer.logging)?;

		let state_file = layer
			.state
			.and_then(|s| s.file)
			.unwrap_or(defaults.state_file);
		if state_file.as_os_str().is_empty() {
			return Err(ConfigError::invalid_value("state.file", "cannot be empty"));
		}

		let output_dir = layer
			.output
			.and_then(|o| o.dir)
			.unwrap_or(defaults.output_dir);
		if output_dir.as_os_str().is_empty() {
			return Err(ConfigError::invalid_value("output.dir", "cannot be empty"));
		}

		Ok(Self {
			logging,
			state_file,
			output_dir,
		})
	}
}

fn build_logging_config(layer: Option<LoggingLayer>) -> Result<LoggingConfig, ConfigError> {
	let layer = layer.unwrap_or_default();
	Ok(LoggingConfig {
		level: layer
			.level
			.as_deref()
			.map(str::parse)
			.transpose()?
			.unwrap_or_default(),
		format: layer
			.format
			.as_deref()
			.map(str::parse)
			.transpose()?
			.unwrap_or_default(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_layer_gives_defaults() {
		let settings = Settings::from_layer(SettingsLayer::default()).unwrap();
		assert_eq!(settings, Settings::default());
		assert_eq!(settings.logging.level, LogLevel::Warn);
		assert_eq!(settings.logging.format, LogFormat::Pretty);
	}

	#[test]
	fn test_levels_parse_case_insensitively() {
		assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
		assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
		assert_eq!("Json".parse::<LogFormat>().unwrap(), LogFormat::Json);
	}

	#[test]
	fn test_unknown_level_is_invalid_value() {
		let mut layer = SettingsLayer::default();
		layer.logging_mut().level = Some("loud".to_string());
		let err = Settings::from_layer(layer).unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "logging.level"));
	}

	#[test]
	fn test_empty_output_dir_is_rejected() {
		let mut layer = SettingsLayer::default();
		layer.set_output_dir(PathBuf::new());
		assert!(Settings::from_layer(layer).is_err());
	}

	#[test]
	fn test_level_display_matches_parse() {
		for level in [
			LogLevel::Error,
			LogLevel::Warn,
			LogLevel::Info,
			LogLevel::Debug,
			LogLevel::Trace,
		] {
			assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
		}
	}
}
