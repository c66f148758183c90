// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered settings for the wgconf CLI.
//!
//! Sources, lowest precedence first: built-in defaults, the user file
//! (`$XDG_CONFIG_HOME/wgconf/config.toml`), the workspace file
//! (`./.wgconf/config.toml`), a file named with `--config`, `WGCONF_*`
//! environment variables, and command-line flags.

pub mod layer;
pub mod paths;
pub mod registry;
pub mod runtime;
pub mod sources;

pub use layer::SettingsLayer;
pub use paths::PathsConfig;
pub use registry::ConfigRegistry;
pub use runtime::{LogFormat, LogLevel, LoggingConfig, Settings};
pub use sources::{CliOverrides, ConfigSource, Precedence};

use crate::error::ConfigError;

/// Load settings from every source with CLI overrides on top.
pub fn load_settings(cli: CliOverrides) -> Result<Settings, ConfigError> {
	let paths = paths::resolve_xdg_paths()?;
	load_settings_from(&paths, sources::EnvSource::from_process(), cli)
}

pub fn load_settings_from(
	paths: &PathsConfig,
	env: sources::EnvSource,
	cli: CliOverrides,
) -> Result<Settings, ConfigError> {
	let mut registry = ConfigRegistry::new();

	registry.register(Box::new(sources::DefaultsSource));
	registry.register(Box::new(sources::FileSource::user(paths)));
	registry.register(Box::new(sources::FileSource::workspace(paths)));
	if let Some(ref file) = cli.config_file {
		registry.register(Box::new(sources::FileSource::explicit(file.clone())));
	}
	registry.register(Box::new(env));
	registry.register(Box::new(sources::CliSource::new(cli)));

	registry.load()
}
