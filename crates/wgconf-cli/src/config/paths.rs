// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! XDG Base Directory compliant path resolution.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Resolved config file locations for wgconf.
#[derive(Debug, Clone)]
pub struct PathsConfig {
	/// User config file: ~/.config/wgconf/config.toml
	pub user_config_file: PathBuf,
	/// Workspace config file: ./.wgconf/config.toml
	pub workspace_config_file: PathBuf,
}

impl PathsConfig {
	/// Paths rooted at explicit directories.
	pub fn new(config_home: &Path, workspace: &Path) -> Self {
		Self {
			user_config_file: config_home.join("wgconf/config.toml"),
			workspace_config_file: workspace.join(".wgconf/config.toml"),
		}
	}
}

/// Resolve paths from `XDG_CONFIG_HOME` (or `~/.config`) and the current
/// directory.
pub fn resolve_xdg_paths() -> Result<PathsConfig, ConfigError> {
	let config_home = match std::env::var_os("XDG_CONFIG_HOME") {
		Some(dir) if !dir.is_empty() => PathBuf::from(dir),
		_ => dirs::home_dir()
			.ok_or(ConfigError::HomeDirNotFound)?
			.join(".config"),
	};
	let cwd = std::env::current_dir()?;

	tracing::debug!(
		config_home = %config_home.display(),
		workspace = %cwd.display(),
		"resolved config paths"
	);

	Ok(PathsConfig::new(&config_home, &cwd))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_paths_are_namespaced() {
		let paths = PathsConfig::new(Path::new("/home/u/.config"), Path::new("/srv/net"));
		assert_eq!(
			paths.user_config_file,
			PathBuf::from("/home/u/.config/wgconf/config.toml")
		);
		assert_eq!(
			paths.workspace_config_file,
			PathBuf::from("/srv/net/.wgconf/config.toml")
		);
	}

	#[test]
	fn test_resolve_xdg_paths_succeeds() {
		let paths = resolve_xdg_paths().unwrap();
		assert!(paths.user_config_file.ends_with("wgconf/config.toml"));
		assert!(paths.workspace_config_file.ends_with(".wgconf/config.toml"));
	}
}
