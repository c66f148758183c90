// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Settings registry - manages sources and merges layers.

use tracing::{debug, info};

use super::layer::SettingsLayer;
use super::runtime::Settings;
use super::sources::ConfigSource;
use crate::error::ConfigError;

/// Registry that manages settings sources and merges them.
#[derive(Default)]
pub struct ConfigRegistry {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, source: Box<dyn ConfigSource>) {
		debug!(source = source.name(), precedence = ?source.precedence(), "registering config source");
		self.sources.push(source);
	}

	/// Load every source, merge, and validate.
	///
	/// Sources are merged lowest precedence first. Any source that fails to
	/// load fails the whole load; missing optional files load as empty
	/// layers.
	pub fn load(&self) -> Result<Settings, ConfigError> {
		let mut sorted_sources: Vec<_> = self.sources.iter().collect();
		sorted_sources.sort_by_key(|s| s.precedence());

		debug!(
			source_count = sorted_sources.len(),
			"loading settings from sources"
		);

		let mut merged = SettingsLayer::default();
		for source in sorted_sources {
			let layer = source.load()?;
			debug!(source = source.name(), "merging config layer");
			merged.merge(layer);
		}

		let settings = Settings::from_layer(merged)?;

		info!(
			log_level = %settings.logging.level,
			state_file = %settings.state_file.display(),
			output_dir = %settings.output_dir.display(),
			"settings loaded"
		);

		Ok(settings)
	}

	pub fn source_count(&self) -> usize {
		self.sources.len()
	}
}
