// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial settings layer for merging from multiple sources.

use serde::Deserialize;
use std::path::PathBuf;

/// Partial settings layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsLayer {
	#[serde(default)]
	pub logging: Option<LoggingLayer>,
	#[serde(default)]
	pub state: Option<StateLayer>,
	#[serde(default)]
	pub output: Option<OutputLayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateLayer {
	#[serde(default)]
	pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputLayer {
	#[serde(default)]
	pub dir: Option<PathBuf>,
}

impl SettingsLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: SettingsLayer) {
		merge_option(&mut self.logging, other.logging, LoggingLayer::merge);
		merge_option(&mut self.state, other.state, |t, s| {
			if s.file.is_some() {
				t.file = s.file;
			}
		});
		merge_option(&mut self.output, other.output, |t, s| {
			if s.dir.is_some() {
				t.dir = s.dir;
			}
		});
	}

	pub fn logging_mut(&mut self) -> &mut LoggingLayer {
		self.logging.get_or_insert_with(LoggingLayer::default)
	}

	pub fn set_state_file(&mut self, file: PathBuf) {
		self.state.get_or_insert_with(StateLayer::default).file = Some(file);
	}

	pub fn set_output_dir(&mut self, dir: PathBuf) {
		self.output.get_or_insert_with(OutputLayer::default).dir = Some(dir);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

impl LoggingLayer {
	fn merge(&mut self, other: LoggingLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.format.is_some() {
			self.format = other.format;
		}
	}
}
