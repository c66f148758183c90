// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for settings, manifests, state and apply.

use std::path::PathBuf;

use wgconf_compose::{ComposeError, TemplateField};
use wgconf_keys::{DecodeError, EntropyError};
use wgconf_template::ValidationError;

/// Errors that can occur while loading and validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("config file not found: {0}")]
	NotFound(PathBuf),

	#[error("Invalid value for {field}: {message}")]
	InvalidValue { field: String, message: String },

	#[error("Could not determine home directory")]
	HomeDirNotFound,
}

impl ConfigError {
	pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			field: field.into(),
			message: message.into(),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
	#[error("failed to read manifest {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML parse error in {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("peer #{index} has an empty name")]
	EmptyName { index: usize },

	#[error("peer name {0:?} must be ASCII letters, digits, '-', '_' or interior '.'")]
	InvalidName(String),

	#[error("duplicate peer name {0:?}")]
	DuplicatePeer(String),

	#[error("peer {peer:?} has no {field}")]
	MissingTemplate { peer: String, field: TemplateField },

	#[error(transparent)]
	Vars(#[from] ValidationError),

	#[error("peer {peer:?} has an invalid identifier: {source}")]
	Identifier {
		peer: String,
		#[source]
		source: DecodeError,
	},
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
	#[error("I/O error on state file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("state file {path} is not valid JSON: {source}")]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("state file {path} has unsupported version {version}")]
	UnsupportedVersion { path: PathBuf, version: u32 },
}

/// Errors from reading or applying a network.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
	#[error("peer {peer:?}: {source}")]
	Compose {
		peer: String,
		#[source]
		source: ComposeError,
	},

	#[error("peer {peer:?}: {source}")]
	Entropy {
		peer: String,
		#[source]
		source: EntropyError,
	},

	#[error("peer {peer:?}: stored identifier is invalid: {source}")]
	StoredIdentifier {
		peer: String,
		#[source]
		source: DecodeError,
	},

	#[error("peer {0:?} is not in state")]
	UnknownPeer(String),

	#[error("peer name {0:?} cannot be used as a config file name")]
	InvalidPeerName(String),

	#[error("failed to write {path}: {source}")]
	Output {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	State(#[from] StateError),
}
