// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persisted record of applied peers and configs.
//!
//! The state never holds private keys. Peers are re-derived from their
//! identifier, and interface sections (which embed the private key) are
//! kept only as a SHA-256 digest.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use tracing::debug;

use wgconf_compose::{ConfigInputs, PeerInputs};
use wgconf_keys::{Identifier, PublicKey};

use crate::error::StateError;

pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
	pub version: u32,
	#[serde(default)]
	pub peers: BTreeMap<String, PeerRecord>,
	#[serde(default)]
	pub configs: BTreeMap<String, ConfigRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRecord {
	pub identifier: Identifier,
	pub public_key: PublicKey,
	#[serde(flatten)]
	pub inputs: PeerInputs,
	pub interface_digest: String,
	pub peer_rendered: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
	pub id: String,
	pub interface_digest: String,
	pub self_peer: String,
	pub all_peers: Vec<String>,
}

impl ConfigRecord {
	pub fn new(id: String, inputs: &ConfigInputs) -> Self {
		Self {
			id,
			interface_digest: section_digest(&inputs.interface),
			self_peer: inputs.self_peer.clone(),
			all_peers: inputs.all_peers.clone(),
		}
	}

	/// True when `inputs` would aggregate to the same config.
	pub fn matches(&self, inputs: &ConfigInputs) -> bool {
		self.interface_digest == section_digest(&inputs.interface)
			&& self.self_peer == inputs.self_peer
			&& self.all_peers == inputs.all_peers
	}
}

/// SHA-256 hex digest of a rendered section.
pub fn section_digest(section: &str) -> String {
	hex::encode(Sha256::digest(section.as_bytes()))
}

impl Default for State {
	fn default() -> Self {
		Self {
			version: STATE_VERSION,
			peers: BTreeMap::new(),
			configs: BTreeMap::new(),
		}
	}
}

impl State {
	/// Read state from `path`; a missing file is an empty state.
	pub fn load(path: &Path) -> Result<Self, StateError> {
		if !path.exists() {
			debug!(path = %path.display(), "state file not found, starting empty");
			return Ok(Self::default());
		}

		let content = std::fs::read_to_string(path).map_err(|source| StateError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let state: State = serde_json::from_str(&content).map_err(|source| StateError::Json {
			path: path.to_path_buf(),
			source,
		})?;
		if state.version != STATE_VERSION {
			return Err(StateError::UnsupportedVersion {
				path: path.to_path_buf(),
				version: state.version,
			});
		}

		debug!(
			path = %path.display(),
			peers = state.peers.len(),
			configs = state.configs.len(),
			"loaded state"
		);
		Ok(state)
	}

	/// Write state atomically with owner-only permissions.
	pub fn save(&self, path: &Path) -> Result<(), StateError> {
		let contents = serde_json::to_string_pretty(self).map_err(|source| StateError::Json {
			path: path.to_path_buf(),
			source,
		})?;
		write_private(path, contents.as_bytes()).map_err(|source| StateError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		debug!(path = %path.display(), "state written");
		Ok(())
	}
}

/// Write `contents` to a sibling temp file created owner-only, then rename it
/// over `path`.
pub fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent)?;
	}

	let temp_path = path.with_extension("tmp");
	match std::fs::remove_file(&temp_path) {
		Ok(()) => debug!(path = %temp_path.display(), "removed stale temp file"),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
		Err(e) => return Err(e),
	}

	let mut opts = OpenOptions::new();
	opts.write(true).create_new(true);
	#[cfg(unix)]
	opts.mode(0o600);

	let result = opts.open(&temp_path).and_then(|mut file| {
		file.write_all(contents)?;
		file.sync_all()
	});
	if let Err(e) = result {
		let _ = std::fs::remove_file(&temp_path);
		return Err(e);
	}

	std::fs::rename(&temp_path, path)
}
