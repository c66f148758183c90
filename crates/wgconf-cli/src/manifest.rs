// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Network manifest: shared templates and variables plus the peer list.
//!
//! ```toml
//! interface_template = """
//! [Interface]
//! PrivateKey = ${private_key}
//! Address = ${address}
//! """
//! peer_template = """
//! [Peer]
//! PublicKey = ${public_key}
//! AllowedIPs = ${address}
//! """
//!
//! [vars]
//! port = 51820
//!
//! [[peer]]
//! name = "alpha"
//! vars = { address = "10.0.0.1/32" }
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, instrument};

use wgconf_compose::{PeerInputs, TemplateField};
use wgconf_keys::Identifier;
use wgconf_template::{validate_vars, RawVars};

use crate::error::ManifestError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
	interface_template: Option<String>,
	peer_template: Option<String>,
	#[serde(default)]
	vars: RawVars,
	#[serde(default, rename = "peer")]
	peers: Vec<PeerEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PeerEntry {
	name: String,
	interface_template: Option<String>,
	peer_template: Option<String>,
	#[serde(default)]
	vars: RawVars,
	identifier: Option<String>,
	#[serde(default = "default_exclude_self")]
	exclude_self: bool,
}

fn default_exclude_self() -> bool {
	true
}

/// A validated network manifest. Peers keep manifest order.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
	pub peers: Vec<PeerSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeerSpec {
	pub name: String,
	pub inputs: PeerInputs,
	/// Identifier to import instead of generating one.
	pub identifier: Option<Identifier>,
	pub exclude_self: bool,
}

impl Manifest {
	#[instrument(skip_all, fields(path = %path.display()))]
	pub fn load(path: &Path) -> Result<Self, ManifestError> {
		let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		let file: ManifestFile = toml::from_str(&content).map_err(|source| ManifestError::Parse {
			path: path.to_path_buf(),
			source,
		})?;
		let manifest = Self::from_file(file)?;
		debug!(peers = manifest.peers.len(), "loaded manifest");
		Ok(manifest)
	}

	pub fn parse(content: &str) -> Result<Self, ManifestError> {
		let file: ManifestFile = toml::from_str(content).map_err(|source| ManifestError::Parse {
			path: "<inline>".into(),
			source,
		})?;
		Self::from_file(file)
	}

	fn from_file(file: ManifestFile) -> Result<Self, ManifestError> {
		let shared_vars = validate_vars("vars", &file.vars)?;
		let mut seen = HashSet::new();
		let mut peers = Vec::with_capacity(file.peers.len());

		for (index, entry) in file.peers.into_iter().enumerate() {
			if entry.name.trim().is_empty() {
				return Err(ManifestError::EmptyName { index });
			}
			if !is_valid_peer_name(&entry.name) {
				return Err(ManifestError::InvalidName(entry.name));
			}
			if !seen.insert(entry.name.clone()) {
				return Err(ManifestError::DuplicatePeer(entry.name));
			}

			let interface_template = entry
				.interface_template
				.or_else(|| file.interface_template.clone())
				.ok_or_else(|| ManifestError::MissingTemplate {
					peer: entry.name.clone(),
					field: TemplateField::Interface,
				})?;
			let peer_template = entry
				.peer_template
				.or_else(|| file.peer_template.clone())
				.ok_or_else(|| ManifestError::MissingTemplate {
					peer: entry.name.clone(),
					field: TemplateField::Peer,
				})?;

			let own_vars = validate_vars(&format!("peer.{}.vars", entry.name), &entry.vars)?;
			let mut vars = shared_vars.clone();
			vars.extend(own_vars);

			let identifier = entry
				.identifier
				.as_deref()
				.map(Identifier::decode)
				.transpose()
				.map_err(|source| ManifestError::Identifier {
					peer: entry.name.clone(),
					source,
				})?;

			peers.push(PeerSpec {
				name: entry.name,
				inputs: PeerInputs {
					interface_template,
					peer_template,
					vars,
				},
				identifier,
				exclude_self: entry.exclude_self,
			});
		}

		Ok(Self { peers })
	}

	pub fn peer(&self, name: &str) -> Option<&PeerSpec> {
		self.peers.iter().find(|p| p.name == name)
	}
}

/// Longest accepted peer name.
pub const MAX_PEER_NAME_LEN: usize = 64;

/// Peer names become `<name>.conf` file names, so they are limited to ASCII
/// letters, digits, `-`, `_` and single interior dots.
pub fn is_valid_peer_name(name: &str) -> bool {
	if name.is_empty() || name.len() > MAX_PEER_NAME_LEN || name.ends_with('.') {
		return false;
	}

	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphanumeric() => {}
		_ => return false,
	}

	let mut prev_was_dot = false;
	for c in chars {
		if c == '.' {
			if prev_was_dot {
				return false;
			}
			prev_was_dot = true;
		} else if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
			prev_was_dot = false;
		} else {
			return false;
		}
	}
	true
}
