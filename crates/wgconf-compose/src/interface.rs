// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{instrument, trace};

const SECTION_SEPARATOR: &str = "\n\n";

/// Inputs of one aggregated interface config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInputs {
	pub interface: String,
	pub self_peer: String,
	pub all_peers: Vec<String>,
}

impl ConfigInputs {
	pub fn compose(&self) -> AggregatedConfig {
		compose_interface(&self.interface, &self.self_peer, &self.all_peers)
	}
}

/// An interface section followed by the peer sections it connects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedConfig {
	/// SHA-256 hex digest of `rendered`.
	pub id: String,
	pub rendered: String,
}

/// Join `interface_section` with every peer section that is not textually
/// equal to `self_peer_section`, each followed by a blank line.
#[instrument(skip_all, fields(candidates = all_peer_sections.len()))]
pub fn compose_interface<S: AsRef<str>>(
	interface_section: &str,
	self_peer_section: &str,
	all_peer_sections: &[S],
) -> AggregatedConfig {
	let mut rendered = String::with_capacity(interface_section.len() + SECTION_SEPARATOR.len());
	rendered.push_str(interface_section);
	rendered.push_str(SECTION_SEPARATOR);

	let mut included = 0usize;
	for section in all_peer_sections.iter().map(AsRef::as_ref) {
		if section == self_peer_section {
			continue;
		}
		rendered.push_str(section);
		rendered.push_str(SECTION_SEPARATOR);
		included += 1;
	}

	let id = config_id(&rendered);
	trace!(included, id = %id, "aggregated interface config");
	AggregatedConfig { id, rendered }
}

pub fn config_id(rendered: &str) -> String {
	hex::encode(Sha256::digest(rendered.as_bytes()))
}
