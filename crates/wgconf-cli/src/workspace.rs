// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Plan and apply a manifest against the state file and output directory.

use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use wgconf_compose::{compose_peer, ConfigInputs, PeerInputs, PeerSections};
use wgconf_keys::{Identifier, PublicKey, SecretString};
use wgconf_template::TemplateRenderer;

use crate::config::Settings;
use crate::error::{ApplyError, StateError};
use crate::manifest::{is_valid_peer_name, Manifest};
use crate::plan::{config_action, peer_action, ConfigAction, ConfigChange, PeerAction, PeerChange, Plan};
use crate::state::{section_digest, write_private, ConfigRecord, PeerRecord, State};

/// A config as it would be written to `<output_dir>/<name>.conf`.
#[derive(Debug, Clone)]
pub struct RenderedConfig {
	pub name: String,
	pub id: String,
	pub action: ConfigAction,
	pub rendered: SecretString,
}

/// Everything computed for a manifest: the plan, the state that applying
/// it records, and the configs to write.
#[derive(Debug, Clone)]
pub struct Evaluation {
	pub plan: Plan,
	pub state: State,
	pub configs: Vec<RenderedConfig>,
}

/// A peer read back from state.
#[derive(Debug, Clone)]
pub struct PeerView {
	pub name: String,
	pub identifier: Identifier,
	pub public_key: PublicKey,
	pub config: Option<RenderedConfig>,
}

#[derive(Debug, Clone)]
pub struct Workspace {
	state_file: PathBuf,
	output_dir: PathBuf,
	renderer: TemplateRenderer,
}

impl Workspace {
	pub fn new(state_file: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
		Self {
			state_file: state_file.into(),
			output_dir: output_dir.into(),
			renderer: TemplateRenderer::with_builtins(),
		}
	}

	pub fn from_settings(settings: &Settings) -> Self {
		Self::new(&settings.state_file, &settings.output_dir)
	}

	pub fn with_renderer(mut self, renderer: TemplateRenderer) -> Self {
		self.renderer = renderer;
		self
	}

	pub fn state_file(&self) -> &Path {
		&self.state_file
	}

	pub fn config_path(&self, name: &str) -> Result<PathBuf, ApplyError> {
		if !is_valid_peer_name(name) {
			return Err(ApplyError::InvalidPeerName(name.to_string()));
		}
		Ok(self.output_dir.join(format!("{name}.conf")))
	}

	pub fn load_state(&self) -> Result<State, StateError> {
		State::load(&self.state_file)
	}

	/// Compute what applying `manifest` would do, without writing anything.
	///
	/// Peers absent from state draw a fresh identifier from `entropy` unless
	/// the manifest imports one.
	#[instrument(skip_all, fields(peers = manifest.peers.len()))]
	pub fn plan<R: Read>(&self, manifest: &Manifest, entropy: &mut R) -> Result<Evaluation, ApplyError> {
		let previous = self.load_state()?;
		evaluate(&self.renderer, manifest, &previous, entropy)
	}

	/// Plan, then write changed configs, remove configs of deleted peers and
	/// save the new state.
	#[instrument(skip_all, fields(peers = manifest.peers.len()))]
	pub fn apply<R: Read>(&self, manifest: &Manifest, entropy: &mut R) -> Result<Evaluation, ApplyError> {
		let evaluation = self.plan(manifest, entropy)?;

		for config in &evaluation.configs {
			let path = self.config_path(&config.name)?;
			if config.action == ConfigAction::NoChange && path.exists() {
				debug!(peer = %config.name, "config unchanged");
				continue;
			}
			write_private(&path, config.rendered.expose().as_bytes())
				.map_err(|source| ApplyError::Output { path: path.clone(), source })?;
			info!(peer = %config.name, id = %config.id, action = %config.action, path = %path.display(), "wrote config");
		}

		for change in &evaluation.plan.peers {
			if change.action != PeerAction::Delete {
				continue;
			}
			let path = self.config_path(&change.name)?;
			match std::fs::remove_file(&path) {
				Ok(()) => info!(peer = %change.name, path = %path.display(), "removed config"),
				Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
				Err(source) => return Err(ApplyError::Output { path, source }),
			}
		}

		evaluation.state.save(&self.state_file)?;
		Ok(evaluation)
	}

	/// Read a peer back from state, re-deriving its keys and sections.
	#[instrument(skip(self))]
	pub fn show(&self, name: &str) -> Result<PeerView, ApplyError> {
		let state = self.load_state()?;
		let record = state
			.peers
			.get(name)
			.ok_or_else(|| ApplyError::UnknownPeer(name.to_string()))?;
		let sections = read_peer(&self.renderer, name, &record.identifier, &record.inputs)?;

		let config = state.configs.get(name).map(|stored| {
			let inputs = ConfigInputs {
				interface: sections.interface_rendered.clone(),
				self_peer: stored.self_peer.clone(),
				all_peers: stored.all_peers.clone(),
			};
			let aggregated = inputs.compose();
			RenderedConfig {
				name: name.to_string(),
				action: if stored.id == aggregated.id {
					ConfigAction::NoChange
				} else {
					ConfigAction::Update
				},
				id: aggregated.id,
				rendered: SecretString::new(aggregated.rendered),
			}
		});

		Ok(PeerView {
			name: name.to_string(),
			identifier: record.identifier,
			public_key: sections.public_key,
			config,
		})
	}
}

fn read_peer(
	renderer: &TemplateRenderer,
	name: &str,
	identifier: &Identifier,
	inputs: &PeerInputs,
) -> Result<PeerSections, ApplyError> {
	compose_peer(renderer, identifier, inputs).map_err(|source| ApplyError::Compose {
		peer: name.to_string(),
		source,
	})
}

/// Read every manifest peer and aggregate one config per peer.
pub fn evaluate<R: Read>(
	renderer: &TemplateRenderer,
	manifest: &Manifest,
	previous: &State,
	entropy: &mut R,
) -> Result<Evaluation, ApplyError> {
	let mut plan = Plan::default();
	let mut state = State::default();
	let mut sections = Vec::with_capacity(manifest.peers.len());

	for spec in &manifest.peers {
		let recorded = previous.peers.get(&spec.name);
		let identifier = match (spec.identifier, recorded) {
			(Some(imported), _) => imported,
			(None, Some(record)) => record.identifier,
			(None, None) => Identifier::generate(entropy).map_err(|source| ApplyError::Entropy {
				peer: spec.name.clone(),
				source,
			})?,
		};

		let action = peer_action(recorded, &identifier, &spec.inputs);
		let peer = read_peer(renderer, &spec.name, &identifier, &spec.inputs)?;
		debug!(peer = %spec.name, action = %action, public_key = %peer.public_key, "read peer");

		state.peers.insert(
			spec.name.clone(),
			PeerRecord {
				identifier,
				public_key: peer.public_key,
				inputs: spec.inputs.clone(),
				interface_digest: section_digest(&peer.interface_rendered),
				peer_rendered: peer.peer_rendered.clone(),
			},
		);
		plan.peers.push(PeerChange {
			name: spec.name.clone(),
			action,
		});
		sections.push(peer);
	}

	for name in previous.peers.keys() {
		if manifest.peer(name).is_none() {
			plan.peers.push(PeerChange {
				name: name.clone(),
				action: PeerAction::Delete,
			});
		}
	}

	let all_peers: Vec<String> = sections.iter().map(|s| s.peer_rendered.clone()).collect();
	let mut configs = Vec::with_capacity(sections.len());

	for (spec, peer) in manifest.peers.iter().zip(&sections) {
		let inputs = ConfigInputs {
			interface: peer.interface_rendered.clone(),
			self_peer: if spec.exclude_self {
				peer.peer_rendered.clone()
			} else {
				String::new()
			},
			all_peers: all_peers.clone(),
		};
		let action = config_action(previous.configs.get(&spec.name), &inputs);
		let aggregated = inputs.compose();

		state
			.configs
			.insert(spec.name.clone(), ConfigRecord::new(aggregated.id.clone(), &inputs));
		plan.configs.push(ConfigChange {
			name: spec.name.clone(),
			action,
			id: aggregated.id.clone(),
		});
		configs.push(RenderedConfig {
			name: spec.name.clone(),
			id: aggregated.id,
			action,
			rendered: SecretString::new(aggregated.rendered),
		});
	}

	Ok(Evaluation {
		plan,
		state,
		configs,
	})
}
