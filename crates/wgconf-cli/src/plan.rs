// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Change detection between the manifest and the recorded state.
//!
//! A peer's interface section depends on its interface template and vars;
//! its peer section on its peer template and vars. A config depends on its
//! interface section, its self section and the ordered candidate list.

use serde::Serialize;
use std::fmt;

use wgconf_compose::{ConfigInputs, PeerInputs};
use wgconf_keys::Identifier;

use crate::state::{ConfigRecord, PeerRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PeerAction {
	Create,
	/// Which sections need re-rendering.
	Update {
		interface: bool,
		peer: bool,
	},
	NoChange,
	Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigAction {
	Create,
	Update,
	NoChange,
}

/// Classify a manifest peer against its record, if any.
///
/// An identifier that differs from the recorded one re-keys the peer, which
/// changes both sections.
pub fn peer_action(
	previous: Option<&PeerRecord>,
	identifier: &Identifier,
	inputs: &PeerInputs,
) -> PeerAction {
	let Some(previous) = previous else {
		return PeerAction::Create;
	};

	let rekeyed = previous.identifier != *identifier;
	let vars_changed = previous.inputs.vars != inputs.vars;
	let interface = rekeyed
		|| vars_changed
		|| previous.inputs.interface_template != inputs.interface_template;
	let peer = rekeyed || vars_changed || previous.inputs.peer_template != inputs.peer_template;

	if interface || peer {
		PeerAction::Update { interface, peer }
	} else {
		PeerAction::NoChange
	}
}

pub fn config_action(previous: Option<&ConfigRecord>, inputs: &ConfigInputs) -> ConfigAction {
	match previous {
		None => ConfigAction::Create,
		Some(record) if record.matches(inputs) => ConfigAction::NoChange,
		Some(_) => ConfigAction::Update,
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerChange {
	pub name: String,
	#[serde(flatten)]
	pub action: PeerAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigChange {
	pub name: String,
	pub action: ConfigAction,
	pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
	pub peers: Vec<PeerChange>,
	pub configs: Vec<ConfigChange>,
}

impl Plan {
	pub fn peer(&self, name: &str) -> Option<PeerAction> {
		self.peers.iter().find(|c| c.name == name).map(|c| c.action)
	}

	pub fn config(&self, name: &str) -> Option<&ConfigChange> {
		self.configs.iter().find(|c| c.name == name)
	}

	pub fn has_changes(&self) -> bool {
		self.peers.iter().any(|c| c.action != PeerAction::NoChange)
			|| self.configs.iter().any(|c| c.action != ConfigAction::NoChange)
	}
}

impl fmt::Display for PeerAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PeerAction::Create => f.write_str("create"),
			PeerAction::Update { interface, peer } => {
				let sections: Vec<&str> = [(*interface, "interface"), (*peer, "peer")]
					.into_iter()
					.filter_map(|(changed, name)| changed.then_some(name))
					.collect();
				write!(f, "update ({})", sections.join(", "))
			}
			PeerAction::NoChange => f.write_str("no change"),
			PeerAction::Delete => f.write_str("delete"),
		}
	}
}

impl fmt::Display for ConfigAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ConfigAction::Create => "create",
			ConfigAction::Update => "update",
			ConfigAction::NoChange => "no change",
		})
	}
}

impl fmt::Display for Plan {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Peers:")?;
		for change in &self.peers {
			writeln!(f, "  {:<8} {}", symbol_for_peer(change.action), change.name)?;
			if change.action != PeerAction::NoChange {
				writeln!(f, "           {}", change.action)?;
			}
		}
		writeln!(f, "Configs:")?;
		for change in &self.configs {
			writeln!(
				f,
				"  {:<8} {} ({}, id {})",
				symbol_for_config(change.action),
				change.name,
				change.action,
				&change.id[..change.id.len().min(12)]
			)?;
		}
		if !self.has_changes() {
			writeln!(f, "No changes.")?;
		}
		Ok(())
	}
}

fn symbol_for_peer(action: PeerAction) -> &'static str {
	match action {
		PeerAction::Create => "+",
		PeerAction::Update { .. } => "~",
		PeerAction::NoChange => "=",
		PeerAction::Delete => "-",
	}
}

fn symbol_for_config(action: ConfigAction) -> &'static str {
	match action {
		ConfigAction::Create => "+",
		ConfigAction::Update => "~",
		ConfigAction::NoChange => "=",
	}
}
