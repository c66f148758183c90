// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use wgconf_keys::{Identifier, KeyPair, PublicKey, SecretString};
use wgconf_template::{validate_vars, RawVars, TemplateRenderer, TemplateVars};

use crate::context::TemplateContext;
use crate::error::{ComposeError, Result, TemplateField};

/// Everything a peer's rendered sections depend on, besides its identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInputs {
	pub interface_template: String,
	pub peer_template: String,
	#[serde(default)]
	pub vars: TemplateVars,
}

impl PeerInputs {
	/// Build inputs from unchecked variables, rejecting list and map values.
	///
	/// `attribute` names the variable block in the validation message.
	pub fn from_raw(
		attribute: &str,
		interface_template: impl Into<String>,
		peer_template: impl Into<String>,
		vars: &RawVars,
	) -> Result<Self> {
		Ok(Self {
			interface_template: interface_template.into(),
			peer_template: peer_template.into(),
			vars: validate_vars(attribute, vars)?,
		})
	}

	pub fn template(&self, field: TemplateField) -> &str {
		match field {
			TemplateField::Interface => &self.interface_template,
			TemplateField::Peer => &self.peer_template,
		}
	}
}

/// The rendered interface and peer sections of one peer.
#[derive(Debug, Clone)]
pub struct PeerSections {
	pub public_key: PublicKey,
	pub private_key: SecretString,
	pub interface_rendered: String,
	pub peer_rendered: String,
}

/// Derive the peer's keys and render both of its templates.
///
/// Either both sections render or the call fails with the error of the
/// first template that did not, tagged with that template's field.
#[instrument(skip_all, fields(public_key = tracing::field::Empty))]
pub fn compose_peer(
	renderer: &TemplateRenderer,
	id: &Identifier,
	inputs: &PeerInputs,
) -> Result<PeerSections> {
	let pair = KeyPair::from_identifier(id);
	tracing::Span::current().record("public_key", tracing::field::display(pair.public_key()));

	let ctx = TemplateContext::new(&pair, &inputs.vars);
	let render = |field: TemplateField| {
		renderer
			.render(inputs.template(field), ctx.vars())
			.map_err(|source| ComposeError::Render { field, source })
	};
	let interface_rendered = render(TemplateField::Interface)?;
	let peer_rendered = render(TemplateField::Peer)?;

	debug!(
		interface_len = interface_rendered.len(),
		peer_len = peer_rendered.len(),
		"composed peer sections"
	);

	Ok(PeerSections {
		public_key: *pair.public_key(),
		private_key: pair.private_key().to_base64(),
		interface_rendered,
		peer_rendered,
	})
}
