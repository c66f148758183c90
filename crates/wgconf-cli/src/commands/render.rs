// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use wgconf_compose::{compose_peer, PeerInputs};
use wgconf_keys::Identifier;
use wgconf_template::{RawVar, RawVars, TemplateRenderer};

#[derive(Args, Debug)]
pub struct RenderArgs {
	/// File holding the interface template
	#[arg(long)]
	pub interface_template: PathBuf,

	/// File holding the peer template
	#[arg(long)]
	pub peer_template: PathBuf,

	/// Template variable as key=value (repeatable)
	#[arg(long = "var", value_parser = parse_var)]
	pub vars: Vec<(String, String)>,

	/// Peer identifier (URL-safe base64, no padding)
	#[arg(long)]
	pub identifier: String,
}

fn parse_var(s: &str) -> Result<(String, String), String> {
	match s.split_once('=') {
		Some((key, value)) if !key.trim().is_empty() => {
			Ok((key.trim().to_string(), value.to_string()))
		}
		_ => Err(format!("expected key=value, got {s:?}")),
	}
}

fn read_template(path: &Path) -> Result<String> {
	std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn run(args: RenderArgs) -> Result<()> {
	let identifier = Identifier::decode(args.identifier.trim()).context("invalid identifier")?;
	let vars: RawVars = args
		.vars
		.into_iter()
		.map(|(k, v)| (k, RawVar::String(v)))
		.collect();
	let inputs = PeerInputs::from_raw(
		"var",
		read_template(&args.interface_template)?,
		read_template(&args.peer_template)?,
		&vars,
	)?;

	let sections = compose_peer(&TemplateRenderer::with_builtins(), &identifier, &inputs)?;
	println!("{}\n", sections.interface_rendered);
	println!("{}", sections.peer_rendered);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_var() {
		assert_eq!(
			parse_var("address=10.0.0.1/32").unwrap(),
			("address".to_string(), "10.0.0.1/32".to_string())
		);
		assert_eq!(
			parse_var("expr=a=b").unwrap(),
			("expr".to_string(), "a=b".to_string())
		);
		assert_eq!(parse_var("empty=").unwrap().1, "");
		assert!(parse_var("novalue").is_err());
		assert!(parse_var("=x").is_err());
	}
}
