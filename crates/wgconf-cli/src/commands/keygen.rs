// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use wgconf_keys::{Identifier, KeyPair, OsEntropy};

#[derive(Args, Debug)]
pub struct KeygenArgs {
	/// Print as JSON
	#[arg(long)]
	pub json: bool,

	/// Also print the private key
	#[arg(long)]
	pub show_private: bool,
}

#[derive(Serialize)]
struct KeygenOutput {
	identifier: String,
	public_key: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	private_key: Option<String>,
}

pub fn run(args: KeygenArgs) -> Result<()> {
	let identifier =
		Identifier::generate(&mut OsEntropy).context("failed to generate peer identifier")?;
	let pair = KeyPair::from_identifier(&identifier);

	let output = KeygenOutput {
		identifier: identifier.encode(),
		public_key: pair.public_key().to_base64(),
		private_key: args
			.show_private
			.then(|| pair.private_key().to_base64().expose().clone()),
	};

	if args.json {
		println!("{}", serde_json::to_string_pretty(&output)?);
	} else {
		println!("identifier:  {}", output.identifier);
		println!("public_key:  {}", output.public_key);
		if let Some(ref private_key) = output.private_key {
			println!("private_key: {private_key}");
		}
	}
	Ok(())
}
