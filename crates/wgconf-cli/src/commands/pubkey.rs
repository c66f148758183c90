// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anyhow::{Context, Result};
use clap::Args;

use wgconf_keys::{Identifier, KeyPair};

#[derive(Args, Debug)]
pub struct PubkeyArgs {
	/// Peer identifier (URL-safe base64, no padding)
	pub identifier: String,
}

pub fn run(args: PubkeyArgs) -> Result<()> {
	let identifier = Identifier::decode(args.identifier.trim()).context("invalid identifier")?;
	println!("{}", KeyPair::from_identifier(&identifier).public_key());
	Ok(())
}
