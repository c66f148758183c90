// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anyhow::Result;
use clap::Args;
use tracing::warn;

use wgconf_cli::{ConfigAction, Settings, Workspace};

#[derive(Args, Debug)]
pub struct ShowArgs {
	/// Peer name
	pub name: String,
}

pub fn run(args: ShowArgs, settings: &Settings) -> Result<()> {
	let view = Workspace::from_settings(settings).show(&args.name)?;

	println!("name:       {}", view.name);
	println!("identifier: {}", view.identifier);
	println!("public_key: {}", view.public_key);
	if let Some(config) = view.config {
		if config.action != ConfigAction::NoChange {
			warn!(peer = %view.name, "rendered config differs from the recorded id; run apply");
		}
		println!("config_id:  {}", config.id);
		println!();
		print!("{}", config.rendered.expose());
	}
	Ok(())
}
