// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use wgconf_cli::{Manifest, Settings, Workspace};
use wgconf_keys::OsEntropy;

#[derive(Args, Debug)]
pub struct ApplyArgs {
	/// Network manifest
	#[arg(short, long, default_value = "network.toml")]
	pub manifest: PathBuf,
}

pub fn run(args: ApplyArgs, settings: &Settings) -> Result<()> {
	let manifest = Manifest::load(&args.manifest)
		.with_context(|| format!("failed to load manifest {}", args.manifest.display()))?;
	let workspace = Workspace::from_settings(settings);
	let evaluation = workspace.apply(&manifest, &mut OsEntropy)?;

	for config in &evaluation.configs {
		info!(peer = %config.name, id = %config.id, "config id");
	}
	print!("{}", evaluation.plan);
	println!(
		"Applied {} peer(s); state saved to {}",
		evaluation.configs.len(),
		workspace.state_file().display()
	);
	Ok(())
}
