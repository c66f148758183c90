// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use wgconf_cli::{Manifest, Settings, Workspace};
use wgconf_keys::OsEntropy;

#[derive(Args, Debug)]
pub struct PlanArgs {
	/// Network manifest
	#[arg(short, long, default_value = "network.toml")]
	pub manifest: PathBuf,

	/// Print the plan as JSON
	#[arg(long)]
	pub json: bool,
}

pub fn run(args: PlanArgs, settings: &Settings) -> Result<()> {
	let manifest = Manifest::load(&args.manifest)
		.with_context(|| format!("failed to load manifest {}", args.manifest.display()))?;
	let evaluation = Workspace::from_settings(settings).plan(&manifest, &mut OsEntropy)?;

	if args.json {
		println!("{}", serde_json::to_string_pretty(&evaluation.plan)?);
	} else {
		print!("{}", evaluation.plan);
	}
	Ok(())
}
