// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! wgconf - render WireGuard configs for a network of peers.
//!
//! Each peer is identified by an opaque identifier that also seeds its
//! X25519 key pair. Templates describe a peer's `[Interface]` and `[Peer]`
//! sections; every peer gets a config holding its own interface section
//! and the peer sections of everyone else.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wgconf_cli::config::{LogFormat, LoggingConfig};
use wgconf_cli::{load_settings, CliOverrides};

mod commands;

/// wgconf - WireGuard configs from templates
#[derive(Parser, Debug)]
#[command(name = "wgconf", version, about, long_about = None)]
struct Args {
	/// Path to an additional configuration file
	#[arg(short, long, global = true)]
	config: Option<PathBuf>,

	/// Log level: error, warn, info, debug or trace (overrides config)
	#[arg(short, long, global = true)]
	log_level: Option<String>,

	/// Log format: pretty, compact or json (overrides config)
	#[arg(long, global = true)]
	log_format: Option<String>,

	/// State file (overrides config)
	#[arg(long, global = true)]
	state_file: Option<PathBuf>,

	/// Directory for rendered .conf files (overrides config)
	#[arg(long, global = true)]
	output_dir: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Generate a new peer identifier and print its public key
	Keygen(commands::keygen::KeygenArgs),
	/// Print the public key of an identifier
	Pubkey(commands::pubkey::PubkeyArgs),
	/// Render one peer's sections from template files
	Render(commands::render::RenderArgs),
	/// Show what apply would change
	Plan(commands::plan::PlanArgs),
	/// Write state and per-peer configs for a manifest
	Apply(commands::apply::ApplyArgs),
	/// Show a peer recorded in state
	Show(commands::show::ShowArgs),
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(format!("warn,wgconf={}", logging.level)));

	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(std::io::stderr))
				.init();
		}
	}
}

fn main() -> Result<()> {
	let args = Args::parse();

	let settings = load_settings(CliOverrides {
		config_file: args.config,
		log_level: args.log_level,
		log_format: args.log_format,
		state_file: args.state_file,
		output_dir: args.output_dir,
	})
	.context("failed to load configuration")?;

	init_tracing(&settings.logging);
	debug!(?settings, "starting wgconf");

	match args.command {
		Command::Keygen(args) => commands::keygen::run(args),
		Command::Pubkey(args) => commands::pubkey::run(args),
		Command::Render(args) => commands::render::run(args),
		Command::Plan(args) => commands::plan::run(args, &settings),
		Command::Apply(args) => commands::apply::run(args, &settings),
		Command::Show(args) => commands::show::run(args, &settings),
	}
}
