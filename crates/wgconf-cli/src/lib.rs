// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Library side of the `wgconf` CLI.
//!
//! A [`Manifest`] names the peers of a network and their templates. A
//! [`Workspace`] evaluates it against the recorded [`State`], producing a
//! [`Plan`] and one WireGuard config per peer, and applies the result to
//! disk.

pub mod config;
pub mod error;
pub mod manifest;
pub mod plan;
pub mod state;
pub mod workspace;

pub use config::{load_settings, CliOverrides, Settings};
pub use error::{ApplyError, ConfigError, ManifestError, StateError};
pub use manifest::{Manifest, PeerSpec};
pub use plan::{ConfigAction, PeerAction, Plan};
pub use state::State;
pub use workspace::{evaluate, Evaluation, PeerView, RenderedConfig, Workspace};
