// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Peer sections and aggregated interface configs.
//!
//! [`compose_peer`] turns an identifier and a pair of templates into the
//! peer's `[Interface]` and `[Peer]` sections. [`compose_interface`] joins
//! one interface section with the peer sections of everyone else and gives
//! the result a content-derived id.
//!
//! ```
//! use wgconf_compose::{compose_interface, compose_peer, PeerInputs};
//! use wgconf_keys::Identifier;
//! use wgconf_template::TemplateRenderer;
//!
//! let renderer = TemplateRenderer::with_builtins();
//! let inputs = PeerInputs {
//! 	interface_template: "[Interface]\nPrivateKey = ${private_key}".into(),
//! 	peer_template: "[Peer]\nPublicKey = ${public_key}".into(),
//! 	vars: Default::default(),
//! };
//! let a = compose_peer(&renderer, &Identifier::from_bytes([1; 32]), &inputs)?;
//! let b = compose_peer(&renderer, &Identifier::from_bytes([2; 32]), &inputs)?;
//!
//! let all = [a.peer_rendered.clone(), b.peer_rendered.clone()];
//! let config = compose_interface(&a.interface_rendered, &a.peer_rendered, &all);
//! assert!(config.rendered.ends_with(&format!("{}\n\n", b.peer_rendered)));
//! # Ok::<(), wgconf_compose::ComposeError>(())
//! ```

pub mod context;
pub mod error;
pub mod interface;
pub mod peer;

pub use context::{TemplateContext, PRIVATE_KEY_VAR, PUBLIC_KEY_VAR};
pub use error::{ComposeError, Result, TemplateField};
pub use interface::{compose_interface, config_id, AggregatedConfig, ConfigInputs};
pub use peer::{compose_peer, PeerInputs, PeerSections};
