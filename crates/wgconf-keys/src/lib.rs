// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! WireGuard key material for wgconf peers.
//!
//! A peer is identified by a 32-byte [`Identifier`]. The identifier is also
//! the seed of the peer's X25519 key pair: [`derive`] clamps it and
//! multiplies by the curve base point, so the same identifier always yields
//! the same [`KeyPair`].
//!
//! ```
//! use wgconf_keys::{Identifier, KeyPair, OsEntropy};
//!
//! let id = Identifier::generate(&mut OsEntropy)?;
//! let pair = KeyPair::from_identifier(&id);
//! assert_eq!(pair.public_key().to_base64().len(), 44);
//! # Ok::<(), wgconf_keys::EntropyError>(())
//! ```

pub mod entropy;
pub mod error;
pub mod identifier;
pub mod keys;
pub mod secret;

pub use entropy::OsEntropy;
pub use error::{DecodeError, EntropyError, Result};
pub use identifier::Identifier;
pub use keys::{clamp, derive, KeyPair, PrivateKey, PublicKey, KEY_LEN};
pub use secret::{Secret, SecretString, REDACTED};
