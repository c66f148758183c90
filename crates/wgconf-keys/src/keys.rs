// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use x25519_dalek::{PublicKey as DalekPublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::error::{DecodeError, Result};
use crate::identifier::Identifier;
use crate::secret::Secret;

pub const KEY_LEN: usize = 32;

/// Apply X25519 scalar clamping.
///
/// Clears the low three bits of the first byte, clears the top bit of the
/// last byte and sets its second-highest bit.
pub fn clamp(mut bytes: [u8; KEY_LEN]) -> [u8; KEY_LEN] {
	bytes[0] &= 248;
	bytes[31] &= 127;
	bytes[31] |= 64;
	bytes
}

/// Derive a key pair from a 32-byte seed. Total and deterministic.
pub fn derive(seed: &[u8; KEY_LEN]) -> KeyPair {
	KeyPair::from_private_key(PrivateKey::from_bytes(*seed))
}

pub(crate) fn decode_key(engine: &impl Engine, s: &str) -> Result<[u8; KEY_LEN]> {
	let bytes = engine.decode(s)?;
	if bytes.len() != KEY_LEN {
		return Err(DecodeError::InvalidLength(bytes.len()));
	}
	let mut arr = [0u8; KEY_LEN];
	arr.copy_from_slice(&bytes);
	Ok(arr)
}

/// A clamped X25519 private scalar.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct PrivateKey {
	bytes: [u8; KEY_LEN],
}

impl PrivateKey {
	/// Build a private key from raw bytes, clamping them.
	pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
		Self {
			bytes: clamp(bytes),
		}
	}

	pub fn from_base64(s: &str) -> Result<Self> {
		decode_key(&STANDARD, s).map(Self::from_bytes)
	}

	/// Standard padded base64, the format `wg` expects.
	pub fn to_base64(&self) -> Secret<String> {
		Secret::new(STANDARD.encode(self.bytes))
	}

	pub fn public_key(&self) -> PublicKey {
		let secret = StaticSecret::from(self.bytes);
		let public = DalekPublicKey::from(&secret);
		PublicKey {
			bytes: *public.as_bytes(),
		}
	}

	pub fn expose_bytes(&self) -> &[u8; KEY_LEN] {
		&self.bytes
	}
}

impl fmt::Debug for PrivateKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PrivateKey")
			.field("bytes", &crate::secret::REDACTED)
			.finish()
	}
}

impl fmt::Display for PrivateKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(crate::secret::REDACTED)
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
	bytes: [u8; KEY_LEN],
}

impl PublicKey {
	pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
		Self { bytes }
	}

	pub fn from_base64(s: &str) -> Result<Self> {
		decode_key(&STANDARD, s).map(Self::from_bytes)
	}

	pub fn to_base64(&self) -> String {
		STANDARD.encode(self.bytes)
	}

	pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
		&self.bytes
	}
}

impl fmt::Debug for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let b64 = self.to_base64();
		f.debug_struct("PublicKey")
			.field("prefix", &format!("{}...", &b64[..8]))
			.finish()
	}
}

impl fmt::Display for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_base64())
	}
}

impl Serialize for PublicKey {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_base64())
	}
}

impl<'de> Deserialize<'de> for PublicKey {
	fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		Self::from_base64(&s).map_err(serde::de::Error::custom)
	}
}

/// Private/public pair. The public half is always computed from the private
/// half, never stored independently.
#[derive(Clone)]
pub struct KeyPair {
	private: PrivateKey,
	public: PublicKey,
}

impl KeyPair {
	pub fn from_private_key(private: PrivateKey) -> Self {
		let public = private.public_key();
		Self { private, public }
	}

	pub fn from_identifier(id: &Identifier) -> Self {
		derive(id.as_bytes())
	}

	pub fn private_key(&self) -> &PrivateKey {
		&self.private
	}

	pub fn public_key(&self) -> &PublicKey {
		&self.public
	}
}

impl fmt::Debug for KeyPair {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("KeyPair")
			.field("private", &self.private)
			.field("public", &self.public)
			.finish()
	}
}
