// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::Read;
use std::str::FromStr;
use tracing::instrument;

use crate::error::{DecodeError, EntropyError, Result};
use crate::keys::{clamp, decode_key, KEY_LEN};

/// Opaque 32-byte peer identity and key seed.
///
/// Encoded externally as URL-safe base64 without padding. The bytes double as
/// private key material, so `Debug` only shows a short prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier([u8; KEY_LEN]);

impl Identifier {
	/// Generate a new identifier from a single read of `source`.
	///
	/// Exactly 32 bytes are requested. A short read or a read error aborts
	/// generation; nothing is retried.
	#[instrument(skip_all)]
	pub fn generate(source: &mut impl Read) -> std::result::Result<Self, EntropyError> {
		let mut bytes = [0u8; KEY_LEN];
		let n = source.read(&mut bytes)?;
		if n != KEY_LEN {
			return Err(EntropyError::Insufficient {
				expected: KEY_LEN,
				got: n,
			});
		}
		tracing::debug!("generated peer identifier");
		Ok(Self(clamp(bytes)))
	}

	pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
		Self(bytes)
	}

	pub fn decode(s: &str) -> Result<Self> {
		decode_key(&URL_SAFE_NO_PAD, s).map(Self)
	}

	pub fn encode(&self) -> String {
		URL_SAFE_NO_PAD.encode(self.0)
	}

	pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
		&self.0
	}
}

impl fmt::Debug for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let encoded = self.encode();
		f.debug_tuple("Identifier")
			.field(&format!("{}...", &encoded[..6]))
			.finish()
	}
}

impl fmt::Display for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.encode())
	}
}

impl FromStr for Identifier {
	type Err = DecodeError;

	fn from_str(s: &str) -> Result<Self> {
		Self::decode(s)
	}
}

impl Serialize for Identifier {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.encode())
	}
}

impl<'de> Deserialize<'de> for Identifier {
	fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		Self::decode(&s).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::entropy::OsEntropy;
	use crate::keys::KeyPair;
	use proptest::prelude::*;
	use std::io;

	struct FailingSource;

	impl Read for FailingSource {
		fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
			Err(io::Error::other("entropy pool unavailable"))
		}
	}

	#[test]
	fn generate_from_os_entropy() {
		let id = Identifier::generate(&mut OsEntropy).unwrap();
		assert_eq!(id.encode().len(), 43);
	}

	#[test]
	fn generated_identifier_is_clamped() {
		let mut source: &[u8] = &[0xff; 32];
		let id = Identifier::generate(&mut source).unwrap();
		assert_eq!(id.as_bytes()[0], 0xf8);
		assert_eq!(id.as_bytes()[31], 0x7f);
	}

	#[test]
	fn short_read_is_insufficient() {
		let mut source: &[u8] = &[1u8; 10];
		let err = Identifier::generate(&mut source).unwrap_err();
		assert!(matches!(
			err,
			EntropyError::Insufficient {
				expected: 32,
				got: 10
			}
		));
	}

	#[test]
	fn read_error_is_source_error() {
		let err = Identifier::generate(&mut FailingSource).unwrap_err();
		assert!(matches!(err, EntropyError::Source(_)));
		assert!(err.to_string().contains("entropy pool unavailable"));
	}

	#[test]
	fn decode_rejects_padded_input() {
		let id = Identifier::from_bytes([3u8; 32]);
		let padded = format!("{}=", id.encode());
		assert!(Identifier::decode(&padded).is_err());
	}

	#[test]
	fn decode_rejects_standard_alphabet() {
		// 0xfb bytes encode to '+' / '/' in the standard alphabet.
		let err = Identifier::decode("+/+/+/+/+/+/+/+/+/+/+/+/+/+/+/+/+/+/+/+/+/+").unwrap_err();
		assert!(matches!(err, DecodeError::InvalidBase64(_)));
	}

	#[test]
	fn decode_rejects_short_identifier() {
		let err = Identifier::decode("AAAAAAAA").unwrap_err();
		assert!(matches!(err, DecodeError::InvalidLength(6)));
	}

	#[test]
	fn debug_does_not_print_full_identifier() {
		let id = Identifier::from_bytes([5u8; 32]);
		let debug = format!("{id:?}");
		assert!(!debug.contains(&id.encode()));
	}

	#[test]
	fn serde_uses_encoded_form() {
		let id = Identifier::from_bytes([5u8; 32]);
		let json = serde_json::to_string(&id).unwrap();
		assert_eq!(json, format!("\"{}\"", id.encode()));
		let restored: Identifier = serde_json::from_str(&json).unwrap();
		assert_eq!(restored, id);
	}

	proptest! {
		#[test]
		fn encode_decode_roundtrip(seed in prop::array::uniform32(any::<u8>())) {
			let id = Identifier::from_bytes(seed);
			let decoded: Identifier = id.encode().parse().unwrap();
			prop_assert_eq!(decoded.as_bytes(), &seed);
		}

		#[test]
		fn same_identifier_same_keys(seed in prop::array::uniform32(any::<u8>())) {
			let id = Identifier::from_bytes(seed);
			let reparsed = Identifier::decode(&id.encode()).unwrap();
			let original = KeyPair::from_identifier(&id);
			let roundtripped = KeyPair::from_identifier(&reparsed);
			prop_assert_eq!(original.public_key(), roundtripped.public_key());
		}
	}
}
