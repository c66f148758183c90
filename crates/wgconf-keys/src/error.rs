// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// An externally supplied identifier or key is not valid base64 of 32 bytes.
#[derive(Error, Debug)]
pub enum DecodeError {
	#[error("invalid base64 encoding: {0}")]
	InvalidBase64(#[from] base64::DecodeError),

	#[error("invalid length: expected 32 bytes, got {0}")]
	InvalidLength(usize),
}

/// The entropy source failed to supply a full seed.
#[derive(Error, Debug)]
pub enum EntropyError {
	#[error("generated insufficient random bytes: expected {expected}, got {got}")]
	Insufficient { expected: usize, got: usize },

	#[error("error generating random bytes: {0}")]
	Source(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
