// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Entropy sources for identifier generation.
//!
//! Any [`std::io::Read`] can act as an entropy source. Generation performs a
//! single read and treats a short read as fatal, so sources that may return
//! partial data are never retried.

use rand::rngs::OsRng;
use rand::RngCore;
use std::io;

/// The process-wide secure random generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl io::Read for OsEntropy {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		OsRng.try_fill_bytes(buf).map_err(io::Error::other)?;
		Ok(buf.len())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Read;

	#[test]
	fn os_entropy_fills_whole_buffer() {
		let mut buf = [0u8; 32];
		let n = OsEntropy.read(&mut buf).unwrap();
		assert_eq!(n, 32);
	}

	#[test]
	fn os_entropy_differs_between_reads() {
		let mut a = [0u8; 32];
		let mut b = [0u8; 32];
		OsEntropy.read(&mut a).unwrap();
		OsEntropy.read(&mut b).unwrap();
		assert_ne!(a, b);
	}
}
