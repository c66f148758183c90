// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;
use wgconf_keys::{KeyPair, REDACTED};
use wgconf_template::TemplateVars;
use zeroize::Zeroize;

pub const PRIVATE_KEY_VAR: &str = "private_key";
pub const PUBLIC_KEY_VAR: &str = "public_key";

/// Variables a peer's templates are rendered with: the derived keys plus
/// the caller's variables.
///
/// Caller variables are merged after the key fields, so a caller variable
/// named `private_key` or `public_key` replaces the derived value. Values
/// are zeroized on drop.
pub struct TemplateContext {
	vars: TemplateVars,
}

impl TemplateContext {
	pub fn new(pair: &KeyPair, vars: &TemplateVars) -> Self {
		let mut ctx = TemplateVars::new();
		ctx.insert(
			PRIVATE_KEY_VAR.to_string(),
			pair.private_key().to_base64().expose().clone(),
		);
		ctx.insert(PUBLIC_KEY_VAR.to_string(), pair.public_key().to_base64());
		for (k, v) in vars {
			ctx.insert(k.clone(), v.clone());
		}
		Self { vars: ctx }
	}

	pub fn vars(&self) -> &TemplateVars {
		&self.vars
	}
}

impl Drop for TemplateContext {
	fn drop(&mut self) {
		for value in self.vars.values_mut() {
			value.zeroize();
		}
	}
}

impl fmt::Debug for TemplateContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut map = f.debug_map();
		for (k, v) in &self.vars {
			if k == PRIVATE_KEY_VAR {
				map.entry(k, &REDACTED);
			} else {
				map.entry(k, v);
			}
		}
		map.finish()
	}
}
