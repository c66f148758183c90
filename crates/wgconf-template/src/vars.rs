// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Template variable mappings and their validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ValidationError;

/// A variable value as supplied by the user, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawVar {
	String(String),
	Bool(bool),
	Integer(i64),
	Float(f64),
	List(Vec<RawVar>),
	Map(BTreeMap<String, RawVar>),
}

impl From<&str> for RawVar {
	fn from(s: &str) -> Self {
		RawVar::String(s.to_string())
	}
}

impl From<String> for RawVar {
	fn from(s: String) -> Self {
		RawVar::String(s)
	}
}

pub type RawVars = BTreeMap<String, RawVar>;

/// Validated variables: every value is a string.
pub type TemplateVars = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
	List,
	Map,
}

impl fmt::Display for CompositeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CompositeKind::List => f.write_str("list"),
			CompositeKind::Map => f.write_str("map"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadVar {
	pub key: String,
	pub kind: CompositeKind,
}

impl fmt::Display for BadVar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.key, self.kind)
	}
}

/// Convert raw variables to strings, rejecting composite values.
///
/// Strings pass through, numbers and bools are formatted. Lists and maps are
/// collected across the whole mapping and reported in one error naming
/// `attribute`.
pub fn validate_vars(attribute: &str, raw: &RawVars) -> Result<TemplateVars, ValidationError> {
	let mut vars = TemplateVars::new();
	let mut bad_vars = Vec::new();

	for (key, value) in raw {
		let converted = match value {
			RawVar::String(s) => s.clone(),
			RawVar::Bool(b) => b.to_string(),
			RawVar::Integer(i) => i.to_string(),
			RawVar::Float(f) => f.to_string(),
			RawVar::List(_) => {
				bad_vars.push(BadVar {
					key: key.clone(),
					kind: CompositeKind::List,
				});
				continue;
			}
			RawVar::Map(_) => {
				bad_vars.push(BadVar {
					key: key.clone(),
					kind: CompositeKind::Map,
				});
				continue;
			}
		};
		vars.insert(key.clone(), converted);
	}

	if !bad_vars.is_empty() {
		return Err(ValidationError {
			attribute: attribute.to_string(),
			bad_vars,
		});
	}

	Ok(vars)
}
