// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::vars::BadVar;

/// Malformed template syntax.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
	pub message: String,
	pub line: usize,
	pub column: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
	#[error("undefined variable {name:?} at {line}:{column}")]
	UndefinedVariable {
		name: String,
		line: usize,
		column: usize,
	},

	#[error("call to unknown function {name:?} at {line}:{column}")]
	UnknownFunction {
		name: String,
		line: usize,
		column: usize,
	},

	#[error("function {function:?} expects {expected} argument(s), got {got}")]
	Arity {
		function: String,
		expected: String,
		got: usize,
	},

	#[error("call to function {function:?} failed: {message}")]
	Function { function: String, message: String },

	#[error("cannot interpolate a {found} value into a template")]
	InvalidInterpolation { found: &'static str },
}

/// Failure to render a template. Parse, evaluation and result coercion
/// failures are kept apart so callers can report them precisely.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
	#[error("template parse error at {0}")]
	Parse(#[from] ParseError),

	#[error("template evaluation failed: {0}")]
	Evaluation(#[from] EvalError),

	#[error("invalid template result: cannot convert {found} to string")]
	Coercion { found: &'static str },
}

/// A variable mapping holds list or map values. Every offending key is
/// reported at once.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{attribute}: cannot contain non-primitives; bad keys: {}", join_bad_vars(.bad_vars))]
pub struct ValidationError {
	pub attribute: String,
	pub bad_vars: Vec<BadVar>,
}

fn join_bad_vars(bad: &[BadVar]) -> String {
	bad.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(", ")
}
