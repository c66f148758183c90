// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// A value produced while evaluating a template expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	String(String),
	Number(f64),
	Bool(bool),
	List(Vec<Value>),
}

impl Value {
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::String(_) => "string",
			Value::Number(_) => "number",
			Value::Bool(_) => "bool",
			Value::List(_) => "list",
		}
	}

	/// String form of a primitive value; `None` for lists.
	pub fn to_primitive_string(&self) -> Option<String> {
		match self {
			Value::String(s) => Some(s.clone()),
			Value::Number(n) => Some(format_number(*n)),
			Value::Bool(b) => Some(b.to_string()),
			Value::List(_) => None,
		}
	}

	pub fn into_primitive_string(self) -> Option<String> {
		match self {
			Value::String(s) => Some(s),
			other => other.to_primitive_string(),
		}
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::String(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::String(s)
	}
}

pub(crate) fn format_number(n: f64) -> String {
	if n.fract() == 0.0 && n.abs() < 1e15 {
		format!("{}", n as i64)
	} else {
		n.to_string()
	}
}
