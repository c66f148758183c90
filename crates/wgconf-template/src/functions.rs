// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Function library available to template expressions.
//!
//! The library is handed to [`crate::TemplateRenderer`] at construction.
//! [`FunctionLibrary::builtin`] provides the string helpers typically needed
//! by WireGuard templates; hosts may register more.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::value::{format_number, Value};

/// Widest padding `indent` accepts.
pub const MAX_INDENT: usize = 1024;

pub type FunctionImpl = dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
	Exact(usize),
	AtLeast(usize),
}

impl Arity {
	pub fn accepts(&self, n: usize) -> bool {
		match self {
			Arity::Exact(want) => n == *want,
			Arity::AtLeast(min) => n >= *min,
		}
	}
}

impl fmt::Display for Arity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Arity::Exact(n) => write!(f, "{n}"),
			Arity::AtLeast(n) => write!(f, "at least {n}"),
		}
	}
}

#[derive(Clone)]
pub struct Function {
	pub arity: Arity,
	call: Arc<FunctionImpl>,
}

impl Function {
	pub fn call(&self, args: &[Value]) -> Result<Value, String> {
		(self.call)(args)
	}
}

#[derive(Clone, Default)]
pub struct FunctionLibrary {
	functions: HashMap<String, Function>,
}

impl FunctionLibrary {
	/// A library with no functions.
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn builtin() -> Self {
		let mut lib = Self::empty();
		lib.register("upper", Arity::Exact(1), |args| {
			Ok(Value::String(string_arg(args, 0)?.to_uppercase()))
		});
		lib.register("lower", Arity::Exact(1), |args| {
			Ok(Value::String(string_arg(args, 0)?.to_lowercase()))
		});
		lib.register("title", Arity::Exact(1), |args| {
			Ok(Value::String(title_case(&string_arg(args, 0)?)))
		});
		lib.register("trimspace", Arity::Exact(1), |args| {
			Ok(Value::String(string_arg(args, 0)?.trim().to_string()))
		});
		lib.register("trim", Arity::Exact(2), |args| {
			let s = string_arg(args, 0)?;
			let cutset = string_arg(args, 1)?;
			Ok(Value::String(
				s.trim_matches(|c: char| cutset.contains(c)).to_string(),
			))
		});
		lib.register("replace", Arity::Exact(3), |args| {
			let s = string_arg(args, 0)?;
			let from = string_arg(args, 1)?;
			let to = string_arg(args, 2)?;
			if from.is_empty() {
				return Ok(Value::String(s));
			}
			Ok(Value::String(s.replace(&from, &to)))
		});
		lib.register("join", Arity::AtLeast(2), builtin_join);
		lib.register("split", Arity::Exact(2), |args| {
			let sep = string_arg(args, 0)?;
			let s = string_arg(args, 1)?;
			if sep.is_empty() {
				return Err("separator must not be empty".to_string());
			}
			Ok(Value::List(
				s.split(sep.as_str()).map(Value::from).collect(),
			))
		});
		lib.register("concat", Arity::AtLeast(1), |args| {
			let mut out = Vec::new();
			for (i, arg) in args.iter().enumerate() {
				match arg {
					Value::List(items) => out.extend(items.iter().cloned()),
					other => {
						return Err(format!(
							"argument {} must be a list, got {}",
							i + 1,
							other.type_name()
						))
					}
				}
			}
			Ok(Value::List(out))
		});
		lib.register("length", Arity::Exact(1), |args| match &args[0] {
			Value::List(items) => Ok(Value::Number(items.len() as f64)),
			Value::String(s) => Ok(Value::Number(s.chars().count() as f64)),
			other => Err(format!("cannot take the length of a {}", other.type_name())),
		});
		lib.register("coalesce", Arity::AtLeast(1), |args| {
			args.iter()
				.filter_map(Value::to_primitive_string)
				.find(|s| !s.is_empty())
				.map(Value::String)
				.ok_or_else(|| "no non-empty arguments".to_string())
		});
		lib.register("format", Arity::AtLeast(1), builtin_format);
		lib.register("base64encode", Arity::Exact(1), |args| {
			Ok(Value::String(STANDARD.encode(string_arg(args, 0)?)))
		});
		lib.register("base64decode", Arity::Exact(1), |args| {
			let bytes = STANDARD
				.decode(string_arg(args, 0)?)
				.map_err(|e| format!("invalid base64: {e}"))?;
			String::from_utf8(bytes)
				.map(Value::String)
				.map_err(|_| "decoded bytes are not valid UTF-8".to_string())
		});
		lib.register("sha256", Arity::Exact(1), |args| {
			let digest = Sha256::digest(string_arg(args, 0)?.as_bytes());
			Ok(Value::String(hex::encode(digest)))
		});
		lib.register("indent", Arity::Exact(2), |args| {
			let spaces = whole_number_arg(args, 0, MAX_INDENT)?;
			let s = string_arg(args, 1)?;
			let pad = format!("\n{}", " ".repeat(spaces));
			Ok(Value::String(s.replace('\n', &pad)))
		});
		lib.register("tostring", Arity::Exact(1), |args| {
			string_arg(args, 0).map(Value::String)
		});
		lib.register("tonumber", Arity::Exact(1), |args| match &args[0] {
			Value::Number(n) => Ok(Value::Number(*n)),
			Value::String(s) => s
				.trim()
				.parse::<f64>()
				.map(Value::Number)
				.map_err(|_| format!("cannot convert {s:?} to a number")),
			other => Err(format!("cannot convert {} to a number", other.type_name())),
		});
		lib
	}

	/// Register `f` under `name`, replacing any existing function.
	pub fn register<F>(&mut self, name: &str, arity: Arity, f: F)
	where
		F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
	{
		self.functions.insert(
			name.to_string(),
			Function {
				arity,
				call: Arc::new(f),
			},
		);
	}

	pub fn get(&self, name: &str) -> Option<&Function> {
		self.functions.get(name)
	}

	pub fn len(&self) -> usize {
		self.functions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.functions.is_empty()
	}

	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}
}

impl fmt::Debug for FunctionLibrary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FunctionLibrary")
			.field("functions", &self.names())
			.finish()
	}
}

fn string_arg(args: &[Value], i: usize) -> Result<String, String> {
	let arg = &args[i];
	arg.to_primitive_string()
		.ok_or_else(|| format!("argument {} must be a string, got {}", i + 1, arg.type_name()))
}

fn whole_number_arg(args: &[Value], i: usize, max: usize) -> Result<usize, String> {
	let n = match &args[i] {
		Value::Number(n) => *n,
		Value::String(s) => s
			.trim()
			.parse::<f64>()
			.map_err(|_| format!("argument {} must be a number, got {s:?}", i + 1))?,
		other => {
			return Err(format!(
				"argument {} must be a number, got {}",
				i + 1,
				other.type_name()
			))
		}
	};
	if n < 0.0 || n.fract() != 0.0 {
		return Err(format!(
			"argument {} must be a non-negative whole number",
			i + 1
		));
	}
	if n > max as f64 {
		return Err(format!("argument {} must be at most {max}, got {n}", i + 1));
	}
	Ok(n as usize)
}

fn title_case(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	let mut at_word_start = true;
	for c in s.chars() {
		if at_word_start {
			out.extend(c.to_uppercase());
		} else {
			out.push(c);
		}
		at_word_start = c.is_whitespace();
	}
	out
}

fn builtin_join(args: &[Value]) -> Result<Value, String> {
	let sep = string_arg(args, 0)?;
	let mut items = Vec::new();
	for (i, arg) in args.iter().enumerate().skip(1) {
		let Value::List(list) = arg else {
			return Err(format!(
				"argument {} must be a list, got {}",
				i + 1,
				arg.type_name()
			));
		};
		for item in list {
			items.push(
				item.to_primitive_string()
					.ok_or_else(|| "cannot join nested lists".to_string())?,
			);
		}
	}
	Ok(Value::String(items.join(&sep)))
}

/// `format(spec, args...)` with `%s`, `%v`, `%d` and `%%` verbs.
fn builtin_format(args: &[Value]) -> Result<Value, String> {
	let spec = string_arg(args, 0)?;
	let mut rest = args[1..].iter();
	let mut out = String::new();
	let mut chars = spec.chars();

	while let Some(c) = chars.next() {
		if c != '%' {
			out.push(c);
			continue;
		}
		let verb = chars
			.next()
			.ok_or_else(|| "format string ends with a lone '%'".to_string())?;
		if verb == '%' {
			out.push('%');
			continue;
		}
		let arg = rest
			.next()
			.ok_or_else(|| format!("not enough arguments for %{verb}"))?;
		match verb {
			's' | 'v' => out.push_str(
				&arg.to_primitive_string()
					.ok_or_else(|| format!("cannot format a {} with %{verb}", arg.type_name()))?,
			),
			'd' => match arg {
				Value::Number(n) if n.fract() == 0.0 => out.push_str(&format_number(*n)),
				other => {
					return Err(format!("%d requires a whole number, got {}", other.type_name()))
				}
			},
			other => return Err(format!("unsupported format verb %{other}")),
		}
	}

	if rest.next().is_some() {
		return Err("too many arguments for format string".to_string());
	}
	Ok(Value::String(out))
}
